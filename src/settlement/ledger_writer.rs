use std::sync::Arc;
use chrono::{DateTime, Duration, Utc};
use crate::config::LoanConfig;
use crate::error::{Error, Result, Warning};
use crate::interfaces::store::SettlementStore;
use crate::observability::metrics;
use crate::types::ids::{LenderId, LoanContractId, RepaymentId};
use crate::types::money::Money;
use crate::types::repayment::RepaymentRecord;
use crate::types::wallet::WalletTransaction;

/// What one settlement left in the books.
pub struct SettlementEntry {
    pub repayment: RepaymentRecord,
    pub transaction: WalletTransaction,
}

/// Writes the durable outcome of a verified payment: the repayment record
/// and the wallet credit. Callers have already verified the payment and won
/// the idempotency gate for its reference.
pub struct LedgerWriter {
    store: Arc<dyn SettlementStore>,
    loan_config: LoanConfig,
}

impl LedgerWriter {
    pub fn new(store: Arc<dyn SettlementStore>, loan_config: LoanConfig) -> Self {
        LedgerWriter {
            store,
            loan_config,
        }
    }

    pub fn record_settlement(
        &self,
        loan_contract_id: LoanContractId,
        lender: LenderId,
        amount: Money,
        interest_portion: Money,
        penalty: Money,
        reference: &str,
    ) -> Result<SettlementEntry> {
        if !amount.is_positive() {
            return Err(Error::InvalidAmount(amount));
        }

        // A missing due date never blocks crediting the lender.
        let due_date = match self.compute_due_date(loan_contract_id) {
            Ok(date) => Some(date),
            Err(warning) => {
                tracing::warn!("Due date not recorded for {}: {}", reference, warning);
                None
            }
        };

        let repayment = RepaymentRecord {
            id: RepaymentId::new(),
            loan_contract_id,
            amount_paid: amount,
            interest_portion,
            penalty_amount: penalty,
            date_paid: Some(Utc::now()),
            due_date,
        };
        self.store.insert_repayment(repayment.clone())?;

        // WalletNotFound here is fatal: the payment is confirmed but there is
        // no destination for the funds.
        let transaction = self.store.credit_wallet(lender, amount, reference)?;

        metrics::WALLET_CREDIT_VOLUME.inc_by(amount.to_kobo() as f64);
        tracing::info!(
            "Credited wallet {} with {} kobo (running balance {})",
            transaction.wallet_id,
            amount,
            transaction.running_balance
        );

        Ok(SettlementEntry {
            repayment,
            transaction,
        })
    }

    fn compute_due_date(
        &self,
        loan_contract_id: LoanContractId,
    ) -> std::result::Result<DateTime<Utc>, Warning> {
        let loan = self.store.loan(loan_contract_id).map_err(|e| Warning {
            step: "due_date",
            details: e.to_string(),
        })?;

        Ok(loan.created_at + Duration::days(self.loan_config.duration_days))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::types::ids::FarmerId;
    use crate::types::loan::LoanContract;

    fn writer_with_store() -> (LedgerWriter, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let writer = LedgerWriter::new(store.clone(), LoanConfig::default());
        (writer, store)
    }

    fn seed_loan(store: &MemoryStore) -> LoanContract {
        let loan = LoanContract::new(
            FarmerId::new(),
            LenderId::new(),
            Money::from_naira(40_000),
            15.0,
            Money::from_naira(46_000),
        );
        store.insert_loan(loan.clone()).unwrap();
        loan
    }

    #[test]
    fn test_record_settlement_credits_wallet() {
        let (writer, store) = writer_with_store();
        let loan = seed_loan(&store);
        store.create_wallet(loan.lender).unwrap();

        let entry = writer
            .record_settlement(
                loan.id,
                loan.lender,
                Money::from_naira(45_000),
                Money::from_naira(5_000),
                Money::zero(),
                "ref-1",
            )
            .unwrap();

        assert_eq!(entry.repayment.amount_paid, Money::from_naira(45_000));
        assert!(entry.repayment.is_settled());
        assert!(entry.repayment.due_date.is_some());
        assert_eq!(entry.transaction.running_balance, Money::from_naira(45_000));
        assert_eq!(
            store.wallet_for_lender(loan.lender).unwrap().balance,
            Money::from_naira(45_000)
        );
    }

    #[test]
    fn test_missing_wallet_is_fatal() {
        let (writer, store) = writer_with_store();
        let loan = seed_loan(&store);

        let result = writer.record_settlement(
            loan.id,
            loan.lender,
            Money::from_naira(10_000),
            Money::zero(),
            Money::zero(),
            "ref-2",
        );

        assert!(matches!(result, Err(Error::WalletNotFound(_))));
    }

    #[test]
    fn test_missing_loan_only_drops_due_date() {
        let (writer, store) = writer_with_store();
        let lender = LenderId::new();
        store.create_wallet(lender).unwrap();

        let entry = writer
            .record_settlement(
                LoanContractId::new(),
                lender,
                Money::from_naira(5_000),
                Money::zero(),
                Money::zero(),
                "ref-3",
            )
            .unwrap();

        assert!(entry.repayment.due_date.is_none());
        assert_eq!(
            store.wallet_for_lender(lender).unwrap().balance,
            Money::from_naira(5_000)
        );
    }

    #[test]
    fn test_non_positive_amount_rejected() {
        let (writer, store) = writer_with_store();
        let loan = seed_loan(&store);
        store.create_wallet(loan.lender).unwrap();

        let result = writer.record_settlement(
            loan.id,
            loan.lender,
            Money::zero(),
            Money::zero(),
            Money::zero(),
            "ref-4",
        );

        assert!(matches!(result, Err(Error::InvalidAmount(_))));
    }
}
