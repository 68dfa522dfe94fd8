use std::sync::Arc;
use crate::error::Warning;
use crate::interfaces::store::SettlementStore;
use crate::observability::metrics;
use crate::types::ids::LoanContractId;
use crate::types::money::Money;

/// Flips a contract to closed once cumulative settled repayments reach the
/// contractual total. Closure is one way; everything here is non-fatal to
/// the settlement that triggered it.
pub struct LoanCloser {
    store: Arc<dyn SettlementStore>,
}

impl LoanCloser {
    pub fn new(store: Arc<dyn SettlementStore>) -> Self {
        LoanCloser {
            store,
        }
    }

    /// Returns true when this call closed the loan.
    pub fn maybe_close(&self, id: LoanContractId) -> std::result::Result<bool, Warning> {
        let loan = self.store.loan(id).map_err(|e| Warning {
            step: "loan_closure",
            details: e.to_string(),
        })?;

        if loan.is_closed() {
            return Ok(false);
        }

        let total_paid = self.store
            .repayments_for_loan(id)
            .iter()
            .filter(|r| r.is_settled())
            .fold(Money::zero(), |acc, r| acc + r.amount_paid);

        if total_paid < loan.total_repayment_due {
            return Ok(false);
        }

        let closed = self.store.close_loan(id).map_err(|e| Warning {
            step: "loan_closure",
            details: e.to_string(),
        })?;

        if closed {
            metrics::LOANS_CLOSED.inc();
            tracing::info!(
                "Loan {} fully repaid ({} >= {}), closed",
                id,
                total_paid,
                loan.total_repayment_due
            );
        }

        Ok(closed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use crate::store::MemoryStore;
    use crate::types::ids::{FarmerId, LenderId, RepaymentId};
    use crate::types::loan::{LoanContract, LoanStatus};
    use crate::types::repayment::RepaymentRecord;

    fn seed(store: &MemoryStore, total_due_naira: i64) -> LoanContract {
        let loan = LoanContract::new(
            FarmerId::new(),
            LenderId::new(),
            Money::from_naira(total_due_naira),
            15.0,
            Money::from_naira(total_due_naira),
        );
        store.insert_loan(loan.clone()).unwrap();
        loan
    }

    fn settled_repayment(loan: &LoanContract, amount_naira: i64) -> RepaymentRecord {
        RepaymentRecord {
            id: RepaymentId::new(),
            loan_contract_id: loan.id,
            amount_paid: Money::from_naira(amount_naira),
            interest_portion: Money::zero(),
            penalty_amount: Money::zero(),
            date_paid: Some(Utc::now()),
            due_date: None,
        }
    }

    #[test]
    fn test_closes_at_threshold() {
        let store = Arc::new(MemoryStore::new());
        let loan = seed(&store, 100_000);
        store.insert_repayment(settled_repayment(&loan, 60_000)).unwrap();

        let closer = LoanCloser::new(store.clone());
        assert!(!closer.maybe_close(loan.id).unwrap());

        store.insert_repayment(settled_repayment(&loan, 50_000)).unwrap();
        assert!(closer.maybe_close(loan.id).unwrap());
        assert_eq!(store.loan(loan.id).unwrap().status, LoanStatus::Closed);
    }

    #[test]
    fn test_reclose_is_noop() {
        let store = Arc::new(MemoryStore::new());
        let loan = seed(&store, 10_000);
        store.insert_repayment(settled_repayment(&loan, 10_000)).unwrap();

        let closer = LoanCloser::new(store.clone());
        assert!(closer.maybe_close(loan.id).unwrap());
        assert!(!closer.maybe_close(loan.id).unwrap());
        assert_eq!(store.loan(loan.id).unwrap().status, LoanStatus::Closed);
    }

    #[test]
    fn test_unsettled_repayments_do_not_count() {
        let store = Arc::new(MemoryStore::new());
        let loan = seed(&store, 10_000);
        let mut pending = settled_repayment(&loan, 10_000);
        pending.date_paid = None;
        store.insert_repayment(pending).unwrap();

        let closer = LoanCloser::new(store.clone());
        assert!(!closer.maybe_close(loan.id).unwrap());
        assert_eq!(store.loan(loan.id).unwrap().status, LoanStatus::Active);
    }

    #[test]
    fn test_unknown_loan_is_warning() {
        let store = Arc::new(MemoryStore::new());
        let closer = LoanCloser::new(store);
        assert!(closer.maybe_close(LoanContractId::new()).is_err());
    }
}
