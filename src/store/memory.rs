use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use crate::error::{Error, Result};
use crate::interfaces::store::{Claim, SettlementStore};
use crate::types::ids::{FeeId, LenderId, LoanContractId, RepaymentId, TransactionId, WalletId};
use crate::types::loan::{LoanContract, LoanStatus};
use crate::types::money::Money;
use crate::types::payment::{FeeStatus, PaymentRecord, PaymentStatus, PlatformFee};
use crate::types::repayment::RepaymentRecord;
use crate::types::wallet::{TransactionStatus, TransactionType, Wallet, WalletTransaction};

/// Wallet row plus its append-only ledger, kept under one map entry so a
/// credit mutates both in a single critical section.
struct WalletLedger {
    wallet: Wallet,
    transactions: Vec<WalletTransaction>,
}

pub struct MemoryStore {
    loans: DashMap<LoanContractId, LoanContract>,
    repayments: DashMap<LoanContractId, Vec<RepaymentRecord>>,
    wallets: DashMap<LenderId, WalletLedger>,
    payments: DashMap<String, PaymentRecord>,  // Keyed by primary reference
    fees: DashMap<FeeId, PlatformFee>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore {
            loans: DashMap::new(),
            repayments: DashMap::new(),
            wallets: DashMap::new(),
            payments: DashMap::new(),
            fees: DashMap::new(),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SettlementStore for MemoryStore {
    fn insert_loan(&self, loan: LoanContract) -> Result<()> {
        match self.loans.entry(loan.id) {
            Entry::Occupied(_) => Err(Error::ContractAlreadyExists(loan.id)),
            Entry::Vacant(v) => {
                v.insert(loan);
                Ok(())
            }
        }
    }

    fn loan(&self, id: LoanContractId) -> Result<LoanContract> {
        self.loans.get(&id)
            .map(|l| l.clone())
            .ok_or(Error::ContractNotFound(id))
    }

    fn close_loan(&self, id: LoanContractId) -> Result<bool> {
        let mut loan = self.loans.get_mut(&id)
            .ok_or(Error::ContractNotFound(id))?;

        if loan.status == LoanStatus::Closed {
            return Ok(false);
        }
        loan.status = LoanStatus::Closed;
        Ok(true)
    }

    fn insert_repayment(&self, record: RepaymentRecord) -> Result<()> {
        self.repayments
            .entry(record.loan_contract_id)
            .or_default()
            .push(record);
        Ok(())
    }

    fn repayments_for_loan(&self, id: LoanContractId) -> Vec<RepaymentRecord> {
        self.repayments.get(&id)
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    fn create_wallet(&self, owner: LenderId) -> Result<Wallet> {
        match self.wallets.entry(owner) {
            Entry::Occupied(_) => Err(Error::WalletAlreadyExists(owner)),
            Entry::Vacant(v) => {
                let wallet = Wallet::new(owner);
                v.insert(WalletLedger {
                    wallet: wallet.clone(),
                    transactions: Vec::new(),
                });
                Ok(wallet)
            }
        }
    }

    fn wallet_for_lender(&self, owner: LenderId) -> Result<Wallet> {
        self.wallets.get(&owner)
            .map(|l| l.wallet.clone())
            .ok_or(Error::WalletNotFound(owner))
    }

    fn credit_wallet(
        &self,
        owner: LenderId,
        amount: Money,
        reference: &str,
    ) -> Result<WalletTransaction> {
        // The entry guard serializes concurrent credits to one wallet; the
        // ledger append and the balance update cannot be observed apart.
        let mut ledger = self.wallets.get_mut(&owner)
            .ok_or(Error::WalletNotFound(owner))?;

        let new_balance = ledger.wallet.balance + amount;
        let transaction = WalletTransaction {
            id: TransactionId::new(),
            wallet_id: ledger.wallet.id,
            transaction_type: TransactionType::LoanRepayment,
            amount,
            running_balance: new_balance,
            reference: reference.to_string(),
            status: TransactionStatus::Successful,
            created_at: Utc::now(),
        };

        ledger.transactions.push(transaction.clone());
        ledger.wallet.balance = new_balance;
        ledger.wallet.updated_at = transaction.created_at;

        Ok(transaction)
    }

    fn transactions_for_wallet(&self, id: WalletId) -> Vec<WalletTransaction> {
        self.wallets.iter()
            .find(|l| l.wallet.id == id)
            .map(|l| l.transactions.clone())
            .unwrap_or_default()
    }

    fn insert_payment(&self, record: PaymentRecord) -> Result<()> {
        match self.payments.entry(record.reference.clone()) {
            Entry::Occupied(_) => Err(Error::PaymentRecordAlreadyExists(record.reference)),
            Entry::Vacant(v) => {
                v.insert(record);
                Ok(())
            }
        }
    }

    fn payment_by_reference(&self, reference: &str) -> Option<PaymentRecord> {
        if let Some(record) = self.payments.get(reference) {
            return Some(record.clone());
        }

        // Fall back to the gateway's own reference
        self.payments.iter()
            .find(|r| r.gateway_reference.as_deref() == Some(reference))
            .map(|r| r.clone())
    }

    fn claim_payment(&self, record: PaymentRecord) -> Result<Claim> {
        match self.payments.entry(record.reference.clone()) {
            Entry::Occupied(mut o) => {
                if o.get().status == PaymentStatus::Completed {
                    return Ok(Claim::AlreadyCompleted(o.get().clone()));
                }
                let mut claimed = record;
                claimed.status = PaymentStatus::Completed;
                o.insert(claimed.clone());
                Ok(Claim::Claimed(claimed))
            }
            Entry::Vacant(v) => {
                let mut claimed = record;
                claimed.status = PaymentStatus::Completed;
                v.insert(claimed.clone());
                Ok(Claim::Claimed(claimed))
            }
        }
    }

    fn attach_repayment(&self, reference: &str, repayment_id: RepaymentId) -> Result<()> {
        let mut record = self.payments.get_mut(reference)
            .ok_or_else(|| Error::PaymentRecordNotFound(reference.to_string()))?;
        record.repayment_id = Some(repayment_id);
        Ok(())
    }

    fn insert_fee(&self, fee: PlatformFee) -> Result<()> {
        self.fees.insert(fee.id, fee);
        Ok(())
    }

    fn pending_fee_for_loan(&self, id: LoanContractId) -> Option<PlatformFee> {
        self.fees.iter()
            .find(|f| f.loan_contract_id == id && f.status == FeeStatus::Pending)
            .map(|f| f.clone())
    }

    fn collect_fee(&self, id: FeeId) -> Result<()> {
        let mut fee = self.fees.get_mut(&id)
            .ok_or(Error::PaymentRecordNotFound(id.to_string()))?;
        fee.status = FeeStatus::Collected;
        fee.collected_at = Some(Utc::now());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ids::FarmerId;

    fn pending_record(reference: &str) -> PaymentRecord {
        PaymentRecord {
            reference: reference.to_string(),
            gateway_reference: None,
            status: PaymentStatus::Pending,
            loan_contract_id: LoanContractId::new(),
            farmer_id: FarmerId::new(),
            lender_id: LenderId::new(),
            amount: Money::from_naira(10_000),
            platform_fee: Money::from_naira(100),
            repayment_id: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_credit_updates_balance_and_running_balance() {
        let store = MemoryStore::new();
        let lender = LenderId::new();
        store.create_wallet(lender).unwrap();

        let t1 = store.credit_wallet(lender, Money::from_naira(100), "ref-1").unwrap();
        let t2 = store.credit_wallet(lender, Money::from_naira(250), "ref-2").unwrap();

        assert_eq!(t1.running_balance, Money::from_naira(100));
        assert_eq!(t2.running_balance, Money::from_naira(350));
        assert_eq!(
            store.wallet_for_lender(lender).unwrap().balance,
            Money::from_naira(350)
        );
    }

    #[test]
    fn test_credit_missing_wallet_fails() {
        let store = MemoryStore::new();
        let result = store.credit_wallet(LenderId::new(), Money::from_naira(100), "ref");
        assert!(matches!(result, Err(Error::WalletNotFound(_))));
    }

    #[test]
    fn test_claim_is_exactly_once() {
        let store = MemoryStore::new();
        let record = pending_record("ref-dup");
        store.insert_payment(record.clone()).unwrap();

        let first = store.claim_payment(record.clone()).unwrap();
        let second = store.claim_payment(record).unwrap();

        assert!(matches!(first, Claim::Claimed(_)));
        assert!(matches!(second, Claim::AlreadyCompleted(_)));
    }

    #[test]
    fn test_claim_without_prior_record() {
        let store = MemoryStore::new();
        let claim = store.claim_payment(pending_record("ref-new")).unwrap();

        match claim {
            Claim::Claimed(record) => assert_eq!(record.status, PaymentStatus::Completed),
            Claim::AlreadyCompleted(_) => panic!("fresh reference should be claimable"),
        }
    }

    #[test]
    fn test_attach_repayment_survives_lookup() {
        let store = MemoryStore::new();
        let record = pending_record("ref-attach");
        store.insert_payment(record.clone()).unwrap();
        store.claim_payment(record).unwrap();

        let repayment_id = RepaymentId::new();
        store.attach_repayment("ref-attach", repayment_id).unwrap();

        assert_eq!(
            store.payment_by_reference("ref-attach").unwrap().repayment_id,
            Some(repayment_id)
        );
    }

    #[test]
    fn test_attach_repayment_unknown_reference_fails() {
        let store = MemoryStore::new();
        let result = store.attach_repayment("ref-ghost", RepaymentId::new());
        assert!(matches!(result, Err(Error::PaymentRecordNotFound(_))));
    }

    #[test]
    fn test_lookup_by_gateway_reference() {
        let store = MemoryStore::new();
        let mut record = pending_record("ref-primary");
        record.gateway_reference = Some("gw-42".to_string());
        store.insert_payment(record).unwrap();

        assert!(store.payment_by_reference("ref-primary").is_some());
        assert!(store.payment_by_reference("gw-42").is_some());
        assert!(store.payment_by_reference("gw-43").is_none());
    }

    #[test]
    fn test_close_loan_is_one_way() {
        let store = MemoryStore::new();
        let loan = LoanContract::new(
            FarmerId::new(),
            LenderId::new(),
            Money::from_naira(80_000),
            15.0,
            Money::from_naira(92_000),
        );
        let id = loan.id;
        store.insert_loan(loan).unwrap();

        assert!(store.close_loan(id).unwrap());
        assert!(!store.close_loan(id).unwrap());
        assert_eq!(store.loan(id).unwrap().status, LoanStatus::Closed);
    }
}
