use crate::error::{Error, Result};
use crate::interfaces::store::SettlementStore;
use crate::types::ids::LenderId;
use crate::types::money::Money;

pub struct Reconciliation;

impl Reconciliation {
    /// Reconcile a wallet balance with its transaction ledger
    pub fn reconcile_wallet(store: &dyn SettlementStore, lender: LenderId) -> Result<()> {
        let wallet = store.wallet_for_lender(lender)?;

        // Recompute balance from the ledger
        let ledger_balance = store
            .transactions_for_wallet(wallet.id)
            .iter()
            .fold(Money::zero(), |acc, t| acc + t.amount);

        if wallet.balance != ledger_balance {
            return Err(Error::ReconciliationFailed {
                expected: ledger_balance,
                actual: wallet.balance,
            });
        }

        Ok(())
    }

    /// Verify each transaction's stored running balance against a replay of
    /// the ledger
    pub fn verify_running_balances(store: &dyn SettlementStore, lender: LenderId) -> Result<()> {
        let wallet = store.wallet_for_lender(lender)?;

        let mut running = Money::zero();
        for transaction in store.transactions_for_wallet(wallet.id) {
            running = running + transaction.amount;
            if transaction.running_balance != running {
                return Err(Error::RunningBalanceMismatch {
                    transaction_id: transaction.id,
                    expected: running,
                    actual: transaction.running_balance,
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn test_reconcile_after_credits() {
        let store = MemoryStore::new();
        let lender = LenderId::new();
        store.create_wallet(lender).unwrap();

        store.credit_wallet(lender, Money::from_naira(12_000), "r1").unwrap();
        store.credit_wallet(lender, Money::from_naira(8_000), "r2").unwrap();

        Reconciliation::reconcile_wallet(&store, lender).unwrap();
        Reconciliation::verify_running_balances(&store, lender).unwrap();
    }

    #[test]
    fn test_empty_wallet_reconciles() {
        let store = MemoryStore::new();
        let lender = LenderId::new();
        store.create_wallet(lender).unwrap();

        Reconciliation::reconcile_wallet(&store, lender).unwrap();
    }

    #[test]
    fn test_unknown_lender_fails() {
        let store = MemoryStore::new();
        assert!(Reconciliation::reconcile_wallet(&store, LenderId::new()).is_err());
    }
}
