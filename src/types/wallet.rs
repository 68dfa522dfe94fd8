use crate::types::ids::{LenderId, TransactionId, WalletId};
use crate::types::money::Money;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Wallet {
    pub id: WalletId,
    pub owner: LenderId,
    pub balance: Money,
    pub locked_balance: Money,  // Held by the withdrawal flow, never touched here
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Wallet {
    pub fn new(owner: LenderId) -> Self {
        let now = Utc::now();
        Wallet {
            id: WalletId::new(),
            owner,
            balance: Money::zero(),
            locked_balance: Money::zero(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn available_balance(&self) -> Money {
        self.balance - self.locked_balance
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    LoanRepayment,
    Deposit,
    Withdrawal,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    Successful,
    Failed,
}

/// Append-only wallet ledger entry. `running_balance` is the wallet balance
/// immediately after this transaction applied.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WalletTransaction {
    pub id: TransactionId,
    pub wallet_id: WalletId,
    pub transaction_type: TransactionType,
    pub amount: Money,
    pub running_balance: Money,
    pub reference: String,
    pub status: TransactionStatus,
    pub created_at: DateTime<Utc>,
}
