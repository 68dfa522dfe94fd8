use crate::types::ids::{FarmerId, FeeId, LenderId, LoanContractId, RepaymentId};
use crate::types::money::Money;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Completed,
}

/// Tracking row for one external payment attempt, keyed by the gateway
/// reference. At most one record per reference ever reaches `Completed`;
/// that transition is the idempotency gate for the whole settlement.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub reference: String,
    pub gateway_reference: Option<String>,
    pub status: PaymentStatus,
    pub loan_contract_id: LoanContractId,
    pub farmer_id: FarmerId,
    pub lender_id: LenderId,
    pub amount: Money,
    pub platform_fee: Money,
    /// Set once the ledger write succeeds, so duplicate settlement calls
    /// return the same repayment as the first.
    pub repayment_id: Option<RepaymentId>,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeeStatus {
    Pending,
    Collected,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlatformFee {
    pub id: FeeId,
    pub loan_contract_id: LoanContractId,
    pub amount: Money,
    pub status: FeeStatus,
    pub collected_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl PlatformFee {
    pub fn pending(loan_contract_id: LoanContractId, amount: Money) -> Self {
        PlatformFee {
            id: FeeId::new(),
            loan_contract_id,
            amount,
            status: FeeStatus::Pending,
            collected_at: None,
            created_at: Utc::now(),
        }
    }
}
