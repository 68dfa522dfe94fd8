use crate::types::ids::{LoanContractId, RepaymentId};
use crate::types::money::Money;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One settled repayment against a loan contract. Immutable once recorded;
/// the penalty is fixed at creation time.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RepaymentRecord {
    pub id: RepaymentId,
    pub loan_contract_id: LoanContractId,
    pub amount_paid: Money,
    pub interest_portion: Money,
    pub penalty_amount: Money,
    pub date_paid: Option<DateTime<Utc>>,  // None until settled
    pub due_date: Option<DateTime<Utc>>,
}

impl RepaymentRecord {
    pub fn is_settled(&self) -> bool {
        self.date_paid.is_some()
    }
}
