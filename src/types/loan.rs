use crate::types::ids::{FarmerId, LenderId, LoanContractId};
use crate::types::money::Money;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanStatus {
    Active,
    Closed,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LoanContract {
    pub id: LoanContractId,
    pub borrower: FarmerId,
    pub lender: LenderId,
    pub principal_disbursed: Money,
    pub interest_rate: f64,  // Flat rate, percent
    pub total_repayment_due: Money,  // Principal plus interest
    pub created_at: DateTime<Utc>,
    pub status: LoanStatus,
}

impl LoanContract {
    pub fn new(
        borrower: FarmerId,
        lender: LenderId,
        principal: Money,
        interest_rate: f64,
        total_repayment_due: Money,
    ) -> Self {
        LoanContract {
            id: LoanContractId::new(),
            borrower,
            lender,
            principal_disbursed: principal,
            interest_rate,
            total_repayment_due,
            created_at: Utc::now(),
            status: LoanStatus::Active,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.status == LoanStatus::Closed
    }
}
