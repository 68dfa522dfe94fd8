use uuid::Uuid;
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! define_id_type {
    ($name:ident) => {
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub Uuid);

        impl $name {
            pub fn new() -> Self {
                $name(Uuid::new_v4())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_id_type!(LoanContractId);
define_id_type!(RepaymentId);
define_id_type!(WalletId);
define_id_type!(TransactionId);
define_id_type!(FeeId);
define_id_type!(FarmerId);
define_id_type!(LenderId);

impl LoanContractId {
    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        Ok(LoanContractId(Uuid::parse_str(s)?))
    }
}

impl FarmerId {
    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        Ok(FarmerId(Uuid::parse_str(s)?))
    }
}

impl LenderId {
    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        Ok(LenderId(Uuid::parse_str(s)?))
    }
}
