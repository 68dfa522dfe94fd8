use serde::{Deserialize, Serialize};

pub mod fees;
pub mod gateway;
pub mod loader;

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct LoanConfig {
    pub duration_days: i64,
}

impl Default for LoanConfig {
    fn default() -> Self {
        LoanConfig {
            duration_days: 270,  // One growing season
        }
    }
}
