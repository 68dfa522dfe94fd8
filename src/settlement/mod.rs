pub mod engine;
pub mod ledger_writer;
pub mod loan_closer;
pub mod reconciliation;

pub use engine::{SettlementEngine, SettlementOutcome};
