use thiserror::Error;
use crate::types::ids::{LenderId, LoanContractId, TransactionId};
use crate::types::money::Money;

#[derive(Error, Debug)]
pub enum Error {
    // Gateway Errors
    #[error("Gateway unreachable: {0}")]
    GatewayUnreachable(String),

    #[error("Payment verification failed for {reference}: {reason}")]
    VerificationFailed {
        reference: String,
        reason: String,
    },

    #[error("Gateway metadata missing for {reference}: {missing}")]
    MissingMetadata {
        reference: String,
        missing: &'static str,
        payload: String,
    },

    // Referential Errors
    #[error("Loan contract not found: {0}")]
    ContractNotFound(LoanContractId),

    #[error("Loan contract already exists: {0}")]
    ContractAlreadyExists(LoanContractId),

    #[error("Wallet not found for lender: {0}")]
    WalletNotFound(LenderId),

    #[error("Wallet already exists for lender: {0}")]
    WalletAlreadyExists(LenderId),

    #[error("Payment record not found: {0}")]
    PaymentRecordNotFound(String),

    #[error("Payment record already exists: {0}")]
    PaymentRecordAlreadyExists(String),

    // Settlement Errors
    #[error("Invalid repayment amount: {0}")]
    InvalidAmount(Money),

    #[error("Reference {reference} marked completed but funds not credited: {reason}")]
    UncreditedSettlement {
        reference: String,
        reason: String,
    },

    // Reconciliation Errors
    #[error("Reconciliation failed: expected={expected}, actual={actual}")]
    ReconciliationFailed {
        expected: Money,
        actual: Money,
    },

    #[error("Running balance mismatch on {transaction_id}: expected={expected}, actual={actual}")]
    RunningBalanceMismatch {
        transaction_id: TransactionId,
        expected: Money,
        actual: Money,
    },

    // System Errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Non-fatal outcome of a bookkeeping step. Logged by the orchestrator,
/// never allowed to block crediting the wallet.
#[derive(Debug, Clone)]
pub struct Warning {
    pub step: &'static str,
    pub details: String,
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.step, self.details)
    }
}
