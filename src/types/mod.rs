pub mod ids;
pub mod loan;
pub mod money;
pub mod payment;
pub mod repayment;
pub mod wallet;

pub use ids::*;
pub use loan::{LoanContract, LoanStatus};
pub use money::Money;
pub use payment::{FeeStatus, PaymentRecord, PaymentStatus, PlatformFee};
pub use repayment::RepaymentRecord;
pub use wallet::{TransactionStatus, TransactionType, Wallet, WalletTransaction};
