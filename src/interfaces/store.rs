use crate::error::Result;
use crate::types::ids::{FeeId, LenderId, LoanContractId, RepaymentId, WalletId};
use crate::types::loan::LoanContract;
use crate::types::money::Money;
use crate::types::payment::{PaymentRecord, PlatformFee};
use crate::types::repayment::RepaymentRecord;
use crate::types::wallet::{Wallet, WalletTransaction};

/// Outcome of the idempotency gate. Exactly one caller per reference ever
/// observes `Claimed`.
#[derive(Clone, Debug)]
pub enum Claim {
    Claimed(PaymentRecord),
    AlreadyCompleted(PaymentRecord),
}

/// Datastore collaborator. Keyed reads and writes over the settlement
/// entities; no cross-entity transactions are assumed, so the two atomic
/// operations (`claim_payment`, `credit_wallet`) carry the correctness
/// burden.
pub trait SettlementStore: Send + Sync {
    // Loan contracts
    fn insert_loan(&self, loan: LoanContract) -> Result<()>;
    fn loan(&self, id: LoanContractId) -> Result<LoanContract>;
    /// Active -> Closed, one way. Returns false when already closed.
    fn close_loan(&self, id: LoanContractId) -> Result<bool>;

    // Repayments
    fn insert_repayment(&self, record: RepaymentRecord) -> Result<()>;
    fn repayments_for_loan(&self, id: LoanContractId) -> Vec<RepaymentRecord>;

    // Wallets
    fn create_wallet(&self, owner: LenderId) -> Result<Wallet>;
    fn wallet_for_lender(&self, owner: LenderId) -> Result<Wallet>;
    /// Appends the ledger transaction and updates the balance in a single
    /// critical section per wallet. Concurrent credits to one wallet are
    /// serialized here.
    fn credit_wallet(&self, owner: LenderId, amount: Money, reference: &str)
        -> Result<WalletTransaction>;
    fn transactions_for_wallet(&self, id: WalletId) -> Vec<WalletTransaction>;

    // Payment records
    fn insert_payment(&self, record: PaymentRecord) -> Result<()>;
    /// Lookup by primary reference, falling back to the gateway's own
    /// reference when the primary is unknown.
    fn payment_by_reference(&self, reference: &str) -> Option<PaymentRecord>;
    /// Atomically marks the reference completed. If another settlement got
    /// there first, returns its record instead.
    fn claim_payment(&self, record: PaymentRecord) -> Result<Claim>;
    /// Records the repayment created for a completed reference, so later
    /// calls for the same reference can return it.
    fn attach_repayment(&self, reference: &str, repayment_id: RepaymentId) -> Result<()>;

    // Platform fees
    fn insert_fee(&self, fee: PlatformFee) -> Result<()>;
    fn pending_fee_for_loan(&self, id: LoanContractId) -> Option<PlatformFee>;
    fn collect_fee(&self, id: FeeId) -> Result<()>;
}
