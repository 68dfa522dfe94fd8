use async_trait::async_trait;
use crate::error::Result;
use crate::gateway::VerifiedPayment;

/// External payment gateway collaborator. One verify call per invocation;
/// retry policy belongs to the caller.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn verify(&self, reference: &str) -> Result<VerifiedPayment>;
}
