pub mod paystack;

use crate::types::money::Money;
use serde::Deserialize;

/// A payment the gateway has confirmed as successful. Carries everything
/// needed to reconstruct a settlement when our own tracking row is missing.
#[derive(Clone, Debug)]
pub struct VerifiedPayment {
    pub reference: String,
    pub gateway_reference: Option<String>,
    pub amount: Money,  // Minor units, as charged
    pub status: String,
    pub metadata: GatewayMetadata,
    pub raw: serde_json::Value,  // Surfaced verbatim on resolution failures
}

/// Metadata echoed back by the gateway from payment initiation. All fields
/// optional; the gateway treats this as an opaque bag.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct GatewayMetadata {
    pub contract_id: Option<String>,
    pub farmer_id: Option<String>,
    pub lender_id: Option<String>,
    pub platform_fee_naira: Option<i64>,
    pub penalty_naira: Option<i64>,
}
