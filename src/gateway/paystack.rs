use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use crate::config::gateway::GatewayConfig;
use crate::error::{Error, Result};
use crate::gateway::{GatewayMetadata, VerifiedPayment};
use crate::interfaces::gateway::PaymentGateway;
use crate::types::money::Money;

pub struct PaystackGateway {
    config: GatewayConfig,
    http_client: Client,
}

#[derive(Debug, Deserialize)]
struct VerifyEnvelope {
    status: bool,
    message: Option<String>,
    data: Option<VerifyData>,
}

#[derive(Debug, Deserialize)]
struct VerifyData {
    id: Option<u64>,
    status: String,
    amount: i64,  // Minor units
    reference: String,
    #[serde(default)]
    metadata: Option<GatewayMetadata>,
}

impl PaystackGateway {
    pub fn new(config: GatewayConfig) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::GatewayUnreachable(e.to_string()))?;

        Ok(Self {
            config,
            http_client,
        })
    }
}

#[async_trait]
impl PaymentGateway for PaystackGateway {
    async fn verify(&self, reference: &str) -> Result<VerifiedPayment> {
        let url = format!(
            "{}/transaction/verify/{}",
            self.config.base_url, reference
        );

        // Timeouts and connection failures land here; the caller treats them
        // the same as an explicit gateway failure, never as success.
        let response = self.http_client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.config.secret_key))
            .header("Content-Type", "application/json")
            .send()
            .await
            .map_err(|e| Error::GatewayUnreachable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Error::VerificationFailed {
                reference: reference.to_string(),
                reason: format!("gateway returned {}", response.status()),
            });
        }

        let raw: serde_json::Value = response.json()
            .await
            .map_err(|e| Error::SerializationError(e.to_string()))?;

        let envelope: VerifyEnvelope = serde_json::from_value(raw.clone())
            .map_err(|e| Error::SerializationError(e.to_string()))?;

        if !envelope.status {
            return Err(Error::VerificationFailed {
                reference: reference.to_string(),
                reason: envelope.message.unwrap_or_else(|| "gateway reported failure".to_string()),
            });
        }

        let data = envelope.data.ok_or_else(|| Error::VerificationFailed {
            reference: reference.to_string(),
            reason: "gateway response carried no transaction data".to_string(),
        })?;

        if data.status != "success" {
            return Err(Error::VerificationFailed {
                reference: reference.to_string(),
                reason: format!("payment status is {:?}", data.status),
            });
        }

        tracing::info!("Verified payment {} for {} kobo", data.reference, data.amount);

        Ok(VerifiedPayment {
            reference: data.reference,
            gateway_reference: data.id.map(|id| id.to_string()),
            amount: Money::from_kobo(data.amount),
            status: data.status,
            metadata: data.metadata.unwrap_or_default(),
            raw,
        })
    }
}
