use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct GatewayConfig {
    pub base_url: String,
    pub secret_key: String,
    pub timeout_secs: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        GatewayConfig {
            base_url: "https://api.paystack.co".to_string(),
            secret_key: String::new(),
            timeout_secs: 30,
        }
    }
}
