use anyhow::Result;
use config::{Config, File};
use core_logic::RetryPolicy;
use serde::Deserialize;
use std::time::Duration;

/// Keeper settings. Every field has a default matching the live service,
/// so the bot runs with no config file at all.
#[derive(Debug, Clone, Deserialize)]
pub struct LayerEdgeConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_ref_code")]
    pub ref_code: String,
    #[serde(default = "default_wallet_file")]
    pub wallet_file: String,
    #[serde(default = "default_proxy_file")]
    pub proxy_file: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_retry_interval_secs")]
    pub retry_interval_secs: u64,
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
}

fn default_base_url() -> String {
    "https://referral-api.layeredge.io".to_string()
}

fn default_ref_code() -> String {
    "mWJ5uQp5".to_string()
}

fn default_wallet_file() -> String {
    "wallets.txt".to_string()
}

fn default_proxy_file() -> String {
    "proxy.txt".to_string()
}

fn default_request_timeout_secs() -> u64 {
    60
}

fn default_max_attempts() -> u32 {
    30
}

fn default_retry_interval_secs() -> u64 {
    2
}

fn default_sweep_interval_secs() -> u64 {
    3600
}

impl Default for LayerEdgeConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            ref_code: default_ref_code(),
            wallet_file: default_wallet_file(),
            proxy_file: default_proxy_file(),
            request_timeout_secs: default_request_timeout_secs(),
            max_attempts: default_max_attempts(),
            retry_interval_secs: default_retry_interval_secs(),
            sweep_interval_secs: default_sweep_interval_secs(),
        }
    }
}

impl LayerEdgeConfig {
    pub fn load(path: &str) -> Result<Self> {
        let settings = Config::builder()
            .add_source(File::with_name(path).required(false))
            .build()?;

        settings.try_deserialize().map_err(|e| anyhow::anyhow!(e))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_attempts, Duration::from_secs(self.retry_interval_secs))
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}
