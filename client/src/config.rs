//! Client configuration with TOML support.

use petition_contract::{ConfirmationPolicy, ContractBinding, DEFAULT_ABI};
use petition_utils::LogFormat;
use petition_wallet::{InjectedProvider, ProviderSource, RpcWalletProvider};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::error::ClientError;

/// How responses from overlapping refreshes are applied.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RefreshOrdering {
    /// Drop a response if a newer refresh was already applied, or if it was
    /// read through a handle that is no longer current.
    #[default]
    LatestRequest,
    /// Apply every response as it arrives; a slow stale response can
    /// overwrite a newer one.
    LatestResponse,
}

/// Configuration for a petition client.
///
/// Built programmatically or parsed with [`ClientConfig::from_toml_str`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Deployed petition contract.
    #[serde(default = "default_contract_address")]
    pub contract_address: String,

    /// JSON ABI of the contract (bare array or compiler artifact).
    #[serde(default = "default_contract_abi")]
    pub contract_abi: String,

    /// JSON-RPC endpoint used as the injected provider. `None` means no wallet.
    #[serde(default)]
    pub provider_url: Option<String>,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_receipt_poll_interval_ms")]
    pub receipt_poll_interval_ms: u64,

    /// Give up waiting for a vote confirmation after this long.
    #[serde(default = "default_receipt_timeout_secs")]
    pub receipt_timeout_secs: u64,

    #[serde(default)]
    pub ordering: RefreshOrdering,

    #[serde(default)]
    pub log_format: LogFormat,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_contract_address() -> String {
    "0x5FbDB2315678afecb367f032d93F642f64180aa3".to_string()
}

fn default_contract_abi() -> String {
    DEFAULT_ABI.to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_receipt_poll_interval_ms() -> u64 {
    1000
}

fn default_receipt_timeout_secs() -> u64 {
    120
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl ClientConfig {
    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ClientError> {
        toml::from_str(s).map_err(|e| ClientError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, ClientError> {
        toml::to_string_pretty(self).map_err(|e| ClientError::Config(e.to_string()))
    }

    pub fn confirmation_policy(&self) -> ConfirmationPolicy {
        ConfirmationPolicy {
            poll_interval: Duration::from_millis(self.receipt_poll_interval_ms),
            timeout: Duration::from_secs(self.receipt_timeout_secs),
        }
    }

    pub fn binding(&self) -> ContractBinding {
        ContractBinding::new(
            self.contract_address.clone(),
            self.contract_abi.clone(),
            self.confirmation_policy(),
        )
    }

    /// Install the global subscriber from `log_format` and `log_level`.
    /// Returns `false` if one was already installed.
    pub fn init_logging(&self) -> bool {
        petition_utils::init_logging(self.log_format, &self.log_level)
    }

    /// The environment the client looks for a wallet in.
    pub fn provider_source(&self) -> Result<Arc<dyn ProviderSource>, ClientError> {
        let source = match &self.provider_url {
            Some(url) => {
                let provider = RpcWalletProvider::new(
                    url.clone(),
                    Duration::from_secs(self.request_timeout_secs),
                )?;
                InjectedProvider::some(Arc::new(provider))
            }
            None => InjectedProvider::none(),
        };
        Ok(Arc::new(source))
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            contract_address: default_contract_address(),
            contract_abi: default_contract_abi(),
            provider_url: None,
            request_timeout_secs: default_request_timeout_secs(),
            receipt_poll_interval_ms: default_receipt_poll_interval_ms(),
            receipt_timeout_secs: default_receipt_timeout_secs(),
            ordering: RefreshOrdering::default(),
            log_format: LogFormat::default(),
            log_level: default_log_level(),
        }
    }
}
