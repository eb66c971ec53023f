//! Provider detection and account queries.

use petition_types::AccountAddress;
use serde_json::json;
use std::sync::Arc;

use crate::error::WalletError;
use crate::provider::{methods, parse_accounts, WalletProvider};

/// Where an injected provider is looked up.
///
/// In a browser this is the global the wallet extension injects; elsewhere
/// it is whatever the embedder configured.
pub trait ProviderSource: Send + Sync {
    fn injected(&self) -> Option<Arc<dyn WalletProvider>>;
}

/// A fixed lookup result.
#[derive(Clone, Default)]
pub struct InjectedProvider(Option<Arc<dyn WalletProvider>>);

impl InjectedProvider {
    pub fn some(provider: Arc<dyn WalletProvider>) -> Self {
        Self(Some(provider))
    }

    pub fn none() -> Self {
        Self(None)
    }
}

impl ProviderSource for InjectedProvider {
    fn injected(&self) -> Option<Arc<dyn WalletProvider>> {
        self.0.clone()
    }
}

/// Performs the wallet-facing side effects. State updates are left to the caller.
#[derive(Clone)]
pub struct WalletConnector {
    source: Arc<dyn ProviderSource>,
}

impl WalletConnector {
    pub fn new(source: Arc<dyn ProviderSource>) -> Self {
        Self { source }
    }

    /// Look for an injected provider.
    pub fn detect(&self) -> Option<Arc<dyn WalletProvider>> {
        let provider = self.source.injected();
        match &provider {
            Some(p) => tracing::debug!(provider = p.name(), "wallet provider detected"),
            None => tracing::info!("no wallet provider injected"),
        }
        provider
    }

    /// Accounts the provider has already authorized, without prompting.
    pub async fn current_accounts(
        &self,
        provider: &dyn WalletProvider,
    ) -> Result<Vec<AccountAddress>, WalletError> {
        let value = provider.request(methods::ACCOUNTS, json!([])).await?;
        parse_accounts(value)
    }

    /// Ask the user to authorize accounts. May prompt and may be rejected.
    pub async fn request_accounts(
        &self,
        provider: &dyn WalletProvider,
    ) -> Result<Vec<AccountAddress>, WalletError> {
        let value = provider.request(methods::REQUEST_ACCOUNTS, json!([])).await?;
        parse_accounts(value)
    }
}
