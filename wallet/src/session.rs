//! Per-client wallet session.

use petition_types::AccountAddress;
use std::fmt;
use std::sync::Arc;

use crate::provider::WalletProvider;

/// The detected provider and the active account.
///
/// `provider` is set once on detection and never cleared. `account` follows
/// the most recent account report from the provider.
#[derive(Clone, Default)]
pub struct WalletSession {
    provider: Option<Arc<dyn WalletProvider>>,
    account: Option<AccountAddress>,
}

impl WalletSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn provider(&self) -> Option<&Arc<dyn WalletProvider>> {
        self.provider.as_ref()
    }

    pub fn account(&self) -> Option<AccountAddress> {
        self.account
    }

    pub fn has_provider(&self) -> bool {
        self.provider.is_some()
    }

    /// Session with `provider` attached. A provider that is already set is kept.
    pub fn with_provider(&self, provider: Arc<dyn WalletProvider>) -> Self {
        Self {
            provider: Some(self.provider.clone().unwrap_or(provider)),
            account: self.account,
        }
    }

    /// Session after the provider reported `accounts`.
    ///
    /// Only the first address is used. An empty report clears the account.
    pub fn with_accounts(&self, accounts: &[AccountAddress]) -> Self {
        Self {
            provider: self.provider.clone(),
            account: accounts.first().copied(),
        }
    }
}

impl fmt::Debug for WalletSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalletSession")
            .field("provider", &self.provider.as_ref().map(|p| p.name().to_string()))
            .field("account", &self.account)
            .finish()
    }
}
