//! Nullable provider source.

use petition_wallet::{ProviderSource, WalletProvider};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::chain::NullChain;

/// An execution environment that may or may not have a wallet injected.
pub struct NullEnvironment {
    wallet: Option<Arc<NullChain>>,
    lookups: AtomicUsize,
}

impl NullEnvironment {
    /// No wallet installed.
    pub fn empty() -> Self {
        Self {
            wallet: None,
            lookups: AtomicUsize::new(0),
        }
    }

    pub fn with_wallet(chain: Arc<NullChain>) -> Self {
        Self {
            wallet: Some(chain),
            lookups: AtomicUsize::new(0),
        }
    }

    /// How many times the environment was searched for a provider.
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

impl ProviderSource for NullEnvironment {
    fn injected(&self) -> Option<Arc<dyn WalletProvider>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.wallet
            .clone()
            .map(|chain| chain as Arc<dyn WalletProvider>)
    }
}
