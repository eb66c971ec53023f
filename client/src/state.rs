//! Everything the client knows, as one replaceable value.

use petition_contract::ContractHandle;
use petition_types::{PetitionList, VoteTally};
use petition_wallet::WalletSession;
use std::fmt;

/// User-facing alerts. Everything else is only logged.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Notice {
    InstallWallet,
    WalletRequired,
    AuthorizationRejected,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::InstallWallet => "Please install MetaMask to interact with this application.",
            Self::WalletRequired => "MetaMask wallet is required to connect",
            Self::AuthorizationRejected => "Wallet connection was rejected",
        })
    }
}

/// Sequence numbers of the refreshes currently on display.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Applied {
    pub petitions: u64,
    pub total_votes: u64,
}

/// Client state. Replaced whole on every transition.
#[derive(Clone, Debug, Default)]
pub struct ClientState {
    pub wallet: WalletSession,
    pub contract: Option<ContractHandle>,
    pub petitions: PetitionList,
    /// `None` until the first successful read.
    pub total_votes: Option<VoteTally>,
    pub notice: Option<Notice>,
    pub applied: Applied,
}
