//! Inputs to and outputs of the reducer.

use petition_contract::ContractHandle;
use petition_types::{AccountAddress, PetitionId, PetitionList, VoteTally};
use petition_wallet::WalletProvider;
use std::fmt;
use std::sync::Arc;

/// Which account query produced an account list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccountSource {
    /// Non-interactive query or a provider notification.
    Query,
    /// The user approved an authorization prompt.
    Authorization,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReadField {
    Petitions,
    TotalVotes,
}

impl fmt::Display for ReadField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Petitions => "petitions",
            Self::TotalVotes => "total votes",
        })
    }
}

/// Identifies one refresh: when it was issued and through which handle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RefreshTicket {
    pub seq: u64,
    pub generation: u64,
}

/// Something that happened.
#[derive(Clone)]
pub enum Event {
    ProviderMissing,
    ProviderDetected(Arc<dyn WalletProvider>),
    ConnectWithoutWallet,
    AccountsReported {
        accounts: Vec<AccountAddress>,
        source: AccountSource,
    },
    AuthorizationFailed {
        rejected: bool,
    },
    Bound(ContractHandle),
    BindFailed,
    PetitionsLoaded {
        ticket: RefreshTicket,
        list: PetitionList,
    },
    TotalVotesLoaded {
        ticket: RefreshTicket,
        tally: VoteTally,
    },
    ReadFailed {
        ticket: RefreshTicket,
        field: ReadField,
    },
    VoteConfirmed(PetitionId),
    VoteFailed(PetitionId),
    NoticeDismissed,
}

impl Event {
    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ProviderMissing => "provider_missing",
            Self::ProviderDetected(_) => "provider_detected",
            Self::ConnectWithoutWallet => "connect_without_wallet",
            Self::AccountsReported { .. } => "accounts_reported",
            Self::AuthorizationFailed { .. } => "authorization_failed",
            Self::Bound(_) => "bound",
            Self::BindFailed => "bind_failed",
            Self::PetitionsLoaded { .. } => "petitions_loaded",
            Self::TotalVotesLoaded { .. } => "total_votes_loaded",
            Self::ReadFailed { .. } => "read_failed",
            Self::VoteConfirmed(_) => "vote_confirmed",
            Self::VoteFailed(_) => "vote_failed",
            Self::NoticeDismissed => "notice_dismissed",
        }
    }
}

impl fmt::Debug for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Work the driver must perform after a transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Effect {
    QueryAccounts,
    Bind,
    RefreshPetitions,
    RefreshTotalVotes,
}
