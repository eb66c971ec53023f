//! Pure state transitions: `(state, event) -> (state, effects)`.

use petition_contract::ContractHandle;

use crate::config::RefreshOrdering;
use crate::event::{AccountSource, Effect, Event, RefreshTicket};
use crate::graph::{self, Node};
use crate::state::{ClientState, Notice};

/// The next state and the work it calls for.
#[derive(Debug)]
pub struct Transition {
    pub state: ClientState,
    pub effects: Vec<Effect>,
}

/// Applies events to state. Holds only the refresh ordering policy.
#[derive(Clone, Copy, Debug, Default)]
pub struct Reducer {
    ordering: RefreshOrdering,
}

impl Reducer {
    pub fn new(ordering: RefreshOrdering) -> Self {
        Self { ordering }
    }

    pub fn ordering(&self) -> RefreshOrdering {
        self.ordering
    }

    pub fn reduce(&self, state: &ClientState, event: Event) -> Transition {
        let mut next = state.clone();
        let mut effects = Vec::new();

        match event {
            Event::ProviderMissing => next.notice = Some(Notice::InstallWallet),

            Event::ProviderDetected(provider) => {
                next.wallet = state.wallet.with_provider(provider);
                effects.push(Effect::QueryAccounts);
            }

            Event::ConnectWithoutWallet => next.notice = Some(Notice::WalletRequired),

            Event::AccountsReported { accounts, source } => {
                let before = state.wallet.account();
                next.wallet = state.wallet.with_accounts(&accounts);
                let after = next.wallet.account();

                if before != after {
                    // A handle signs as its own account; it is dead once that account is not active.
                    if next.contract.as_ref().is_some_and(|h| Some(h.account()) != after) {
                        next.contract = None;
                    }
                    if after.is_some() {
                        effects.extend(graph::recompute(Node::WalletSession));
                    }
                } else if source == AccountSource::Authorization && after.is_some() {
                    effects.push(Effect::Bind);
                }

                if source == AccountSource::Authorization {
                    next.notice = None;
                }
            }

            Event::AuthorizationFailed { rejected } => {
                if rejected {
                    next.notice = Some(Notice::AuthorizationRejected);
                }
            }

            Event::Bound(handle) => {
                let for_active_account = Some(handle.account()) == state.wallet.account();
                let unchanged = state.contract.as_ref() == Some(&handle);
                if for_active_account && !unchanged {
                    next.contract = Some(handle);
                    effects.extend(graph::recompute(Node::ContractHandle));
                }
            }

            Event::PetitionsLoaded { ticket, list } => {
                if self.accepts(state.contract.as_ref(), ticket, state.applied.petitions) {
                    next.petitions = list;
                    next.applied.petitions = ticket.seq;
                }
            }

            Event::TotalVotesLoaded { ticket, tally } => {
                if self.accepts(state.contract.as_ref(), ticket, state.applied.total_votes) {
                    next.total_votes = Some(tally);
                    next.applied.total_votes = ticket.seq;
                }
            }

            Event::VoteConfirmed(_) => {
                effects.push(Effect::RefreshPetitions);
                effects.push(Effect::RefreshTotalVotes);
            }

            Event::NoticeDismissed => next.notice = None,

            Event::BindFailed | Event::ReadFailed { .. } | Event::VoteFailed(_) => {}
        }

        Transition {
            state: next,
            effects,
        }
    }

    fn accepts(&self, current: Option<&ContractHandle>, ticket: RefreshTicket, applied: u64) -> bool {
        match self.ordering {
            RefreshOrdering::LatestResponse => true,
            RefreshOrdering::LatestRequest => {
                current.is_some_and(|h| h.generation() == ticket.generation) && ticket.seq > applied
            }
        }
    }
}
