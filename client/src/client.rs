//! The client driver: runs the effects the reducer asks for.

use petition_contract::ContractBinding;
use petition_types::{AccountAddress, PetitionId};
use petition_wallet::{ProviderSource, WalletConnector, WalletError};
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::watch;

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::event::{AccountSource, Effect, Event};
use crate::reducer::Reducer;
use crate::state::ClientState;
use crate::store::PetitionDataStore;
use crate::view::View;
use crate::vote::{VoteOutcome, VoteSubmitter};

/// A petition voting session against one wallet environment.
///
/// Every public operation is one flow: its wallet and contract calls run in
/// sequence. Separate flows may run concurrently on the same client; their
/// results meet in the reducer.
pub struct PetitionClient {
    connector: WalletConnector,
    binding: ContractBinding,
    store: PetitionDataStore,
    submitter: VoteSubmitter,
    reducer: Reducer,
    state: watch::Sender<ClientState>,
}

impl PetitionClient {
    pub fn new(source: Arc<dyn ProviderSource>, config: &ClientConfig) -> Self {
        let (state, _) = watch::channel(ClientState::default());
        Self {
            connector: WalletConnector::new(source),
            binding: config.binding(),
            store: PetitionDataStore::new(),
            submitter: VoteSubmitter::new(),
            reducer: Reducer::new(config.ordering),
            state,
        }
    }

    /// Client for the environment described by `config`.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ClientError> {
        Ok(Self::new(config.provider_source()?, config))
    }

    pub fn state(&self) -> ClientState {
        self.state.borrow().clone()
    }

    pub fn view(&self) -> View {
        View::derive(&self.state.borrow())
    }

    /// Receives every state the client moves through.
    pub fn subscribe(&self) -> watch::Receiver<ClientState> {
        self.state.subscribe()
    }

    /// Look for a wallet and pick up any account it has already authorized.
    pub async fn detect(&self) -> Result<(), ClientError> {
        match self.connector.detect() {
            Some(provider) => {
                self.run(Event::ProviderDetected(provider)).await;
                Ok(())
            }
            None => {
                self.run(Event::ProviderMissing).await;
                Err(ClientError::WalletUnavailable)
            }
        }
    }

    /// Ask the wallet to authorize an account, then bind the contract to it.
    ///
    /// A wallet that grants no accounts leaves the client without an
    /// account and yields [`WalletError::InvalidResponse`].
    pub async fn connect(&self) -> Result<(), ClientError> {
        let provider = self.state.borrow().wallet.provider().cloned();
        let Some(provider) = provider else {
            tracing::warn!("connect requested without a wallet");
            self.run(Event::ConnectWithoutWallet).await;
            return Err(ClientError::WalletRequired);
        };

        match self.connector.request_accounts(provider.as_ref()).await {
            Ok(accounts) => {
                let granted = accounts.len();
                tracing::info!(accounts = granted, "wallet authorized");
                self.run(Event::AccountsReported {
                    accounts,
                    source: AccountSource::Authorization,
                })
                .await;
                if granted == 0 {
                    tracing::warn!("authorization granted no accounts");
                    return Err(ClientError::Wallet(WalletError::InvalidResponse(
                        "authorization granted no accounts".into(),
                    )));
                }
                Ok(())
            }
            Err(e) => {
                let rejected = e.is_rejection();
                tracing::warn!(error = %e, rejected, "wallet authorization failed");
                self.run(Event::AuthorizationFailed { rejected }).await;
                Err(if rejected {
                    ClientError::AuthorizationRejected
                } else {
                    ClientError::Wallet(e)
                })
            }
        }
    }

    /// The wallet switched accounts.
    pub async fn accounts_changed(&self, accounts: Vec<AccountAddress>) {
        self.run(Event::AccountsReported {
            accounts,
            source: AccountSource::Query,
        })
        .await;
    }

    /// Vote for `id`, then re-read petitions and the total once confirmed.
    ///
    /// Without a bound contract, or for an id outside the list on display,
    /// nothing is sent and the outcome is [`VoteOutcome::Skipped`].
    pub async fn vote(&self, id: PetitionId) -> Result<VoteOutcome, ClientError> {
        let handle = self.submitter.eligible(&self.state.borrow(), id);
        let Some(handle) = handle else {
            tracing::debug!(petition = %id, "vote skipped");
            return Ok(VoteOutcome::Skipped);
        };

        match self.submitter.submit(&handle, id).await {
            Ok(receipt) => {
                self.run(Event::VoteConfirmed(id)).await;
                Ok(VoteOutcome::Confirmed(receipt))
            }
            Err(e) => {
                tracing::error!(petition = %id, error = %e, "vote failed");
                self.run(Event::VoteFailed(id)).await;
                Err(e)
            }
        }
    }

    pub async fn refresh(&self) {
        self.run_effects([Effect::RefreshPetitions, Effect::RefreshTotalVotes].into())
            .await;
    }

    pub async fn refresh_petitions(&self) {
        self.run_effects([Effect::RefreshPetitions].into()).await;
    }

    pub async fn refresh_total_votes(&self) {
        self.run_effects([Effect::RefreshTotalVotes].into()).await;
    }

    pub fn dismiss_notice(&self) {
        self.dispatch(Event::NoticeDismissed);
    }

    fn dispatch(&self, event: Event) -> Vec<Effect> {
        let name = event.name();
        let mut effects = Vec::new();
        self.state.send_modify(|state| {
            let transition = self.reducer.reduce(state, event);
            *state = transition.state;
            effects = transition.effects;
        });
        tracing::trace!(event = name, ?effects, "event applied");
        effects
    }

    async fn run(&self, event: Event) {
        let effects = self.dispatch(event);
        self.run_effects(effects.into()).await;
    }

    async fn run_effects(&self, mut queue: VecDeque<Effect>) {
        while let Some(effect) = queue.pop_front() {
            if let Some(event) = self.execute(effect).await {
                queue.extend(self.dispatch(event));
            }
        }
    }

    async fn execute(&self, effect: Effect) -> Option<Event> {
        match effect {
            Effect::QueryAccounts => {
                let provider = self.state.borrow().wallet.provider().cloned()?;
                match self.connector.current_accounts(provider.as_ref()).await {
                    Ok(accounts) => Some(Event::AccountsReported {
                        accounts,
                        source: AccountSource::Query,
                    }),
                    Err(e) => {
                        tracing::warn!(error = %e, "account query failed");
                        None
                    }
                }
            }
            Effect::Bind => {
                let (provider, account) = {
                    let state = self.state.borrow();
                    (state.wallet.provider().cloned(), state.wallet.account())
                };
                match self.binding.bind(provider.as_ref(), account) {
                    Ok(handle) => handle.map(Event::Bound),
                    Err(e) => {
                        tracing::error!(error = %ClientError::BindingFailed(e), "contract binding failed");
                        Some(Event::BindFailed)
                    }
                }
            }
            Effect::RefreshPetitions => {
                let handle = self.state.borrow().contract.clone()?;
                Some(self.store.refresh_petitions(&handle).await)
            }
            Effect::RefreshTotalVotes => {
                let handle = self.state.borrow().contract.clone()?;
                Some(self.store.refresh_total_votes(&handle).await)
            }
        }
    }
}
