//! Reads petitions and the vote total through a contract handle.

use petition_contract::{ContractError, ContractHandle};
use petition_types::{PetitionId, PetitionList, VoteTally};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::ClientError;
use crate::event::{Event, ReadField, RefreshTicket};

/// Issues refresh tickets and performs the reads behind them.
///
/// Reads never touch client state. Each refresh resolves to an [`Event`]
/// that the reducer applies or discards.
#[derive(Debug, Default)]
pub struct PetitionDataStore {
    sequence: AtomicU64,
}

impl PetitionDataStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamp a new refresh through `handle`. Sequence numbers start at 1.
    pub fn ticket(&self, handle: &ContractHandle) -> RefreshTicket {
        RefreshTicket {
            seq: self.sequence.fetch_add(1, Ordering::Relaxed) + 1,
            generation: handle.generation(),
        }
    }

    /// Read the count, then every petition in id order.
    pub async fn fetch_petitions(&self, handle: &ContractHandle) -> Result<PetitionList, ClientError> {
        let contract = handle.contract();
        let count = contract.petitions_count().await.map_err(read_failed(ReadField::Petitions))?;

        let mut records = Vec::with_capacity(count.min(1024) as usize);
        for id in 1..=count {
            let id = PetitionId::new(id).map_err(|e| ClientError::ReadFailed {
                field: ReadField::Petitions,
                source: ContractError::Decode(e.to_string()),
            })?;
            let record = contract.petition(id).await.map_err(read_failed(ReadField::Petitions))?;
            records.push((record.name, record.vote_count));
        }
        Ok(PetitionList::from_records(records))
    }

    pub async fn fetch_total_votes(&self, handle: &ContractHandle) -> Result<VoteTally, ClientError> {
        handle
            .contract()
            .total_votes()
            .await
            .map(VoteTally)
            .map_err(read_failed(ReadField::TotalVotes))
    }

    pub async fn refresh_petitions(&self, handle: &ContractHandle) -> Event {
        let ticket = self.ticket(handle);
        match self.fetch_petitions(handle).await {
            Ok(list) => {
                tracing::debug!(seq = ticket.seq, count = list.len(), "petitions read");
                Event::PetitionsLoaded { ticket, list }
            }
            Err(e) => {
                tracing::warn!(seq = ticket.seq, error = %e, "petition refresh failed");
                Event::ReadFailed {
                    ticket,
                    field: ReadField::Petitions,
                }
            }
        }
    }

    pub async fn refresh_total_votes(&self, handle: &ContractHandle) -> Event {
        let ticket = self.ticket(handle);
        match self.fetch_total_votes(handle).await {
            Ok(tally) => {
                tracing::debug!(seq = ticket.seq, %tally, "total votes read");
                Event::TotalVotesLoaded { ticket, tally }
            }
            Err(e) => {
                tracing::warn!(seq = ticket.seq, error = %e, "total votes refresh failed");
                Event::ReadFailed {
                    ticket,
                    field: ReadField::TotalVotes,
                }
            }
        }
    }
}

fn read_failed(field: ReadField) -> impl Fn(ContractError) -> ClientError {
    move |source| ClientError::ReadFailed { field, source }
}

#[cfg(test)]
mod tests {
    use super::*;
    use petition_contract::{ConfirmationPolicy, ContractBinding, DEFAULT_ABI};
    use petition_nullables::NullChain;
    use petition_types::AccountAddress;
    use petition_wallet::WalletProvider;
    use std::sync::Arc;

    const ADDRESS: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";

    fn bound(chain: &Arc<NullChain>) -> ContractHandle {
        let provider: Arc<dyn WalletProvider> = chain.clone();
        let binding = ContractBinding::new(ADDRESS, DEFAULT_ABI, ConfirmationPolicy::default());
        binding
            .bind(Some(&provider), Some(AccountAddress::new([0xaa; 20])))
            .unwrap()
            .unwrap()
    }

    fn chain() -> Arc<NullChain> {
        Arc::new(NullChain::new().with_petitions(&[
            ("Clean Air", 5),
            ("Save Forests", 2),
            ("Ocean Cleanup", 9),
        ]))
    }

    #[tokio::test]
    async fn reads_every_petition_in_id_order() {
        let chain = chain();
        let handle = bound(&chain);
        let list = PetitionDataStore::new().fetch_petitions(&handle).await.unwrap();

        assert_eq!(list.len(), 3);
        for (i, petition) in list.iter().enumerate() {
            assert_eq!(petition.id.get(), i as u64 + 1);
        }
        assert_eq!(list.get(PetitionId::new(3).unwrap()).unwrap().name, "Ocean Cleanup");
        assert_eq!(chain.count_calls("eth_call", Some("petitions")), 3);
        assert_eq!(chain.count_calls("eth_call", Some("petitionsCount")), 1);
    }

    #[tokio::test]
    async fn failure_at_any_index_yields_no_list() {
        let chain = chain();
        let handle = bound(&chain);
        chain.fail_next_read("petitions", Some(2));

        let store = PetitionDataStore::new();
        let event = store.refresh_petitions(&handle).await;
        assert!(matches!(
            event,
            Event::ReadFailed {
                field: ReadField::Petitions,
                ..
            }
        ));
        // Sequential: the read of id 3 never happens.
        assert_eq!(chain.count_calls("eth_call", Some("petitions")), 2);
    }

    #[tokio::test]
    async fn empty_contract_reads_empty_list() {
        let chain = Arc::new(NullChain::new());
        let handle = bound(&chain);
        let list = PetitionDataStore::new().fetch_petitions(&handle).await.unwrap();
        assert!(list.is_empty());
        assert_eq!(chain.count_calls("eth_call", Some("petitions")), 0);
    }

    #[tokio::test]
    async fn total_votes_failure_is_reported() {
        let chain = chain();
        let handle = bound(&chain);
        chain.fail_next_read("totalVotes", None);

        let store = PetitionDataStore::new();
        let err = store.fetch_total_votes(&handle).await.unwrap_err();
        assert!(matches!(
            err,
            ClientError::ReadFailed {
                field: ReadField::TotalVotes,
                ..
            }
        ));
        assert_eq!(store.fetch_total_votes(&handle).await.unwrap(), VoteTally(16));
    }

    #[tokio::test]
    async fn tickets_increase_across_both_reads() {
        let chain = chain();
        let handle = bound(&chain);
        let store = PetitionDataStore::new();

        let Event::PetitionsLoaded { ticket: first, .. } = store.refresh_petitions(&handle).await else {
            panic!("expected petitions");
        };
        let Event::TotalVotesLoaded { ticket: second, tally } = store.refresh_total_votes(&handle).await else {
            panic!("expected total");
        };
        assert_eq!(tally, VoteTally(16));
        assert!(second.seq > first.seq);
        assert_eq!(first.generation, handle.generation());
    }
}
