//! Vote submission.

use petition_contract::{ContractHandle, Receipt};
use petition_types::PetitionId;

use crate::error::ClientError;
use crate::state::ClientState;

/// What a vote request amounted to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VoteOutcome {
    /// Preconditions did not hold; no transaction was sent.
    Skipped,
    Confirmed(Receipt),
}

#[derive(Clone, Copy, Debug, Default)]
pub struct VoteSubmitter;

impl VoteSubmitter {
    pub fn new() -> Self {
        Self
    }

    /// The handle to vote through, if a vote for `id` may be sent from `state`.
    ///
    /// Requires a bound handle for the active account and an id inside the
    /// petition list currently on display.
    pub fn eligible(&self, state: &ClientState, id: PetitionId) -> Option<ContractHandle> {
        let account = state.wallet.account()?;
        let handle = state.contract.as_ref()?;
        if handle.account() != account || !state.petitions.contains(id) {
            return None;
        }
        Some(handle.clone())
    }

    /// Send the vote and wait for one confirmation.
    pub async fn submit(&self, handle: &ContractHandle, id: PetitionId) -> Result<Receipt, ClientError> {
        let contract = handle.contract();
        let tx = contract.vote(id).await.map_err(ClientError::VoteFailed)?;
        let receipt = contract.wait_for_confirmation(tx).await.map_err(ClientError::VoteFailed)?;
        tracing::info!(
            petition = %id,
            account = %handle.account(),
            block = receipt.block_number,
            "vote confirmed"
        );
        Ok(receipt)
    }
}
