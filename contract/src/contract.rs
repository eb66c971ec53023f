//! Typed seam between the client and the deployed petition contract.

use async_trait::async_trait;
use petition_types::{PetitionId, TxHash};

use crate::error::ContractError;

/// `petitions(id)` as returned by the contract.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PetitionRecord {
    pub name: String,
    pub vote_count: u64,
}

/// A mined transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Receipt {
    pub tx_hash: TxHash,
    pub block_number: u64,
}

/// Calls against one deployed petition contract, signed by one account.
#[async_trait]
pub trait PetitionContract: Send + Sync {
    async fn petitions_count(&self) -> Result<u64, ContractError>;

    async fn petition(&self, id: PetitionId) -> Result<PetitionRecord, ContractError>;

    async fn total_votes(&self) -> Result<u64, ContractError>;

    /// Submit a vote. Resolves once the wallet has accepted the transaction,
    /// not once it is mined.
    async fn vote(&self, id: PetitionId) -> Result<TxHash, ContractError>;

    /// Wait for one confirmation. A reverted transaction is an error.
    async fn wait_for_confirmation(&self, tx: TxHash) -> Result<Receipt, ContractError>;
}
