use petition_types::{TxHash, TypesError};
use petition_wallet::WalletError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContractError {
    #[error("invalid contract address: {0}")]
    InvalidAddress(#[from] TypesError),

    #[error("invalid interface description: {0}")]
    InvalidInterface(String),

    #[error("interface is missing `{0}`")]
    MissingFunction(String),

    #[error("provider error: {0}")]
    Provider(#[from] WalletError),

    #[error("ABI encoding error: {0}")]
    Encode(String),

    #[error("ABI decoding error: {0}")]
    Decode(String),

    #[error("transaction {0} reverted")]
    Reverted(TxHash),

    #[error("transaction {tx} not confirmed within {secs}s")]
    ConfirmationTimeout { tx: TxHash, secs: u64 },
}
