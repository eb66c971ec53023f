use petition_contract::ContractError;
use petition_wallet::WalletError;
use thiserror::Error;

use crate::event::ReadField;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("no wallet provider detected")]
    WalletUnavailable,

    #[error("a wallet is required to connect")]
    WalletRequired,

    #[error("account authorization rejected")]
    AuthorizationRejected,

    #[error("wallet error: {0}")]
    Wallet(#[from] WalletError),

    #[error("contract binding failed: {0}")]
    BindingFailed(#[source] ContractError),

    #[error("reading {field} failed: {source}")]
    ReadFailed {
        field: ReadField,
        #[source]
        source: ContractError,
    },

    #[error("vote failed: {0}")]
    VoteFailed(#[source] ContractError),

    #[error("config error: {0}")]
    Config(String),
}
