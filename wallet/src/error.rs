use petition_types::TypesError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WalletError {
    #[error("no wallet provider available")]
    Unavailable,

    #[error("request rejected by user: {0}")]
    Rejected(String),

    #[error("provider error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("invalid provider response: {0}")]
    InvalidResponse(String),

    #[error("provider reported a malformed account: {0}")]
    InvalidAccount(#[from] TypesError),
}

impl WalletError {
    /// Whether the user declined the request in the wallet UI.
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }
}
