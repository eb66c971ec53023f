//! The request protocol every wallet provider speaks.

use async_trait::async_trait;
use petition_types::AccountAddress;
use serde_json::Value;

use crate::error::WalletError;

/// JSON-RPC error code a provider returns when the user declines a prompt.
pub const USER_REJECTED_CODE: i64 = 4001;

/// Method names used by the client.
pub mod methods {
    /// Non-interactive query for already-authorized accounts.
    pub const ACCOUNTS: &str = "eth_accounts";
    /// Interactive authorization; may prompt the user.
    pub const REQUEST_ACCOUNTS: &str = "eth_requestAccounts";
    pub const CALL: &str = "eth_call";
    pub const SEND_TRANSACTION: &str = "eth_sendTransaction";
    pub const TRANSACTION_RECEIPT: &str = "eth_getTransactionReceipt";
}

/// A wallet agent holding keys and forwarding chain traffic.
///
/// Mirrors the single `request({ method, params })` entry point of injected
/// browser wallets. Implementations map user rejections to
/// [`WalletError::Rejected`].
#[async_trait]
pub trait WalletProvider: Send + Sync {
    async fn request(&self, method: &str, params: Value) -> Result<Value, WalletError>;

    /// Short label used in logs.
    fn name(&self) -> &str {
        "wallet"
    }
}

/// Decode an account list response into typed addresses.
///
/// A single malformed entry fails the whole list: a half-parsed list could
/// promote the second account to active.
pub fn parse_accounts(value: Value) -> Result<Vec<AccountAddress>, WalletError> {
    let raw: Vec<String> = serde_json::from_value(value)
        .map_err(|e| WalletError::InvalidResponse(format!("account list: {e}")))?;
    raw.iter()
        .map(|s| AccountAddress::parse(s).map_err(WalletError::from))
        .collect()
}
