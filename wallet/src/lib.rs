//! Wallet side of the petition voting client.
//!
//! Provides everything the client needs from a wallet:
//! - The EIP-1193 style request protocol ([`WalletProvider`])
//! - A JSON-RPC over HTTP provider for node-backed environments
//! - Provider detection and account queries ([`WalletConnector`])
//! - The per-client [`WalletSession`]

pub mod connector;
pub mod error;
pub mod provider;
pub mod rpc;
pub mod session;

pub use connector::{InjectedProvider, ProviderSource, WalletConnector};
pub use error::WalletError;
pub use provider::{methods, parse_accounts, WalletProvider, USER_REJECTED_CODE};
pub use rpc::RpcWalletProvider;
pub use session::WalletSession;
