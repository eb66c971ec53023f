//! Nullable infrastructure for deterministic testing.
//!
//! External collaborators (the injected wallet and the deployed contract)
//! are replaced with in-memory versions that:
//! - Speak the same request protocol as the real thing
//! - Can be steered programmatically (rejections, reverts, failing reads)
//! - Record every request for assertions
//!
//! Usage: hand a [`NullEnvironment`] to the client instead of a real provider source.

pub mod chain;
pub mod environment;

pub use chain::{NullChain, RecordedCall};
pub use environment::NullEnvironment;
