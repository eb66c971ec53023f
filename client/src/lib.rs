//! Petition voting client.
//!
//! The client is a small state machine driven by user actions:
//! - Detect an injected wallet and read already-authorized accounts
//! - Ask the wallet to authorize an account
//! - Bind the petition contract to the active account
//! - Read petitions and the vote total, and vote for a petition
//!
//! State transitions are pure ([`reducer`]); wallet and contract calls are
//! executed by [`PetitionClient`] and fed back in as [`Event`]s. What to show
//! is derived from the state by [`view`].

pub mod client;
pub mod config;
pub mod error;
pub mod event;
pub mod graph;
pub mod reducer;
pub mod state;
pub mod store;
pub mod view;
pub mod vote;

pub use client::PetitionClient;
pub use config::{ClientConfig, RefreshOrdering};
pub use error::ClientError;
pub use event::{AccountSource, Effect, Event, ReadField, RefreshTicket};
pub use reducer::{Reducer, Transition};
pub use state::{ClientState, Notice};
pub use store::PetitionDataStore;
pub use view::{PetitionCard, Screen, View, ViewState};
pub use vote::{VoteOutcome, VoteSubmitter};
