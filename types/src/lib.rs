//! Fundamental types for the petition voting client.
//!
//! This crate defines the types shared across every other crate in the workspace:
//! account addresses, petitions, petition lists and the aggregate vote tally.

pub mod address;
pub mod error;
pub mod petition;

pub use address::{AccountAddress, ContractAddress};
pub use alloy_primitives::TxHash;
pub use error::TypesError;
pub use petition::{Petition, PetitionId, PetitionList, VoteTally};
