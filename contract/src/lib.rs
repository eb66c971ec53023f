//! Contract side of the petition voting client.
//!
//! - [`abi`]: JSON ABI loading and call encoding
//! - [`interface`]: the validated petition contract interface
//! - [`contract`]: the typed [`PetitionContract`] seam
//! - [`signed`]: a [`PetitionContract`] that talks through a wallet provider
//! - [`binding`]: builds signer-scoped [`ContractHandle`]s

pub mod abi;
pub mod binding;
pub mod contract;
pub mod error;
pub mod interface;
pub mod signed;

pub use binding::{BindingKey, ContractBinding, ContractHandle};
pub use contract::{PetitionContract, PetitionRecord, Receipt};
pub use error::ContractError;
pub use interface::{PetitionInterface, DEFAULT_ABI};
pub use signed::{ConfirmationPolicy, SignedContract};
