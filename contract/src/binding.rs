//! Builds signer-scoped contract handles.

use petition_types::{AccountAddress, ContractAddress};
use petition_wallet::WalletProvider;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::contract::PetitionContract;
use crate::error::ContractError;
use crate::interface::PetitionInterface;
use crate::signed::{ConfirmationPolicy, SignedContract};

/// What a handle is bound to. Handles with equal keys are interchangeable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BindingKey {
    pub contract: ContractAddress,
    pub account: AccountAddress,
}

/// A callable contract reference scoped to one account.
///
/// Never reuse a handle after the active account changes: its signer is the
/// old account.
#[derive(Clone)]
pub struct ContractHandle {
    key: BindingKey,
    generation: u64,
    contract: Arc<dyn PetitionContract>,
}

impl ContractHandle {
    pub fn new(key: BindingKey, generation: u64, contract: Arc<dyn PetitionContract>) -> Self {
        Self {
            key,
            generation,
            contract,
        }
    }

    pub fn key(&self) -> BindingKey {
        self.key
    }

    pub fn account(&self) -> AccountAddress {
        self.key.account
    }

    /// Increases with every successful bind.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn contract(&self) -> &dyn PetitionContract {
        self.contract.as_ref()
    }
}

impl PartialEq for ContractHandle {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for ContractHandle {}

impl fmt::Debug for ContractHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContractHandle")
            .field("contract", &self.key.contract)
            .field("account", &self.key.account)
            .field("generation", &self.generation)
            .finish()
    }
}

/// Fixed contract address and interface description, bound on demand.
pub struct ContractBinding {
    address: String,
    abi: String,
    policy: ConfirmationPolicy,
    generations: AtomicU64,
}

impl ContractBinding {
    /// Nothing is validated here; a malformed address or ABI surfaces from
    /// [`ContractBinding::bind`] so the caller can treat it as a failed bind.
    pub fn new(address: impl Into<String>, abi: impl Into<String>, policy: ConfirmationPolicy) -> Self {
        Self {
            address: address.into(),
            abi: abi.into(),
            policy,
            generations: AtomicU64::new(0),
        }
    }

    /// Build a handle for `account`. Returns `Ok(None)` when either input is absent.
    pub fn bind(
        &self,
        provider: Option<&Arc<dyn WalletProvider>>,
        account: Option<AccountAddress>,
    ) -> Result<Option<ContractHandle>, ContractError> {
        let (Some(provider), Some(account)) = (provider, account) else {
            return Ok(None);
        };

        let address = ContractAddress::parse(&self.address)?;
        let interface = Arc::new(PetitionInterface::parse(&self.abi)?);
        let contract = SignedContract::new(provider.clone(), account, address, interface, self.policy);
        let generation = self.generations.fetch_add(1, Ordering::Relaxed) + 1;

        tracing::info!(contract = %address, %account, generation, "contract bound");
        Ok(Some(ContractHandle::new(
            BindingKey {
                contract: address,
                account,
            },
            generation,
            Arc::new(contract),
        )))
    }
}
