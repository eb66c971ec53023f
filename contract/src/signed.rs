//! [`PetitionContract`] implementation that routes through a wallet provider.

use async_trait::async_trait;
use petition_types::{AccountAddress, ContractAddress, PetitionId, TxHash};
use petition_wallet::{methods, WalletProvider};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

use alloy_primitives::{Bytes, TxKind};
use alloy_rpc_types_eth::{TransactionInput, TransactionReceipt, TransactionRequest};

use crate::abi::{self, DynSolValue, Function};
use crate::contract::{PetitionContract, PetitionRecord, Receipt};
use crate::error::ContractError;
use crate::interface::PetitionInterface;

/// How long to wait for a vote transaction to be mined.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConfirmationPolicy {
    pub poll_interval: Duration,
    pub timeout: Duration,
}

impl Default for ConfirmationPolicy {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(1000),
            timeout: Duration::from_secs(120),
        }
    }
}

/// The contract at `address`, with `signer` as the sending account.
pub struct SignedContract {
    provider: Arc<dyn WalletProvider>,
    signer: AccountAddress,
    address: ContractAddress,
    interface: Arc<PetitionInterface>,
    policy: ConfirmationPolicy,
}

impl SignedContract {
    pub fn new(
        provider: Arc<dyn WalletProvider>,
        signer: AccountAddress,
        address: ContractAddress,
        interface: Arc<PetitionInterface>,
        policy: ConfirmationPolicy,
    ) -> Self {
        Self {
            provider,
            signer,
            address,
            interface,
            policy,
        }
    }

    pub fn signer(&self) -> AccountAddress {
        self.signer
    }

    pub fn address(&self) -> ContractAddress {
        self.address
    }

    fn transaction(&self, data: Vec<u8>) -> TransactionRequest {
        TransactionRequest {
            from: Some(self.signer.inner()),
            to: Some(TxKind::Call(self.address.inner())),
            input: TransactionInput::both(Bytes::from(data)),
            ..Default::default()
        }
    }

    async fn call(
        &self,
        function: &Function,
        args: &[DynSolValue],
    ) -> Result<Vec<DynSolValue>, ContractError> {
        let data = abi::encode_call(function, args)?;
        let result = self
            .provider
            .request(methods::CALL, json!([self.transaction(data), "latest"]))
            .await?;
        let raw: Bytes = serde_json::from_value(result)
            .map_err(|e| ContractError::Decode(format!("{} returned {e}", function.name)))?;
        abi::decode_output(function, &raw)
    }

    async fn call_scalar(&self, function: &Function) -> Result<u64, ContractError> {
        let values = self.call(function, &[]).await?;
        let first = values
            .first()
            .ok_or_else(|| ContractError::Decode(format!("{} returned nothing", function.name)))?;
        abi::as_u64(first)
    }

    async fn poll_receipt(&self, tx: TxHash) -> Result<Receipt, ContractError> {
        loop {
            let value = self
                .provider
                .request(methods::TRANSACTION_RECEIPT, json!([tx]))
                .await?;
            if !value.is_null() {
                let receipt: TransactionReceipt = serde_json::from_value(value)
                    .map_err(|e| ContractError::Decode(format!("receipt for {tx}: {e}")))?;
                return confirmed(tx, &receipt);
            }
            tokio::time::sleep(self.policy.poll_interval).await;
        }
    }
}

fn confirmed(tx: TxHash, receipt: &TransactionReceipt) -> Result<Receipt, ContractError> {
    if !receipt.status() {
        return Err(ContractError::Reverted(tx));
    }
    let block_number = receipt
        .block_number
        .ok_or_else(|| ContractError::Decode(format!("receipt for {tx} has no block number")))?;
    Ok(Receipt { tx_hash: tx, block_number })
}

#[async_trait]
impl PetitionContract for SignedContract {
    async fn petitions_count(&self) -> Result<u64, ContractError> {
        self.call_scalar(&self.interface.petitions_count).await
    }

    async fn petition(&self, id: PetitionId) -> Result<PetitionRecord, ContractError> {
        let mut values = self.call(&self.interface.petitions, &[abi::uint(id.get())]).await?;
        let (name_at, count_at) = self.interface.petition_fields();
        if values.len() <= name_at.max(count_at) {
            let got = values.len();
            return Err(ContractError::Decode(format!("petitions({id}) returned {got} values")));
        }
        let vote_count = abi::as_u64(&values[count_at])?;
        let name = abi::into_string(values.swap_remove(name_at))?;
        Ok(PetitionRecord { name, vote_count })
    }

    async fn total_votes(&self) -> Result<u64, ContractError> {
        self.call_scalar(&self.interface.total_votes).await
    }

    async fn vote(&self, id: PetitionId) -> Result<TxHash, ContractError> {
        let data = abi::encode_call(&self.interface.vote, &[abi::uint(id.get())])?;
        let result = self
            .provider
            .request(methods::SEND_TRANSACTION, json!([self.transaction(data)]))
            .await?;
        let tx: TxHash = serde_json::from_value(result)
            .map_err(|e| ContractError::Decode(format!("transaction hash expected: {e}")))?;
        tracing::debug!(%tx, petition = %id, signer = %self.signer, "vote submitted");
        Ok(tx)
    }

    async fn wait_for_confirmation(&self, tx: TxHash) -> Result<Receipt, ContractError> {
        tokio::time::timeout(self.policy.timeout, self.poll_receipt(tx))
            .await
            .map_err(|_| ContractError::ConfirmationTimeout {
                tx,
                secs: self.policy.timeout.as_secs(),
            })?
    }
}
