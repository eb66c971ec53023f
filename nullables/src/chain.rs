//! Nullable wallet + chain: an injected wallet backed by an in-memory petition contract.

use alloy_dyn_abi::{DynSolType, DynSolValue, FunctionExt, JsonAbiExt, Specifier};
use alloy_json_abi::{Function, Param};
use alloy_primitives::{Address, Bloom, Bytes, TxKind, B256, I256, U256};
use alloy_rpc_types_eth::TransactionRequest;
use async_trait::async_trait;
use petition_contract::abi;
use petition_contract::{PetitionInterface, DEFAULT_ABI};
use petition_types::{AccountAddress, TxHash};
use petition_wallet::{methods, WalletError, WalletProvider, USER_REJECTED_CODE};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// One request as seen by the chain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordedCall {
    pub method: String,
    /// Contract function for `eth_call` / `eth_sendTransaction`.
    pub function: Option<String>,
    /// First uint argument, if any.
    pub arg: Option<u64>,
}

impl RecordedCall {
    fn plain(method: &str) -> Self {
        Self {
            method: method.to_string(),
            function: None,
            arg: None,
        }
    }
}

struct MinedTx {
    block_number: u64,
    success: bool,
    polls_left: u32,
    from: Address,
    to: Option<Address>,
}

#[derive(Default)]
struct ChainState {
    authorized: Vec<AccountAddress>,
    wallet_accounts: Vec<AccountAddress>,
    reject_authorization: bool,
    reject_transactions: bool,
    revert_next_vote: bool,
    receipt_delay: u32,
    petitions: Vec<(String, u64)>,
    total_votes: u64,
    block_number: u64,
    receipts: HashMap<TxHash, MinedTx>,
    failing_reads: Vec<(String, Option<u64>)>,
    held_reads: Vec<(String, Option<u64>, Arc<Notify>)>,
    calls: Vec<RecordedCall>,
}

/// A deterministic wallet and petition contract in one.
///
/// `eth_accounts` reports the authorized accounts; `eth_requestAccounts`
/// authorizes every account the wallet holds unless rejection is switched
/// on. Votes are applied when the transaction is sent and mined when a
/// receipt is requested.
pub struct NullChain {
    interface: PetitionInterface,
    state: Mutex<ChainState>,
}

impl NullChain {
    pub fn new() -> Self {
        Self::with_abi(DEFAULT_ABI)
    }

    /// A chain whose contract exposes `abi`. Outputs of `petitions(id)`
    /// other than the name and vote count read as zero values.
    pub fn with_abi(abi: &str) -> Self {
        Self {
            interface: PetitionInterface::parse(abi).expect("test ABI is valid"),
            state: Mutex::new(ChainState::default()),
        }
    }

    /// Accounts the wallet holds, authorized only after `eth_requestAccounts`.
    pub fn with_wallet_accounts(self, accounts: Vec<AccountAddress>) -> Self {
        self.state.lock().unwrap().wallet_accounts = accounts;
        self
    }

    /// Accounts already authorized for this site (reported by `eth_accounts`).
    pub fn with_authorized(self, accounts: Vec<AccountAddress>) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            for account in &accounts {
                if !state.wallet_accounts.contains(account) {
                    state.wallet_accounts.push(*account);
                }
            }
            state.authorized = accounts;
        }
        self
    }

    /// Seed petitions in id order. The total is the sum of their votes.
    pub fn with_petitions(self, petitions: &[(&str, u64)]) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            state.petitions = petitions.iter().map(|(n, c)| (n.to_string(), *c)).collect();
            state.total_votes = petitions.iter().map(|(_, c)| c).sum();
        }
        self
    }

    /// Replace the authorized account list, as a wallet account switch would.
    pub fn set_authorized(&self, accounts: Vec<AccountAddress>) {
        self.state.lock().unwrap().authorized = accounts;
    }

    pub fn set_reject_authorization(&self, reject: bool) {
        self.state.lock().unwrap().reject_authorization = reject;
    }

    pub fn set_reject_transactions(&self, reject: bool) {
        self.state.lock().unwrap().reject_transactions = reject;
    }

    pub fn revert_next_vote(&self) {
        self.state.lock().unwrap().revert_next_vote = true;
    }

    /// Number of empty receipt polls before a transaction shows as mined.
    pub fn set_receipt_delay(&self, polls: u32) {
        self.state.lock().unwrap().receipt_delay = polls;
    }

    /// Make the next `eth_call` to `function` (with `arg`, if given) fail.
    pub fn fail_next_read(&self, function: &str, arg: Option<u64>) {
        self.state
            .lock()
            .unwrap()
            .failing_reads
            .push((function.to_string(), arg));
    }

    /// Hold the next matching `eth_call` until the returned [`Notify`] fires.
    ///
    /// The response is computed before the hold, so releasing it later
    /// delivers the data as it was when the request arrived.
    pub fn hold_next_read(&self, function: &str, arg: Option<u64>) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.state
            .lock()
            .unwrap()
            .held_reads
            .push((function.to_string(), arg, gate.clone()));
        gate
    }

    /// Change a petition's name or votes directly, as another voter would.
    pub fn set_petition(&self, id: u64, name: &str, votes: u64) {
        let mut state = self.state.lock().unwrap();
        let index = (id - 1) as usize;
        if index >= state.petitions.len() {
            state.petitions.resize(index + 1, (String::new(), 0));
        }
        state.petitions[index] = (name.to_string(), votes);
        state.total_votes = state.petitions.iter().map(|(_, c)| c).sum();
    }

    pub fn petitions(&self) -> Vec<(String, u64)> {
        self.state.lock().unwrap().petitions.clone()
    }

    pub fn total_votes(&self) -> u64 {
        self.state.lock().unwrap().total_votes
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Requests to `method`, optionally narrowed to one contract function.
    pub fn count_calls(&self, method: &str, function: Option<&str>) -> usize {
        self.state
            .lock()
            .unwrap()
            .calls
            .iter()
            .filter(|c| c.method == method)
            .filter(|c| function.map_or(true, |f| c.function.as_deref() == Some(f)))
            .count()
    }

    pub fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    fn decode_call(
        &self,
        params: &Value,
    ) -> Result<(&Function, Option<u64>, TransactionRequest), WalletError> {
        let tx: TransactionRequest = params
            .get(0)
            .cloned()
            .ok_or_else(|| invalid_params("missing transaction object"))
            .and_then(|tx| {
                serde_json::from_value(tx).map_err(|e| invalid_params(&e.to_string()))
            })?;
        let data = tx
            .input
            .input()
            .ok_or_else(|| invalid_params("missing data"))?;
        if data.len() < 4 {
            return Err(invalid_params("calldata shorter than a selector"));
        }

        let function = [
            &self.interface.petitions_count,
            &self.interface.petitions,
            &self.interface.total_votes,
            &self.interface.vote,
        ]
        .into_iter()
        .find(|f| f.selector().as_slice() == &data[..4])
        .ok_or_else(|| WalletError::Rpc {
            code: -32000,
            message: "execution reverted: unknown selector".into(),
        })?;

        let args = function
            .abi_decode_input(&data[4..], true)
            .map_err(|e| invalid_params(&e.to_string()))?;
        let arg = args
            .first()
            .map(abi::as_u64)
            .transpose()
            .map_err(|e| invalid_params(&e.to_string()))?;
        Ok((function, arg, tx))
    }

    fn read(
        &self,
        state: &ChainState,
        function: &Function,
        arg: Option<u64>,
    ) -> Result<Value, WalletError> {
        let values = match function.name.as_str() {
            "petitionsCount" => vec![abi::uint(state.petitions.len() as u64)],
            "totalVotes" => vec![abi::uint(state.total_votes)],
            "petitions" => {
                // Mapping semantics: unknown ids read as the zero value.
                let (name, votes) = arg
                    .and_then(|id| id.checked_sub(1))
                    .and_then(|i| usize::try_from(i).ok())
                    .and_then(|i| state.petitions.get(i).cloned())
                    .unwrap_or_default();
                let (name_at, count_at) = self.interface.petition_fields();
                let mut values = function
                    .outputs
                    .iter()
                    .map(zero_value)
                    .collect::<Result<Vec<_>, _>>()?;
                values[name_at] = DynSolValue::String(name);
                values[count_at] = abi::uint(votes);
                values
            }
            _ => Vec::new(),
        };
        let encoded = function.abi_encode_output(&values).map_err(|e| WalletError::Rpc {
            code: -32603,
            message: format!("cannot encode {} output: {e}", function.name),
        })?;
        Ok(json!(Bytes::from(encoded)))
    }

    async fn eth_call(&self, params: &Value) -> Result<Value, WalletError> {
        let (function, arg, _) = self.decode_call(params)?;
        let function_name = function.name.clone();
        let (response, gate) = {
            let mut state = self.state.lock().unwrap();
            state.calls.push(RecordedCall {
                method: methods::CALL.into(),
                function: Some(function_name.clone()),
                arg,
            });

            if take_matching(&mut state.failing_reads, &function_name, arg, |(f, a)| (f, a)).is_some() {
                return Err(WalletError::Rpc {
                    code: -32603,
                    message: format!("internal error reading {function_name}"),
                });
            }
            let gate = take_matching(&mut state.held_reads, &function_name, arg, |(f, a, _)| (f, a))
                .map(|(_, _, gate)| gate);
            (self.read(&state, function, arg)?, gate)
        };

        if let Some(gate) = gate {
            gate.notified().await;
        }
        Ok(response)
    }

    fn send_transaction(&self, params: &Value) -> Result<Value, WalletError> {
        let (function, arg, tx) = self.decode_call(params)?;
        let mut guard = self.state.lock().unwrap();
        let state = &mut *guard;
        state.calls.push(RecordedCall {
            method: methods::SEND_TRANSACTION.into(),
            function: Some(function.name.clone()),
            arg,
        });

        if state.reject_transactions {
            return Err(rejected("User denied transaction signature."));
        }
        let Some(from) = tx
            .from
            .filter(|a| state.authorized.contains(&AccountAddress::from(*a)))
        else {
            return Err(WalletError::Rpc {
                code: 4100,
                message: "the requested account has not been authorized".into(),
            });
        };

        let mut success = function.name == "vote" && !std::mem::take(&mut state.revert_next_vote);
        if success {
            let slot = arg
                .and_then(|id| id.checked_sub(1))
                .and_then(|i| usize::try_from(i).ok())
                .and_then(|i| state.petitions.get_mut(i));
            match slot {
                Some((_, votes)) => {
                    *votes += 1;
                    state.total_votes += 1;
                }
                None => success = false,
            }
        }

        state.block_number += 1;
        let mut hash = [0u8; 32];
        hash[24..].copy_from_slice(&state.block_number.to_be_bytes());
        let tx_hash = TxHash::from(hash);
        let mined = MinedTx {
            block_number: state.block_number,
            success,
            polls_left: state.receipt_delay,
            from,
            to: match tx.to {
                Some(TxKind::Call(to)) => Some(to),
                _ => None,
            },
        };
        state.receipts.insert(tx_hash, mined);
        Ok(json!(tx_hash))
    }

    fn receipt(&self, params: &Value) -> Result<Value, WalletError> {
        let tx_hash: TxHash = params
            .get(0)
            .cloned()
            .ok_or_else(|| invalid_params("missing transaction hash"))
            .and_then(|raw| {
                serde_json::from_value(raw).map_err(|e| invalid_params(&e.to_string()))
            })?;

        let mut state = self.state.lock().unwrap();
        state.calls.push(RecordedCall::plain(methods::TRANSACTION_RECEIPT));
        let Some(mined) = state.receipts.get_mut(&tx_hash) else {
            return Ok(Value::Null);
        };
        if mined.polls_left > 0 {
            mined.polls_left -= 1;
            return Ok(Value::Null);
        }
        let mut block_hash = [0u8; 32];
        block_hash[..8].copy_from_slice(&mined.block_number.to_be_bytes());
        Ok(json!({
            "type": "0x2",
            "status": if mined.success { "0x1" } else { "0x0" },
            "cumulativeGasUsed": "0xb0fc",
            "logs": [],
            "logsBloom": Bloom::ZERO,
            "transactionHash": tx_hash,
            "transactionIndex": "0x0",
            "blockHash": B256::from(block_hash),
            "blockNumber": format!("0x{:x}", mined.block_number),
            "gasUsed": "0xb0fc",
            "effectiveGasPrice": "0x3b9aca00",
            "from": mined.from,
            "to": mined.to,
            "contractAddress": null,
        }))
    }
}

impl Default for NullChain {
    fn default() -> Self {
        Self::new()
    }
}

/// The value an unset storage slot of `param`'s type reads as.
fn zero_value(param: &Param) -> Result<DynSolValue, WalletError> {
    let ty = param.resolve().map_err(|e| invalid_params(&e.to_string()))?;
    Ok(match ty {
        DynSolType::Bool => DynSolValue::Bool(false),
        DynSolType::Int(bits) => DynSolValue::Int(I256::ZERO, bits),
        DynSolType::Uint(bits) => DynSolValue::Uint(U256::ZERO, bits),
        DynSolType::FixedBytes(size) => DynSolValue::FixedBytes(B256::ZERO, size),
        DynSolType::Address => DynSolValue::Address(Address::ZERO),
        DynSolType::Bytes => DynSolValue::Bytes(Vec::new()),
        DynSolType::String => DynSolValue::String(String::new()),
        other => {
            return Err(invalid_params(&format!("no zero value for {other:?}")));
        }
    })
}

fn invalid_params(message: &str) -> WalletError {
    WalletError::Rpc {
        code: -32602,
        message: message.to_string(),
    }
}

fn rejected(message: &str) -> WalletError {
    WalletError::Rejected(format!("{USER_REJECTED_CODE}: {message}"))
}

/// Remove and return the first entry matching `function` and `arg`.
/// An entry with no argument matches any argument.
fn take_matching<T>(
    entries: &mut Vec<T>,
    function: &str,
    arg: Option<u64>,
    key: impl Fn(&T) -> (&String, &Option<u64>),
) -> Option<T> {
    let position = entries.iter().position(|entry| {
        let (f, a) = key(entry);
        f == function && (a.is_none() || *a == arg)
    })?;
    Some(entries.remove(position))
}

#[async_trait]
impl WalletProvider for NullChain {
    async fn request(&self, method: &str, params: Value) -> Result<Value, WalletError> {
        match method {
            methods::ACCOUNTS => {
                let mut state = self.state.lock().unwrap();
                state.calls.push(RecordedCall::plain(method));
                Ok(json!(state.authorized.iter().map(|a| a.to_hex()).collect::<Vec<_>>()))
            }
            methods::REQUEST_ACCOUNTS => {
                let mut state = self.state.lock().unwrap();
                state.calls.push(RecordedCall::plain(method));
                if state.reject_authorization {
                    return Err(rejected("User rejected the request."));
                }
                state.authorized = state.wallet_accounts.clone();
                Ok(json!(state.authorized.iter().map(|a| a.to_hex()).collect::<Vec<_>>()))
            }
            methods::CALL => self.eth_call(&params).await,
            methods::SEND_TRANSACTION => self.send_transaction(&params),
            methods::TRANSACTION_RECEIPT => self.receipt(&params),
            other => {
                self.state.lock().unwrap().calls.push(RecordedCall::plain(other));
                Err(WalletError::Rpc {
                    code: -32601,
                    message: format!("method {other} not supported"),
                })
            }
        }
    }

    fn name(&self) -> &str {
        "null-chain"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use petition_contract::{ConfirmationPolicy, ContractBinding, PetitionContract};
    use petition_types::PetitionId;
    use std::time::Duration;

    const CONTRACT: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";

    fn account() -> AccountAddress {
        AccountAddress::new([0xaa; 20])
    }

    fn fast_policy() -> ConfirmationPolicy {
        ConfirmationPolicy {
            poll_interval: Duration::from_millis(1),
            timeout: Duration::from_secs(5),
        }
    }

    fn bound(chain: Arc<NullChain>) -> petition_contract::ContractHandle {
        let provider: Arc<dyn WalletProvider> = chain;
        ContractBinding::new(CONTRACT, DEFAULT_ABI, fast_policy())
            .bind(Some(&provider), Some(account()))
            .unwrap()
            .unwrap()
    }

    #[tokio::test]
    async fn request_accounts_authorizes_wallet_accounts() {
        let chain = NullChain::new().with_wallet_accounts(vec![account()]);
        assert_eq!(chain.request(methods::ACCOUNTS, json!([])).await.unwrap(), json!([]));
        let granted = chain.request(methods::REQUEST_ACCOUNTS, json!([])).await.unwrap();
        assert_eq!(granted, json!([account().to_hex()]));
        assert_eq!(chain.request(methods::ACCOUNTS, json!([])).await.unwrap(), granted);
    }

    #[tokio::test]
    async fn rejection_uses_rejected_error() {
        let chain = NullChain::new().with_wallet_accounts(vec![account()]);
        chain.set_reject_authorization(true);
        let err = chain.request(methods::REQUEST_ACCOUNTS, json!([])).await.unwrap_err();
        assert!(err.is_rejection());
    }

    #[tokio::test]
    async fn reads_through_signed_contract() {
        let chain = Arc::new(
            NullChain::new()
                .with_authorized(vec![account()])
                .with_petitions(&[("Clean Air", 5), ("Save Forests", 2)]),
        );
        let handle = bound(chain.clone());
        let contract = handle.contract();

        assert_eq!(contract.petitions_count().await.unwrap(), 2);
        assert_eq!(contract.total_votes().await.unwrap(), 7);
        let second = contract.petition(PetitionId::new(2).unwrap()).await.unwrap();
        assert_eq!(second.name, "Save Forests");
        assert_eq!(second.vote_count, 2);
        assert_eq!(chain.count_calls(methods::CALL, Some("petitions")), 1);
    }

    #[tokio::test]
    async fn extra_petition_outputs_read_as_zero() {
        let abi = DEFAULT_ABI.replace(
            r#"{ "name": "voteCount", "type": "uint256" }"#,
            r#"{ "name": "voteCount", "type": "uint256" }, { "name": "descriptionHash", "type": "bytes32" }"#,
        );
        let chain = Arc::new(
            NullChain::with_abi(&abi)
                .with_authorized(vec![account()])
                .with_petitions(&[("Clean Air", 5)]),
        );
        let provider: Arc<dyn WalletProvider> = chain.clone();
        let handle = ContractBinding::new(CONTRACT, abi, fast_policy())
            .bind(Some(&provider), Some(account()))
            .unwrap()
            .unwrap();

        let first = handle.contract().petition(PetitionId::FIRST).await.unwrap();
        assert_eq!((first.name.as_str(), first.vote_count), ("Clean Air", 5));
    }

    #[tokio::test]
    async fn receipt_is_a_full_rpc_receipt() {
        let chain = Arc::new(
            NullChain::new()
                .with_authorized(vec![account()])
                .with_petitions(&[("Clean Air", 5)]),
        );
        let handle = bound(chain.clone());
        let tx = handle.contract().vote(PetitionId::FIRST).await.unwrap();

        let raw = chain.request(methods::TRANSACTION_RECEIPT, json!([tx])).await.unwrap();
        let receipt: alloy_rpc_types_eth::TransactionReceipt = serde_json::from_value(raw).unwrap();
        assert!(receipt.status());
        assert_eq!(receipt.transaction_hash, tx);
        assert_eq!(receipt.from, account().inner());
        assert_eq!(receipt.block_number, Some(1));
    }

    #[tokio::test]
    async fn vote_is_mined_after_receipt_delay() {
        let chain = Arc::new(
            NullChain::new()
                .with_authorized(vec![account()])
                .with_petitions(&[("Clean Air", 5)]),
        );
        chain.set_receipt_delay(2);
        let handle = bound(chain.clone());

        let tx = handle.contract().vote(PetitionId::FIRST).await.unwrap();
        let receipt = handle.contract().wait_for_confirmation(tx).await.unwrap();
        assert_eq!(receipt.tx_hash, tx);
        assert_eq!(chain.count_calls(methods::TRANSACTION_RECEIPT, None), 3);
        assert_eq!(chain.petitions()[0].1, 6);
        assert_eq!(chain.total_votes(), 6);
    }

    #[tokio::test]
    async fn reverted_vote_changes_nothing() {
        let chain = Arc::new(
            NullChain::new()
                .with_authorized(vec![account()])
                .with_petitions(&[("Clean Air", 5)]),
        );
        chain.revert_next_vote();
        let handle = bound(chain.clone());

        let tx = handle.contract().vote(PetitionId::FIRST).await.unwrap();
        let err = handle.contract().wait_for_confirmation(tx).await.unwrap_err();
        assert!(matches!(err, petition_contract::ContractError::Reverted(_)));
        assert_eq!(chain.total_votes(), 5);
    }

    #[tokio::test]
    async fn failing_read_is_one_shot() {
        let chain = Arc::new(
            NullChain::new()
                .with_authorized(vec![account()])
                .with_petitions(&[("Clean Air", 5)]),
        );
        chain.fail_next_read("totalVotes", None);
        let handle = bound(chain.clone());

        assert!(handle.contract().total_votes().await.is_err());
        assert_eq!(handle.contract().total_votes().await.unwrap(), 5);
    }

    #[tokio::test]
    async fn unauthorized_sender_is_refused() {
        let chain = Arc::new(NullChain::new().with_petitions(&[("Clean Air", 5)]));
        let handle = bound(chain.clone());
        let err = handle.contract().vote(PetitionId::FIRST).await.unwrap_err();
        assert!(matches!(
            err,
            petition_contract::ContractError::Provider(WalletError::Rpc { code: 4100, .. })
        ));
    }
}
