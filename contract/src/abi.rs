//! JSON ABI loading and call encoding, on top of `alloy-json-abi` and
//! `alloy-dyn-abi`.

use alloy_dyn_abi::{DynSolType, FunctionExt, JsonAbiExt, Specifier};
use alloy_primitives::U256;
use serde_json::Value;

pub use alloy_dyn_abi::DynSolValue;
pub use alloy_json_abi::{Function, JsonAbi, Param};

use crate::error::ContractError;

/// Parse a bare ABI array, or a compiler artifact carrying one under `abi`.
pub fn parse_abi(json: &str) -> Result<JsonAbi, ContractError> {
    let value: Value = serde_json::from_str(json)
        .map_err(|e| ContractError::InvalidInterface(format!("not JSON: {e}")))?;
    let abi = match value {
        Value::Object(mut artifact) => artifact
            .remove("abi")
            .ok_or_else(|| ContractError::InvalidInterface("artifact has no `abi` field".into()))?,
        other => other,
    };
    serde_json::from_value(abi).map_err(|e| ContractError::InvalidInterface(e.to_string()))
}

/// Resolve the Solidity type of a parameter.
pub fn param_type(param: &Param) -> Result<DynSolType, ContractError> {
    param
        .resolve()
        .map_err(|e| ContractError::InvalidInterface(format!("type `{}`: {e}", param.ty)))
}

pub fn is_uint(ty: &DynSolType) -> bool {
    matches!(ty, DynSolType::Uint(_))
}

pub fn is_string(ty: &DynSolType) -> bool {
    matches!(ty, DynSolType::String)
}

/// A `uint256` argument.
pub fn uint(value: u64) -> DynSolValue {
    DynSolValue::Uint(U256::from(value), 256)
}

/// Selector followed by the encoded arguments.
pub fn encode_call(function: &Function, args: &[DynSolValue]) -> Result<Vec<u8>, ContractError> {
    function
        .abi_encode_input(args)
        .map_err(|e| ContractError::Encode(format!("{}: {e}", function.signature())))
}

/// Decode a call result against the function's declared outputs.
pub fn decode_output(function: &Function, data: &[u8]) -> Result<Vec<DynSolValue>, ContractError> {
    function
        .abi_decode_output(data, true)
        .map_err(|e| ContractError::Decode(format!("{}: {e}", function.signature())))
}

pub fn as_u64(value: &DynSolValue) -> Result<u64, ContractError> {
    let (n, _) = value.as_uint().ok_or_else(|| {
        ContractError::Decode(format!("expected an unsigned integer, got {value:?}"))
    })?;
    u64::try_from(n).map_err(|_| ContractError::Decode(format!("{n} does not fit in 64 bits")))
}

pub fn into_string(value: DynSolValue) -> Result<String, ContractError> {
    match value {
        DynSolValue::String(s) => Ok(s),
        other => Err(ContractError::Decode(format!("expected a string, got {other:?}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ABI: &str = r#"[{
        "type": "function",
        "name": "petitions",
        "inputs": [{ "name": "", "type": "uint256" }],
        "outputs": [
            { "name": "name", "type": "string" },
            { "name": "voteCount", "type": "uint256" }
        ],
        "stateMutability": "view"
    }]"#;

    fn petitions() -> Function {
        parse_abi(ABI).unwrap().function("petitions").unwrap()[0].clone()
    }

    #[test]
    fn artifact_and_bare_array_agree() {
        let artifact = format!(r#"{{ "contractName": "Petition", "abi": {ABI} }}"#);
        assert_eq!(parse_abi(&artifact).unwrap(), parse_abi(ABI).unwrap());
    }

    #[test]
    fn artifact_without_abi_is_rejected() {
        let err = parse_abi(r#"{ "contractName": "Petition" }"#).unwrap_err();
        assert!(matches!(err, ContractError::InvalidInterface(_)));
    }

    #[test]
    fn call_starts_with_selector() {
        let function = petitions();
        let data = encode_call(&function, &[uint(3)]).unwrap();
        assert_eq!(function.signature(), "petitions(uint256)");
        assert_eq!(&data[..4], function.selector().as_slice());
        assert_eq!(data.len(), 4 + 32);
        assert_eq!(data[35], 3);
    }

    #[test]
    fn wrong_argument_type_is_encode_error() {
        let err = encode_call(&petitions(), &[DynSolValue::Bool(true)]).unwrap_err();
        assert!(matches!(err, ContractError::Encode(_)));
    }

    #[test]
    fn truncated_output_is_decode_error() {
        let function = petitions();
        let data = function
            .abi_encode_output(&[DynSolValue::String("Clean Air".into()), uint(7)])
            .unwrap();
        let values = decode_output(&function, &data).unwrap();
        assert_eq!(as_u64(&values[1]).unwrap(), 7);

        let err = decode_output(&function, &data[..40]).unwrap_err();
        assert!(matches!(err, ContractError::Decode(_)));
    }

    #[test]
    fn wide_uint_does_not_fit() {
        let wide = DynSolValue::Uint(U256::from(u64::MAX) + U256::from(1), 256);
        assert!(as_u64(&wide).is_err());
        assert!(into_string(uint(1)).is_err());
    }
}
