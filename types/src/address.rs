//! 20-byte account addresses.

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TypesError;

/// An externally owned account reported by a wallet provider.
///
/// Always exactly 20 bytes. Parsing accepts `0x`-prefixed hex in any letter
/// case; checksums are not enforced because providers report lowercase
/// addresses as often as checksummed ones.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountAddress(Address);

/// Deployed contract addresses share the account representation.
pub type ContractAddress = AccountAddress;

impl AccountAddress {
    pub const LEN: usize = 20;

    pub fn new(bytes: [u8; 20]) -> Self {
        Self(Address::from(bytes))
    }

    /// Parse a `0x`-prefixed, 40-hex-digit address.
    pub fn parse(raw: &str) -> Result<Self, TypesError> {
        let invalid = |reason: &str| TypesError::InvalidAddress {
            value: raw.to_string(),
            reason: reason.to_string(),
        };

        let digits = raw
            .strip_prefix("0x")
            .or_else(|| raw.strip_prefix("0X"))
            .ok_or_else(|| invalid("missing 0x prefix"))?;
        if digits.len() != Self::LEN * 2 {
            return Err(invalid("expected 40 hex digits"));
        }
        Address::from_str(digits)
            .map(Self)
            .map_err(|e| invalid(&e.to_string()))
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_slice()
    }

    /// The underlying primitive, for ABI encoding.
    pub fn inner(&self) -> Address {
        self.0
    }

    /// Lowercase `0x`-prefixed hex, the form providers expect in requests.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0.as_slice()))
    }
}

impl fmt::Display for AccountAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for AccountAddress {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for AccountAddress {
    type Error = TypesError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Address> for AccountAddress {
    fn from(address: Address) -> Self {
        Self(address)
    }
}

impl From<AccountAddress> for String {
    fn from(address: AccountAddress) -> Self {
        address.to_hex()
    }
}
