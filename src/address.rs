use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use sha3::{Digest, Sha3_256};
use std::{fmt, str::FromStr};
use thiserror::Error;

/// Length in bytes of an account address
pub const ADDRESS_LENGTH: usize = 32;

// Appended to the public key before hashing to get the authentication key of a single-key account
const ED25519_SCHEME: u8 = 0x00;

/// 32-byte account address. Parses short (`0x1`) and long forms, always displays the long form.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AccountAddress([u8; ADDRESS_LENGTH]);

#[allow(missing_docs)]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AddressError {
    #[error("Address is empty")]
    Empty,
    #[error("Address has {0} hex digits, at most 64 allowed")]
    TooLong(usize),
    #[error("Address is not valid hex: {0}")]
    Hex(String),
}

impl AccountAddress {
    /// The framework address, `0x1`
    pub const ONE: AccountAddress = AccountAddress::one();

    const fn one() -> Self {
        let mut bytes = [0u8; ADDRESS_LENGTH];
        bytes[ADDRESS_LENGTH - 1] = 1;
        AccountAddress(bytes)
    }

    /// Constructor from raw bytes
    pub const fn new(bytes: [u8; ADDRESS_LENGTH]) -> Self {
        AccountAddress(bytes)
    }

    /// Parse from hex with or without a `0x` prefix; short forms are left-padded with zeros
    pub fn from_hex(s: &str) -> Result<Self, AddressError> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        if digits.is_empty() {
            return Err(AddressError::Empty);
        }
        if digits.len() > ADDRESS_LENGTH * 2 {
            return Err(AddressError::TooLong(digits.len()));
        }
        let padded = format!("{:0>64}", digits);
        let decoded = hex::decode(padded).map_err(|e| AddressError::Hex(e.to_string()))?;
        let mut bytes = [0u8; ADDRESS_LENGTH];
        bytes.copy_from_slice(&decoded);
        Ok(AccountAddress(bytes))
    }

    /// Address of the account created for a single Ed25519 key
    pub fn from_ed25519_public_key(public_key: &[u8; 32]) -> Self {
        let mut hasher = Sha3_256::new();
        hasher.update(public_key);
        hasher.update([ED25519_SCHEME]);
        let digest = hasher.finalize();
        let mut bytes = [0u8; ADDRESS_LENGTH];
        bytes.copy_from_slice(&digest);
        AccountAddress(bytes)
    }

    /// `0x` followed by all 64 hex digits
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    #[allow(missing_docs)]
    pub fn as_bytes(&self) -> &[u8; ADDRESS_LENGTH] {
        &self.0
    }
}

impl fmt::Display for AccountAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for AccountAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountAddress({})", self.to_hex())
    }
}

impl FromStr for AccountAddress {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AccountAddress::from_hex(s)
    }
}

impl Serialize for AccountAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for AccountAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        AccountAddress::from_hex(&s).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const USER_PUBLIC_KEY: &str =
        "6718aa0146691b7d6517d9cefda77cd58d0143e0e64dba76b087a23a63f8fccf";
    const USER_ADDRESS: &str = "0x8630f8fe18d3d841aa9e5d349c011d3330c81fd71db252024622055bbdcccb44";

    #[test]
    fn short_form_is_left_padded() {
        let one = AccountAddress::from_hex("0x1").unwrap();
        assert_eq!(one, AccountAddress::ONE);
        assert_eq!(
            one.to_string(),
            "0x0000000000000000000000000000000000000000000000000000000000000001"
        );
    }

    #[test]
    fn prefix_is_optional() {
        let with = AccountAddress::from_hex(USER_ADDRESS).unwrap();
        let without = AccountAddress::from_hex(&USER_ADDRESS[2..]).unwrap();
        assert_eq!(with, without);
    }

    #[test]
    fn rejects_bad_input() {
        assert_eq!(AccountAddress::from_hex("0x"), Err(AddressError::Empty));
        assert_eq!(
            AccountAddress::from_hex(&"f".repeat(65)),
            Err(AddressError::TooLong(65))
        );
        assert!(matches!(
            AccountAddress::from_hex("0xzz"),
            Err(AddressError::Hex(_))
        ));
    }

    #[test]
    fn derives_address_from_public_key() {
        let mut public_key = [0u8; 32];
        public_key.copy_from_slice(&hex::decode(USER_PUBLIC_KEY).unwrap());
        let address = AccountAddress::from_ed25519_public_key(&public_key);
        assert_eq!(address.to_hex(), USER_ADDRESS);
    }

    #[test]
    fn serde_uses_long_hex() {
        let json = serde_json::to_string(&AccountAddress::ONE).unwrap();
        assert_eq!(
            json,
            "\"0x0000000000000000000000000000000000000000000000000000000000000001\""
        );
        let back: AccountAddress = serde_json::from_str("\"0x1\"").unwrap();
        assert_eq!(back, AccountAddress::ONE);
    }

    proptest! {
        #[test]
        fn display_parses_back(bytes in any::<[u8; 32]>()) {
            let address = AccountAddress::new(bytes);
            let parsed = AccountAddress::from_hex(&address.to_string()).unwrap();
            prop_assert_eq!(parsed, address);
        }

        #[test]
        fn short_forms_match_padded(digits in "[0-9a-f]{1,64}") {
            let short = AccountAddress::from_hex(&digits).unwrap();
            let padded = AccountAddress::from_hex(&format!("{:0>64}", digits)).unwrap();
            prop_assert_eq!(short, padded);
        }
    }
}
