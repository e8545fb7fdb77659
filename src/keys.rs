use crate::address::AccountAddress;
use async_trait::async_trait;
use ed25519_dalek::{Signer, SigningKey, SECRET_KEY_LENGTH};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::{fmt, path::Path};
use thiserror::Error;
use tokio::fs;

/// Source of the signing key used to authorize transactions
#[async_trait]
pub trait Keys: Send + Sync {
    /// Address of the account the key signs for
    async fn address(&self) -> KeysResult<AccountAddress>;

    /// Raw Ed25519 public key
    async fn public_key(&self) -> KeysResult<[u8; 32]>;

    /// Ed25519 signature over `message`
    async fn sign(&self, message: &[u8]) -> KeysResult<[u8; 64]>;
}

#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum KeysError {
    #[error("Seed is not valid hex: {0:?}")]
    BadSeedHex(hex::FromHexError),
    #[error("Seed must be 32 bytes, got {0}")]
    BadSeedLength(usize),
    #[error("Error reading seed file: {0:?}")]
    SeedFile(Box<dyn std::error::Error + Send + Sync>),
    #[error("Environment variable {0:?} is not set")]
    MissingEnvVar(String),
}

#[allow(missing_docs)]
pub type KeysResult<T> = Result<T, KeysError>;

/// Ed25519 key built from a raw 32-byte seed
pub struct SeedKeys {
    signing_key: SigningKey,
    address: AccountAddress,
}

impl SeedKeys {
    /// Build from a hex seed. `pinned_address` overrides the derived address, which is needed
    /// once an account has rotated its key.
    pub fn from_hex_seed(
        seed: &SecretString,
        pinned_address: Option<AccountAddress>,
    ) -> KeysResult<Self> {
        let exposed = seed.expose_secret();
        let digits = exposed.trim().strip_prefix("0x").unwrap_or(exposed.trim());
        let bytes = hex::decode(digits).map_err(KeysError::BadSeedHex)?;
        let secret: [u8; SECRET_KEY_LENGTH] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| KeysError::BadSeedLength(bytes.len()))?;
        let signing_key = SigningKey::from_bytes(&secret);
        let derived = AccountAddress::from_ed25519_public_key(signing_key.verifying_key().as_bytes());
        let address = pinned_address.unwrap_or(derived);
        Ok(SeedKeys {
            signing_key,
            address,
        })
    }

    /// Seed read from a TOML seed file
    pub async fn from_seed_file<P: AsRef<Path>>(
        path: P,
        pinned_address: Option<AccountAddress>,
    ) -> KeysResult<Self> {
        let seed = read_seed_file(path).await?;
        SeedKeys::from_hex_seed(&seed, pinned_address)
    }

    /// Seed read from an environment variable
    pub fn from_env(var: &str, pinned_address: Option<AccountAddress>) -> KeysResult<Self> {
        let seed = std::env::var(var).map_err(|_| KeysError::MissingEnvVar(var.to_string()))?;
        SeedKeys::from_hex_seed(&SecretString::new(seed), pinned_address)
    }
}

impl fmt::Debug for SeedKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SeedKeys")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Keys for SeedKeys {
    async fn address(&self) -> KeysResult<AccountAddress> {
        Ok(self.address)
    }

    async fn public_key(&self) -> KeysResult<[u8; 32]> {
        Ok(self.signing_key.verifying_key().to_bytes())
    }

    async fn sign(&self, message: &[u8]) -> KeysResult<[u8; 64]> {
        Ok(self.signing_key.sign(message).to_bytes())
    }
}

/// On-disk shape of the seed file
#[derive(Serialize, Deserialize)]
pub struct SeedFile {
    seed: String,
}

impl SeedFile {
    #[allow(missing_docs)]
    pub fn new(seed: &str) -> Self {
        SeedFile {
            seed: seed.to_string(),
        }
    }
}

/// Reads the hex seed from a TOML file with a single `seed` field
pub async fn read_seed_file<P: AsRef<Path>>(path: P) -> KeysResult<SecretString> {
    let text = fs::read_to_string(path)
        .await
        .map_err(|e| KeysError::SeedFile(Box::new(e)))?;
    let file: SeedFile = toml::from_str(&text).map_err(|e| KeysError::SeedFile(Box::new(e)))?;
    Ok(SecretString::new(file.seed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ed25519_dalek::{Signature, Verifier, VerifyingKey};
    use std::io::Write;

    const USER_SEED: &str = "165b006e6718b20a8275f52189419655bcab018eda25eb2002b6077a05261646";
    const USER_ADDRESS: &str = "0x8630f8fe18d3d841aa9e5d349c011d3330c81fd71db252024622055bbdcccb44";
    const HELLO_SIGNATURE: &str = "e77d1420eb3334eb9641d8d9bcec4da6d0cddf13570619e0be0923650d2583305582fdd076cff31a377755a1adcdf794d9181cc67770e362b91dd5e84ece3f01";

    fn user_keys() -> SeedKeys {
        SeedKeys::from_hex_seed(&SecretString::new(USER_SEED.to_string()), None).unwrap()
    }

    #[tokio::test]
    async fn derives_user_address_from_seed() {
        let keys = user_keys();
        assert_eq!(keys.address().await.unwrap().to_hex(), USER_ADDRESS);
    }

    #[tokio::test]
    async fn pinned_address_wins() {
        let keys = SeedKeys::from_hex_seed(
            &SecretString::new(USER_SEED.to_string()),
            Some(AccountAddress::ONE),
        )
        .unwrap();
        assert_eq!(keys.address().await.unwrap(), AccountAddress::ONE);
    }

    #[tokio::test]
    async fn signs_deterministically() {
        let keys = user_keys();
        let signature = keys.sign(b"hello").await.unwrap();
        assert_eq!(hex::encode(signature), HELLO_SIGNATURE);

        let verifying_key = VerifyingKey::from_bytes(&keys.public_key().await.unwrap()).unwrap();
        verifying_key
            .verify(b"hello", &Signature::from_bytes(&signature))
            .unwrap();
    }

    #[test]
    fn rejects_short_seed() {
        let res = SeedKeys::from_hex_seed(&SecretString::new("0xabcd".to_string()), None);
        assert!(matches!(res, Err(KeysError::BadSeedLength(2))));
    }

    #[test]
    fn rejects_non_hex_seed() {
        let res = SeedKeys::from_hex_seed(&SecretString::new("not a seed".to_string()), None);
        assert!(matches!(res, Err(KeysError::BadSeedHex(_))));
    }

    #[tokio::test]
    async fn reads_seed_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "seed = \"{}\"", USER_SEED).unwrap();
        let keys = SeedKeys::from_seed_file(file.path(), None).await.unwrap();
        assert_eq!(keys.address().await.unwrap().to_hex(), USER_ADDRESS);
    }

    #[test]
    fn missing_env_var_is_reported() {
        let res = SeedKeys::from_env("URN_TO_EARN_SEED_THAT_IS_NOT_SET", None);
        assert!(matches!(res, Err(KeysError::MissingEnvVar(_))));
    }
}
