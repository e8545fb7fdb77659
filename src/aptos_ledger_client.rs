use crate::{
    address::AccountAddress,
    backend::TxSettings,
    error::*,
    keys::SeedKeys,
    transaction::ModuleId,
    urn_to_earn::{MODULE_NAME, OWNER_ADDRESS},
};
use aptos_http_client::{AptosHttp, IndexerHttp, TESTNET_INDEXER_URL, TESTNET_URL};
use dirs::home_dir;
use serde::{de::DeserializeOwned, ser, Deserialize, Serialize};
use std::{
    path::{Path, PathBuf},
    time::Duration,
};
use thiserror::Error;
use tokio::{fs, io::AsyncWriteExt};

pub use rest_ledger::AptosLedgerClient;

/// Ledger client backed by a full node and the token indexer
pub mod rest_ledger;

#[cfg(test)]
mod tests;

#[allow(missing_docs)]
pub const CONFIG_FOLDER: &str = ".urn-to-earn";
#[allow(missing_docs)]
pub const CONFIG_FILE: &str = "config.toml";
#[allow(missing_docs)]
pub const SEED_FILE: &str = "seed.toml";

/// Chain id of the Aptos testnet
pub const TESTNET_CHAIN_ID: u8 = 2;
/// Default cap for [`AptosLedgerClient::wait_for_transaction`]
pub const DEFAULT_WAIT_TIMEOUT_SECS: u64 = 30;
#[allow(missing_docs)]
pub const DEFAULT_WAIT_POLL_INTERVAL_MS: u64 = 500;

#[allow(missing_docs)]
pub fn path_to_config_dir() -> Result<PathBuf> {
    let mut dir =
        home_dir().ok_or_else(|| Error::Config("Could not find home directory :(".to_string()))?;
    dir.push(CONFIG_FOLDER);
    Ok(dir)
}

#[allow(missing_docs)]
pub fn path_to_config_file() -> Result<PathBuf> {
    let mut dir = path_to_config_dir()?;
    dir.push(CONFIG_FILE);
    Ok(dir)
}

#[allow(missing_docs)]
pub fn path_to_seed_file() -> Result<PathBuf> {
    let mut dir = path_to_config_dir()?;
    dir.push(SEED_FILE);
    Ok(dir)
}

/// Loads the config at `path`, or the default location when `path` is `None`
pub async fn get_client_config_from_file(path: Option<&Path>) -> Result<ClientConfig> {
    let config_path = match path {
        Some(path) => path.to_path_buf(),
        None => path_to_config_file()?,
    };
    read_toml_struct_from_file::<ClientConfig>(&config_path)
        .await?
        .ok_or_else(|| {
            Error::Config(format!(
                "No config found at {config_path:?}, run `urn-cli init` first"
            ))
        })
}

/// Where the signing seed comes from
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum KeySource {
    /// TOML file holding `seed = "<hex>"`
    RawSeed { seed_file: PathBuf },
    /// Environment variable holding the hex seed
    EnvSeed { var: String },
}

fn default_node_url() -> String {
    TESTNET_URL.to_string()
}

fn default_indexer_url() -> String {
    TESTNET_INDEXER_URL.to_string()
}

fn default_module_address() -> String {
    OWNER_ADDRESS.to_string()
}

fn default_module_name() -> String {
    MODULE_NAME.to_string()
}

fn default_gas_unit_price() -> u64 {
    TxSettings::default().gas_unit_price
}

fn default_max_gas_amount() -> u64 {
    TxSettings::default().max_gas_amount
}

fn default_expiration_secs() -> u64 {
    TxSettings::default().expiration_secs
}

fn default_wait_timeout_secs() -> u64 {
    DEFAULT_WAIT_TIMEOUT_SECS
}

fn default_wait_poll_interval_ms() -> u64 {
    DEFAULT_WAIT_POLL_INTERVAL_MS
}

/// Everything needed to talk to a network as a given account
#[allow(missing_docs)]
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    #[serde(default = "default_node_url")]
    pub node_url: String,
    #[serde(default = "default_indexer_url")]
    pub indexer_url: String,
    /// Fetched from the node when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<u8>,
    #[serde(default = "default_module_address")]
    pub module_address: String,
    #[serde(default = "default_module_name")]
    pub module_name: String,
    #[serde(default = "default_gas_unit_price")]
    pub gas_unit_price: u64,
    #[serde(default = "default_max_gas_amount")]
    pub max_gas_amount: u64,
    #[serde(default = "default_expiration_secs")]
    pub expiration_secs: u64,
    #[serde(default = "default_wait_timeout_secs")]
    pub wait_timeout_secs: u64,
    #[serde(default = "default_wait_poll_interval_ms")]
    pub wait_poll_interval_ms: u64,
    /// Overrides the address derived from the key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<AccountAddress>,
    pub key_source: KeySource,
}

impl ClientConfig {
    /// Testnet defaults with the given key
    pub fn new(key_source: KeySource) -> Self {
        ClientConfig {
            node_url: default_node_url(),
            indexer_url: default_indexer_url(),
            chain_id: Some(TESTNET_CHAIN_ID),
            module_address: default_module_address(),
            module_name: default_module_name(),
            gas_unit_price: default_gas_unit_price(),
            max_gas_amount: default_max_gas_amount(),
            expiration_secs: default_expiration_secs(),
            wait_timeout_secs: default_wait_timeout_secs(),
            wait_poll_interval_ms: default_wait_poll_interval_ms(),
            sender: None,
            key_source,
        }
    }

    /// Gas and expiration settings for the backend
    pub fn tx_settings(&self) -> TxSettings {
        TxSettings {
            gas_unit_price: self.gas_unit_price,
            max_gas_amount: self.max_gas_amount,
            expiration_secs: self.expiration_secs,
        }
    }

    /// The game module this config points at
    pub fn module(&self) -> Result<ModuleId> {
        let address = AccountAddress::from_hex(&self.module_address)?;
        Ok(ModuleId::new(address, &self.module_name))
    }

    /// Loads the key and builds the client. Nothing is fetched from the network yet.
    pub async fn to_client(&self) -> Result<AptosLedgerClient<SeedKeys>> {
        let keys = match &self.key_source {
            KeySource::RawSeed { seed_file } => {
                SeedKeys::from_seed_file(seed_file, self.sender).await?
            }
            KeySource::EnvSeed { var } => SeedKeys::from_env(var, self.sender)?,
        };
        let node = AptosHttp::new(&self.node_url);
        let indexer = IndexerHttp::new(&self.indexer_url);
        let client = AptosLedgerClient::new(node, indexer, keys, self.chain_id).with_wait(
            Duration::from_secs(self.wait_timeout_secs),
            Duration::from_millis(self.wait_poll_interval_ms),
        );
        Ok(client)
    }
}

#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum TomlError {
    #[error("No config directory for file: {0:?}")]
    NoParentDir(String),
}

#[allow(missing_docs)]
pub async fn write_toml_struct_to_file<Toml: ser::Serialize>(
    file_path: &PathBuf,
    toml_struct: &Toml,
) -> Result<()> {
    let serialized = toml::to_string(&toml_struct).map_err(|e| Error::TOML(Box::new(e)))?;
    let parent_dir = file_path
        .parent()
        .ok_or_else(|| TomlError::NoParentDir(format!("{file_path:?}")))
        .map_err(|e| Error::TOML(Box::new(e)))?;
    fs::create_dir_all(&parent_dir)
        .await
        .map_err(|e| Error::TOML(Box::new(e)))?;
    let mut file = fs::OpenOptions::new()
        .write(true)
        .truncate(true)
        .create(true)
        .open(&file_path)
        .await
        .map_err(|e| Error::TOML(Box::new(e)))?;
    file.write_all(&serialized.into_bytes())
        .await
        .map_err(|e| Error::TOML(Box::new(e)))?;
    Ok(())
}

/// `None` when the file doesn't exist
pub async fn read_toml_struct_from_file<Toml: DeserializeOwned>(
    file_path: &PathBuf,
) -> Result<Option<Toml>> {
    if file_path.exists() {
        let contents = fs::read_to_string(file_path)
            .await
            .map_err(|e| Error::TOML(Box::new(e)))?;
        let toml_struct = toml::from_str(&contents).map_err(|e| Error::TOML(Box::new(e)))?;
        Ok(Some(toml_struct))
    } else {
        Ok(None)
    }
}
