#![allow(non_snake_case)]

use super::*;
use crate::{keys::SeedFile, ledger_client::LedgerClient};

const USER_SEED: &str = "165b006e6718b20a8275f52189419655bcab018eda25eb2002b6077a05261646";
const USER_ADDRESS: &str = "0x8630f8fe18d3d841aa9e5d349c011d3330c81fd71db252024622055bbdcccb44";

#[tokio::test]
async fn write_toml_struct_to_file__round_trips_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join(CONFIG_FILE);
    let mut config = ClientConfig::new(KeySource::RawSeed {
        seed_file: dir.path().join(SEED_FILE),
    });
    config.sender = Some(AccountAddress::ONE);

    write_toml_struct_to_file(&path, &config).await.unwrap();
    let read = read_toml_struct_from_file::<ClientConfig>(&path)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(read, config);
}

#[tokio::test]
async fn read_toml_struct_from_file__missing_file_is_none() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(CONFIG_FILE);

    let read = read_toml_struct_from_file::<ClientConfig>(&path)
        .await
        .unwrap();

    assert!(read.is_none());
}

#[tokio::test]
async fn get_client_config_from_file__missing_file_is_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(CONFIG_FILE);

    let res = get_client_config_from_file(Some(&path)).await;

    assert!(matches!(res, Err(Error::Config(_))));
}

#[test]
fn client_config__fills_defaults() {
    let text = r#"
        [key_source]
        type = "EnvSeed"
        var = "URN_SEED"
    "#;

    let config: ClientConfig = toml::from_str(text).unwrap();

    assert_eq!(config.node_url, TESTNET_URL);
    assert_eq!(config.indexer_url, TESTNET_INDEXER_URL);
    assert_eq!(config.chain_id, None);
    assert_eq!(config.module_name, MODULE_NAME);
    assert_eq!(config.tx_settings(), TxSettings::default());
    assert_eq!(config.wait_timeout_secs, DEFAULT_WAIT_TIMEOUT_SECS);
    assert_eq!(
        config.key_source,
        KeySource::EnvSeed {
            var: "URN_SEED".to_string()
        }
    );
    let module = config.module().unwrap();
    assert_eq!(module.address().to_hex(), OWNER_ADDRESS);
}

#[test]
fn client_config__bad_module_address_is_error() {
    let mut config = ClientConfig::new(KeySource::EnvSeed {
        var: "URN_SEED".to_string(),
    });
    config.module_address = "0xnothex".to_string();

    assert!(matches!(config.module(), Err(Error::Address(_))));
}

#[tokio::test]
async fn to_client__loads_keys_from_seed_file() {
    let dir = tempfile::tempdir().unwrap();
    let seed_file = dir.path().join(SEED_FILE);
    write_toml_struct_to_file(&seed_file, &SeedFile::new(USER_SEED))
        .await
        .unwrap();
    let config = ClientConfig::new(KeySource::RawSeed { seed_file });

    let client = config.to_client().await.unwrap();

    let signer = client.signer_address().await.unwrap();
    assert_eq!(signer.to_hex(), USER_ADDRESS);
    // Configured chain id is used without asking the node
    assert_eq!(client.chain_id().await.unwrap(), TESTNET_CHAIN_ID);
}

#[tokio::test]
async fn to_client__missing_seed_file_is_keys_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = ClientConfig::new(KeySource::RawSeed {
        seed_file: dir.path().join(SEED_FILE),
    });

    let res = config.to_client().await;

    assert!(matches!(res, Err(Error::Keys(_))));
}

#[ignore]
#[tokio::test]
async fn testnet__balance_and_tokens_of_module_owner() {
    let dir = tempfile::tempdir().unwrap();
    let seed_file = dir.path().join(SEED_FILE);
    write_toml_struct_to_file(&seed_file, &SeedFile::new(USER_SEED))
        .await
        .unwrap();
    let config = ClientConfig::new(KeySource::RawSeed { seed_file });
    let client = config.to_client().await.unwrap();
    let owner = AccountAddress::from_hex(OWNER_ADDRESS).unwrap();

    let balance = client.native_balance(&owner).await.unwrap();
    let tokens = client.account_tokens(&owner).await.unwrap();

    println!("balance: {balance}, tokens: {}", tokens.len());
}
