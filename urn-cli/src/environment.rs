use anyhow::Result;
use dialoguer::{Confirm, Input, Password, Select};
use rand::Rng;
use std::path::{Path, PathBuf};
use urn_to_earn::{
    aptos_ledger_client::{
        get_client_config_from_file, path_to_config_file, path_to_seed_file,
        read_toml_struct_from_file, write_toml_struct_to_file, ClientConfig, KeySource,
        SEED_FILE,
    },
    keys::{Keys, SeedFile, SeedKeys},
    ledger_client::LedgerClient,
    AccountAddress,
};

const DEFAULT_SEED_VAR: &str = "URN_TO_EARN_SEED";

#[derive(Clone, Copy)]
enum SeedChoice {
    Generate,
    Paste,
    EnvVar,
}

impl ToString for SeedChoice {
    fn to_string(&self) -> String {
        match self {
            SeedChoice::Generate => "Generate a new key".to_string(),
            SeedChoice::Paste => "Paste an existing hex seed".to_string(),
            SeedChoice::EnvVar => "Read the seed from an environment variable".to_string(),
        }
    }
}

pub(crate) async fn init_impl(config_path: Option<&Path>) -> Result<()> {
    println!();
    println!("🏺 Welcome to urn-to-earn ⛏");
    println!();
    print_safety_warning();

    let config_file = match config_path {
        Some(path) => path.to_path_buf(),
        None => path_to_config_file()?,
    };
    if read_toml_struct_from_file::<ClientConfig>(&config_file)
        .await?
        .is_some()
        && !Confirm::new()
            .with_prompt(format!("{config_file:?} exists, overwrite?"))
            .default(false)
            .interact()?
    {
        println!("Init aborted ⚓");
        return Ok(());
    }

    let seed_file = match config_path.and_then(Path::parent) {
        Some(dir) => dir.join(SEED_FILE),
        None => path_to_seed_file()?,
    };
    let key_source = get_key_source(seed_file).await?;

    let mut config = ClientConfig::new(key_source);
    config.node_url = Input::new()
        .with_prompt("Full node URL")
        .default(config.node_url.clone())
        .interact_text()?;
    config.indexer_url = Input::new()
        .with_prompt("Indexer URL")
        .default(config.indexer_url.clone())
        .interact_text()?;
    let pinned: String = Input::new()
        .with_prompt("Account address, if the key was rotated (leave empty to derive)")
        .allow_empty(true)
        .interact_text()?;
    if !pinned.trim().is_empty() {
        config.sender = Some(AccountAddress::from_hex(pinned.trim())?);
    }

    write_toml_struct_to_file(&config_file, &config).await?;
    println!();
    println!("Config written to {config_file:?}");
    if let KeySource::RawSeed { seed_file } = &config.key_source {
        let keys = SeedKeys::from_seed_file(seed_file, config.sender).await?;
        println!("Your address: {}", keys.address().await?);
    }
    println!();
    println!("Initialized successfully!");
    Ok(())
}

async fn get_key_source(seed_file: PathBuf) -> Result<KeySource> {
    let items = vec![SeedChoice::Generate, SeedChoice::Paste, SeedChoice::EnvVar];
    let index = Select::new()
        .with_prompt("Where does the signing key come from?")
        .items(&items)
        .default(0)
        .interact()?;
    let choice = items.get(index).copied().unwrap_or(SeedChoice::Generate);
    let key_source = match choice {
        SeedChoice::Generate => {
            let seed = hex::encode(rand::thread_rng().gen::<[u8; 32]>());
            write_toml_struct_to_file(&seed_file, &SeedFile::new(&seed)).await?;
            println!("New key saved to {seed_file:?}; fund the account before running.");
            KeySource::RawSeed { seed_file }
        }
        SeedChoice::Paste => {
            let seed = Password::new()
                .with_prompt("⚠️  Hex seed (testnet only) ⚠️ ")
                .interact()?;
            write_toml_struct_to_file(&seed_file, &SeedFile::new(seed.trim())).await?;
            KeySource::RawSeed { seed_file }
        }
        SeedChoice::EnvVar => {
            let var = Input::new()
                .with_prompt("Environment variable")
                .default(DEFAULT_SEED_VAR.to_string())
                .interact_text()?;
            KeySource::EnvSeed { var }
        }
    };
    Ok(key_source)
}

pub(crate) async fn env_impl(config_path: Option<&Path>) -> Result<()> {
    let config = get_client_config_from_file(config_path).await?;
    println!("Node: {}", config.node_url);
    println!("Indexer: {}", config.indexer_url);
    match config.chain_id {
        Some(chain_id) => println!("Chain id: {chain_id}"),
        None => println!("Chain id: from node"),
    }
    println!("Module: {}", config.module()?);
    let settings = config.tx_settings();
    println!(
        "Gas: {} octas/unit, max {} units, expires after {}s",
        settings.gas_unit_price, settings.max_gas_amount, settings.expiration_secs
    );
    match &config.key_source {
        KeySource::RawSeed { seed_file } => println!("Key: seed file {seed_file:?}"),
        KeySource::EnvSeed { var } => println!("Key: ${var}"),
    }
    let client = config.to_client().await;
    match client {
        Ok(client) => println!("Address: {}", client.signer_address().await?),
        Err(e) => println!("Key not available: {e}"),
    }
    Ok(())
}

fn print_safety_warning() {
    println!("⚠️  Only use keys you are willing to lose funds from, preferably");
    println!("⚠️  only with funds on testnet!");
    println!("⚠️  Seeds are stored in plaintext files on your computer!");
    println!();
}
