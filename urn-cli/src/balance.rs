use crate::{contract::load, CliError};
use anyhow::Result;
use aptos_http_client::AptosHttpTrait;
use std::path::Path;
use urn_to_earn::{
    coin::format_apt,
    ledger_client::LedgerClient,
    smart_contract::{SmartContract, SmartContractTrait},
    urn_to_earn::{UrnToEarnLookups, UrnToEarnResponses},
    AccountAddress,
};

pub(crate) async fn balance_impl(config_path: Option<&Path>) -> Result<()> {
    let (logic, backend) = load(config_path).await?;
    let owner = *logic.module().address();
    let user = backend.ledger_client().signer_address().await?;
    let contract = SmartContract::new(&logic, &backend);
    for (label, address) in [("Owner", owner), ("User", user)] {
        match contract
            .lookup(UrnToEarnLookups::CoinBalance(Some(address)))
            .await?
        {
            UrnToEarnResponses::CoinBalance(octas) => {
                println!("{label} {address}");
                println!("Balance: {} APT", format_apt(octas));
            }
            other => return Err(CliError::UnexpectedResponse(format!("{other:?}")).into()),
        }
    }
    Ok(())
}

pub(crate) async fn tokens_impl(
    config_path: Option<&Path>,
    account: Option<AccountAddress>,
) -> Result<()> {
    let (logic, backend) = load(config_path).await?;
    let contract = SmartContract::new(&logic, &backend);
    match contract.lookup(UrnToEarnLookups::UrnTokens(account)).await? {
        UrnToEarnResponses::UrnTokens(tokens) => {
            if tokens.is_empty() {
                println!("No urn tokens");
            }
            for token in tokens {
                println!("{}: {}", token.name(), token.amount());
                for (key, value) in token.score_properties() {
                    println!("  {key}: {value}");
                }
            }
            Ok(())
        }
        other => Err(CliError::UnexpectedResponse(format!("{other:?}")).into()),
    }
}

pub(crate) async fn info_impl(config_path: Option<&Path>) -> Result<()> {
    let (_, backend) = load(config_path).await?;
    let node = backend.ledger_client().node();
    let info = node.ledger_info().await?;
    println!("Node: {}", node.parent_url());
    println!("Chain id: {}", info.chain_id);
    println!("Epoch: {}", info.epoch);
    println!("Ledger version: {}", info.ledger_version);
    println!("Block height: {}", info.block_height);
    println!("Ledger timestamp: {} us", info.ledger_timestamp);
    Ok(())
}
