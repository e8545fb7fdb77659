use crate::CliError;
use anyhow::Result;
use std::path::Path;
use urn_to_earn::{
    aptos_ledger_client::{get_client_config_from_file, AptosLedgerClient},
    backend::Backend,
    coin::format_apt_diff,
    harness::run_mint_shovel_dig,
    keys::SeedKeys,
    ledger_client::LedgerClient,
    smart_contract::{SmartContract, SmartContractTrait},
    urn_to_earn::{Mintable, UrnToEarnEndpoints, UrnToEarnLogic},
    TxOutcome,
};

pub(crate) type UrnBackend = Backend<AptosLedgerClient<SeedKeys>>;

pub(crate) async fn load(config_path: Option<&Path>) -> Result<(UrnToEarnLogic, UrnBackend)> {
    let config = get_client_config_from_file(config_path).await?;
    let logic = UrnToEarnLogic::new(config.module()?);
    let ledger_client = config.to_client().await?;
    let backend = Backend::new(ledger_client).with_settings(config.tx_settings());
    Ok((logic, backend))
}

async fn hit(config_path: Option<&Path>, endpoint: UrnToEarnEndpoints) -> Result<()> {
    let (logic, backend) = load(config_path).await?;
    let contract = SmartContract::new(&logic, &backend);
    let outcome = contract.hit_endpoint(endpoint).await?;
    print_outcome(&outcome);
    Ok(())
}

fn print_outcome(outcome: &TxOutcome) {
    println!("Transaction: {}", outcome.tx_id);
    println!("Status: {}", outcome.vm_status);
    println!("Gas used: {}", outcome.gas_used);
}

pub(crate) async fn run_impl(
    config_path: Option<&Path>,
    times: usize,
    show_balances: bool,
) -> Result<()> {
    let (logic, backend) = load(config_path).await?;
    let owner = *logic.module().address();
    let user = backend.ledger_client().signer_address().await?;
    let before = if show_balances {
        Some((
            backend.ledger_client().native_balance(&owner).await?,
            backend.ledger_client().native_balance(&user).await?,
        ))
    } else {
        None
    };

    tracing::debug!(times, %user, module = %logic.module(), "starting run");
    let contract = SmartContract::new(&logic, &backend);
    let reports = run_mint_shovel_dig(&contract, times).await;
    for report in &reports {
        match &report.mint_shovel {
            Ok(_) => println!("mint shovel success"),
            Err(e) => println!("mint shovel error: {e}"),
        }
        match &report.dig {
            Some(Ok(_)) => println!("dig success"),
            Some(Err(e)) => println!("dig error: {e}"),
            None => {}
        }
    }

    if let Some((owner_before, user_before)) = before {
        let owner_after = backend.ledger_client().native_balance(&owner).await?;
        let user_after = backend.ledger_client().native_balance(&user).await?;
        println!(
            "owner balance diff {} APT",
            format_apt_diff(owner_before, owner_after)
        );
        println!(
            "user balance diff {} APT",
            format_apt_diff(user_before, user_after)
        );
    }

    let failed = reports.iter().filter(|r| !r.succeeded()).count();
    if failed > 0 {
        return Err(CliError::RunFailed(failed, times).into());
    }
    Ok(())
}

pub(crate) async fn mint_impl(config_path: Option<&Path>, item: Mintable) -> Result<()> {
    hit(config_path, UrnToEarnEndpoints::Mint(item)).await
}

pub(crate) async fn dig_impl(config_path: Option<&Path>) -> Result<()> {
    hit(config_path, UrnToEarnEndpoints::Dig).await
}

pub(crate) async fn put_bone_part_impl(
    config_path: Option<&Path>,
    part: String,
    golden: bool,
) -> Result<()> {
    hit(config_path, UrnToEarnEndpoints::PutBonePart { part, golden }).await
}
