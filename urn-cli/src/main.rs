use crate::{
    balance::{balance_impl, info_impl, tokens_impl},
    contract::{dig_impl, mint_impl, put_bone_part_impl, run_impl},
    environment::{env_impl, init_impl},
    logging::init_logging,
};
use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use thiserror::Error;
use urn_to_earn::{harness::DEFAULT_ITERATIONS, urn_to_earn::Mintable, AccountAddress};

mod balance;
mod contract;
mod environment;
mod logging;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Config file to use instead of ~/.urn-to-earn/config.toml
    #[clap(long, global = true)]
    config: Option<PathBuf>,
    /// Debug logs for requests and polling
    #[clap(short, long, global = true)]
    verbose: bool,
    #[clap(subcommand)]
    action: ActionParams,
}

#[derive(clap::Subcommand, Debug)]
enum ActionParams {
    /// Create a config and signing key 🏺
    Init,
    /// View current config
    Env,
    /// Mint a shovel and dig with it, a few times in a row
    Run {
        #[clap(long, default_value_t = DEFAULT_ITERATIONS)]
        times: usize,
        /// Print owner and user balance changes after the run
        #[clap(long)]
        show_balances: bool,
    },
    /// Mint `shovel`, `urn` or `forge`
    Mint { item: Mintable },
    /// Dig for bone parts
    Dig,
    /// Burn a bone part into your urn
    PutBonePart {
        part: String,
        /// Use the golden urn; golden parts only
        #[clap(long)]
        golden: bool,
    },
    /// List urn tokens
    Tokens {
        /// Defaults to your own account
        #[clap(long)]
        account: Option<AccountAddress>,
    },
    /// APT balance of the module owner and of your account
    Balance,
    /// Ledger info of the configured node
    Info,
}

#[derive(Debug, Error)]
pub(crate) enum CliError {
    #[error("Unexpected lookup response: {0}")]
    UnexpectedResponse(String),
    #[error("{0} of {1} rounds failed")]
    RunFailed(usize, usize),
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);
    let config = args.config.as_deref();
    match args.action {
        ActionParams::Init => init_impl(config).await?,
        ActionParams::Env => env_impl(config).await?,
        ActionParams::Run {
            times,
            show_balances,
        } => run_impl(config, times, show_balances).await?,
        ActionParams::Mint { item } => mint_impl(config, item).await?,
        ActionParams::Dig => dig_impl(config).await?,
        ActionParams::PutBonePart { part, golden } => {
            put_bone_part_impl(config, part, golden).await?
        }
        ActionParams::Tokens { account } => tokens_impl(config, account).await?,
        ActionParams::Balance => balance_impl(config).await?,
        ActionParams::Info => info_impl(config).await?,
    }
    Ok(())
}
