use crate::{
    error::Result,
    smart_contract::SmartContractTrait,
    transaction::TxOutcome,
    urn_to_earn::{Mintable, UrnToEarnEndpoints},
};

/// Default number of mint-and-dig rounds
pub const DEFAULT_ITERATIONS: usize = 2;

/// What happened in one round of [`run_mint_shovel_dig`]
#[derive(Debug)]
pub struct IterationReport {
    /// Zero-based round number
    pub iteration: usize,
    /// Outcome of `mint_shovel`, or the error that ended the round
    pub mint_shovel: Result<TxOutcome>,
    /// `None` when the round ended before digging
    pub dig: Option<Result<TxOutcome>>,
}

impl IterationReport {
    /// Both calls committed successfully
    pub fn succeeded(&self) -> bool {
        self.mint_shovel.is_ok() && matches!(self.dig, Some(Ok(_)))
    }
}

/// Mint a shovel then dig with it, `times` times in a row. A failing round is logged and the
/// next one still runs.
pub async fn run_mint_shovel_dig<C>(contract: &C, times: usize) -> Vec<IterationReport>
where
    C: SmartContractTrait<Endpoint = UrnToEarnEndpoints> + Sync,
{
    let mut reports = Vec::with_capacity(times);
    for iteration in 0..times {
        let mint_shovel = contract
            .hit_endpoint(UrnToEarnEndpoints::Mint(Mintable::Shovel))
            .await;
        let dig = match &mint_shovel {
            Ok(outcome) => {
                tracing::info!(iteration, hash = %outcome.tx_id, "mint shovel success");
                let dig = contract.hit_endpoint(UrnToEarnEndpoints::Dig).await;
                match &dig {
                    Ok(outcome) => tracing::info!(iteration, hash = %outcome.tx_id, "dig success"),
                    Err(e) => tracing::error!(iteration, error = %e, "dig failed"),
                }
                Some(dig)
            }
            Err(e) => {
                tracing::error!(iteration, error = %e, "mint shovel failed");
                None
            }
        };
        reports.push(IterationReport {
            iteration,
            mint_shovel,
            dig,
        });
    }
    reports
}
