use crate::{ledger_client::LedgerClient, transaction::TxActions};
use async_trait::async_trait;
use error::SCLogicResult;

/// Errors for `SCLogic` implementations
pub mod error;

/// Interface for a contract's off-chain logic: it turns endpoints into entry-function calls and
/// answers lookups from ledger state.
#[async_trait]
pub trait SCLogic: Send + Sync {
    /// Calls that result in a transaction
    type Endpoints: Send;
    /// Read-only queries
    type Lookups: Send;
    /// Answers to `Lookups`
    type LookupResponses: Send;

    /// Turn `endpoint` into the call that has to be submitted
    async fn handle_endpoint<LC: LedgerClient>(
        &self,
        endpoint: Self::Endpoints,
        ledger_client: &LC,
    ) -> SCLogicResult<TxActions>;

    /// Answer `query` without submitting anything
    async fn lookup<LC: LedgerClient>(
        &self,
        query: Self::Lookups,
        ledger_client: &LC,
    ) -> SCLogicResult<Self::LookupResponses>;
}
