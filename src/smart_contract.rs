use async_trait::async_trait;

use crate::{
    backend::Backend, error::Result, ledger_client::LedgerClient, logic::SCLogic,
    transaction::TxOutcome,
};

/// A contract's logic bound to a backend, so endpoints can be hit directly
#[async_trait]
pub trait SmartContractTrait {
    #[allow(missing_docs)]
    type Endpoint;
    #[allow(missing_docs)]
    type Lookup;
    #[allow(missing_docs)]
    type LookupResponse;
    /// Build, submit and wait for the transaction behind `endpoint`
    async fn hit_endpoint(&self, endpoint: Self::Endpoint) -> Result<TxOutcome>;
    #[allow(missing_docs)]
    async fn lookup(&self, lookup: Self::Lookup) -> Result<Self::LookupResponse>;
}

#[allow(missing_docs)]
#[derive(Debug)]
pub struct SmartContract<'a, Logic, LC>
where
    Logic: SCLogic,
    LC: LedgerClient,
{
    pub logic: &'a Logic,
    pub backend: &'a Backend<LC>,
}

impl<'a, Logic, LC> SmartContract<'a, Logic, LC>
where
    Logic: SCLogic,
    LC: LedgerClient,
{
    #[allow(missing_docs)]
    pub fn new(logic: &'a Logic, backend: &'a Backend<LC>) -> Self {
        SmartContract { logic, backend }
    }
}

#[async_trait]
impl<'a, Logic, LC> SmartContractTrait for SmartContract<'a, Logic, LC>
where
    Logic: SCLogic,
    LC: LedgerClient,
{
    type Endpoint = Logic::Endpoints;
    type Lookup = Logic::Lookups;
    type LookupResponse = Logic::LookupResponses;

    async fn hit_endpoint(&self, endpoint: Logic::Endpoints) -> Result<TxOutcome> {
        let tx_actions = self
            .logic
            .handle_endpoint(endpoint, self.backend.ledger_client())
            .await?;
        self.backend.process(tx_actions).await
    }

    async fn lookup(&self, lookup: Self::Lookup) -> Result<Self::LookupResponse> {
        Ok(self
            .logic
            .lookup(lookup, self.backend.ledger_client())
            .await?)
    }
}
