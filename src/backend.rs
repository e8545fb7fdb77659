use crate::{
    error::{Error, Result},
    ledger_client::LedgerClient,
    transaction::{EntryFunctionCall, TxActions, TxOutcome, UnsignedTransaction},
};

#[cfg(test)]
mod tests;

/// Gas and expiration applied to every transaction the backend builds
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TxSettings {
    pub gas_unit_price: u64,
    pub max_gas_amount: u64,
    /// Added to the ledger clock to get the expiration timestamp
    pub expiration_secs: u64,
}

impl Default for TxSettings {
    fn default() -> Self {
        TxSettings {
            gas_unit_price: 100,
            max_gas_amount: 500_000,
            expiration_secs: 30,
        }
    }
}

/// Turns [`TxActions`] into signed, submitted and committed transactions
#[derive(Debug)]
pub struct Backend<LC: LedgerClient> {
    ledger_client: LC,
    settings: TxSettings,
}

impl<LC: LedgerClient> Backend<LC> {
    #[allow(missing_docs)]
    pub fn new(ledger_client: LC) -> Self {
        Backend {
            ledger_client,
            settings: TxSettings::default(),
        }
    }

    #[allow(missing_docs)]
    pub fn with_settings(mut self, settings: TxSettings) -> Self {
        self.settings = settings;
        self
    }

    #[allow(missing_docs)]
    pub fn ledger_client(&self) -> &LC {
        &self.ledger_client
    }

    #[allow(missing_docs)]
    pub fn settings(&self) -> &TxSettings {
        &self.settings
    }

    /// Fill the transaction envelope for `call` from the signer's account and the ledger clock
    pub async fn build(&self, call: EntryFunctionCall) -> Result<UnsignedTransaction> {
        let sender = self.ledger_client.signer_address().await?;
        let (sequence_number, chain_id, now) = futures::try_join!(
            self.ledger_client.sequence_number(&sender),
            self.ledger_client.chain_id(),
            self.ledger_client.current_time_secs(),
        )?;
        let expiration = now.checked_add(self.settings.expiration_secs).ok_or_else(|| {
            Error::Config(format!(
                "expiration_secs {} overflows ledger time {now}",
                self.settings.expiration_secs
            ))
        })?;
        let tx = UnsignedTransaction::builder()
            .chain_id(chain_id)
            .sender(sender)
            .sequence_number(sequence_number)
            .payload(call)
            .max_gas_amount(self.settings.max_gas_amount)
            .gas_unit_price(self.settings.gas_unit_price)
            .expiration_timestamp_secs(expiration)
            .build()?;
        Ok(tx)
    }

    /// Build, optionally simulate, submit and wait. A transaction that commits with a failed VM
    /// status is an error.
    pub async fn process(&self, actions: TxActions) -> Result<TxOutcome> {
        let simulate_first = actions.simulate_first();
        let tx = self.build(actions.into_call()).await?;
        let function = tx.payload.qualified_name();

        if simulate_first {
            let simulated = self.ledger_client.simulate(&tx).await?;
            if !simulated.success {
                tracing::warn!(%function, vm_status = %simulated.vm_status, "simulation failed");
                return Err(Error::SimulationFailed {
                    function,
                    vm_status: simulated.vm_status,
                });
            }
            tracing::debug!(%function, gas_used = simulated.gas_used, "simulation succeeded");
        }

        let tx_id = self.ledger_client.issue(tx).await?;
        let outcome = self.ledger_client.wait_for_transaction(&tx_id).await?;
        if !outcome.success {
            return Err(Error::TransactionFailed {
                tx_id,
                vm_status: outcome.vm_status,
            });
        }
        Ok(outcome)
    }
}
