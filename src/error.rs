use thiserror::Error;

use crate::{
    address::AddressError,
    keys::KeysError,
    ledger_client::LedgerClientError,
    logic::error::SCLogicError,
    transaction::{TransactionError, TxId},
};

#[allow(missing_docs)]
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum Error {
    #[error("Error from LedgerClient: {0}")]
    LedgerClient(#[from] LedgerClientError),
    #[error("Error from contract logic: {0}")]
    SCLogic(#[from] SCLogicError),
    #[error("Error building transaction: {0}")]
    Transaction(#[from] TransactionError),
    #[error("Keys Error: {0}")]
    Keys(#[from] KeysError),
    #[error("Address Error: {0}")]
    Address(#[from] AddressError),
    #[error("Simulation of {function} failed: {vm_status}")]
    SimulationFailed { function: String, vm_status: String },
    #[error("Transaction {tx_id} failed: {vm_status}")]
    TransactionFailed { tx_id: TxId, vm_status: String },
    #[error("Config Error: {0}")]
    Config(String),
    #[error("TOML Error: {0:?}")]
    TOML(Box<dyn std::error::Error + Send + Sync>),
}
