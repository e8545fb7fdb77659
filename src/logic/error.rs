use crate::ledger_client::LedgerClientError;
use std::error;
use thiserror::Error;

#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum SCLogicError {
    #[error("Error handling endpoint: {0}")]
    Endpoint(Box<dyn error::Error + Send + Sync>),
    #[error("Error doing lookup: {0}")]
    Lookup(Box<dyn error::Error + Send + Sync>),
    #[error("From LedgerClient: {0:?}")]
    LedgerClient(#[from] LedgerClientError),
}

#[allow(missing_docs)]
pub type SCLogicResult<T> = crate::error::Result<T, SCLogicError>;

#[allow(missing_docs)]
pub fn as_endpoint_err<E: error::Error + Send + Sync + 'static>(error: E) -> SCLogicError {
    SCLogicError::Endpoint(Box::new(error))
}

#[allow(missing_docs)]
pub fn as_lookup_err<E: error::Error + Send + Sync + 'static>(error: E) -> SCLogicError {
    SCLogicError::Lookup(Box::new(error))
}
