use thiserror::Error;

/// Test ledger client module
pub mod test_ledger_client;

use async_trait::async_trait;

use crate::{
    address::AccountAddress,
    token::Token,
    transaction::{StructTag, TxId, TxOutcome, UnsignedTransaction},
};
use std::{error, time::Duration};

/// Interface defining interactions with the chain: account state, the token indexer and
/// transaction submission. The abstraction lets tests swap in an in-memory ledger.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Address of the account whose key signs issued transactions
    async fn signer_address(&self) -> LedgerClientResult<AccountAddress>;

    /// Next sequence number expected from `address`
    async fn sequence_number(&self, address: &AccountAddress) -> LedgerClientResult<u64>;

    /// Chain identifier transactions have to carry
    async fn chain_id(&self) -> LedgerClientResult<u8>;

    /// Current time in seconds since the UNIX epoch, as seen by this client
    async fn current_time_secs(&self) -> LedgerClientResult<u64>;

    /// Balance of `coin_type` at `address`, in base units
    async fn coin_balance(
        &self,
        address: &AccountAddress,
        coin_type: &StructTag,
    ) -> LedgerClientResult<u64>;

    /// Balance of the native coin at `address`, in octas
    async fn native_balance(&self, address: &AccountAddress) -> LedgerClientResult<u64> {
        self.coin_balance(address, &StructTag::aptos_coin()).await
    }

    /// Every token currently owned by `address`
    async fn account_tokens(&self, address: &AccountAddress) -> LedgerClientResult<Vec<Token>>;

    /// Dry-run `tx` without changing chain state
    async fn simulate(&self, tx: &UnsignedTransaction) -> LedgerClientResult<TxOutcome>;

    /// Sign `tx` with the signer key owned by the instance of `LedgerClient` and submit it
    async fn issue(&self, tx: UnsignedTransaction) -> LedgerClientResult<TxId>;

    /// Block until `tx_id` is committed and report how it went
    async fn wait_for_transaction(&self, tx_id: &TxId) -> LedgerClientResult<TxOutcome>;
}

#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum LedgerClientError {
    #[error("Couldn't retrieve signer: {0:?}")]
    Signer(Box<dyn error::Error + Send + Sync>),
    #[error("Failed to retrieve account {0}: {1:?}")]
    FailedToRetrieveAccount(AccountAddress, Box<dyn error::Error + Send + Sync>),
    #[error("Failed to retrieve chain id: {0:?}")]
    FailedToRetrieveChainId(Box<dyn error::Error + Send + Sync>),
    #[error("Failed to retrieve balance of {0}: {1:?}")]
    FailedToRetrieveBalance(AccountAddress, Box<dyn error::Error + Send + Sync>),
    #[error("Failed to retrieve tokens of {0}: {1:?}")]
    FailedToRetrieveTokens(AccountAddress, Box<dyn error::Error + Send + Sync>),
    #[error("Failed to simulate transaction: {0:?}")]
    FailedToSimulateTx(Box<dyn error::Error + Send + Sync>),
    #[error("Failed to issue transaction: {0:?}")]
    FailedToIssueTx(Box<dyn error::Error + Send + Sync>),
    #[error("Failed while waiting for transaction {0}: {1:?}")]
    FailedToWaitForTx(TxId, Box<dyn error::Error + Send + Sync>),
    #[error("Transaction {0} was not committed within {1:?}")]
    WaitTimeout(TxId, Duration),
    #[error("While getting current time: {0:?}")]
    CurrentTime(Box<dyn error::Error + Send + Sync>),
    #[error("Config error: {0}")]
    ConfigError(String),
}

#[allow(missing_docs)]
pub type LedgerClientResult<T> = Result<T, LedgerClientError>;
