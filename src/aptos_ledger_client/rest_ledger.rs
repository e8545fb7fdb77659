use crate::{
    address::AccountAddress,
    keys::Keys,
    ledger_client::{LedgerClient, LedgerClientError, LedgerClientResult},
    token::{Token, TokenId},
    transaction::{StructTag, TxId, TxOutcome, UnsignedTransaction},
};
use aptos_http_client::{
    models::{
        CoinStore, Ed25519Signature, EncodeSubmissionRequest, EntryFunctionPayload,
        SubmitTransactionRequest, TokenOwnership, Transaction,
    },
    AptosHttp, AptosHttpTrait, IndexerHttp,
};
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tokio::{sync::OnceCell, time::Instant};

use super::{DEFAULT_WAIT_POLL_INTERVAL_MS, DEFAULT_WAIT_TIMEOUT_SECS};


const MICROS_PER_SEC: u64 = 1_000_000;

#[derive(Debug, Error)]
enum RestLedgerError {
    #[error("Signing message is not valid hex: {0:?}")]
    SigningMessage(hex::FromHexError),
    #[error("Transaction is for chain {got}, node is on chain {expected}")]
    ChainIdMismatch { expected: u8, got: u8 },
    #[error("Simulation returned no transaction")]
    EmptySimulation,
}

/// [`LedgerClient`] talking to an Aptos full node over REST and to the token indexer over
/// GraphQL. Transactions are encoded by the node and signed locally with `K`.
pub struct AptosLedgerClient<K: Keys> {
    node: AptosHttp,
    indexer: IndexerHttp,
    keys: K,
    chain_id: OnceCell<u8>,
    wait_timeout: Duration,
    poll_interval: Duration,
}

impl<K: Keys> AptosLedgerClient<K> {
    /// A `None` chain id is looked up from the node on first use
    pub fn new(node: AptosHttp, indexer: IndexerHttp, keys: K, chain_id: Option<u8>) -> Self {
        AptosLedgerClient {
            node,
            indexer,
            keys,
            chain_id: OnceCell::new_with(chain_id),
            wait_timeout: Duration::from_secs(DEFAULT_WAIT_TIMEOUT_SECS),
            poll_interval: Duration::from_millis(DEFAULT_WAIT_POLL_INTERVAL_MS),
        }
    }

    #[allow(missing_docs)]
    pub fn with_wait(mut self, timeout: Duration, poll_interval: Duration) -> Self {
        self.wait_timeout = timeout;
        self.poll_interval = poll_interval;
        self
    }

    #[allow(missing_docs)]
    pub fn node(&self) -> &AptosHttp {
        &self.node
    }

    async fn signature_for(&self, signature: [u8; 64]) -> LedgerClientResult<Ed25519Signature> {
        let public_key = self
            .keys
            .public_key()
            .await
            .map_err(|e| LedgerClientError::Signer(Box::new(e)))?;
        Ok(Ed25519Signature::new(
            format!("0x{}", hex::encode(public_key)),
            format!("0x{}", hex::encode(signature)),
        ))
    }
}

// The node signs over its own chain id, so a mismatch would only surface as a bad signature
fn check_chain_id(expected: u8, tx: &UnsignedTransaction) -> Result<(), RestLedgerError> {
    if expected == tx.chain_id {
        Ok(())
    } else {
        Err(RestLedgerError::ChainIdMismatch {
            expected,
            got: tx.chain_id,
        })
    }
}

fn to_request(tx: &UnsignedTransaction) -> EncodeSubmissionRequest {
    let payload = EntryFunctionPayload::new(
        tx.payload.qualified_name(),
        tx.payload
            .type_arguments()
            .iter()
            .map(|t| t.to_string())
            .collect(),
        tx.payload.arguments().to_vec(),
    );
    EncodeSubmissionRequest {
        sender: tx.sender.to_hex(),
        sequence_number: tx.sequence_number,
        max_gas_amount: tx.max_gas_amount,
        gas_unit_price: tx.gas_unit_price,
        expiration_timestamp_secs: tx.expiration_timestamp_secs,
        payload,
    }
}

fn to_outcome(tx: Transaction) -> TxOutcome {
    TxOutcome {
        tx_id: TxId::new(&tx.hash),
        success: tx.success.unwrap_or(false),
        vm_status: tx.vm_status.unwrap_or_default(),
        gas_used: tx.gas_used.unwrap_or_default(),
    }
}

fn to_token(ownership: TokenOwnership) -> Result<Token, crate::address::AddressError> {
    let id = TokenId {
        creator: AccountAddress::from_hex(&ownership.creator_address)?,
        collection: ownership.collection_name,
        name: ownership.name,
        property_version: ownership.property_version,
    };
    let mut token = Token::new(id, ownership.amount);
    if let Value::Object(properties) = ownership.token_properties {
        for (key, value) in properties {
            token = token.with_property(&key, value);
        }
    }
    Ok(token)
}

#[async_trait]
impl<K: Keys> LedgerClient for AptosLedgerClient<K> {
    async fn signer_address(&self) -> LedgerClientResult<AccountAddress> {
        self.keys
            .address()
            .await
            .map_err(|e| LedgerClientError::Signer(Box::new(e)))
    }

    async fn sequence_number(&self, address: &AccountAddress) -> LedgerClientResult<u64> {
        let account = self
            .node
            .account(&address.to_hex())
            .await
            .map_err(|e| LedgerClientError::FailedToRetrieveAccount(*address, Box::new(e)))?;
        Ok(account.sequence_number)
    }

    async fn chain_id(&self) -> LedgerClientResult<u8> {
        let chain_id = self
            .chain_id
            .get_or_try_init(|| async {
                let info = self.node.ledger_info().await?;
                tracing::debug!(chain_id = info.chain_id, "fetched chain id");
                Ok::<_, aptos_http_client::error::Error>(info.chain_id)
            })
            .await
            .map_err(|e| LedgerClientError::FailedToRetrieveChainId(Box::new(e)))?;
        Ok(*chain_id)
    }

    async fn current_time_secs(&self) -> LedgerClientResult<u64> {
        let info = self
            .node
            .ledger_info()
            .await
            .map_err(|e| LedgerClientError::CurrentTime(Box::new(e)))?;
        Ok(info.ledger_timestamp / MICROS_PER_SEC)
    }

    async fn coin_balance(
        &self,
        address: &AccountAddress,
        coin_type: &StructTag,
    ) -> LedgerClientResult<u64> {
        let resource_type = StructTag::coin_store(coin_type.clone()).to_string();
        match self
            .node
            .account_resource::<CoinStore>(&address.to_hex(), &resource_type)
            .await
        {
            Ok(resource) => Ok(resource.data.coin.value),
            // No coin store registered yet
            Err(e) if e.is_not_found() => Ok(0),
            Err(e) => Err(LedgerClientError::FailedToRetrieveBalance(
                *address,
                Box::new(e),
            )),
        }
    }

    async fn account_tokens(&self, address: &AccountAddress) -> LedgerClientResult<Vec<Token>> {
        let ownerships = self
            .indexer
            .all_token_ownerships(&address.to_hex())
            .await
            .map_err(|e| LedgerClientError::FailedToRetrieveTokens(*address, Box::new(e)))?;
        ownerships
            .into_iter()
            .map(to_token)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| LedgerClientError::FailedToRetrieveTokens(*address, Box::new(e)))
    }

    async fn simulate(&self, tx: &UnsignedTransaction) -> LedgerClientResult<TxOutcome> {
        check_chain_id(self.chain_id().await?, tx)
            .map_err(|e| LedgerClientError::FailedToSimulateTx(Box::new(e)))?;
        let request = SubmitTransactionRequest {
            transaction: to_request(tx),
            signature: self.signature_for([0u8; 64]).await?,
        };
        let mut results = self
            .node
            .simulate(&request)
            .await
            .map_err(|e| LedgerClientError::FailedToSimulateTx(Box::new(e)))?;
        let simulated = results
            .pop()
            .ok_or(RestLedgerError::EmptySimulation)
            .map_err(|e| LedgerClientError::FailedToSimulateTx(Box::new(e)))?;
        let outcome = to_outcome(simulated);
        tracing::debug!(
            function = %tx.payload.qualified_name(),
            success = outcome.success,
            vm_status = %outcome.vm_status,
            "simulated"
        );
        Ok(outcome)
    }

    async fn issue(&self, tx: UnsignedTransaction) -> LedgerClientResult<TxId> {
        check_chain_id(self.chain_id().await?, &tx)
            .map_err(|e| LedgerClientError::FailedToIssueTx(Box::new(e)))?;
        let unsigned = to_request(&tx);
        let message_hex = self
            .node
            .encode_submission(&unsigned)
            .await
            .map_err(|e| LedgerClientError::FailedToIssueTx(Box::new(e)))?;
        let message = hex::decode(message_hex.trim_start_matches("0x"))
            .map_err(RestLedgerError::SigningMessage)
            .map_err(|e| LedgerClientError::FailedToIssueTx(Box::new(e)))?;
        let signature = self
            .keys
            .sign(&message)
            .await
            .map_err(|e| LedgerClientError::Signer(Box::new(e)))?;
        let request = SubmitTransactionRequest {
            transaction: unsigned,
            signature: self.signature_for(signature).await?,
        };
        let pending = self
            .node
            .submit(&request)
            .await
            .map_err(|e| LedgerClientError::FailedToIssueTx(Box::new(e)))?;
        tracing::info!(
            hash = %pending.hash,
            function = %tx.payload.qualified_name(),
            sequence_number = tx.sequence_number,
            "submitted transaction"
        );
        Ok(TxId::new(&pending.hash))
    }

    async fn wait_for_transaction(&self, tx_id: &TxId) -> LedgerClientResult<TxOutcome> {
        let deadline = Instant::now() + self.wait_timeout;
        loop {
            match self.node.transaction_by_hash(tx_id.as_str()).await {
                Ok(tx) if !tx.is_pending() => {
                    let outcome = to_outcome(tx);
                    tracing::info!(
                        hash = %tx_id,
                        success = outcome.success,
                        vm_status = %outcome.vm_status,
                        "transaction committed"
                    );
                    return Ok(outcome);
                }
                Ok(_) => tracing::debug!(hash = %tx_id, "transaction pending"),
                Err(e) if e.is_not_found() => {
                    tracing::debug!(hash = %tx_id, "transaction not found yet")
                }
                Err(e) => {
                    return Err(LedgerClientError::FailedToWaitForTx(
                        tx_id.clone(),
                        Box::new(e),
                    ))
                }
            }
            if Instant::now() >= deadline {
                return Err(LedgerClientError::WaitTimeout(tx_id.clone(), self.wait_timeout));
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }
}
