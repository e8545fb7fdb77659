use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
};

use crate::{
    address::AccountAddress,
    ledger_client::{LedgerClient, LedgerClientError, LedgerClientResult},
    token::Token,
    transaction::{StructTag, TxId, TxOutcome, UnsignedTransaction},
};
use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;


/// Chain id of a local test network
pub const TEST_CHAIN_ID: u8 = 4;
/// Gas units charged for every committed transaction
pub const DEFAULT_GAS_USED: u64 = 500;
/// Ledger clock at genesis
pub const DEFAULT_START_TIME_SECS: u64 = 1_666_000_000;
/// Clock advance per committed transaction
pub const BLOCK_TIME_SECS: u64 = 1;

const EXECUTED: &str = "Executed successfully";

/// Builder for a [`TestLedgerClient`] with pre-funded accounts and pre-minted tokens
pub struct TestLedgerClientBuilder {
    signer: AccountAddress,
    chain_id: u8,
    gas_used: u64,
    start_time_secs: u64,
    accounts: HashMap<AccountAddress, TestAccount>,
    aborts: HashMap<String, String>,
}

impl TestLedgerClientBuilder {
    /// `signer` is created with `starting_balance` octas
    pub fn new(signer: &AccountAddress, starting_balance: u64) -> Self {
        let mut accounts = HashMap::new();
        accounts.insert(*signer, TestAccount::new(starting_balance));
        TestLedgerClientBuilder {
            signer: *signer,
            chain_id: TEST_CHAIN_ID,
            gas_used: DEFAULT_GAS_USED,
            start_time_secs: DEFAULT_START_TIME_SECS,
            accounts,
            aborts: HashMap::new(),
        }
    }

    #[allow(missing_docs)]
    pub fn with_chain_id(mut self, chain_id: u8) -> Self {
        self.chain_id = chain_id;
        self
    }

    #[allow(missing_docs)]
    pub fn with_gas_used(mut self, gas_used: u64) -> Self {
        self.gas_used = gas_used;
        self
    }

    #[allow(missing_docs)]
    pub fn with_start_time(mut self, start_time_secs: u64) -> Self {
        self.start_time_secs = start_time_secs;
        self
    }

    /// Creates `owner` if needed and sets its balance
    pub fn with_balance(mut self, owner: &AccountAddress, balance: u64) -> Self {
        self.accounts
            .entry(*owner)
            .or_insert_with(|| TestAccount::new(0))
            .balance = balance;
        self
    }

    #[allow(missing_docs)]
    pub fn with_sequence_number(mut self, owner: &AccountAddress, sequence_number: u64) -> Self {
        self.accounts
            .entry(*owner)
            .or_insert_with(|| TestAccount::new(0))
            .sequence_number = sequence_number;
        self
    }

    #[allow(missing_docs)]
    pub fn with_token(mut self, owner: &AccountAddress, token: Token) -> Self {
        self.accounts
            .entry(*owner)
            .or_insert_with(|| TestAccount::new(0))
            .tokens
            .push(token);
        self
    }

    /// Every call of the entry function `function` (bare name) aborts with `vm_status`
    pub fn with_abort(mut self, function: &str, vm_status: &str) -> Self {
        self.aborts.insert(function.to_string(), vm_status.to_string());
        self
    }

    #[allow(missing_docs)]
    pub fn build(self) -> TestLedgerClient {
        let state = LedgerState {
            accounts: self.accounts,
            now_secs: self.start_time_secs,
            committed: HashMap::new(),
            issued: Vec::new(),
            aborts: self.aborts,
        };
        TestLedgerClient {
            signer: self.signer,
            chain_id: self.chain_id,
            gas_used: self.gas_used,
            state: Arc::new(Mutex::new(state)),
        }
    }
}

#[derive(Clone, Debug)]
struct TestAccount {
    sequence_number: u64,
    balance: u64,
    tokens: Vec<Token>,
}

impl TestAccount {
    fn new(balance: u64) -> Self {
        TestAccount {
            sequence_number: 0,
            balance,
            tokens: Vec::new(),
        }
    }
}

/// Record of a transaction accepted by the [`TestLedgerClient`]
#[allow(missing_docs)]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IssuedCall {
    pub tx_id: TxId,
    pub sender: AccountAddress,
    pub sequence_number: u64,
    pub function: String,
    pub arguments: Vec<Value>,
    pub success: bool,
}

#[derive(Debug)]
struct LedgerState {
    accounts: HashMap<AccountAddress, TestAccount>,
    now_secs: u64,
    committed: HashMap<TxId, TxOutcome>,
    issued: Vec<IssuedCall>,
    aborts: HashMap<String, String>,
}

#[derive(Debug, Error)]
enum TestLCError {
    #[error("Mutex lock error: {0:?}")]
    Mutex(String),
    #[error("Only {expected} can sign, transaction is from {got}")]
    WrongSender {
        expected: AccountAddress,
        got: AccountAddress,
    },
    #[error("Wrong chain id: expected {expected}, got {got}")]
    WrongChainId { expected: u8, got: u8 },
    #[error("Wrong sequence number: expected {expected}, got {got}")]
    WrongSequenceNumber { expected: u64, got: u64 },
    #[error("Transaction expired at {expiration}, ledger time is {now}")]
    Expired { expiration: u64, now: u64 },
    #[error("Balance {balance} can't cover max gas fee {required}")]
    InsufficientBalanceForGas { required: u128, balance: u64 },
    #[error("Account {0} doesn't exist")]
    UnknownAccount(AccountAddress),
    #[error("Transaction {0} not found")]
    UnknownTransaction(TxId),
}

/// In-memory ledger. It checks transaction envelopes (sender, chain id, sequence number,
/// expiration, gas) and keeps accounts, tokens and committed transactions, but it does not run
/// Move code: entry functions succeed unless configured to abort.
#[derive(Debug, Clone)]
pub struct TestLedgerClient {
    signer: AccountAddress,
    chain_id: u8,
    gas_used: u64,
    state: Arc<Mutex<LedgerState>>,
}

impl TestLedgerClient {
    fn state(&self) -> Result<MutexGuard<'_, LedgerState>, TestLCError> {
        self.state
            .lock()
            .map_err(|e| TestLCError::Mutex(format! {"{:?}", e}))
    }

    /// Everything accepted so far, in submission order
    pub fn issued(&self) -> LedgerClientResult<Vec<IssuedCall>> {
        let state = self
            .state()
            .map_err(|e| LedgerClientError::FailedToIssueTx(Box::new(e)))?;
        Ok(state.issued.clone())
    }

    #[allow(missing_docs)]
    pub fn advance_time(&self, secs: u64) -> LedgerClientResult<()> {
        let mut state = self
            .state()
            .map_err(|e| LedgerClientError::CurrentTime(Box::new(e)))?;
        state.now_secs += secs;
        Ok(())
    }

    fn check_envelope(
        &self,
        state: &LedgerState,
        tx: &UnsignedTransaction,
    ) -> Result<(), TestLCError> {
        if tx.sender != self.signer {
            return Err(TestLCError::WrongSender {
                expected: self.signer,
                got: tx.sender,
            });
        }
        if tx.chain_id != self.chain_id {
            return Err(TestLCError::WrongChainId {
                expected: self.chain_id,
                got: tx.chain_id,
            });
        }
        let account = state
            .accounts
            .get(&tx.sender)
            .ok_or(TestLCError::UnknownAccount(tx.sender))?;
        if tx.sequence_number != account.sequence_number {
            return Err(TestLCError::WrongSequenceNumber {
                expected: account.sequence_number,
                got: tx.sequence_number,
            });
        }
        if tx.expiration_timestamp_secs <= state.now_secs {
            return Err(TestLCError::Expired {
                expiration: tx.expiration_timestamp_secs,
                now: state.now_secs,
            });
        }
        let required = tx.max_gas_amount as u128 * tx.gas_unit_price as u128;
        if required > account.balance as u128 {
            return Err(TestLCError::InsufficientBalanceForGas {
                required,
                balance: account.balance,
            });
        }
        Ok(())
    }

    fn execution_status(state: &LedgerState, tx: &UnsignedTransaction) -> (bool, String) {
        match state.aborts.get(tx.payload.function()) {
            Some(vm_status) => (false, vm_status.clone()),
            None => (true, EXECUTED.to_string()),
        }
    }
}

#[async_trait]
impl LedgerClient for TestLedgerClient {
    async fn signer_address(&self) -> LedgerClientResult<AccountAddress> {
        Ok(self.signer)
    }

    async fn sequence_number(&self, address: &AccountAddress) -> LedgerClientResult<u64> {
        let state = self
            .state()
            .map_err(|e| LedgerClientError::FailedToRetrieveAccount(*address, Box::new(e)))?;
        state
            .accounts
            .get(address)
            .map(|account| account.sequence_number)
            .ok_or_else(|| {
                LedgerClientError::FailedToRetrieveAccount(
                    *address,
                    Box::new(TestLCError::UnknownAccount(*address)),
                )
            })
    }

    async fn chain_id(&self) -> LedgerClientResult<u8> {
        Ok(self.chain_id)
    }

    async fn current_time_secs(&self) -> LedgerClientResult<u64> {
        let state = self
            .state()
            .map_err(|e| LedgerClientError::CurrentTime(Box::new(e)))?;
        Ok(state.now_secs)
    }

    async fn coin_balance(
        &self,
        address: &AccountAddress,
        coin_type: &StructTag,
    ) -> LedgerClientResult<u64> {
        if *coin_type != StructTag::aptos_coin() {
            return Ok(0);
        }
        let state = self
            .state()
            .map_err(|e| LedgerClientError::FailedToRetrieveBalance(*address, Box::new(e)))?;
        Ok(state
            .accounts
            .get(address)
            .map(|account| account.balance)
            .unwrap_or_default())
    }

    async fn account_tokens(&self, address: &AccountAddress) -> LedgerClientResult<Vec<Token>> {
        let state = self
            .state()
            .map_err(|e| LedgerClientError::FailedToRetrieveTokens(*address, Box::new(e)))?;
        Ok(state
            .accounts
            .get(address)
            .map(|account| account.tokens.clone())
            .unwrap_or_default())
    }

    async fn simulate(&self, tx: &UnsignedTransaction) -> LedgerClientResult<TxOutcome> {
        let state = self
            .state()
            .map_err(|e| LedgerClientError::FailedToSimulateTx(Box::new(e)))?;
        self.check_envelope(&state, tx)
            .map_err(|e| LedgerClientError::FailedToSimulateTx(Box::new(e)))?;
        let (success, vm_status) = Self::execution_status(&state, tx);
        Ok(TxOutcome {
            tx_id: TxId::new(&format!("0x{:064x}", 0)),
            success,
            vm_status,
            gas_used: self.gas_used,
        })
    }

    async fn issue(&self, tx: UnsignedTransaction) -> LedgerClientResult<TxId> {
        let mut state = self
            .state()
            .map_err(|e| LedgerClientError::FailedToIssueTx(Box::new(e)))?;
        self.check_envelope(&state, &tx)
            .map_err(|e| LedgerClientError::FailedToIssueTx(Box::new(e)))?;
        let (success, vm_status) = Self::execution_status(&state, &tx);

        let tx_id = TxId::new(&format!("0x{:064x}", state.issued.len() + 1));
        let fee = self.gas_used.saturating_mul(tx.gas_unit_price);
        let account = state
            .accounts
            .get_mut(&tx.sender)
            .ok_or(TestLCError::UnknownAccount(tx.sender))
            .map_err(|e| LedgerClientError::FailedToIssueTx(Box::new(e)))?;
        account.sequence_number += 1;
        account.balance = account.balance.saturating_sub(fee);

        let outcome = TxOutcome {
            tx_id: tx_id.clone(),
            success,
            vm_status,
            gas_used: self.gas_used,
        };
        state.committed.insert(tx_id.clone(), outcome);
        state.issued.push(IssuedCall {
            tx_id: tx_id.clone(),
            sender: tx.sender,
            sequence_number: tx.sequence_number,
            function: tx.payload.qualified_name(),
            arguments: tx.payload.arguments().to_vec(),
            success,
        });
        state.now_secs += BLOCK_TIME_SECS;
        Ok(tx_id)
    }

    async fn wait_for_transaction(&self, tx_id: &TxId) -> LedgerClientResult<TxOutcome> {
        let state = self
            .state()
            .map_err(|e| LedgerClientError::FailedToWaitForTx(tx_id.clone(), Box::new(e)))?;
        state.committed.get(tx_id).cloned().ok_or_else(|| {
            LedgerClientError::FailedToWaitForTx(
                tx_id.clone(),
                Box::new(TestLCError::UnknownTransaction(tx_id.clone())),
            )
        })
    }
}
