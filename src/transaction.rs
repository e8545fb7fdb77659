use crate::address::AccountAddress;
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// A Move module, addressed as `<address>::<name>`
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ModuleId {
    address: AccountAddress,
    name: String,
}

impl ModuleId {
    #[allow(missing_docs)]
    pub fn new(address: AccountAddress, name: &str) -> Self {
        ModuleId {
            address,
            name: name.to_string(),
        }
    }

    #[allow(missing_docs)]
    pub fn address(&self) -> &AccountAddress {
        &self.address
    }

    #[allow(missing_docs)]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.address, self.name)
    }
}

/// Fully qualified Move struct type, e.g. `0x1::coin::CoinStore<0x1::aptos_coin::AptosCoin>`
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct StructTag {
    module: ModuleId,
    name: String,
    type_params: Vec<StructTag>,
}

impl StructTag {
    #[allow(missing_docs)]
    pub fn new(module: ModuleId, name: &str, type_params: Vec<StructTag>) -> Self {
        StructTag {
            module,
            name: name.to_string(),
            type_params,
        }
    }

    /// The chain's native coin
    pub fn aptos_coin() -> Self {
        StructTag::new(
            ModuleId::new(AccountAddress::ONE, "aptos_coin"),
            "AptosCoin",
            vec![],
        )
    }

    /// The resource holding an account's balance of `coin`
    pub fn coin_store(coin: StructTag) -> Self {
        StructTag::new(
            ModuleId::new(AccountAddress::ONE, "coin"),
            "CoinStore",
            vec![coin],
        )
    }
}

impl fmt::Display for StructTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.module, self.name)?;
        if !self.type_params.is_empty() {
            let params: Vec<String> = self.type_params.iter().map(|p| p.to_string()).collect();
            write!(f, "<{}>", params.join(", "))?;
        }
        Ok(())
    }
}

/// Call of a public entry function. Arguments are kept in the node's JSON encoding: 64-bit
/// integers as decimal strings, strings as themselves.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntryFunctionCall {
    module: ModuleId,
    function: String,
    type_arguments: Vec<StructTag>,
    arguments: Vec<Value>,
}

impl EntryFunctionCall {
    #[allow(missing_docs)]
    pub fn new(module: &ModuleId, function: &str) -> Self {
        EntryFunctionCall {
            module: module.clone(),
            function: function.to_string(),
            type_arguments: Vec::new(),
            arguments: Vec::new(),
        }
    }

    #[allow(missing_docs)]
    pub fn with_type_argument(mut self, type_argument: StructTag) -> Self {
        self.type_arguments.push(type_argument);
        self
    }

    #[allow(missing_docs)]
    pub fn with_u64_arg(mut self, arg: u64) -> Self {
        self.arguments.push(Value::String(arg.to_string()));
        self
    }

    #[allow(missing_docs)]
    pub fn with_string_arg(mut self, arg: &str) -> Self {
        self.arguments.push(Value::String(arg.to_string()));
        self
    }

    #[allow(missing_docs)]
    pub fn module(&self) -> &ModuleId {
        &self.module
    }

    /// Bare function name, e.g. `dig`
    pub fn function(&self) -> &str {
        &self.function
    }

    /// `<address>::<module>::<function>`
    pub fn qualified_name(&self) -> String {
        format!("{}::{}", self.module, self.function)
    }

    #[allow(missing_docs)]
    pub fn type_arguments(&self) -> &[StructTag] {
        &self.type_arguments
    }

    #[allow(missing_docs)]
    pub fn arguments(&self) -> &[Value] {
        &self.arguments
    }
}

/// What a contract endpoint wants done on chain
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TxActions {
    call: EntryFunctionCall,
    simulate_first: bool,
}

impl TxActions {
    #[allow(missing_docs)]
    pub fn new(call: EntryFunctionCall) -> Self {
        TxActions {
            call,
            simulate_first: false,
        }
    }

    /// Dry-run the call before submitting it; a failing dry run stops the submission
    pub fn with_simulation(mut self) -> Self {
        self.simulate_first = true;
        self
    }

    #[allow(missing_docs)]
    pub fn call(&self) -> &EntryFunctionCall {
        &self.call
    }

    #[allow(missing_docs)]
    pub fn simulate_first(&self) -> bool {
        self.simulate_first
    }

    #[allow(missing_docs)]
    pub fn into_call(self) -> EntryFunctionCall {
        self.call
    }
}

/// Raw transaction before signing
#[allow(missing_docs)]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnsignedTransaction {
    pub chain_id: u8,
    pub sender: AccountAddress,
    pub sequence_number: u64,
    pub payload: EntryFunctionCall,
    pub max_gas_amount: u64,
    pub gas_unit_price: u64,
    pub expiration_timestamp_secs: u64,
}

impl UnsignedTransaction {
    #[allow(missing_docs)]
    pub fn builder() -> UnsignedTransactionBuilder {
        UnsignedTransactionBuilder::default()
    }
}

#[allow(missing_docs)]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransactionError {
    #[error("Transaction is missing field: {0}")]
    MissingField(&'static str),
}

/// Builder for [`UnsignedTransaction`]; every field is required
#[allow(missing_docs)]
#[derive(Clone, Debug, Default)]
pub struct UnsignedTransactionBuilder {
    chain_id: Option<u8>,
    sender: Option<AccountAddress>,
    sequence_number: Option<u64>,
    payload: Option<EntryFunctionCall>,
    max_gas_amount: Option<u64>,
    gas_unit_price: Option<u64>,
    expiration_timestamp_secs: Option<u64>,
}

#[allow(missing_docs)]
impl UnsignedTransactionBuilder {
    pub fn chain_id(mut self, chain_id: u8) -> Self {
        self.chain_id = Some(chain_id);
        self
    }

    pub fn sender(mut self, sender: AccountAddress) -> Self {
        self.sender = Some(sender);
        self
    }

    pub fn sequence_number(mut self, sequence_number: u64) -> Self {
        self.sequence_number = Some(sequence_number);
        self
    }

    pub fn payload(mut self, payload: EntryFunctionCall) -> Self {
        self.payload = Some(payload);
        self
    }

    pub fn max_gas_amount(mut self, max_gas_amount: u64) -> Self {
        self.max_gas_amount = Some(max_gas_amount);
        self
    }

    pub fn gas_unit_price(mut self, gas_unit_price: u64) -> Self {
        self.gas_unit_price = Some(gas_unit_price);
        self
    }

    pub fn expiration_timestamp_secs(mut self, expiration_timestamp_secs: u64) -> Self {
        self.expiration_timestamp_secs = Some(expiration_timestamp_secs);
        self
    }

    pub fn build(self) -> Result<UnsignedTransaction, TransactionError> {
        Ok(UnsignedTransaction {
            chain_id: self
                .chain_id
                .ok_or(TransactionError::MissingField("chain_id"))?,
            sender: self.sender.ok_or(TransactionError::MissingField("sender"))?,
            sequence_number: self
                .sequence_number
                .ok_or(TransactionError::MissingField("sequence_number"))?,
            payload: self
                .payload
                .ok_or(TransactionError::MissingField("payload"))?,
            max_gas_amount: self
                .max_gas_amount
                .ok_or(TransactionError::MissingField("max_gas_amount"))?,
            gas_unit_price: self
                .gas_unit_price
                .ok_or(TransactionError::MissingField("gas_unit_price"))?,
            expiration_timestamp_secs: self
                .expiration_timestamp_secs
                .ok_or(TransactionError::MissingField("expiration_timestamp_secs"))?,
        })
    }
}

/// Transaction hash as returned by the node
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TxId(String);

impl TxId {
    #[allow(missing_docs)]
    pub fn new(hash: &str) -> Self {
        TxId(hash.to_string())
    }

    #[allow(missing_docs)]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Result of executing (or simulating) a transaction
#[allow(missing_docs)]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TxOutcome {
    pub tx_id: TxId,
    pub success: bool,
    pub vm_status: String,
    pub gas_used: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn urn_module() -> ModuleId {
        ModuleId::new(AccountAddress::from_hex("0xcafe").unwrap(), "urn_to_earn")
    }

    #[test]
    fn coin_store_type_renders_nested_params() {
        let coin_store = StructTag::coin_store(StructTag::aptos_coin());
        let one = AccountAddress::ONE.to_hex();
        assert_eq!(
            coin_store.to_string(),
            format!("{one}::coin::CoinStore<{one}::aptos_coin::AptosCoin>")
        );
    }

    #[test]
    fn entry_function_arguments_use_json_encoding() {
        let call = EntryFunctionCall::new(&urn_module(), "burn_and_fill")
            .with_u64_arg(0)
            .with_u64_arg(u64::MAX)
            .with_string_arg("hip");
        assert_eq!(
            call.arguments(),
            &[
                Value::String("0".to_string()),
                Value::String("18446744073709551615".to_string()),
                Value::String("hip".to_string()),
            ]
        );
        assert!(call.qualified_name().ends_with("::urn_to_earn::burn_and_fill"));
    }

    #[test]
    fn builder_reports_first_missing_field() {
        let err = UnsignedTransaction::builder()
            .chain_id(2)
            .sender(AccountAddress::ONE)
            .build()
            .unwrap_err();
        assert_eq!(err, TransactionError::MissingField("sequence_number"));
    }

    #[test]
    fn builder_builds_complete_transaction() {
        let call = EntryFunctionCall::new(&urn_module(), "dig");
        let tx = UnsignedTransaction::builder()
            .chain_id(2)
            .sender(AccountAddress::ONE)
            .sequence_number(5)
            .payload(call.clone())
            .max_gas_amount(500_000)
            .gas_unit_price(100)
            .expiration_timestamp_secs(30)
            .build()
            .unwrap();
        assert_eq!(tx.payload, call);
        assert_eq!(tx.sequence_number, 5);
    }
}
