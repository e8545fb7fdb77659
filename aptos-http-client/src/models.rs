use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr, PickFirst};

pub const ENTRY_FUNCTION_PAYLOAD: &str = "entry_function_payload";
pub const ED25519_SIGNATURE: &str = "ed25519_signature";
pub const PENDING_TRANSACTION: &str = "pending_transaction";

#[serde_as]
#[derive(Deserialize, Debug, Clone)]
pub struct LedgerInfo {
    pub chain_id: u8,
    #[serde_as(as = "DisplayFromStr")]
    pub epoch: u64,
    #[serde_as(as = "DisplayFromStr")]
    pub ledger_version: u64,
    #[serde_as(as = "DisplayFromStr")]
    pub ledger_timestamp: u64,
    #[serde_as(as = "DisplayFromStr")]
    pub block_height: u64,
}

#[serde_as]
#[derive(Deserialize, Debug, Clone)]
pub struct AccountData {
    #[serde_as(as = "DisplayFromStr")]
    pub sequence_number: u64,
    pub authentication_key: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct AccountResource<T> {
    #[serde(rename = "type")]
    pub resource_type: String,
    pub data: T,
}

#[derive(Deserialize, Debug, Clone)]
pub struct CoinStore {
    pub coin: Coin,
}

#[serde_as]
#[derive(Deserialize, Debug, Clone)]
pub struct Coin {
    #[serde_as(as = "DisplayFromStr")]
    pub value: u64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct EntryFunctionPayload {
    #[serde(rename = "type")]
    pub payload_type: String,
    pub function: String,
    pub type_arguments: Vec<String>,
    pub arguments: Vec<serde_json::Value>,
}

impl EntryFunctionPayload {
    pub fn new(
        function: String,
        type_arguments: Vec<String>,
        arguments: Vec<serde_json::Value>,
    ) -> Self {
        EntryFunctionPayload {
            payload_type: ENTRY_FUNCTION_PAYLOAD.to_string(),
            function,
            type_arguments,
            arguments,
        }
    }
}

/// Body for `encode_submission`, and the unsigned half of a submission
#[serde_as]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct EncodeSubmissionRequest {
    pub sender: String,
    #[serde_as(as = "DisplayFromStr")]
    pub sequence_number: u64,
    #[serde_as(as = "DisplayFromStr")]
    pub max_gas_amount: u64,
    #[serde_as(as = "DisplayFromStr")]
    pub gas_unit_price: u64,
    #[serde_as(as = "DisplayFromStr")]
    pub expiration_timestamp_secs: u64,
    pub payload: EntryFunctionPayload,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Ed25519Signature {
    #[serde(rename = "type")]
    pub signature_type: String,
    pub public_key: String,
    pub signature: String,
}

impl Ed25519Signature {
    /// Both values are expected to be `0x`-prefixed hex
    pub fn new(public_key: String, signature: String) -> Self {
        Ed25519Signature {
            signature_type: ED25519_SIGNATURE.to_string(),
            public_key,
            signature,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SubmitTransactionRequest {
    #[serde(flatten)]
    pub transaction: EncodeSubmissionRequest,
    pub signature: Ed25519Signature,
}

#[derive(Deserialize, Debug, Clone)]
pub struct PendingTransaction {
    pub hash: String,
}

/// Subset of the node's `Transaction` shape that is shared by pending, committed and simulated
/// user transactions.
#[serde_as]
#[derive(Deserialize, Debug, Clone)]
pub struct Transaction {
    #[serde(rename = "type")]
    pub transaction_type: String,
    pub hash: String,
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub vm_status: Option<String>,
    #[serde_as(as = "Option<DisplayFromStr>")]
    pub gas_used: Option<u64>,
    #[serde_as(as = "Option<DisplayFromStr>")]
    pub version: Option<u64>,
}

impl Transaction {
    pub fn is_pending(&self) -> bool {
        self.transaction_type == PENDING_TRANSACTION
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct AptosErrorBody {
    pub message: String,
    #[serde(default)]
    pub error_code: Option<String>,
    #[serde(default)]
    pub vm_error_code: Option<u64>,
}

#[derive(Serialize, Debug, Clone)]
pub struct GraphQLRequest<V> {
    pub query: String,
    pub variables: V,
}

#[derive(Deserialize, Debug)]
pub struct GraphQLResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQLError>,
}

#[derive(Deserialize, Debug)]
pub struct GraphQLError {
    pub message: String,
}

#[derive(Serialize, Debug, Clone)]
pub struct TokenOwnershipVariables {
    pub owner_address: String,
    pub limit: u64,
    pub offset: u64,
}

#[derive(Deserialize, Debug)]
pub struct CurrentTokenOwnerships {
    pub current_token_ownerships: Vec<TokenOwnership>,
}

// Hasura renders `numeric` columns as JSON numbers or strings depending on the deployment
#[serde_as]
#[derive(Deserialize, Debug, Clone)]
pub struct TokenOwnership {
    pub creator_address: String,
    pub collection_name: String,
    pub name: String,
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub property_version: u64,
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub amount: u64,
    #[serde(default)]
    pub token_properties: serde_json::Value,
}
