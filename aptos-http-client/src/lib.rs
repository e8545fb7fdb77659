use crate::models::{
    AccountData, AccountResource, AptosErrorBody, CurrentTokenOwnerships, EncodeSubmissionRequest,
    GraphQLRequest, GraphQLResponse, LedgerInfo, PendingTransaction, SubmitTransactionRequest,
    TokenOwnership, TokenOwnershipVariables, Transaction,
};
use async_trait::async_trait;
use reqwest::Response;
use serde::{de::DeserializeOwned, Serialize};
use url::Url;

use crate::error::{Error, Result};

pub mod error;
pub mod models;

pub const MAINNET_URL: &str = "https://fullnode.mainnet.aptoslabs.com";
pub const TESTNET_URL: &str = "https://fullnode.testnet.aptoslabs.com";
pub const TESTNET_INDEXER_URL: &str = "https://indexer-testnet.staging.gcp.aptosdev.com/v1/graphql";

/// Page size used when walking the indexer
pub const TOKEN_PAGE_SIZE: u64 = 100;

const CURRENT_TOKEN_OWNERSHIPS_QUERY: &str = r#"
query CurrentTokenOwnerships($owner_address: String, $limit: Int, $offset: Int) {
  current_token_ownerships(
    where: { owner_address: { _eq: $owner_address }, amount: { _gt: "0" } }
    limit: $limit
    offset: $offset
  ) {
    creator_address
    collection_name
    name
    property_version
    amount
    token_properties
  }
}
"#;

#[async_trait]
pub trait AptosHttpTrait {
    async fn ledger_info(&self) -> Result<LedgerInfo>;

    async fn account(&self, address: &str) -> Result<AccountData>;

    async fn account_resource<T: DeserializeOwned + Send>(
        &self,
        address: &str,
        resource_type: &str,
    ) -> Result<AccountResource<T>>;

    /// Returns the `0x`-prefixed hex of the message that has to be signed
    async fn encode_submission(&self, request: &EncodeSubmissionRequest) -> Result<String>;

    async fn simulate(&self, request: &SubmitTransactionRequest) -> Result<Vec<Transaction>>;

    async fn submit(&self, request: &SubmitTransactionRequest) -> Result<PendingTransaction>;

    async fn transaction_by_hash(&self, hash: &str) -> Result<Transaction>;
}

#[derive(Debug, Clone)]
pub struct AptosHttp {
    parent_url: String,
    client: reqwest::Client,
}

#[async_trait]
impl AptosHttpTrait for AptosHttp {
    async fn ledger_info(&self) -> Result<LedgerInfo> {
        self.get_endpoint("./v1").await
    }

    async fn account(&self, address: &str) -> Result<AccountData> {
        let ext = format!("./v1/accounts/{}", address);
        self.get_endpoint(&ext).await
    }

    async fn account_resource<T: DeserializeOwned + Send>(
        &self,
        address: &str,
        resource_type: &str,
    ) -> Result<AccountResource<T>> {
        let ext = format!("./v1/accounts/{}/resource/{}", address, resource_type);
        self.get_endpoint(&ext).await
    }

    async fn encode_submission(&self, request: &EncodeSubmissionRequest) -> Result<String> {
        self.post_endpoint("./v1/transactions/encode_submission", &[], request)
            .await
    }

    async fn simulate(&self, request: &SubmitTransactionRequest) -> Result<Vec<Transaction>> {
        let params = [
            ("estimate_gas_unit_price", "false"),
            ("estimate_max_gas_amount", "false"),
        ];
        self.post_endpoint("./v1/transactions/simulate", &params, request)
            .await
    }

    async fn submit(&self, request: &SubmitTransactionRequest) -> Result<PendingTransaction> {
        self.post_endpoint("./v1/transactions", &[], request).await
    }

    async fn transaction_by_hash(&self, hash: &str) -> Result<Transaction> {
        let ext = format!("./v1/transactions/by_hash/{}", hash);
        self.get_endpoint(&ext).await
    }
}

impl AptosHttp {
    /// `url` is the node root, with or without a trailing `/v1`
    pub fn new(url: &str) -> Self {
        let trimmed = url.trim_end_matches('/');
        let trimmed = trimmed.strip_suffix("/v1").unwrap_or(trimmed);
        let parent_url = format!("{}/", trimmed);
        AptosHttp {
            parent_url,
            client: reqwest::Client::new(),
        }
    }

    pub fn parent_url(&self) -> &str {
        &self.parent_url
    }

    async fn get_endpoint<T: DeserializeOwned>(&self, ext: &str) -> Result<T> {
        let url = Url::parse(&self.parent_url)?.join(ext)?;
        tracing::debug!(%url, "GET");
        let res = self.client.get(url).send().await?;
        parse_response(res).await
    }

    async fn post_endpoint<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        ext: &str,
        params: &[(&str, &str)],
        body: &B,
    ) -> Result<T> {
        let mut url = Url::parse(&self.parent_url)?.join(ext)?;
        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params);
        }
        tracing::debug!(%url, "POST");
        let res = self.client.post(url).json(body).send().await?;
        parse_response(res).await
    }
}

async fn parse_response<T: DeserializeOwned>(res: Response) -> Result<T> {
    let status = res.status();
    if status.is_success() {
        return Ok(res.json().await?);
    }
    let text = res.text().await?;
    let (message, error_code) = match serde_json::from_str::<AptosErrorBody>(&text) {
        Ok(body) => (body.message, body.error_code),
        Err(_) => (text, None),
    };
    Err(Error::HttpError {
        status_code: status.as_u16(),
        message,
        error_code,
    })
}

#[derive(Debug, Clone)]
pub struct IndexerHttp {
    url: String,
    client: reqwest::Client,
}

impl IndexerHttp {
    pub fn new(url: &str) -> Self {
        IndexerHttp {
            url: url.to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// One page of the tokens currently held by `owner_address`
    pub async fn current_token_ownerships(
        &self,
        owner_address: &str,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<TokenOwnership>> {
        let variables = TokenOwnershipVariables {
            owner_address: owner_address.to_string(),
            limit,
            offset,
        };
        let data: CurrentTokenOwnerships = self
            .query(CURRENT_TOKEN_OWNERSHIPS_QUERY, variables)
            .await?;
        Ok(data.current_token_ownerships)
    }

    /// Every token currently held by `owner_address`, following pages until a short one
    pub async fn all_token_ownerships(&self, owner_address: &str) -> Result<Vec<TokenOwnership>> {
        let mut tokens = Vec::new();
        let mut offset = 0;
        loop {
            let page = self
                .current_token_ownerships(owner_address, TOKEN_PAGE_SIZE, offset)
                .await?;
            let page_len = page.len() as u64;
            tokens.extend(page);
            if page_len < TOKEN_PAGE_SIZE {
                break;
            }
            offset += page_len;
        }
        Ok(tokens)
    }

    async fn query<V: Serialize, T: DeserializeOwned>(&self, query: &str, variables: V) -> Result<T> {
        let url = Url::parse(&self.url)?;
        let body = GraphQLRequest {
            query: query.to_string(),
            variables,
        };
        tracing::debug!(%url, "GraphQL query");
        let res = self.client.post(url).json(&body).send().await?;
        let response: GraphQLResponse<T> = parse_response(res).await?;
        if !response.errors.is_empty() {
            let messages = response.errors.into_iter().map(|e| e.message).collect();
            return Err(Error::GraphQL(messages));
        }
        response
            .data
            .ok_or_else(|| Error::MissingField("data".to_string()))
    }
}
