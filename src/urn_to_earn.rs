use crate::{
    address::AccountAddress,
    ledger_client::LedgerClient,
    logic::{
        error::{as_endpoint_err, as_lookup_err, SCLogicResult},
        SCLogic,
    },
    token::{find_last_named, urn_tokens, Token},
    transaction::{EntryFunctionCall, ModuleId, TxActions},
};
use async_trait::async_trait;
use std::{fmt, str::FromStr};
use thiserror::Error;

#[cfg(test)]
mod tests;

/// Account the urn-to-earn package is published under on testnet
pub const OWNER_ADDRESS: &str =
    "0xd640a1d7f3e7236a7aa95fa6e9a69531ad3c88ee9601b8a4afabe73d25b48508";
/// [`OWNER_ADDRESS`] as bytes
pub const OWNER: AccountAddress = AccountAddress::new([
    0xd6, 0x40, 0xa1, 0xd7, 0xf3, 0xe7, 0x23, 0x6a, 0x7a, 0xa9, 0x5f, 0xa6, 0xe9, 0xa6, 0x95, 0x31,
    0xad, 0x3c, 0x88, 0xee, 0x96, 0x01, 0xb8, 0xa4, 0xaf, 0xab, 0xe7, 0x3d, 0x25, 0xb4, 0x85, 0x08,
]);
/// Game module
pub const MODULE_NAME: &str = "urn_to_earn";

const URN: &str = "urn";
const GOLDEN_URN: &str = "golden_urn";
const GOLDEN: &str = "golden";

/// Items bought with a plain mint call
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mintable {
    Shovel,
    Urn,
    Forge,
}

impl Mintable {
    /// Entry function that mints the item
    pub fn entry_function(&self) -> &'static str {
        match self {
            Mintable::Shovel => "mint_shovel",
            Mintable::Urn => "mint_urn",
            Mintable::Forge => "forge",
        }
    }
}

impl FromStr for Mintable {
    type Err = UrnToEarnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "shovel" => Ok(Mintable::Shovel),
            "urn" => Ok(Mintable::Urn),
            "forge" => Ok(Mintable::Forge),
            other => Err(UrnToEarnError::UnknownObject(other.to_string())),
        }
    }
}

impl fmt::Display for Mintable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Mintable::Shovel => "shovel",
            Mintable::Urn => "urn",
            Mintable::Forge => "forge",
        };
        write!(f, "{}", name)
    }
}

#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrnToEarnEndpoints {
    Mint(Mintable),
    Dig,
    /// Burn a bone part into the signer's urn (or golden urn)
    PutBonePart { part: String, golden: bool },
}

/// `None` means the signer's own account
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrnToEarnLookups {
    UrnTokens(Option<AccountAddress>),
    CoinBalance(Option<AccountAddress>),
}

#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq)]
pub enum UrnToEarnResponses {
    UrnTokens(Vec<Token>),
    CoinBalance(u64),
}

#[allow(missing_docs)]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UrnToEarnError {
    #[error("unknown obj {0}")]
    UnknownObject(String),
    #[error("invalid part {0:?}: golden parts go into the golden urn only")]
    InvalidPart(String),
    #[error("no bone token found for {0:?}")]
    NoBoneToken(String),
    #[error("no urn token found named {0:?}")]
    NoUrnToken(String),
}

/// Off-chain side of the urn-to-earn module
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrnToEarnLogic {
    module: ModuleId,
}

impl UrnToEarnLogic {
    #[allow(missing_docs)]
    pub fn new(module: ModuleId) -> Self {
        UrnToEarnLogic { module }
    }

    #[allow(missing_docs)]
    pub fn module(&self) -> &ModuleId {
        &self.module
    }

    fn call(&self, function: &str) -> EntryFunctionCall {
        EntryFunctionCall::new(&self.module, function)
    }

    async fn put_bone_part<LC: LedgerClient>(
        &self,
        part: &str,
        golden: bool,
        ledger_client: &LC,
    ) -> SCLogicResult<TxActions> {
        if golden != part.contains(GOLDEN) {
            return Err(as_endpoint_err(UrnToEarnError::InvalidPart(
                part.to_string(),
            )));
        }

        let signer = ledger_client.signer_address().await?;
        let tokens = ledger_client.account_tokens(&signer).await?;

        let bone = find_last_named(&tokens, part)
            .ok_or_else(|| as_endpoint_err(UrnToEarnError::NoBoneToken(part.to_string())))?;
        tracing::debug!(?bone, "bone token");

        let urn_name = if golden { GOLDEN_URN } else { URN };
        let urn = find_last_named(&tokens, urn_name)
            .ok_or_else(|| as_endpoint_err(UrnToEarnError::NoUrnToken(urn_name.to_string())))?;
        tracing::debug!(?urn, "urn token");

        let function = if golden {
            "burn_and_fill_golden"
        } else {
            "burn_and_fill"
        };
        let call = self
            .call(function)
            .with_u64_arg(urn.id().property_version)
            .with_u64_arg(bone.id().property_version)
            .with_string_arg(part);
        Ok(TxActions::new(call).with_simulation())
    }
}

impl Default for UrnToEarnLogic {
    fn default() -> Self {
        UrnToEarnLogic::new(ModuleId::new(OWNER, MODULE_NAME))
    }
}

#[async_trait]
impl SCLogic for UrnToEarnLogic {
    type Endpoints = UrnToEarnEndpoints;
    type Lookups = UrnToEarnLookups;
    type LookupResponses = UrnToEarnResponses;

    async fn handle_endpoint<LC: LedgerClient>(
        &self,
        endpoint: Self::Endpoints,
        ledger_client: &LC,
    ) -> SCLogicResult<TxActions> {
        match endpoint {
            UrnToEarnEndpoints::Mint(item) => {
                Ok(TxActions::new(self.call(item.entry_function())))
            }
            UrnToEarnEndpoints::Dig => Ok(TxActions::new(self.call("dig"))),
            UrnToEarnEndpoints::PutBonePart { part, golden } => {
                self.put_bone_part(&part, golden, ledger_client).await
            }
        }
    }

    async fn lookup<LC: LedgerClient>(
        &self,
        query: Self::Lookups,
        ledger_client: &LC,
    ) -> SCLogicResult<Self::LookupResponses> {
        match query {
            UrnToEarnLookups::UrnTokens(owner) => {
                let owner = owner_or_signer(owner, ledger_client).await?;
                let tokens = ledger_client
                    .account_tokens(&owner)
                    .await
                    .map_err(as_lookup_err)?;
                Ok(UrnToEarnResponses::UrnTokens(urn_tokens(tokens)))
            }
            UrnToEarnLookups::CoinBalance(owner) => {
                let owner = owner_or_signer(owner, ledger_client).await?;
                let balance = ledger_client
                    .native_balance(&owner)
                    .await
                    .map_err(as_lookup_err)?;
                Ok(UrnToEarnResponses::CoinBalance(balance))
            }
        }
    }
}

async fn owner_or_signer<LC: LedgerClient>(
    owner: Option<AccountAddress>,
    ledger_client: &LC,
) -> SCLogicResult<AccountAddress> {
    match owner {
        Some(owner) => Ok(owner),
        None => ledger_client
            .signer_address()
            .await
            .map_err(as_lookup_err),
    }
}
