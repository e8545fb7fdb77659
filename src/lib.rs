#![warn(missing_docs)]

//! Off-chain client for the urn-to-earn game on Aptos: builds, simulates, signs and submits the
//! game's entry functions and runs the mint-and-dig harness.

pub use crate::{
    address::AccountAddress,
    transaction::{EntryFunctionCall, TxActions, TxOutcome},
};

/// Account addresses
pub mod address;
/// Config file and the REST-backed ledger client
pub mod aptos_ledger_client;
pub mod backend;
/// Octa/APT formatting
pub mod coin;
#[allow(missing_docs)]
pub mod error;
/// The default mint-and-dig run
pub mod harness;
/// Signing keys
pub mod keys;
/// Ledger client module
pub mod ledger_client;
/// Smart contract logic module
pub mod logic;
#[allow(missing_docs)]
pub mod smart_contract;
/// Tokens as reported by the indexer
pub mod token;
/// Entry-function calls and transaction envelopes
pub mod transaction;
/// Endpoints and lookups of the urn-to-earn module
pub mod urn_to_earn;
