#![allow(non_snake_case)]

use super::*;
use crate::{
    ledger_client::test_ledger_client::{TestLedgerClient, TestLedgerClientBuilder},
    token::{TokenId, URN_COLLECTION},
};
use serde_json::{json, Value};

fn signer() -> AccountAddress {
    AccountAddress::from_hex("0xa11ce").unwrap()
}

fn item(name: &str, collection: &str, property_version: u64) -> Token {
    Token::new(
        TokenId {
            creator: AccountAddress::from_hex(OWNER_ADDRESS).unwrap(),
            collection: collection.to_string(),
            name: name.to_string(),
            property_version,
        },
        1,
    )
}

fn ledger_with(tokens: Vec<Token>) -> TestLedgerClient {
    tokens
        .into_iter()
        .fold(
            TestLedgerClientBuilder::new(&signer(), 100_000_000),
            |builder, token| builder.with_token(&signer(), token),
        )
        .build()
}

#[test]
fn mintable__parses_known_items() {
    assert_eq!("shovel".parse::<Mintable>().unwrap(), Mintable::Shovel);
    assert_eq!("urn".parse::<Mintable>().unwrap(), Mintable::Urn);
    assert_eq!("forge".parse::<Mintable>().unwrap(), Mintable::Forge);
    assert_eq!(Mintable::Urn.entry_function(), "mint_urn");
}

#[test]
fn mintable__unknown_item_is_error() {
    let err = "knife".parse::<Mintable>().unwrap_err();
    assert_eq!(err.to_string(), "unknown obj knife");
}

#[test]
fn default__targets_published_owner() {
    let logic = UrnToEarnLogic::default();
    assert_eq!(OWNER.to_hex(), OWNER_ADDRESS);
    assert_eq!(logic.module().address(), &OWNER);
    assert_eq!(logic.module().name(), MODULE_NAME);
}

#[tokio::test]
async fn handle_endpoint__mint_shovel_has_no_args() {
    let logic = UrnToEarnLogic::default();
    let ledger = ledger_with(vec![]);

    let actions = logic
        .handle_endpoint(UrnToEarnEndpoints::Mint(Mintable::Shovel), &ledger)
        .await
        .unwrap();

    assert_eq!(actions.call().function(), "mint_shovel");
    assert_eq!(actions.call().module(), logic.module());
    assert!(actions.call().arguments().is_empty());
    assert!(!actions.simulate_first());
}

#[tokio::test]
async fn handle_endpoint__dig() {
    let logic = UrnToEarnLogic::default();
    let ledger = ledger_with(vec![]);

    let actions = logic
        .handle_endpoint(UrnToEarnEndpoints::Dig, &ledger)
        .await
        .unwrap();

    assert_eq!(actions.call().function(), "dig");
}

#[tokio::test]
async fn handle_endpoint__put_bone_part_uses_last_matching_tokens() {
    let logic = UrnToEarnLogic::default();
    let ledger = ledger_with(vec![
        item("skull", URN_COLLECTION, 1),
        item("urn", URN_COLLECTION, 2),
        item("skull", URN_COLLECTION, 3),
        item("urn", URN_COLLECTION, 4),
    ]);

    let actions = logic
        .handle_endpoint(
            UrnToEarnEndpoints::PutBonePart {
                part: "skull".to_string(),
                golden: false,
            },
            &ledger,
        )
        .await
        .unwrap();

    assert_eq!(actions.call().function(), "burn_and_fill");
    assert_eq!(
        actions.call().arguments(),
        &[json!("4"), json!("3"), Value::String("skull".to_string())]
    );
    assert!(actions.simulate_first());
}

#[tokio::test]
async fn handle_endpoint__golden_part_goes_into_golden_urn() {
    let logic = UrnToEarnLogic::default();
    let ledger = ledger_with(vec![
        item("urn", URN_COLLECTION, 1),
        item("golden_urn", URN_COLLECTION, 7),
        item("golden_hip", URN_COLLECTION, 9),
    ]);

    let actions = logic
        .handle_endpoint(
            UrnToEarnEndpoints::PutBonePart {
                part: "golden_hip".to_string(),
                golden: true,
            },
            &ledger,
        )
        .await
        .unwrap();

    assert_eq!(actions.call().function(), "burn_and_fill_golden");
    assert_eq!(
        actions.call().arguments(),
        &[json!("7"), json!("9"), json!("golden_hip")]
    );
}

#[tokio::test]
async fn handle_endpoint__golden_mismatch_is_invalid_part() {
    let logic = UrnToEarnLogic::default();
    let ledger = ledger_with(vec![item("golden_hip", URN_COLLECTION, 1)]);

    let err = logic
        .handle_endpoint(
            UrnToEarnEndpoints::PutBonePart {
                part: "golden_hip".to_string(),
                golden: false,
            },
            &ledger,
        )
        .await
        .unwrap_err();

    assert!(err.to_string().contains("invalid part"));
}

#[tokio::test]
async fn handle_endpoint__missing_bone_is_error() {
    let logic = UrnToEarnLogic::default();
    let ledger = ledger_with(vec![item("urn", URN_COLLECTION, 1)]);

    let err = logic
        .handle_endpoint(
            UrnToEarnEndpoints::PutBonePart {
                part: "arm".to_string(),
                golden: false,
            },
            &ledger,
        )
        .await
        .unwrap_err();

    assert!(err.to_string().contains("no bone token found"));
}

#[tokio::test]
async fn handle_endpoint__missing_urn_is_error() {
    let logic = UrnToEarnLogic::default();
    let ledger = ledger_with(vec![item("arm", URN_COLLECTION, 1)]);

    let err = logic
        .handle_endpoint(
            UrnToEarnEndpoints::PutBonePart {
                part: "arm".to_string(),
                golden: false,
            },
            &ledger,
        )
        .await
        .unwrap_err();

    assert!(err.to_string().contains("no urn token found"));
}

#[tokio::test]
async fn lookup__urn_tokens_filters_collection() {
    let logic = UrnToEarnLogic::default();
    let bob = AccountAddress::from_hex("0xb0b").unwrap();
    let shovel = item("shovel", URN_COLLECTION, 0);
    let ledger = TestLedgerClientBuilder::new(&signer(), 100_000_000)
        .with_token(&bob, shovel.clone())
        .with_token(&bob, item("sword", "armory", 0))
        .build();

    let res = logic
        .lookup(UrnToEarnLookups::UrnTokens(Some(bob)), &ledger)
        .await
        .unwrap();

    assert_eq!(res, UrnToEarnResponses::UrnTokens(vec![shovel]));
}

#[tokio::test]
async fn lookup__coin_balance_defaults_to_signer() {
    let logic = UrnToEarnLogic::default();
    let ledger = ledger_with(vec![]);

    let res = logic
        .lookup(UrnToEarnLookups::CoinBalance(None), &ledger)
        .await
        .unwrap();

    assert_eq!(res, UrnToEarnResponses::CoinBalance(100_000_000));
}
