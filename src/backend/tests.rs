#![allow(non_snake_case)]

use super::*;
use crate::{
    address::AccountAddress,
    ledger_client::test_ledger_client::{
        TestLedgerClientBuilder, DEFAULT_GAS_USED, DEFAULT_START_TIME_SECS, TEST_CHAIN_ID,
    },
    transaction::ModuleId,
};

const STARTING_BALANCE: u64 = 100_000_000;

fn signer() -> AccountAddress {
    AccountAddress::from_hex("0xa11ce").unwrap()
}

fn call(function: &str) -> EntryFunctionCall {
    let module = ModuleId::new(AccountAddress::from_hex("0xcafe").unwrap(), "urn_to_earn");
    EntryFunctionCall::new(&module, function)
}

#[tokio::test]
async fn build__fills_envelope_from_ledger() {
    let ledger = TestLedgerClientBuilder::new(&signer(), STARTING_BALANCE)
        .with_sequence_number(&signer(), 5)
        .build();
    let settings = TxSettings {
        gas_unit_price: 150,
        max_gas_amount: 2_000,
        expiration_secs: 60,
    };
    let backend = Backend::new(ledger).with_settings(settings);

    let tx = backend.build(call("dig")).await.unwrap();

    assert_eq!(tx.chain_id, TEST_CHAIN_ID);
    assert_eq!(tx.sender, signer());
    assert_eq!(tx.sequence_number, 5);
    assert_eq!(tx.gas_unit_price, 150);
    assert_eq!(tx.max_gas_amount, 2_000);
    assert_eq!(tx.expiration_timestamp_secs, DEFAULT_START_TIME_SECS + 60);
}

#[tokio::test]
async fn process__commits_and_charges_gas() {
    let ledger = TestLedgerClientBuilder::new(&signer(), STARTING_BALANCE).build();
    let backend = Backend::new(ledger);

    let outcome = backend.process(TxActions::new(call("mint_shovel"))).await.unwrap();

    assert!(outcome.success);
    let ledger = backend.ledger_client();
    assert_eq!(ledger.sequence_number(&signer()).await.unwrap(), 1);
    let fee = DEFAULT_GAS_USED * TxSettings::default().gas_unit_price;
    assert_eq!(
        ledger.native_balance(&signer()).await.unwrap(),
        STARTING_BALANCE - fee
    );
}

#[tokio::test]
async fn process__consecutive_calls_use_fresh_sequence_numbers() {
    let ledger = TestLedgerClientBuilder::new(&signer(), STARTING_BALANCE).build();
    let backend = Backend::new(ledger);

    backend.process(TxActions::new(call("mint_shovel"))).await.unwrap();
    backend.process(TxActions::new(call("dig"))).await.unwrap();

    let issued = backend.ledger_client().issued().unwrap();
    let sequence_numbers: Vec<_> = issued.iter().map(|c| c.sequence_number).collect();
    assert_eq!(sequence_numbers, vec![0, 1]);
}

#[tokio::test]
async fn process__failed_simulation_submits_nothing() {
    let ledger = TestLedgerClientBuilder::new(&signer(), STARTING_BALANCE)
        .with_abort("burn_and_fill", "Move abort: EWRONG_PART")
        .build();
    let backend = Backend::new(ledger);
    let actions = TxActions::new(call("burn_and_fill")).with_simulation();

    let err = backend.process(actions).await.unwrap_err();

    match err {
        Error::SimulationFailed { function, vm_status } => {
            assert!(function.ends_with("::urn_to_earn::burn_and_fill"));
            assert_eq!(vm_status, "Move abort: EWRONG_PART");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(backend.ledger_client().issued().unwrap().is_empty());
}

#[tokio::test]
async fn process__failed_commit_is_error() {
    let ledger = TestLedgerClientBuilder::new(&signer(), STARTING_BALANCE)
        .with_abort("dig", "Move abort: ENO_SHOVEL")
        .build();
    let backend = Backend::new(ledger);

    let err = backend.process(TxActions::new(call("dig"))).await.unwrap_err();

    assert!(matches!(err, Error::TransactionFailed { .. }));
    // Failed transactions still consume the sequence number
    let ledger = backend.ledger_client();
    assert_eq!(ledger.sequence_number(&signer()).await.unwrap(), 1);
}

#[tokio::test]
async fn process__unaffordable_gas_is_ledger_error() {
    let ledger = TestLedgerClientBuilder::new(&signer(), 10).build();
    let backend = Backend::new(ledger);

    let err = backend.process(TxActions::new(call("dig"))).await.unwrap_err();

    assert!(matches!(err, Error::LedgerClient(_)));
}

#[tokio::test]
async fn build__rejects_expiration_past_u64() {
    let ledger = TestLedgerClientBuilder::new(&signer(), STARTING_BALANCE).build();
    let settings = TxSettings {
        expiration_secs: u64::MAX,
        ..TxSettings::default()
    };
    let backend = Backend::new(ledger).with_settings(settings);

    let err = backend.build(call("dig")).await.unwrap_err();

    assert!(matches!(err, Error::Config(_)));
    assert!(backend.ledger_client().issued().unwrap().is_empty());
}
