use solana_actions::crypto::Ed25519Verifier;
use solana_actions::services::provider::{ProviderRequest, ProviderResponse, TransportError};
use solana_actions::wire::Pubkey;
use solana_actions::{
    ActionClient, CancelToken, ErrorKind, HistoryOptions, LocatorError, Reference,
    find_reference,
};

use crate::support::{StubLedger, signature};

fn reference() -> Reference {
    Reference::new(Pubkey::new_from_array([9; 32]))
}

fn limit(limit: usize) -> HistoryOptions {
    HistoryOptions {
        limit: Some(limit),
        ..HistoryOptions::default()
    }
}

#[test]
fn full_page_then_short_page_returns_oldest() {
    let ledger = StubLedger::with_pages(vec![
        (1..=9).rev().map(signature).collect(),
        vec![signature(0)],
    ]);
    let found = find_reference(&ledger, &reference(), &limit(9), &CancelToken::new()).unwrap();

    assert_eq!(found.signature, signature(0));
    let requests = ledger.requests.lock().unwrap();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].before, None);
    assert_eq!(requests[1].before, Some(signature(1)));
    assert_eq!(requests[1].limit, Some(9));
}

#[test]
fn short_first_page_needs_one_call() {
    let ledger = StubLedger::with_pages(vec![vec![signature(5), signature(4)]]);
    let found = find_reference(&ledger, &reference(), &limit(10), &CancelToken::new()).unwrap();

    assert_eq!(found.signature, signature(4));
    assert_eq!(ledger.history_calls(), 1);
}

#[test]
fn empty_history_is_not_found() {
    let ledger = StubLedger::with_pages(Vec::new());
    let error =
        find_reference(&ledger, &reference(), &limit(10), &CancelToken::new()).unwrap_err();
    assert_eq!(error, LocatorError::NotFound);
    assert_eq!(error.kind(), ErrorKind::Locator);
}

#[test]
fn exhaustion_after_full_page_keeps_running_oldest() {
    let ledger = StubLedger::with_pages(vec![vec![signature(3), signature(2)], Vec::new()]);
    let found = find_reference(&ledger, &reference(), &limit(2), &CancelToken::new()).unwrap();
    assert_eq!(found.signature, signature(2));
    assert_eq!(ledger.history_calls(), 2);
}

#[test]
fn client_uses_configured_page_size() {
    let transport = |_: &ProviderRequest| {
        Err::<ProviderResponse, _>(TransportError::Network("unused".to_string()))
    };
    let ledger = StubLedger::with_pages(vec![
        vec![signature(8), signature(7), signature(6)],
        vec![signature(5)],
    ]);
    let client = ActionClient::new(transport, ledger, Ed25519Verifier).with_history_limit(3);

    let found = client
        .find_reference(&reference(), &HistoryOptions::default(), &CancelToken::new())
        .unwrap();
    assert_eq!(found.signature, signature(5));
    assert_eq!(client.ledger().history_calls(), 2);
}
