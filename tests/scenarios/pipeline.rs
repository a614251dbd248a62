use solana_actions::crypto::Ed25519Verifier;
use solana_actions::services::provider::{ProviderRequest, ProviderResponse, TransportError};
use solana_actions::types::ActionPostRequest;
use rstest::rstest;
use solana_actions::wire::{
    Pubkey, Signature, VersionedTransaction, WireError, transaction_to_base64,
};
use solana_actions::{
    ActionClient, ActionRequestFields, CancelToken, Commitment, ErrorKind, FetchError,
    VerifyError, fetch_transaction, serialize_transaction,
};
use url::Url;

use crate::support::{
    LATEST_BLOCKHASH, PROVIDER_BLOCKHASH, StubLedger, legacy_mut, message, pubkey, sign,
    signing_key,
};

fn verify(
    envelope: &VersionedTransaction,
    account: &Pubkey,
    ledger: &StubLedger,
) -> Result<VersionedTransaction, VerifyError> {
    serialize_transaction(
        ledger,
        &Ed25519Verifier,
        account,
        &transaction_to_base64(envelope).unwrap(),
        Commitment::Confirmed,
        &CancelToken::new(),
    )
    .map(|assembled| assembled.into_envelope())
}

#[test]
fn tampered_message_fails_signature_check() {
    let payer = signing_key(1);
    let envelope = sign(message(&[pubkey(&payer)], Pubkey::new_from_array([9; 32])), &[&payer]);
    let signed_len = envelope.message.serialize().len();

    // Every instruction-data byte is covered by the signature.
    for offset in 1..=12 {
        let mut tampered = envelope.clone();
        let data = &mut legacy_mut(&mut tampered.message).instructions[0].data;
        let index = data.len() - (offset % data.len()) - 1;
        data[index] ^= 0x01;
        assert_eq!(tampered.message.serialize().len(), signed_len);

        let result = verify(&tampered, &pubkey(&payer), &StubLedger::default());
        assert_eq!(
            result,
            Err(VerifyError::InvalidSignature {
                index: 0,
                signer: pubkey(&payer)
            })
        );
    }

    let mut tampered = envelope;
    legacy_mut(&mut tampered.message).account_keys[1] = Pubkey::new_from_array([0x44; 32]);
    let error = verify(&tampered, &pubkey(&payer), &StubLedger::default()).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Verification);
}

#[test]
fn sole_signer_gets_fresh_blockhash() {
    let payer = signing_key(1);
    let envelope = sign(message(&[pubkey(&payer)], Pubkey::new_from_array([9; 32])), &[&payer]);
    let ledger = StubLedger::default();

    let assembled = verify(&envelope, &pubkey(&payer), &ledger).unwrap();
    assert_eq!(*assembled.message.recent_blockhash(), LATEST_BLOCKHASH);
    assert_eq!(assembled.signatures, envelope.signatures);
    assert_eq!(*ledger.blockhash_calls.lock().unwrap(), 1);
}

#[test]
fn single_signature_for_someone_else_keeps_blockhash() {
    let payer = signing_key(1);
    let envelope = sign(message(&[pubkey(&payer)], Pubkey::new_from_array([9; 32])), &[&payer]);
    let ledger = StubLedger::default();

    let assembled = verify(&envelope, &pubkey(&signing_key(5)), &ledger).unwrap();
    assert_eq!(*assembled.message.recent_blockhash(), PROVIDER_BLOCKHASH);
    assert_eq!(*ledger.blockhash_calls.lock().unwrap(), 0);
}

#[test]
fn two_signers_keep_provider_blockhash() {
    let payer = signing_key(1);
    let partner = signing_key(2);
    let envelope = sign(
        message(&[pubkey(&payer), pubkey(&partner)], Pubkey::new_from_array([9; 32])),
        &[&payer, &partner],
    );
    let ledger = StubLedger::default();

    let assembled = verify(&envelope, &pubkey(&payer), &ledger).unwrap();
    assert_eq!(*assembled.message.recent_blockhash(), PROVIDER_BLOCKHASH);
    assert_eq!(assembled.signatures, envelope.signatures);
    assert_eq!(*ledger.blockhash_calls.lock().unwrap(), 0);
}

#[test]
fn payer_demoted_to_non_signer_is_rejected() {
    let payer = signing_key(1);
    let mut unsigned = message(&[pubkey(&payer)], Pubkey::new_from_array([9; 32]));
    // No signer is required, yet a signature is attached.
    let legacy = legacy_mut(&mut unsigned);
    legacy.header.num_required_signatures = 0;
    legacy.header.num_readonly_unsigned_accounts = 0;
    let envelope = sign(unsigned, &[&payer]);

    let error = verify(&envelope, &pubkey(&payer), &StubLedger::default()).unwrap_err();
    assert!(matches!(error, VerifyError::Decode(WireError::Sanitize(_))));
    assert_eq!(error.kind(), ErrorKind::Response);
}

#[rstest]
#[case::no_slots(Vec::new())]
#[case::zero_filled_slot(vec![Signature::default()])]
fn provider_template_flows_through_client(#[case] signatures: Vec<Signature>) {
    let account = pubkey(&signing_key(7));
    let reference = Pubkey::new_from_array([9; 32]);
    let template = transaction_to_base64(&VersionedTransaction {
        signatures,
        message: message(&[Pubkey::default()], reference),
    })
    .unwrap();

    let transport = move |request: &ProviderRequest| {
        assert_eq!(request.url.as_str(), "https://actions.alice.com/donate");
        let body = serde_json::json!({"transaction": template, "message": "Thanks!"});
        Ok::<_, TransportError>(ProviderResponse::new(200, body.to_string()))
    };
    let client = ActionClient::new(transport, StubLedger::default(), Ed25519Verifier)
        .with_commitment(Commitment::Finalized);

    let fields = solana_actions::codec::parse_url_str(
        "solana-action:https://actions.alice.com/donate?label=wonderland&message=the_builder",
    )
    .unwrap()
    .into_action();
    let fetched = client
        .fetch_transaction(&fields, &account, &CancelToken::new())
        .unwrap();

    assert_eq!(fetched.message.as_deref(), Some("Thanks!"));
    assert_eq!(fetched.transaction.fee_payer(), Some(&account));
    assert_eq!(fetched.transaction.recent_blockhash(), &LATEST_BLOCKHASH);
    let slots = fetched.transaction.signature_slots();
    assert_eq!(slots.len(), 1);
    assert_eq!(slots[0].signer, account);
    assert_eq!(slots[0].signature, None);
    assert!(
        fetched
            .transaction
            .envelope()
            .message
            .static_account_keys()
            .contains(&reference)
    );
}

#[test]
fn partner_signed_transaction_leaves_account_slot_open() {
    let partner = signing_key(2);
    let account = pubkey(&signing_key(7));
    let mut envelope = sign(
        message(&[pubkey(&partner), account], Pubkey::new_from_array([9; 32])),
        &[&partner],
    );
    envelope.signatures.push(Signature::default());
    let ledger = StubLedger::default();

    let assembled = verify(&envelope, &account, &ledger).unwrap();
    assert_eq!(assembled.signatures, envelope.signatures);
    assert_eq!(*assembled.message.recent_blockhash(), PROVIDER_BLOCKHASH);
    assert_eq!(*ledger.blockhash_calls.lock().unwrap(), 0);
}

#[test]
fn forged_cosignature_is_reported_through_fetch() {
    let payer = signing_key(1);
    let partner = signing_key(2);
    let envelope = sign(
        message(&[pubkey(&payer), pubkey(&partner)], Pubkey::new_from_array([9; 32])),
        &[&payer, &signing_key(3)],
    );
    let payload =
        serde_json::json!({"transaction": transaction_to_base64(&envelope).unwrap()}).to_string();
    let transport = move |_: &ProviderRequest| {
        Ok::<_, TransportError>(ProviderResponse::new(200, payload.clone()))
    };

    let result = fetch_transaction(
        &transport,
        &StubLedger::default(),
        &Ed25519Verifier,
        &ActionRequestFields::new(Url::parse("https://a.io/x").unwrap()),
        &ActionPostRequest::new(&pubkey(&payer)),
        Commitment::Confirmed,
        &CancelToken::new(),
    );
    let error = result.unwrap_err();
    assert_eq!(
        error,
        FetchError::Verify(VerifyError::InvalidSignature {
            index: 1,
            signer: pubkey(&partner)
        })
    );
    assert_eq!(error.kind(), ErrorKind::Verification);
}

#[test]
fn cancelled_fetch_never_reaches_provider() {
    let transport = |_: &ProviderRequest| -> Result<ProviderResponse, TransportError> {
        panic!("provider must not be called after cancellation")
    };
    let cancel = CancelToken::new();
    cancel.cancel();
    let result = fetch_transaction(
        &transport,
        &StubLedger::default(),
        &Ed25519Verifier,
        &ActionRequestFields::new(Url::parse("https://a.io/x").unwrap()),
        &ActionPostRequest::new(&Pubkey::new_from_array([1; 32])),
        Commitment::Confirmed,
        &cancel,
    );
    assert_eq!(result.unwrap_err().kind(), ErrorKind::Cancelled);
}
