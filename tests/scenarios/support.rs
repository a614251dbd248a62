use std::sync::Mutex;

use ed25519_dalek::{Signer, SigningKey};
use solana_actions::services::ledger::LedgerError;
use solana_actions::wire::{
    CompiledInstruction, Hash, Message, MessageHeader, Pubkey, Signature, VersionedMessage,
    VersionedTransaction,
};
use solana_actions::{CancelToken, Commitment, HistoryOptions, HistoryPage, Ledger, SignatureInfo};

pub(crate) const PROVIDER_BLOCKHASH: Hash = Hash::new_from_array([0x11; 32]);
pub(crate) const LATEST_BLOCKHASH: Hash = Hash::new_from_array([0x22; 32]);

pub(crate) fn signing_key(seed: u8) -> SigningKey {
    SigningKey::from_bytes(&[seed; 32])
}

pub(crate) fn pubkey(key: &SigningKey) -> Pubkey {
    Pubkey::new_from_array(key.verifying_key().to_bytes())
}

pub(crate) fn signature(n: u8) -> Signature {
    Signature::from([n; 64])
}

/// Transfer-shaped message: `signers` first, then a recipient, a reference
/// tag and the program id.
pub(crate) fn message(signers: &[Pubkey], reference: Pubkey) -> VersionedMessage {
    let mut account_keys = signers.to_vec();
    account_keys.push(Pubkey::new_from_array([0x33; 32]));
    account_keys.push(reference);
    account_keys.push(Pubkey::default());
    let program = (account_keys.len() - 1) as u8;
    VersionedMessage::Legacy(Message {
        header: MessageHeader {
            num_required_signatures: signers.len() as u8,
            num_readonly_signed_accounts: 0,
            num_readonly_unsigned_accounts: 2,
        },
        account_keys,
        recent_blockhash: PROVIDER_BLOCKHASH,
        instructions: vec![CompiledInstruction {
            program_id_index: program,
            accounts: vec![0, program - 2, program - 1],
            data: vec![2, 0, 0, 0, 0x40, 0x42, 0x0f, 0, 0, 0, 0, 0],
        }],
    })
}

/// The legacy message built by [`message`].
pub(crate) fn legacy_mut(message: &mut VersionedMessage) -> &mut Message {
    match message {
        VersionedMessage::Legacy(message) => message,
        VersionedMessage::V0(_) => panic!("scenario messages are legacy"),
    }
}

pub(crate) fn sign(message: VersionedMessage, keys: &[&SigningKey]) -> VersionedTransaction {
    let bytes = message.serialize();
    VersionedTransaction {
        signatures: keys
            .iter()
            .map(|key| Signature::from(key.sign(&bytes).to_bytes()))
            .collect(),
        message,
    }
}

/// Ledger double: serves canned history pages in order and a fixed blockhash,
/// recording every history request.
#[derive(Default)]
pub(crate) struct StubLedger {
    pages: Mutex<Vec<Vec<Signature>>>,
    pub(crate) requests: Mutex<Vec<HistoryOptions>>,
    pub(crate) blockhash_calls: Mutex<usize>,
}

impl StubLedger {
    pub(crate) fn with_pages(pages: Vec<Vec<Signature>>) -> Self {
        let mut pages = pages;
        pages.reverse();
        Self {
            pages: Mutex::new(pages),
            ..Self::default()
        }
    }

    pub(crate) fn history_calls(&self) -> usize {
        self.requests.lock().map(|requests| requests.len()).unwrap_or(0)
    }
}

impl Ledger for StubLedger {
    fn signatures_for_address(
        &self,
        _: &Pubkey,
        options: &HistoryOptions,
        _: &CancelToken,
    ) -> Result<HistoryPage, LedgerError> {
        self.requests.lock().unwrap().push(options.clone());
        let page = self.pages.lock().unwrap().pop().unwrap_or_default();
        Ok(HistoryPage::new(
            page.into_iter()
                .enumerate()
                .map(|(slot, signature)| SignatureInfo::new(signature, slot as u64))
                .collect(),
        ))
    }

    fn latest_blockhash(&self, _: Commitment, _: &CancelToken) -> Result<Hash, LedgerError> {
        *self.blockhash_calls.lock().unwrap() += 1;
        Ok(LATEST_BLOCKHASH)
    }
}
