/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use bincode::Options;
use solana_pubkey::Pubkey;
use solana_signature::Signature;
use solana_transaction::versioned::VersionedTransaction;

use crate::{MessageExt, WireError};

/// Largest transaction the ledger accepts in a single packet.
pub const MAX_TRANSACTION_SIZE: u64 = 1232;

/// Decodes a wire transaction and checks that its message is well formed.
///
/// An envelope may arrive with no signatures at all (an unsigned template) or
/// with exactly as many slots as the header requires signers. Unfilled slots
/// hold the all-zero signature.
pub fn decode_transaction(bytes: &[u8]) -> Result<VersionedTransaction, WireError> {
    let transaction: VersionedTransaction = bincode::options()
        .with_limit(MAX_TRANSACTION_SIZE)
        .with_fixint_encoding()
        .reject_trailing_bytes()
        .deserialize(bytes)
        .map_err(|error| WireError::Decode(error.to_string()))?;
    transaction
        .message
        .sanitize()
        .map_err(|error| WireError::Sanitize(error.to_string()))?;

    let required = usize::from(transaction.message.header().num_required_signatures);
    if !transaction.signatures.is_empty() && transaction.signatures.len() != required {
        return Err(WireError::SignatureCountMismatch {
            expected: required,
            found: transaction.signatures.len(),
        });
    }
    Ok(transaction)
}

pub fn encode_transaction(transaction: &VersionedTransaction) -> Result<Vec<u8>, WireError> {
    bincode::serialize(transaction).map_err(|error| WireError::Encode(error.to_string()))
}

pub fn transaction_from_base64(text: &str) -> Result<VersionedTransaction, WireError> {
    let bytes = STANDARD
        .decode(text.trim())
        .map_err(|error| WireError::InvalidBase64(error.to_string()))?;
    decode_transaction(&bytes)
}

pub fn transaction_to_base64(transaction: &VersionedTransaction) -> Result<String, WireError> {
    encode_transaction(transaction).map(|bytes| STANDARD.encode(bytes))
}

pub trait TransactionExt {
    /// Bytes covered by every signature on the envelope.
    fn signing_message(&self) -> Vec<u8>;

    /// Pairs each signature slot with the key that owns it, if the message
    /// names one.
    fn signature_slots(&self) -> Vec<(&Signature, Option<&Pubkey>)>;
}

impl TransactionExt for VersionedTransaction {
    fn signing_message(&self) -> Vec<u8> {
        self.message.serialize()
    }

    fn signature_slots(&self) -> Vec<(&Signature, Option<&Pubkey>)> {
        let signers = self.message.signer_keys();
        self.signatures
            .iter()
            .enumerate()
            .map(|(index, signature)| (signature, signers.get(index)))
            .collect()
    }
}
