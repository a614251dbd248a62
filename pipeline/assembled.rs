/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use actions_wire::{
    CompiledInstruction, Hash, MessageExt, Pubkey, Signature, TransactionExt,
    VersionedTransaction, WireError, encode_transaction, is_empty_signature,
    transaction_to_base64,
};

/// A transaction that passed verification and is ready for a local signer.
///
/// Only the pipeline constructs these. Every populated signature slot has
/// been checked against its signer; empty slots are left for the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledTransaction {
    envelope: VersionedTransaction,
}

/// A required signer and, if already provided, its verified signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignatureSlot {
    pub signer: Pubkey,
    pub signature: Option<Signature>,
}

impl AssembledTransaction {
    pub(crate) fn new(envelope: VersionedTransaction) -> Self {
        Self { envelope }
    }

    pub fn envelope(&self) -> &VersionedTransaction {
        &self.envelope
    }

    pub fn into_envelope(self) -> VersionedTransaction {
        self.envelope
    }

    pub fn fee_payer(&self) -> Option<&Pubkey> {
        self.envelope.message.fee_payer()
    }

    pub fn recent_blockhash(&self) -> &Hash {
        self.envelope.message.recent_blockhash()
    }

    pub fn instructions(&self) -> &[CompiledInstruction] {
        self.envelope.message.instructions()
    }

    /// One entry per required signer, in slot order. An unsigned template
    /// reports every signer with no signature.
    pub fn signature_slots(&self) -> Vec<SignatureSlot> {
        let signers = self.envelope.message.signer_keys();
        signers
            .iter()
            .enumerate()
            .map(|(index, signer)| SignatureSlot {
                signer: *signer,
                signature: self
                    .envelope
                    .signatures
                    .get(index)
                    .filter(|signature| !is_empty_signature(signature))
                    .copied(),
            })
            .collect()
    }

    /// Bytes the local signer must sign.
    pub fn signing_message(&self) -> Vec<u8> {
        self.envelope.signing_message()
    }

    pub fn serialize(&self) -> Result<Vec<u8>, WireError> {
        encode_transaction(&self.envelope)
    }

    pub fn to_base64(&self) -> Result<String, WireError> {
        transaction_to_base64(&self.envelope)
    }
}
