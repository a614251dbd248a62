/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use solana_message::VersionedMessage;
use solana_pubkey::Pubkey;
use solana_signature::Signature;

use crate::WireError;

/// An all-zero signature marks a slot nobody has filled yet.
pub fn is_empty_signature(signature: &Signature) -> bool {
    *signature == Signature::default()
}

/// Parses a base58 account address, keeping the error in the wire vocabulary.
pub fn parse_pubkey(text: &str) -> Result<Pubkey, WireError> {
    text.parse().map_err(|error| WireError::InvalidKey {
        kind: "public key",
        reason: format!("{error}"),
    })
}

/// Accessors shared by legacy and v0 messages.
pub trait MessageExt {
    /// The fee payer is the first static account key.
    fn fee_payer(&self) -> Option<&Pubkey>;

    /// Keys whose signatures the header requires, in slot order.
    fn signer_keys(&self) -> &[Pubkey];

    fn static_account_keys_mut(&mut self) -> &mut Vec<Pubkey>;

    fn set_fee_payer(&mut self, fee_payer: Pubkey) -> Result<(), WireError> {
        let slot = self
            .static_account_keys_mut()
            .first_mut()
            .ok_or(WireError::MissingFeePayer)?;
        *slot = fee_payer;
        Ok(())
    }
}

impl MessageExt for VersionedMessage {
    fn fee_payer(&self) -> Option<&Pubkey> {
        self.static_account_keys().first()
    }

    fn signer_keys(&self) -> &[Pubkey] {
        let keys = self.static_account_keys();
        let required = usize::from(self.header().num_required_signatures);
        &keys[..required.min(keys.len())]
    }

    fn static_account_keys_mut(&mut self) -> &mut Vec<Pubkey> {
        match self {
            Self::Legacy(message) => &mut message.account_keys,
            Self::V0(message) => &mut message.account_keys,
        }
    }
}
