/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Signature verification over serialized transaction messages.

use actions_wire::{Pubkey, Signature};
use ed25519_dalek::{Verifier, VerifyingKey};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// The public key bytes are not a valid curve point.
    MalformedKey(Pubkey),
}

impl std::fmt::Display for CryptoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MalformedKey(key) => write!(f, "malformed ed25519 public key {key}"),
        }
    }
}

impl std::error::Error for CryptoError {}

pub trait SignatureVerifier {
    /// `Ok(false)` means a well-formed signature that does not match.
    fn verify(
        &self,
        signature: &Signature,
        message: &[u8],
        key: &Pubkey,
    ) -> Result<bool, CryptoError>;
}

impl<V: SignatureVerifier + ?Sized> SignatureVerifier for &V {
    fn verify(
        &self,
        signature: &Signature,
        message: &[u8],
        key: &Pubkey,
    ) -> Result<bool, CryptoError> {
        (**self).verify(signature, message, key)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Ed25519Verifier;

impl SignatureVerifier for Ed25519Verifier {
    fn verify(
        &self,
        signature: &Signature,
        message: &[u8],
        key: &Pubkey,
    ) -> Result<bool, CryptoError> {
        let verifying_key =
            VerifyingKey::from_bytes(key.as_array()).map_err(|_| CryptoError::MalformedKey(*key))?;
        let signature = ed25519_dalek::Signature::from_bytes(&<[u8; 64]>::from(*signature));
        Ok(verifying_key.verify(message, &signature).is_ok())
    }
}
