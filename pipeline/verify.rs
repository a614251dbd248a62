/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Turns a provider-supplied transaction into one safe to hand to a signer.

use actions_wire::{
    Hash, MessageExt, Pubkey, Signature, TransactionExt, VersionedTransaction, WireError,
    is_empty_signature, transaction_from_base64,
};

use super::AssembledTransaction;
use crate::cancel::{CancelToken, Cancelled};
use crate::crypto::{CryptoError, SignatureVerifier};
use crate::error::ErrorKind;
use crate::services::ledger::{Commitment, Ledger, LedgerError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyError {
    Decode(WireError),
    MissingFeePayer,
    /// The fee payer is not the first required signer.
    FeePayerMismatch {
        fee_payer: Pubkey,
        signer: Option<Pubkey>,
    },
    MissingBlockhash,
    MissingSignature {
        index: usize,
        signer: Pubkey,
    },
    InvalidSignature {
        index: usize,
        signer: Pubkey,
    },
    /// The slot's signer is not a usable ed25519 key.
    MalformedKey {
        index: usize,
        signer: Pubkey,
    },
    Ledger(LedgerError),
    Cancelled,
}

impl VerifyError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Decode(_) => ErrorKind::Response,
            Self::Ledger(error) => error.kind(),
            Self::Cancelled => ErrorKind::Cancelled,
            _ => ErrorKind::Verification,
        }
    }
}

impl From<LedgerError> for VerifyError {
    fn from(error: LedgerError) -> Self {
        Self::Ledger(error)
    }
}

impl From<Cancelled> for VerifyError {
    fn from(_: Cancelled) -> Self {
        Self::Cancelled
    }
}

impl std::fmt::Display for VerifyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Decode(error) => write!(f, "malformed transaction: {error}"),
            Self::MissingFeePayer => write!(f, "missing fee payer"),
            Self::FeePayerMismatch { fee_payer, signer } => match signer {
                Some(signer) => write!(f, "fee payer {fee_payer} does not match signer {signer}"),
                None => write!(f, "fee payer {fee_payer} is not a required signer"),
            },
            Self::MissingBlockhash => write!(f, "missing recent blockhash"),
            Self::MissingSignature { index, signer } => {
                write!(f, "missing signature {index} for {signer}")
            }
            Self::InvalidSignature { index, signer } => {
                write!(f, "invalid signature {index} for {signer}")
            }
            Self::MalformedKey { index, signer } => {
                write!(f, "signer {index} has malformed public key {signer}")
            }
            Self::Ledger(error) => write!(f, "{error}"),
            Self::Cancelled => write!(f, "verification cancelled"),
        }
    }
}

impl std::error::Error for VerifyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Decode(error) => Some(error),
            Self::Ledger(error) => Some(error),
            _ => None,
        }
    }
}

/// Decode `transaction` (base64) and prepare it for `account` to sign.
///
/// A transaction with no signatures, or only empty (all-zero) ones, is an
/// unsigned template: it gets `account` as fee payer, one empty slot per
/// required signer and a fresh blockhash. A pre-signed transaction must name
/// its fee payer as first signer and carry a blockhash. Every filled slot must
/// verify against the slot's signer; a slot may stay empty only when it
/// belongs to `account`. When the transaction has a single slot and the fee
/// payer is `account`, the blockhash is refreshed as well. Existing
/// signatures are never dropped or reordered.
pub fn serialize_transaction<L, V>(
    ledger: &L,
    verifier: &V,
    account: &Pubkey,
    transaction: &str,
    commitment: Commitment,
    cancel: &CancelToken,
) -> Result<AssembledTransaction, VerifyError>
where
    L: Ledger + ?Sized,
    V: SignatureVerifier + ?Sized,
{
    cancel.check()?;
    let mut envelope = transaction_from_base64(transaction).map_err(VerifyError::Decode)?;

    if envelope.signatures.iter().all(is_empty_signature) {
        let required = usize::from(envelope.message.header().num_required_signatures);
        envelope.signatures.resize(required, Signature::default());
        envelope
            .message
            .set_fee_payer(*account)
            .map_err(|_| VerifyError::MissingFeePayer)?;
        refresh_blockhash(&mut envelope, ledger, commitment, cancel)?;
        return Ok(AssembledTransaction::new(envelope));
    }

    let fee_payer = verify_signatures(&envelope, account, verifier)?;
    if envelope.signatures.len() == 1 && fee_payer == *account {
        refresh_blockhash(&mut envelope, ledger, commitment, cancel)?;
    }
    Ok(AssembledTransaction::new(envelope))
}

fn verify_signatures<V>(
    envelope: &VersionedTransaction,
    account: &Pubkey,
    verifier: &V,
) -> Result<Pubkey, VerifyError>
where
    V: SignatureVerifier + ?Sized,
{
    let message = &envelope.message;
    let fee_payer = *message.fee_payer().ok_or(VerifyError::MissingFeePayer)?;

    let signers = message.signer_keys();
    if signers.first() != Some(&fee_payer) {
        log::warn!("rejecting transaction: fee payer {fee_payer} is not the first signer");
        return Err(VerifyError::FeePayerMismatch {
            fee_payer,
            signer: signers.first().copied(),
        });
    }
    if *message.recent_blockhash() == Hash::default() {
        return Err(VerifyError::MissingBlockhash);
    }
    if envelope.signatures.len() != signers.len() {
        return Err(VerifyError::Decode(WireError::SignatureCountMismatch {
            expected: signers.len(),
            found: envelope.signatures.len(),
        }));
    }

    let signing_message = envelope.signing_message();
    for (index, (signature, signer)) in envelope.signatures.iter().zip(signers).enumerate() {
        if is_empty_signature(signature) {
            if signer == account {
                continue;
            }
            return Err(VerifyError::MissingSignature {
                index,
                signer: *signer,
            });
        }
        let verified = match verifier.verify(signature, &signing_message, signer) {
            Ok(verified) => verified,
            Err(CryptoError::MalformedKey(_)) => {
                log::warn!("rejecting transaction: signer {index} key {signer} is malformed");
                return Err(VerifyError::MalformedKey {
                    index,
                    signer: *signer,
                });
            }
        };
        if !verified {
            log::warn!("rejecting transaction: signature {index} does not verify for {signer}");
            return Err(VerifyError::InvalidSignature {
                index,
                signer: *signer,
            });
        }
    }
    Ok(fee_payer)
}

fn refresh_blockhash<L>(
    envelope: &mut VersionedTransaction,
    ledger: &L,
    commitment: Commitment,
    cancel: &CancelToken,
) -> Result<(), VerifyError>
where
    L: Ledger + ?Sized,
{
    let blockhash = ledger.latest_blockhash(commitment, cancel)?;
    cancel.check()?;
    log::debug!("using blockhash {blockhash} at {commitment}");
    envelope.message.set_recent_blockhash(blockhash);
    Ok(())
}
