/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Transaction envelope helpers for Solana Actions clients.
//!
//! Key, message and transaction types come from the Solana SDK crates. This
//! crate adds the strict base64 envelope codec a client applies to
//! provider-built transactions and the few message accessors it needs to
//! inspect and re-anchor them.

mod error;
mod message;
mod transaction;

pub use error::WireError;
pub use message::{MessageExt, is_empty_signature, parse_pubkey};
pub use solana_hash::Hash;
pub use solana_message::compiled_instruction::CompiledInstruction;
pub use solana_message::v0;
pub use solana_message::{Message, MessageHeader, VersionedMessage};
pub use solana_pubkey::Pubkey;
pub use solana_signature::Signature;
pub use solana_transaction::versioned::VersionedTransaction;
pub use transaction::{
    MAX_TRANSACTION_SIZE, TransactionExt, decode_transaction, encode_transaction,
    transaction_from_base64, transaction_to_base64,
};
