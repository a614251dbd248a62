/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Client engine for the Solana Actions URL protocol.
//!
//! Three pieces carry the logic:
//! - [`codec`] converts between Action/blink URLs and their structured fields.
//! - [`pipeline`] fetches a transaction from an action provider and verifies it
//!   before it is handed to a local signer.
//! - [`locator`] walks an address's signature history to find the oldest
//!   transaction carrying a reference key.
//!
//! Network collaborators live in [`services`] behind traits so callers can swap
//! in their own transport or ledger client.

pub mod cancel;
pub mod client;
pub mod codec;
pub mod config;
pub mod crypto;
pub mod error;
pub mod locator;
pub mod pipeline;
pub mod registries;
pub mod services;
pub mod types;

pub use actions_wire as wire;

pub use cancel::{CancelToken, Cancelled};
pub use client::ActionClient;
pub use codec::{ActionRequestFields, ActionUrl, BlinkFields, CodecError};
pub use config::{ActionsConfig, ConfigError};
pub use error::ErrorKind;
pub use locator::{LocatorError, find_reference};
pub use pipeline::{
    AssembledTransaction, FetchError, FetchedTransaction, SignatureSlot, VerifyError,
    fetch_transaction, serialize_transaction,
};
pub use registries::protocol::ProtocolScheme;
pub use services::ledger::{Commitment, HistoryOptions, HistoryPage, Ledger, SignatureInfo};
pub use services::provider::ProviderTransport;
pub use types::Reference;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
