/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Transaction pipeline: fetch an action's transaction from its provider and
//! verify it before handing it to a local signer.

mod assembled;
mod verify;

use actions_wire::{WireError, parse_pubkey};

use crate::cancel::{CancelToken, Cancelled};
use crate::codec::ActionRequestFields;
use crate::crypto::SignatureVerifier;
use crate::error::ErrorKind;
use crate::services::ledger::{Commitment, Ledger};
use crate::services::provider::{
    ProviderRequest, ProviderResponse, ProviderTransport, TransportError,
};
use crate::types::{ActionError, ActionGetResponse, ActionPostRequest, ActionPostResponse};

pub use assembled::{AssembledTransaction, SignatureSlot};
pub use verify::{VerifyError, serialize_transaction};

/// Result of a successful [`fetch_transaction`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedTransaction {
    pub transaction: AssembledTransaction,
    /// Provider's description of the transaction, if any.
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    InvalidRequest(String),
    InvalidAccount(WireError),
    Transport(TransportError),
    HttpStatus(u16),
    /// Non-2xx answer carrying an `ActionError` body.
    Provider { status: u16, message: String },
    MissingTransaction,
    InvalidResponse(String),
    Verify(VerifyError),
    Cancelled,
}

impl FetchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidRequest(_) | Self::InvalidAccount(_) => ErrorKind::Codec,
            Self::Transport(error) => error.kind(),
            Self::HttpStatus(_) => ErrorKind::Network,
            Self::Provider { .. } | Self::MissingTransaction | Self::InvalidResponse(_) => {
                ErrorKind::Response
            }
            Self::Verify(error) => error.kind(),
            Self::Cancelled => ErrorKind::Cancelled,
        }
    }
}

impl From<TransportError> for FetchError {
    fn from(error: TransportError) -> Self {
        Self::Transport(error)
    }
}

impl From<VerifyError> for FetchError {
    fn from(error: VerifyError) -> Self {
        Self::Verify(error)
    }
}

impl From<Cancelled> for FetchError {
    fn from(_: Cancelled) -> Self {
        Self::Cancelled
    }
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidRequest(reason) => write!(f, "invalid request body: {reason}"),
            Self::InvalidAccount(error) => write!(f, "invalid account: {error}"),
            Self::Transport(error) => write!(f, "{error}"),
            Self::HttpStatus(status) => write!(f, "provider answered HTTP {status}"),
            Self::Provider { status, message } => {
                write!(f, "provider error ({status}): {message}")
            }
            Self::MissingTransaction => write!(f, "missing transaction"),
            Self::InvalidResponse(reason) => write!(f, "invalid provider response: {reason}"),
            Self::Verify(error) => write!(f, "{error}"),
            Self::Cancelled => write!(f, "fetch cancelled"),
        }
    }
}

impl std::error::Error for FetchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidAccount(error) => Some(error),
            Self::Transport(error) => Some(error),
            Self::Verify(error) => Some(error),
            _ => None,
        }
    }
}

/// GET the action's metadata.
pub fn fetch_metadata<T>(
    transport: &T,
    fields: &ActionRequestFields,
    cancel: &CancelToken,
) -> Result<ActionGetResponse, FetchError>
where
    T: ProviderTransport + ?Sized,
{
    let response = transport.send(&ProviderRequest::get(fields.link.clone()), cancel)?;
    cancel.check()?;
    ensure_success(&response)?;
    serde_json::from_slice(&response.body)
        .map_err(|error| FetchError::InvalidResponse(error.to_string()))
}

/// POST `request` to the action's link and verify the transaction it returns.
///
/// A 2xx body that is not valid JSON is treated as carrying no transaction.
pub fn fetch_transaction<T, L, V>(
    transport: &T,
    ledger: &L,
    verifier: &V,
    fields: &ActionRequestFields,
    request: &ActionPostRequest,
    commitment: Commitment,
    cancel: &CancelToken,
) -> Result<FetchedTransaction, FetchError>
where
    T: ProviderTransport + ?Sized,
    L: Ledger + ?Sized,
    V: SignatureVerifier + ?Sized,
{
    let body = serde_json::to_vec(request)
        .map_err(|error| FetchError::InvalidRequest(error.to_string()))?;
    let response = transport.send(
        &ProviderRequest::post_json(fields.link.clone(), body),
        cancel,
    )?;
    cancel.check()?;
    ensure_success(&response)?;

    let payload: ActionPostResponse =
        serde_json::from_slice(&response.body).unwrap_or_else(|error| {
            log::warn!("undecodable action response from {}: {error}", fields.link);
            ActionPostResponse::default()
        });
    if payload.transaction.trim().is_empty() {
        return Err(FetchError::MissingTransaction);
    }

    let account = parse_pubkey(&request.account).map_err(FetchError::InvalidAccount)?;
    let transaction = serialize_transaction(
        ledger,
        verifier,
        &account,
        &payload.transaction,
        commitment,
        cancel,
    )?;
    log::info!("fetched transaction from {} for {account}", fields.link);

    Ok(FetchedTransaction {
        transaction,
        message: payload.message,
    })
}

fn ensure_success(response: &ProviderResponse) -> Result<(), FetchError> {
    if response.is_success() {
        return Ok(());
    }
    Err(match serde_json::from_slice::<ActionError>(&response.body) {
        Ok(error) => FetchError::Provider {
            status: response.status,
            message: error.message,
        },
        Err(_) => FetchError::HttpStatus(response.status),
    })
}
