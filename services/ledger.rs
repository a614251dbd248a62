/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Ledger queries: signature history for an address and the latest blockhash.

use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use actions_wire::{Hash, Pubkey, Signature};
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::cancel::{CancelToken, Cancelled};
use crate::error::ErrorKind;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Commitment {
    Processed,
    #[default]
    Confirmed,
    Finalized,
}

impl Commitment {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Processed => "processed",
            Self::Confirmed => "confirmed",
            Self::Finalized => "finalized",
        }
    }
}

impl std::fmt::Display for Commitment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Commitment {
    type Err = String;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        match text.to_ascii_lowercase().as_str() {
            "processed" => Ok(Self::Processed),
            "confirmed" => Ok(Self::Confirmed),
            "finalized" => Ok(Self::Finalized),
            other => Err(format!("unknown commitment level {other:?}")),
        }
    }
}

/// Paging window for [`Ledger::signatures_for_address`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
    /// Start searching backwards from this signature (exclusive).
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "base58::option")]
    pub before: Option<Signature>,
    /// Stop once this signature is reached (exclusive).
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "base58::option")]
    pub until: Option<Signature>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commitment: Option<Commitment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureInfo {
    #[serde(with = "base58")]
    pub signature: Signature,
    pub slot: u64,
    /// Transaction error as reported by the ledger; `None` on success.
    #[serde(default)]
    pub err: Option<serde_json::Value>,
    #[serde(default)]
    pub memo: Option<String>,
    #[serde(default)]
    pub block_time: Option<i64>,
    #[serde(default)]
    pub confirmation_status: Option<Commitment>,
}

impl SignatureInfo {
    pub fn new(signature: Signature, slot: u64) -> Self {
        Self {
            signature,
            slot,
            err: None,
            memo: None,
            block_time: None,
            confirmation_status: None,
        }
    }

    pub fn succeeded(&self) -> bool {
        self.err.as_ref().is_none_or(serde_json::Value::is_null)
    }
}

/// One page of history, newest first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryPage {
    pub entries: Vec<SignatureInfo>,
}

impl HistoryPage {
    pub fn new(entries: Vec<SignatureInfo>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn oldest(&self) -> Option<&SignatureInfo> {
        self.entries.last()
    }

    /// Cursor for the next older page.
    pub fn cursor(&self) -> Option<Signature> {
        self.oldest().map(|info| info.signature)
    }

    pub fn into_oldest(mut self) -> Option<SignatureInfo> {
        self.entries.pop()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    Network(String),
    Timeout,
    HttpStatus(u16),
    Rpc { code: i64, message: String },
    Decode(String),
    Cancelled,
}

impl LedgerError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Cancelled => ErrorKind::Cancelled,
            Self::Decode(_) => ErrorKind::Response,
            _ => ErrorKind::Network,
        }
    }
}

impl From<Cancelled> for LedgerError {
    fn from(_: Cancelled) -> Self {
        Self::Cancelled
    }
}

impl std::fmt::Display for LedgerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Network(reason) => write!(f, "ledger unreachable: {reason}"),
            Self::Timeout => write!(f, "ledger request timed out"),
            Self::HttpStatus(status) => write!(f, "ledger answered HTTP {status}"),
            Self::Rpc { code, message } => write!(f, "rpc error {code}: {message}"),
            Self::Decode(reason) => write!(f, "malformed rpc response: {reason}"),
            Self::Cancelled => write!(f, "ledger request cancelled"),
        }
    }
}

impl std::error::Error for LedgerError {}

pub trait Ledger {
    fn signatures_for_address(
        &self,
        address: &Pubkey,
        options: &HistoryOptions,
        cancel: &CancelToken,
    ) -> Result<HistoryPage, LedgerError>;

    fn latest_blockhash(
        &self,
        commitment: Commitment,
        cancel: &CancelToken,
    ) -> Result<Hash, LedgerError>;
}

impl<L: Ledger + ?Sized> Ledger for &L {
    fn signatures_for_address(
        &self,
        address: &Pubkey,
        options: &HistoryOptions,
        cancel: &CancelToken,
    ) -> Result<HistoryPage, LedgerError> {
        (**self).signatures_for_address(address, options, cancel)
    }

    fn latest_blockhash(
        &self,
        commitment: Commitment,
        cancel: &CancelToken,
    ) -> Result<Hash, LedgerError> {
        (**self).latest_blockhash(commitment, cancel)
    }
}

/// RPC nodes exchange keys, hashes and signatures as base58 text.
mod base58 {
    use std::fmt::Display;
    use std::str::FromStr;

    use serde::{Deserialize, Deserializer, Serializer, de};

    pub(super) fn serialize<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: Display,
        S: Serializer,
    {
        serializer.collect_str(value)
    }

    pub(super) fn deserialize<'de, T, D>(deserializer: D) -> Result<T, D::Error>
    where
        T: FromStr,
        T::Err: Display,
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(de::Error::custom)
    }

    pub(super) fn option<T, S>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: Display,
        S: Serializer,
    {
        match value {
            Some(value) => serializer.collect_str(value),
            None => serializer.serialize_none(),
        }
    }
}

#[derive(Serialize)]
struct RpcRequest<'a, P> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: P,
}

#[derive(Deserialize)]
struct RpcResponse<R> {
    result: Option<R>,
    error: Option<RpcErrorObject>,
}

#[derive(Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

#[derive(Serialize)]
struct CommitmentConfig {
    commitment: Commitment,
}

#[derive(Deserialize)]
struct BlockhashValue {
    #[serde(deserialize_with = "base58::deserialize")]
    blockhash: Hash,
}

#[derive(Deserialize)]
struct WithContext<T> {
    value: T,
}

/// JSON-RPC 2.0 client for a Solana RPC node.
#[derive(Debug)]
pub struct JsonRpcLedger {
    client: Client,
    endpoint: Url,
    timeout: Duration,
    next_id: AtomicU64,
}

impl JsonRpcLedger {
    pub fn new(endpoint: Url, timeout: Duration) -> Result<Self, LedgerError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|error| LedgerError::Network(error.to_string()))?;
        Ok(Self {
            client,
            endpoint,
            timeout,
            next_id: AtomicU64::new(1),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn call<P, R>(&self, method: &str, params: P, cancel: &CancelToken) -> Result<R, LedgerError>
    where
        P: Serialize,
        R: DeserializeOwned,
    {
        cancel.check()?;
        let request = RpcRequest {
            jsonrpc: "2.0",
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            method,
            params,
        };
        let body =
            serde_json::to_vec(&request).map_err(|error| LedgerError::Decode(error.to_string()))?;

        log::debug!("rpc {method} -> {}", self.endpoint);
        let response = self
            .client
            .post(self.endpoint.clone())
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
            .timeout(cancel.request_timeout(self.timeout))
            .body(body)
            .send()
            .map_err(|error| {
                if error.is_timeout() {
                    LedgerError::Timeout
                } else {
                    LedgerError::Network(error.to_string())
                }
            })?;
        cancel.check()?;

        let status = response.status();
        if !status.is_success() {
            return Err(LedgerError::HttpStatus(status.as_u16()));
        }
        let bytes = response
            .bytes()
            .map_err(|error| LedgerError::Network(error.to_string()))?;
        decode_rpc_response(&bytes)
    }
}

fn decode_rpc_response<R: DeserializeOwned>(bytes: &[u8]) -> Result<R, LedgerError> {
    let response: RpcResponse<R> =
        serde_json::from_slice(bytes).map_err(|error| LedgerError::Decode(error.to_string()))?;
    if let Some(error) = response.error {
        return Err(LedgerError::Rpc {
            code: error.code,
            message: error.message,
        });
    }
    response
        .result
        .ok_or_else(|| LedgerError::Decode("response has neither result nor error".to_string()))
}

impl Ledger for JsonRpcLedger {
    fn signatures_for_address(
        &self,
        address: &Pubkey,
        options: &HistoryOptions,
        cancel: &CancelToken,
    ) -> Result<HistoryPage, LedgerError> {
        let entries: Vec<SignatureInfo> = self.call(
            "getSignaturesForAddress",
            (address.to_string(), options),
            cancel,
        )?;
        log::debug!("history page for {address}: {} entries", entries.len());
        Ok(HistoryPage::new(entries))
    }

    fn latest_blockhash(
        &self,
        commitment: Commitment,
        cancel: &CancelToken,
    ) -> Result<Hash, LedgerError> {
        let response: WithContext<BlockhashValue> =
            self.call("getLatestBlockhash", [CommitmentConfig { commitment }], cancel)?;
        Ok(response.value.blockhash)
    }
}
