/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Facade bundling a provider transport, a ledger and a signature verifier.

use actions_wire::Pubkey;

use crate::cancel::CancelToken;
use crate::codec::ActionRequestFields;
use crate::config::{ActionsConfig, ConfigError};
use crate::crypto::{Ed25519Verifier, SignatureVerifier};
use crate::locator::{self, LocatorError};
use crate::pipeline::{self, AssembledTransaction, FetchError, FetchedTransaction, VerifyError};
use crate::services::ledger::{Commitment, HistoryOptions, JsonRpcLedger, Ledger, SignatureInfo};
use crate::services::provider::{HttpTransport, ProviderTransport};
use crate::types::{ActionGetResponse, ActionPostRequest, Reference};

pub struct ActionClient<T = HttpTransport, L = JsonRpcLedger, V = Ed25519Verifier> {
    transport: T,
    ledger: L,
    verifier: V,
    commitment: Commitment,
    history_limit: usize,
}

impl ActionClient {
    /// HTTP transport, JSON-RPC ledger and Ed25519 verification, configured
    /// from `config`.
    pub fn from_config(config: &ActionsConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let transport = HttpTransport::new(config.request_timeout())
            .map_err(|error| ConfigError::Client(error.to_string()))?;
        let ledger = JsonRpcLedger::new(config.rpc_url()?, config.request_timeout())
            .map_err(|error| ConfigError::Client(error.to_string()))?;
        Ok(Self::new(transport, ledger, Ed25519Verifier)
            .with_commitment(config.commitment)
            .with_history_limit(config.history_page_limit))
    }
}

impl<T, L, V> ActionClient<T, L, V>
where
    T: ProviderTransport,
    L: Ledger,
    V: SignatureVerifier,
{
    pub fn new(transport: T, ledger: L, verifier: V) -> Self {
        Self {
            transport,
            ledger,
            verifier,
            commitment: Commitment::default(),
            history_limit: locator::DEFAULT_HISTORY_LIMIT,
        }
    }

    pub fn with_commitment(mut self, commitment: Commitment) -> Self {
        self.commitment = commitment;
        self
    }

    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    pub fn commitment(&self) -> Commitment {
        self.commitment
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn metadata(
        &self,
        fields: &ActionRequestFields,
        cancel: &CancelToken,
    ) -> Result<ActionGetResponse, FetchError> {
        pipeline::fetch_metadata(&self.transport, fields, cancel)
    }

    pub fn fetch_transaction(
        &self,
        fields: &ActionRequestFields,
        account: &Pubkey,
        cancel: &CancelToken,
    ) -> Result<FetchedTransaction, FetchError> {
        pipeline::fetch_transaction(
            &self.transport,
            &self.ledger,
            &self.verifier,
            fields,
            &ActionPostRequest::new(account),
            self.commitment,
            cancel,
        )
    }

    pub fn serialize_transaction(
        &self,
        account: &Pubkey,
        transaction: &str,
        cancel: &CancelToken,
    ) -> Result<AssembledTransaction, VerifyError> {
        pipeline::serialize_transaction(
            &self.ledger,
            &self.verifier,
            account,
            transaction,
            self.commitment,
            cancel,
        )
    }

    /// Unset `limit` and `commitment` in `options` fall back to the client's.
    pub fn find_reference(
        &self,
        reference: &Reference,
        options: &HistoryOptions,
        cancel: &CancelToken,
    ) -> Result<SignatureInfo, LocatorError> {
        let options = HistoryOptions {
            limit: options.limit.or(Some(self.history_limit)),
            commitment: options.commitment.or(Some(self.commitment)),
            ..options.clone()
        };
        locator::find_reference(&self.ledger, reference, &options, cancel)
    }
}
