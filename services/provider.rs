/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! HTTP transport used to talk to action providers.
//!
//! The pipeline only needs "send this request, give me status and body", so
//! the seam is a single-method trait. Closures implement it, which keeps test
//! doubles to a line or two.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use url::Url;

use crate::cancel::{CancelToken, Cancelled};
use crate::error::ErrorKind;

const JSON_CONTENT_TYPE: &str = "application/json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderMethod {
    Get,
    Post,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderRequest {
    pub method: ProviderMethod,
    pub url: Url,
    /// JSON body; only sent with POST.
    pub body: Option<Vec<u8>>,
}

impl ProviderRequest {
    pub fn get(url: Url) -> Self {
        Self {
            method: ProviderMethod::Get,
            url,
            body: None,
        }
    }

    pub fn post_json(url: Url, body: Vec<u8>) -> Self {
        Self {
            method: ProviderMethod::Post,
            url,
            body: Some(body),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl ProviderResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    Network(String),
    Timeout,
    Body(String),
    Cancelled,
}

impl TransportError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Cancelled => ErrorKind::Cancelled,
            _ => ErrorKind::Network,
        }
    }
}

impl From<Cancelled> for TransportError {
    fn from(_: Cancelled) -> Self {
        Self::Cancelled
    }
}

impl std::fmt::Display for TransportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Network(reason) => write!(f, "network error: {reason}"),
            Self::Timeout => write!(f, "request timed out"),
            Self::Body(reason) => write!(f, "failed to read response body: {reason}"),
            Self::Cancelled => write!(f, "request cancelled"),
        }
    }
}

impl std::error::Error for TransportError {}

pub trait ProviderTransport {
    fn send(
        &self,
        request: &ProviderRequest,
        cancel: &CancelToken,
    ) -> Result<ProviderResponse, TransportError>;
}

impl<F> ProviderTransport for F
where
    F: Fn(&ProviderRequest) -> Result<ProviderResponse, TransportError>,
{
    fn send(
        &self,
        request: &ProviderRequest,
        cancel: &CancelToken,
    ) -> Result<ProviderResponse, TransportError> {
        cancel.check()?;
        self(request)
    }
}

/// Blocking `reqwest` transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    timeout: Duration,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|error| TransportError::Network(error.to_string()))?;
        Ok(Self { client, timeout })
    }

    pub fn with_client(client: Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }
}

impl ProviderTransport for HttpTransport {
    fn send(
        &self,
        request: &ProviderRequest,
        cancel: &CancelToken,
    ) -> Result<ProviderResponse, TransportError> {
        cancel.check()?;

        let builder = match request.method {
            ProviderMethod::Get => self.client.get(request.url.clone()),
            ProviderMethod::Post => self.client.post(request.url.clone()),
        };
        let mut builder = builder
            .header(ACCEPT, JSON_CONTENT_TYPE)
            .timeout(cancel.request_timeout(self.timeout));
        if let Some(body) = &request.body {
            builder = builder.header(CONTENT_TYPE, JSON_CONTENT_TYPE).body(body.clone());
        }

        log::debug!("{:?} {}", request.method, request.url);
        let response = builder.send().map_err(classify)?;
        cancel.check()?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .map_err(|error| TransportError::Body(error.to_string()))?;
        log::trace!("{} answered {status} with {} bytes", request.url, body.len());
        Ok(ProviderResponse::new(status, body.to_vec()))
    }
}

fn classify(error: reqwest::Error) -> TransportError {
    if error.is_timeout() {
        TransportError::Timeout
    } else {
        TransportError::Network(error.to_string())
    }
}
