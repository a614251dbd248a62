/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Action URL codec.
//!
//! An Action URL is `<scheme>:<link>` where `<link>` is the provider's HTTPS
//! endpoint, percent-encoded as a whole when it carries a query. `label` and
//! `message` ride on the outer URL's query. A blink wraps an Action URL in the
//! `action` query parameter of an ordinary web link.

mod encode;
mod parse;

use std::borrow::Cow;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};
use url::Url;

use crate::error::ErrorKind;
use crate::registries::protocol::ProtocolScheme;

pub use encode::{encode_action_url, encode_blink_url};
pub use parse::{parse_url, parse_url_str};

/// Everything except the RFC 3986 unreserved characters.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionRequestFields {
    /// Absolute HTTPS endpoint of the action provider.
    pub link: Url,
    pub label: Option<String>,
    pub message: Option<String>,
}

impl ActionRequestFields {
    pub fn new(link: Url) -> Self {
        Self {
            link,
            label: None,
            message: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// A web link carrying an Action URL in its `action` query parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlinkFields {
    pub blink: Url,
    pub action: ActionRequestFields,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionUrl {
    Action(ActionRequestFields),
    Blink(BlinkFields),
}

impl ActionUrl {
    pub fn encode(&self, scheme: ProtocolScheme) -> Result<Url, CodecError> {
        match self {
            Self::Action(fields) => encode_action_url(fields, scheme),
            Self::Blink(fields) => encode_blink_url(fields, scheme),
        }
    }

    /// The Action request this URL resolves to, unwrapping blinks.
    pub fn action(&self) -> &ActionRequestFields {
        match self {
            Self::Action(fields) => fields,
            Self::Blink(fields) => &fields.action,
        }
    }

    pub fn into_action(self) -> ActionRequestFields {
        match self {
            Self::Action(fields) => fields,
            Self::Blink(fields) => fields.action,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    InvalidProtocol(String),
    MissingPathname,
    InvalidPathname,
    InvalidUrl(String),
    /// The decoded link is not HTTPS; carries the scheme found.
    InvalidLink(String),
    /// A blink base must be an http(s) URL; carries the scheme found.
    InvalidBlink(String),
    MissingActionParam,
    /// A blink's `action` parameter held another blink.
    NestedBlink,
    NestedParseFailed(Box<CodecError>),
}

impl CodecError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidProtocol(_) => ErrorKind::Protocol,
            _ => ErrorKind::Codec,
        }
    }
}

impl std::fmt::Display for CodecError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidProtocol(scheme) => write!(f, "protocol invalid: {scheme:?}"),
            Self::MissingPathname => write!(f, "pathname missing"),
            Self::InvalidPathname => write!(f, "pathname invalid"),
            Self::InvalidUrl(reason) => write!(f, "invalid url: {reason}"),
            Self::InvalidLink(scheme) => write!(f, "invalid link: expected https, got {scheme:?}"),
            Self::InvalidBlink(scheme) => {
                write!(f, "invalid blink url: expected http(s), got {scheme:?}")
            }
            Self::MissingActionParam => write!(f, "blink url has no action parameter"),
            Self::NestedBlink => write!(f, "blink url wraps another blink url"),
            Self::NestedParseFailed(inner) => write!(f, "nested action url: {inner}"),
        }
    }
}

impl std::error::Error for CodecError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::NestedParseFailed(inner) => Some(inner.as_ref()),
            _ => None,
        }
    }
}

fn escape_component(text: &str) -> String {
    utf8_percent_encode(text, COMPONENT).to_string()
}

/// Undo [`escape_component`] on a link that was escaped as a whole. A link
/// still containing `:` was never escaped and is returned untouched.
fn unescape_link(text: &str) -> Result<Cow<'_, str>, CodecError> {
    if text.contains(':') {
        return Ok(Cow::Borrowed(text));
    }
    percent_decode_str(text)
        .decode_utf8()
        .map_err(|error| CodecError::InvalidUrl(error.to_string()))
}

fn ensure_https(link: &Url) -> Result<(), CodecError> {
    if link.scheme() == crate::registries::protocol::HTTPS_PROTOCOL {
        Ok(())
    } else {
        Err(CodecError::InvalidLink(link.scheme().to_string()))
    }
}
