/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Registry of URL schemes recognized as Action protocols.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::codec::CodecError;

/// Query parameter on a blink URL that carries the encoded Action URL.
pub const BLINKS_QUERY_PARAM: &str = "action";
pub const LABEL_QUERY_PARAM: &str = "label";
pub const MESSAGE_QUERY_PARAM: &str = "message";
pub const HTTPS_PROTOCOL: &str = "https";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProtocolScheme {
    /// `solana:` (Solana Pay).
    #[serde(rename = "solana")]
    Pay,
    /// `solana-action:`
    #[serde(rename = "solana-action")]
    Action,
    /// `solana-actions:`, accepted as a spelling of `solana-action:`.
    #[serde(rename = "solana-actions")]
    Actions,
}

impl ProtocolScheme {
    pub const ALL: [ProtocolScheme; 3] = [Self::Action, Self::Pay, Self::Actions];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pay => "solana",
            Self::Action => "solana-action",
            Self::Actions => "solana-actions",
        }
    }

    /// Scheme comparison is ASCII case-insensitive.
    pub fn from_scheme(scheme: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|protocol| protocol.as_str().eq_ignore_ascii_case(scheme))
    }
}

impl Default for ProtocolScheme {
    fn default() -> Self {
        Self::Action
    }
}

impl std::fmt::Display for ProtocolScheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProtocolScheme {
    type Err = CodecError;

    fn from_str(scheme: &str) -> Result<Self, Self::Err> {
        Self::from_scheme(scheme).ok_or_else(|| CodecError::InvalidProtocol(scheme.to_string()))
    }
}

pub fn is_valid_protocol(scheme: &str) -> bool {
    ProtocolScheme::from_scheme(scheme).is_some()
}
