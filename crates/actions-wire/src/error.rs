/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

/// Errors raised while decoding or mutating a transaction envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WireError {
    InvalidBase64(String),
    Decode(String),
    Sanitize(String),
    SignatureCountMismatch { expected: usize, found: usize },
    MissingFeePayer,
    Encode(String),
    InvalidKey { kind: &'static str, reason: String },
}

impl std::fmt::Display for WireError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidBase64(reason) => write!(f, "invalid base64 transaction: {reason}"),
            Self::Decode(reason) => write!(f, "malformed transaction bytes: {reason}"),
            Self::Sanitize(reason) => write!(f, "invalid transaction message: {reason}"),
            Self::SignatureCountMismatch { expected, found } => write!(
                f,
                "header requires {expected} signatures but envelope carries {found}"
            ),
            Self::MissingFeePayer => write!(f, "message has no account keys"),
            Self::Encode(reason) => write!(f, "failed to encode transaction: {reason}"),
            Self::InvalidKey { kind, reason } => write!(f, "invalid {kind}: {reason}"),
        }
    }
}

impl std::error::Error for WireError {}
