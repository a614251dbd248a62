/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Failure categories shared by every error type in the crate.
//!
//! Each module keeps its own error enum with precise variants; `kind()` on
//! those enums folds them into one of these categories so callers can decide
//! on retries or user messaging without matching every variant.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// URL scheme is not a recognized Action protocol.
    Protocol,
    /// Malformed URL, missing wrapper parameter, non-HTTPS link.
    Codec,
    /// Transport failure talking to a provider or the ledger.
    Network,
    /// Provider answered without a usable payload.
    Response,
    /// Transaction failed fee payer, blockhash or signature checks.
    Verification,
    /// No history references the key.
    Locator,
    Cancelled,
    Config,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Protocol => "protocol",
            Self::Codec => "codec",
            Self::Network => "network",
            Self::Response => "response",
            Self::Verification => "verification",
            Self::Locator => "locator",
            Self::Cancelled => "cancelled",
            Self::Config => "config",
        };
        f.write_str(name)
    }
}
