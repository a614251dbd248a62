/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Finds the oldest transaction that carries a reference key.

use crate::cancel::{CancelToken, Cancelled};
use crate::error::ErrorKind;
use crate::services::ledger::{HistoryOptions, Ledger, LedgerError, SignatureInfo};
use crate::types::Reference;

/// Page size used when the caller does not set one; also the ledger's maximum.
pub const DEFAULT_HISTORY_LIMIT: usize = 1000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocatorError {
    NotFound,
    Ledger(LedgerError),
    Cancelled,
}

impl LocatorError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound => ErrorKind::Locator,
            Self::Ledger(error) => error.kind(),
            Self::Cancelled => ErrorKind::Cancelled,
        }
    }
}

impl From<LedgerError> for LocatorError {
    fn from(error: LedgerError) -> Self {
        match error {
            LedgerError::Cancelled => Self::Cancelled,
            other => Self::Ledger(other),
        }
    }
}

impl From<Cancelled> for LocatorError {
    fn from(_: Cancelled) -> Self {
        Self::Cancelled
    }
}

impl std::fmt::Display for LocatorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound => write!(f, "not found"),
            Self::Ledger(error) => write!(f, "{error}"),
            Self::Cancelled => write!(f, "reference lookup cancelled"),
        }
    }
}

impl std::error::Error for LocatorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Ledger(error) => Some(error),
            _ => None,
        }
    }
}

/// Walk `reference`'s history backwards, one page at a time, and return the
/// oldest entry.
///
/// A page shorter than the limit ends the walk. Only an empty first page is
/// `NotFound`; an empty later page ends the walk with the oldest entry seen.
pub fn find_reference<L>(
    ledger: &L,
    reference: &Reference,
    options: &HistoryOptions,
    cancel: &CancelToken,
) -> Result<SignatureInfo, LocatorError>
where
    L: Ledger + ?Sized,
{
    let limit = options
        .limit
        .filter(|limit| *limit > 0)
        .unwrap_or(DEFAULT_HISTORY_LIMIT);
    let mut request = HistoryOptions {
        limit: Some(limit),
        ..options.clone()
    };
    let mut oldest: Option<SignatureInfo> = None;
    let mut pages = 0_usize;

    loop {
        cancel.check()?;
        let page = ledger.signatures_for_address(reference.pubkey(), &request, cancel)?;
        cancel.check()?;
        pages += 1;

        let page_len = page.len();
        let Some(candidate) = page.into_oldest() else {
            return oldest.ok_or(LocatorError::NotFound);
        };
        // A ledger that ignores `before` would hand back the same page forever.
        if request.before == Some(candidate.signature) {
            log::debug!("history cursor for {reference} did not advance; stopping");
            return oldest.ok_or(LocatorError::NotFound);
        }
        log::debug!("page {pages} for {reference}: {page_len} entries");

        request.before = Some(candidate.signature);
        oldest = Some(candidate);
        if page_len < limit {
            break;
        }
    }

    let oldest = oldest.ok_or(LocatorError::NotFound)?;
    log::info!(
        "oldest transaction for {reference} is {} after {pages} page(s)",
        oldest.signature
    );
    Ok(oldest)
}
