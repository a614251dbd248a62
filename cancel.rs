/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Cooperative cancellation for blocking network sequences.

use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;

/// Shared [`CancellationToken`] with an optional deadline.
///
/// Clones observe the same token; children see their parent's cancellation
/// but not the reverse. Operations check the token before every
/// request and after every response; a blocking HTTP call already in flight is
/// bounded by [`CancelToken::request_timeout`] rather than interrupted.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            token: CancellationToken::new(),
            deadline: Instant::now().checked_add(timeout),
        }
    }

    /// Child token for one operation. Cancelling the child leaves the parent
    /// running; the child's deadline never outlives the parent's.
    pub fn child_with_timeout(&self, timeout: Duration) -> Self {
        let deadline = Instant::now().checked_add(timeout);
        Self {
            token: self.token.child_token(),
            deadline: match (self.deadline, deadline) {
                (Some(parent), Some(child)) => Some(parent.min(child)),
                (parent, child) => parent.or(child),
            },
        }
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
            || self
                .deadline
                .is_some_and(|deadline| Instant::now() >= deadline)
    }

    pub fn check(&self) -> Result<(), Cancelled> {
        if self.is_cancelled() {
            Err(Cancelled)
        } else {
            Ok(())
        }
    }

    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    /// Per-request timeout: `default`, shortened to whatever is left before
    /// the deadline.
    pub fn request_timeout(&self, default: Duration) -> Duration {
        match self.remaining() {
            Some(remaining) => default.min(remaining),
            None => default,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cancelled;

impl std::fmt::Display for Cancelled {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "operation cancelled")
    }
}

impl std::error::Error for Cancelled {}
