// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Scoped connection handling.
//!
//! [`ScopedConnection`] owns a transport for the duration of one unit of work:
//! it connects, runs a body against the connected transport, and disconnects
//! on every exit path. An optional deadline bounds connect plus body.
//!
//! # Outcome rules
//!
//! | connect | body  | disconnect | result              |
//! |---------|-------|------------|---------------------|
//! | err     | -     | skipped    | connect error       |
//! | ok      | ok    | ok         | body value          |
//! | ok      | ok    | err        | disconnect error    |
//! | ok      | err   | ok         | body error          |
//! | ok      | err   | err        | body error (logged) |

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use tokio::time::Instant;

use crate::error::{OpcUaError, OpcUaResult};

use super::transport::OpcUaTransport;

/// Boxed future returned by a scoped body.
pub type ScopeFuture<'a, R> = Pin<Box<dyn Future<Output = OpcUaResult<R>> + Send + 'a>>;

// =============================================================================
// ScopedConnection
// =============================================================================

/// A transport that is connected only while a body runs.
#[derive(Debug)]
pub struct ScopedConnection<T: OpcUaTransport> {
    transport: T,
    deadline: Option<Duration>,
}

impl<T: OpcUaTransport> ScopedConnection<T> {
    /// Wraps a (disconnected) transport.
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            deadline: None,
        }
    }

    /// Bounds connect plus body by `deadline`.
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Sets or clears the deadline.
    pub fn with_optional_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.deadline = deadline;
        self
    }

    /// Returns the configured deadline.
    pub fn deadline(&self) -> Option<Duration> {
        self.deadline
    }

    /// Returns the wrapped transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Consumes the scope and returns the transport.
    pub fn into_inner(self) -> T {
        self.transport
    }

    /// Connects, runs `body`, and disconnects.
    ///
    /// The body receives a shared reference to the connected transport and
    /// must not hold it past its own future. Disconnect is attempted even when
    /// the body fails or the deadline expires.
    pub async fn run<R, F>(&mut self, body: F) -> OpcUaResult<R>
    where
        F: for<'a> FnOnce(&'a T) -> ScopeFuture<'a, R>,
    {
        let budget = self.deadline;
        let expires_at = budget.map(|d| Instant::now() + d);
        let endpoint = self.transport.endpoint().to_string();

        tracing::debug!(endpoint = %endpoint, deadline = ?budget, "Opening scoped connection");

        let connected = bounded(expires_at, budget, self.transport.connect()).await;
        if let Err(e) = connected {
            // A timed-out connect may still have left a half-open session.
            if self.transport.is_connected() {
                if let Err(d) = self.transport.disconnect().await {
                    d.log("scoped connection cleanup after failed connect");
                }
            }
            return Err(e);
        }

        let outcome = bounded(expires_at, budget, body(&self.transport)).await;
        let released = self.transport.disconnect().await;

        tracing::debug!(
            endpoint = %endpoint,
            body_ok = outcome.is_ok(),
            disconnect_ok = released.is_ok(),
            "Closed scoped connection"
        );

        match (outcome, released) {
            (Ok(value), Ok(())) => Ok(value),
            (Ok(_), Err(d)) => Err(d),
            (Err(e), Ok(())) => Err(e),
            (Err(e), Err(d)) => {
                d.log("scoped connection disconnect");
                Err(e)
            }
        }
    }
}

/// Awaits `fut`, failing with a deadline error once `expires_at` passes.
async fn bounded<R>(
    expires_at: Option<Instant>,
    budget: Option<Duration>,
    fut: impl Future<Output = OpcUaResult<R>>,
) -> OpcUaResult<R> {
    match (expires_at, budget) {
        (Some(at), Some(d)) => match tokio::time::timeout_at(at, fut).await {
            Ok(result) => result,
            Err(_) => Err(OpcUaError::deadline_exceeded(d)),
        },
        _ => fut.await,
    }
}
