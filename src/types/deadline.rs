//! Per-call deadline.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;

use crate::{Error, Result};

/// Absolute deadline shared by every step of one gateway call.
///
/// The deadline is fixed when the call starts; resolution and the RPC draw
/// from the same budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    at: Instant,
    budget: Duration,
}

impl Deadline {
    /// Creates a deadline `budget` from now.
    pub fn after(budget: Duration) -> Self {
        Self {
            at: Instant::now() + budget,
            budget,
        }
    }

    /// Returns the instant the deadline expires.
    #[inline]
    pub fn at(&self) -> Instant {
        self.at
    }

    /// Returns the total budget the deadline was created with.
    #[inline]
    pub fn budget(&self) -> Duration {
        self.budget
    }

    /// Returns the time left, or zero once expired.
    pub fn remaining(&self) -> Duration {
        self.at.saturating_duration_since(Instant::now())
    }

    /// Returns `true` once the deadline has passed.
    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.at
    }

    /// Runs a fallible operation, failing with a timeout error when the
    /// deadline passes first.
    pub async fn run<F, T>(self, operation: &str, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        match tokio::time::timeout_at(self.at, fut).await {
            Ok(result) => result,
            Err(_) => Err(self.elapsed(operation)),
        }
    }

    /// Waits for an infallible future, failing with a timeout error when the
    /// deadline passes first.
    pub async fn wait<F>(self, operation: &str, fut: F) -> Result<F::Output>
    where
        F: Future,
    {
        tokio::time::timeout_at(self.at, fut)
            .await
            .map_err(|_| self.elapsed(operation))
    }

    fn elapsed(&self, operation: &str) -> Error {
        Error::timeout(format!("{operation} exceeded the {:?} deadline", self.budget))
    }
}
