// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Exponential requeue delays for objects whose reconciliation keeps failing.

use crate::kubernetes::ObjectKey;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

/// Tracks consecutive failures per object.
///
/// The n-th consecutive failure of an object is retried after
/// `base * 2^(n-1)`, capped at `max`. A successful pass resets the count.
#[derive(Debug)]
pub struct ErrorBackoff {
    base: Duration,
    max: Duration,
    failures: Mutex<HashMap<ObjectKey, u32>>,
}

impl ErrorBackoff {
    pub fn new(base: Duration, max: Duration) -> Self {
        Self {
            base,
            max,
            failures: Mutex::new(HashMap::new()),
        }
    }

    /// Record a failure of `key` and return how long to wait before retrying
    pub fn next_delay(&self, key: &ObjectKey) -> Duration {
        let mut failures = self.failures.lock().unwrap_or_else(PoisonError::into_inner);
        let count = failures.entry(key.clone()).or_insert(0);
        let delay = Self::delay_for(*count, self.base, self.max);
        *count = count.saturating_add(1);
        delay
    }

    pub fn reset(&self, key: &ObjectKey) {
        self.failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
    }

    /// Delay after `previous` earlier consecutive failures
    pub fn delay_for(previous: u32, base: Duration, max: Duration) -> Duration {
        base.saturating_mul(2u32.saturating_pow(previous)).min(max)
    }
}
