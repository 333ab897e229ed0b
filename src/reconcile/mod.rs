// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Reconciliation core: ensure managed resources exist and correct their drift.

pub mod drift;
pub mod ensure;
pub mod outcome;
pub mod reconciler;

pub use ensure::Ensured;
pub use outcome::{Outcome, Phase, ReconcileError, ReconcileReport};
pub use reconciler::{Reconciler, Stores};
