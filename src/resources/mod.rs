// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Desired shape of the resources managed for a Hello.

pub mod builders;
pub mod labels;
pub mod patch;

pub use builders::{build_endpoint, build_workload, Desired, ReconcileWarning};
pub use labels::labels;
pub use patch::WorkloadPatch;
