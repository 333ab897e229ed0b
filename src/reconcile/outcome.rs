// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::error::HelloError;
use crate::reconcile::ensure::Ensured;
use crate::resources::{ReconcileWarning, WorkloadPatch};
use std::fmt;
use thiserror::Error;

/// States of a single reconciliation pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Start,
    ParentLoaded,
    WorkloadEnsured,
    EndpointEnsured,
    DriftCorrected,
    Done,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Start => "start",
            Phase::ParentLoaded => "parent-loaded",
            Phase::WorkloadEnsured => "workload-ensured",
            Phase::EndpointEnsured => "endpoint-ensured",
            Phase::DriftCorrected => "drift-corrected",
            Phase::Done => "done",
        };
        f.write_str(name)
    }
}

/// Result of one step: carry on with a value, or end the pass early
#[derive(Debug)]
pub enum Step<T> {
    Continue(T),
    Stop(Outcome),
}

/// What a pass did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub phase: Phase,
    pub parent_found: bool,
    pub workload: Option<Ensured>,
    pub endpoint: Option<Ensured>,
    pub patches: Vec<WorkloadPatch>,
    pub warnings: Vec<ReconcileWarning>,
}

impl ReconcileReport {
    /// Number of create and update calls issued during the pass
    pub fn writes(&self) -> usize {
        let created = [self.workload, self.endpoint]
            .iter()
            .filter(|e| **e == Some(Ensured::Created))
            .count();
        created + self.patches.len()
    }

    pub(crate) fn failed(&self, source: HelloError) -> ReconcileError {
        ReconcileError {
            phase: self.phase,
            source,
        }
    }
}

/// Successful end of a pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// Whether the pass asks to be run again right away
    pub requeue: bool,
    pub report: ReconcileReport,
}

impl Outcome {
    pub fn finished(report: ReconcileReport) -> Self {
        Outcome {
            requeue: false,
            report,
        }
    }
}

/// A failed pass, with the last state it reached
#[derive(Debug, Error)]
#[error("reconcile failed in state {phase}: {source}")]
pub struct ReconcileError {
    pub phase: Phase,
    #[source]
    pub source: HelloError,
}
