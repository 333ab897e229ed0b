// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Drift correction for the managed Deployment.

use crate::error::Result;
use crate::kubernetes::{ObjectKey, ObjectStore};
use crate::resources::patch::{plan_workload_drift, WorkloadTarget};
use crate::resources::WorkloadPatch;
use k8s_openapi::api::apps::v1::Deployment;
use tracing::{debug, info, instrument};

/// Bring the replica count and image of the stored workload in line with
/// `target`.
///
/// The patches are planned against the stored object, then each drifted field
/// is written with its own update, replicas first. Every patch is applied to
/// the object returned by the previous update, so later writes carry the fresh
/// `resourceVersion`. Any failure stops the pass; a field left behind is picked
/// up by the next reconciliation.
#[instrument(skip(store, key, target), fields(key = %key))]
pub async fn correct_workload<S>(
    store: &S,
    key: &ObjectKey,
    target: &WorkloadTarget,
) -> Result<Vec<WorkloadPatch>>
where
    S: ObjectStore<Deployment> + ?Sized,
{
    let mut current = store.get(key).await?;
    let plan = plan_workload_drift(&current, target)?;
    if plan.is_empty() {
        debug!("Deployment {} has no drift", key);
        return Ok(plan);
    }

    let mut applied = Vec::with_capacity(plan.len());
    for patch in plan {
        current = write_patch(store, &current, patch, &mut applied).await?;
    }

    Ok(applied)
}

async fn write_patch<S>(
    store: &S,
    current: &Deployment,
    patch: WorkloadPatch,
    applied: &mut Vec<WorkloadPatch>,
) -> Result<Deployment>
where
    S: ObjectStore<Deployment> + ?Sized,
{
    let updated = store.update(&patch.apply(current)?).await?;
    info!("Updated Deployment {}", patch);
    applied.push(patch);
    Ok(updated)
}
