// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Targeted field changes to a managed Deployment.

use crate::config::Config;
use crate::error::{HelloError, Result};
use crate::types::Hello;
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::Container;
use std::fmt;

const CONTAINERS_KEY: &str = ".spec.template.spec.containers[0]";

/// Values of the tracked workload fields implied by a parent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkloadTarget {
    pub replicas: i32,
    pub image: String,
}

impl WorkloadTarget {
    pub fn for_parent(hello: &Hello, config: &Config) -> Self {
        WorkloadTarget {
            replicas: hello.spec.size,
            image: hello.spec.image(&config.image_repository),
        }
    }
}

/// A single field change. Applying it yields a new Deployment and leaves the
/// input untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkloadPatch {
    Replicas { from: Option<i32>, to: i32 },
    Image { from: Option<String>, to: String },
}

impl WorkloadPatch {
    pub fn apply(&self, current: &Deployment) -> Result<Deployment> {
        let mut next = current.clone();
        match self {
            WorkloadPatch::Replicas { to, .. } => {
                next.spec.get_or_insert_with(Default::default).replicas = Some(*to);
            }
            WorkloadPatch::Image { to, .. } => {
                first_container_mut(&mut next)?.image = Some(to.clone());
            }
        }
        Ok(next)
    }

    pub fn field(&self) -> &'static str {
        match self {
            WorkloadPatch::Replicas { .. } => "replicas",
            WorkloadPatch::Image { .. } => "image",
        }
    }
}

impl fmt::Display for WorkloadPatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkloadPatch::Replicas { from, to } => match from {
                Some(from) => write!(f, "replicas {} -> {}", from, to),
                None => write!(f, "replicas unset -> {}", to),
            },
            WorkloadPatch::Image { from, to } => match from {
                Some(from) => write!(f, "image {} -> {}", from, to),
                None => write!(f, "image unset -> {}", to),
            },
        }
    }
}

/// Patches needed to bring `current` to `target`, replicas first.
pub fn plan_workload_drift(current: &Deployment, target: &WorkloadTarget) -> Result<Vec<WorkloadPatch>> {
    let mut patches = Vec::new();

    if let Some(patch) = replicas_drift(current, target) {
        patches.push(patch);
    }
    if let Some(patch) = image_drift(current, target)? {
        patches.push(patch);
    }

    Ok(patches)
}

/// Replica change needed, a missing count counts as drift
fn replicas_drift(current: &Deployment, target: &WorkloadTarget) -> Option<WorkloadPatch> {
    let replicas = current.spec.as_ref().and_then(|s| s.replicas);
    (replicas != Some(target.replicas)).then(|| WorkloadPatch::Replicas {
        from: replicas,
        to: target.replicas,
    })
}

fn image_drift(current: &Deployment, target: &WorkloadTarget) -> Result<Option<WorkloadPatch>> {
    let image = first_container(current)?.image.clone();
    if image.as_deref() == Some(target.image.as_str()) {
        return Ok(None);
    }
    Ok(Some(WorkloadPatch::Image {
        from: image,
        to: target.image.clone(),
    }))
}

fn first_container(deployment: &Deployment) -> Result<&Container> {
    deployment
        .spec
        .as_ref()
        .and_then(|s| s.template.spec.as_ref())
        .and_then(|p| p.containers.first())
        .ok_or(HelloError::MissingObjectKey(CONTAINERS_KEY))
}

fn first_container_mut(deployment: &mut Deployment) -> Result<&mut Container> {
    deployment
        .spec
        .as_mut()
        .and_then(|s| s.template.spec.as_mut())
        .and_then(|p| p.containers.first_mut())
        .ok_or(HelloError::MissingObjectKey(CONTAINERS_KEY))
}
