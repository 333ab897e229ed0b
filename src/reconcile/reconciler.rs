// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! One reconciliation pass for a Hello.
//!
//! A pass loads the parent, makes sure its Deployment and Service exist, then
//! corrects drift on the Deployment. Every store failure ends the pass and is
//! handed back to the caller, which owns retries. Replaying a pass against
//! unchanged state performs no writes.

use crate::config::Config;
use crate::error::HelloError;
use crate::kubernetes::{ObjectKey, ObjectStore};
use crate::reconcile::drift::correct_workload;
use crate::reconcile::ensure::ensure;
use crate::reconcile::outcome::{Outcome, Phase, ReconcileError, ReconcileReport, Step};
use crate::resources::patch::WorkloadTarget;
use crate::resources::{build_endpoint, build_workload};
use crate::types::Hello;
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::Service;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Store access for every kind a pass touches
#[derive(Clone)]
pub struct Stores {
    pub parents: Arc<dyn ObjectStore<Hello>>,
    pub workloads: Arc<dyn ObjectStore<Deployment>>,
    pub endpoints: Arc<dyn ObjectStore<Service>>,
}

impl Stores {
    /// Use one store for all kinds
    pub fn from_store<S>(store: S) -> Self
    where
        S: ObjectStore<Hello> + ObjectStore<Deployment> + ObjectStore<Service> + Clone + 'static,
    {
        Stores {
            parents: Arc::new(store.clone()),
            workloads: Arc::new(store.clone()),
            endpoints: Arc::new(store),
        }
    }
}

pub struct Reconciler {
    stores: Stores,
    config: Config,
}

impl Reconciler {
    pub fn new(stores: Stores, config: Config) -> Self {
        Self { stores, config }
    }

    #[instrument(skip(self, key), fields(hello = %key))]
    pub async fn reconcile(&self, key: &ObjectKey) -> Result<Outcome, ReconcileError> {
        let mut report = ReconcileReport::default();

        let hello = match self.load_parent(key).await {
            Ok(Step::Continue(hello)) => hello,
            Ok(Step::Stop(outcome)) => return Ok(outcome),
            Err(e) => return Err(report.failed(e)),
        };
        report.parent_found = true;
        report.phase = Phase::ParentLoaded;

        hello.spec.validate().map_err(|e| report.failed(e))?;

        let workload = build_workload(&hello, &self.config);
        report.warnings.extend(workload.warning);
        let ensured = ensure(self.stores.workloads.as_ref(), &workload.resource)
            .await
            .map_err(|e| report.failed(e))?;
        report.workload = Some(ensured);
        report.phase = Phase::WorkloadEnsured;
        debug!("Deployment {}", ensured);

        let endpoint = build_endpoint(&hello, &self.config);
        report.warnings.extend(endpoint.warning);
        let ensured = ensure(self.stores.endpoints.as_ref(), &endpoint.resource)
            .await
            .map_err(|e| report.failed(e))?;
        report.endpoint = Some(ensured);
        report.phase = Phase::EndpointEnsured;
        debug!("Service {}", ensured);

        let workload_key = ObjectKey::of(&workload.resource).map_err(|e| report.failed(e))?;
        let target = WorkloadTarget::for_parent(&hello, &self.config);
        let patches = correct_workload(self.stores.workloads.as_ref(), &workload_key, &target)
            .await
            .map_err(|e| report.failed(e))?;
        report.patches = patches;
        report.phase = Phase::DriftCorrected;

        report.phase = Phase::Done;
        debug!("Reconciled with {} writes", report.writes());
        Ok(Outcome::finished(report))
    }

    /// Fetch the parent; a deleted parent ends the pass successfully
    async fn load_parent(&self, key: &ObjectKey) -> Result<Step<Hello>, HelloError> {
        match self.stores.parents.get(key).await {
            Ok(hello) => Ok(Step::Continue(hello)),
            Err(e) if e.is_not_found() => {
                debug!("Hello {} no longer exists, nothing to do", key);
                Ok(Step::Stop(Outcome::finished(ReconcileReport {
                    phase: Phase::Done,
                    ..Default::default()
                })))
            }
            Err(e) => Err(e),
        }
    }
}
