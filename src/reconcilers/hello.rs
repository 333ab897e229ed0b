// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Hello reconciler - watches Hello resources and the Deployments and Services
//! they own, and runs a reconciliation pass per changed Hello.

use crate::config::Config;
use crate::kubernetes::KubeStore;
use crate::reconcile::{Outcome, ReconcileError, ReconcileReport, Reconciler, Stores};
use crate::reconcilers::backoff::ErrorBackoff;
use crate::types::Hello;
use futures::StreamExt;
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::Service;
use kube::{
    runtime::{
        controller::{Action, Config as ControllerConfig},
        Controller,
    },
    Api, Client, ResourceExt,
};
use kube_runtime::watcher::Config as WatcherConfig;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

pub struct HelloReconciler {
    client: Client,
    config: Config,
}

/// Shared state handed to every reconciliation
pub struct Context {
    reconciler: Reconciler,
    backoff: ErrorBackoff,
    /// Delay used when a successful pass asks to be run again
    requeue_after: Duration,
}

impl Context {
    pub fn new(reconciler: Reconciler, config: &Config) -> Self {
        Self {
            reconciler,
            backoff: ErrorBackoff::new(
                Duration::from_secs(config.error_backoff_base_secs),
                Duration::from_secs(config.error_backoff_max_secs),
            ),
            requeue_after: Duration::from_secs(config.error_backoff_base_secs),
        }
    }
}

impl HelloReconciler {
    pub fn new(client: Client, config: Config) -> Self {
        Self { client, config }
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let (hellos, deployments, services) = match self.config.watch_namespace.as_deref() {
            Some(namespace) => (
                Api::<Hello>::namespaced(self.client.clone(), namespace),
                Api::<Deployment>::namespaced(self.client.clone(), namespace),
                Api::<Service>::namespaced(self.client.clone(), namespace),
            ),
            None => (
                Api::<Hello>::all(self.client.clone()),
                Api::<Deployment>::all(self.client.clone()),
                Api::<Service>::all(self.client.clone()),
            ),
        };

        let stores = Stores::from_store(KubeStore::new(self.client.clone()));
        let reconciler = Reconciler::new(stores, self.config.clone());
        let context = Arc::new(Context::new(reconciler, &self.config));

        let controller_config = ControllerConfig::default().concurrency(self.config.concurrency);

        Controller::new(hellos, WatcherConfig::default())
            .owns(deployments, WatcherConfig::default())
            .owns(services, WatcherConfig::default())
            .with_config(controller_config)
            .shutdown_on_signal()
            .run(reconcile, error_policy, context)
            .for_each(|res| async move {
                match res {
                    Ok(o) => debug!("Reconciled hello: {:?}", o),
                    Err(e) => warn!("Reconciliation error: {:?}", e),
                }
            })
            .await;

        Ok(())
    }
}

async fn reconcile(hello: Arc<Hello>, ctx: Arc<Context>) -> Result<Action, ReconcileError> {
    let key = hello
        .object_key()
        .map_err(|e| ReconcileReport::default().failed(e))?;

    let outcome = ctx.reconciler.reconcile(&key).await?;
    ctx.backoff.reset(&key);

    for warning in &outcome.report.warnings {
        warn!("Hello {}: {}", key, warning);
    }
    if outcome.report.writes() > 0 {
        info!(
            "Hello {} reconciled with {} writes",
            key,
            outcome.report.writes()
        );
    }

    Ok(action_for(&outcome, ctx.requeue_after))
}

/// Map a finished pass to the next controller action.
///
/// No current pass sets `requeue`; it is reserved for passes that need a timed
/// recheck and uses a fixed delay, leaving the failure count alone.
fn action_for(outcome: &Outcome, requeue_after: Duration) -> Action {
    if outcome.requeue {
        Action::requeue(requeue_after)
    } else {
        // Owned Deployments and Services trigger a new pass when they change
        Action::await_change()
    }
}

fn error_policy(hello: Arc<Hello>, error: &ReconcileError, ctx: Arc<Context>) -> Action {
    let Ok(key) = hello.object_key() else {
        // Retrying cannot fix an object without namespace or name
        error!("Reconciliation of Hello {} failed: {}", hello.name_any(), error);
        return Action::await_change();
    };
    let delay = ctx.backoff.next_delay(&key);
    error!(
        "Reconciliation of Hello {} failed: {}, retrying in {}s",
        key,
        error,
        delay.as_secs()
    );
    Action::requeue(delay)
}
