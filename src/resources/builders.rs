// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Builders for the Deployment and Service managed on behalf of a Hello.
//!
//! Both builders are pure functions of the parent and the operator
//! configuration. The selector labels of the Service and the pod labels of the
//! Deployment come from the same [`labels`] call, so they always match.

use crate::config::Config;
use crate::constants::labels::FRONTEND_TIER;
use crate::constants::workload::{CONTAINER_NAME, CONTAINER_PORT, SERVICE_PORT};
use crate::resources::labels::labels;
use crate::types::Hello;
use k8s_openapi::api::apps::v1::{Deployment, DeploymentSpec};
use k8s_openapi::api::core::v1::{
    Container, ContainerPort, PodSpec, PodTemplateSpec, Service, ServicePort, ServiceSpec,
};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{LabelSelector, OwnerReference};
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use kube::api::ObjectMeta;
use kube::{Resource, ResourceExt};
use std::fmt;

/// A non-fatal problem found while reconciling
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileWarning {
    /// Kind and key of the affected resource, e.g. `Deployment default/sample-hello`
    pub resource: String,
    pub message: String,
}

impl fmt::Display for ReconcileWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.resource, self.message)
    }
}

/// A resource as it should be created, plus any warning raised building it
#[derive(Debug, Clone)]
pub struct Desired<K> {
    pub resource: K,
    pub warning: Option<ReconcileWarning>,
}

pub fn build_workload(hello: &Hello, config: &Config) -> Desired<Deployment> {
    build_workload_in_tier(hello, config, FRONTEND_TIER)
}

pub fn build_endpoint(hello: &Hello, config: &Config) -> Desired<Service> {
    build_endpoint_in_tier(hello, config, FRONTEND_TIER)
}

pub fn build_workload_in_tier(hello: &Hello, config: &Config, tier: &str) -> Desired<Deployment> {
    let labels = labels(tier);
    let name = hello.child_names().deployment;
    let namespace = hello.namespace().unwrap_or_default();
    let (owner_references, warning) = owner_link(hello, "Deployment", &namespace, &name);

    let resource = Deployment {
        metadata: ObjectMeta {
            name: Some(name),
            namespace: Some(namespace),
            owner_references,
            ..Default::default()
        },
        spec: Some(DeploymentSpec {
            replicas: Some(hello.spec.size),
            selector: LabelSelector {
                match_labels: Some(labels.clone()),
                ..Default::default()
            },
            template: PodTemplateSpec {
                metadata: Some(ObjectMeta {
                    labels: Some(labels),
                    ..Default::default()
                }),
                spec: Some(PodSpec {
                    containers: vec![Container {
                        name: CONTAINER_NAME.to_string(),
                        image: Some(hello.spec.image(&config.image_repository)),
                        image_pull_policy: Some("IfNotPresent".to_string()),
                        ports: Some(vec![ContainerPort {
                            container_port: CONTAINER_PORT,
                            name: Some(CONTAINER_NAME.to_string()),
                            ..Default::default()
                        }]),
                        ..Default::default()
                    }],
                    ..Default::default()
                }),
            },
            ..Default::default()
        }),
        ..Default::default()
    };

    Desired { resource, warning }
}

pub fn build_endpoint_in_tier(hello: &Hello, config: &Config, tier: &str) -> Desired<Service> {
    let name = hello.child_names().service;
    let namespace = hello.namespace().unwrap_or_default();
    let (owner_references, warning) = owner_link(hello, "Service", &namespace, &name);

    let resource = Service {
        metadata: ObjectMeta {
            name: Some(name),
            namespace: Some(namespace),
            owner_references,
            ..Default::default()
        },
        spec: Some(ServiceSpec {
            selector: Some(labels(tier)),
            ports: Some(vec![ServicePort {
                port: SERVICE_PORT,
                target_port: Some(IntOrString::Int(CONTAINER_PORT)),
                node_port: config.node_port,
                ..Default::default()
            }]),
            type_: Some("NodePort".to_string()),
            ..Default::default()
        }),
        ..Default::default()
    };

    Desired { resource, warning }
}

/// Controller owner reference back to the parent.
///
/// The link needs the parent's name and uid; without them the child is still
/// built, unowned, and a warning is returned instead.
fn owner_link(
    hello: &Hello,
    kind: &str,
    namespace: &str,
    name: &str,
) -> (Option<Vec<OwnerReference>>, Option<ReconcileWarning>) {
    match hello.controller_owner_ref(&()) {
        Some(owner) => (Some(vec![owner]), None),
        None => (
            None,
            Some(ReconcileWarning {
                resource: format!("{} {}/{}", kind, namespace, name),
                message: format!(
                    "cannot set owner reference to Hello {}: parent has no uid, \
                     the resource will not be garbage collected with it",
                    hello.name_any()
                ),
            }),
        ),
    }
}
