// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::constants::workload::{DEPLOYMENT_SUFFIX, SERVICE_SUFFIX};
use crate::error::{HelloError, Result};
use crate::kubernetes::ObjectKey;
use kube::{CustomResource, ResourceExt};
use serde::{Deserialize, Serialize};

/// Desired state of a hello-kubernetes deployment.
#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, PartialEq, schemars::JsonSchema)]
#[kube(group = "hello.operator.dev", version = "v1alpha1", kind = "Hello")]
#[kube(namespaced, shortname = "hello", derive = "PartialEq")]
#[kube(printcolumn = r#"{"name":"Size","type":"integer","jsonPath":".spec.size"}"#)]
#[kube(printcolumn = r#"{"name":"Version","type":"string","jsonPath":".spec.version"}"#)]
#[serde(rename_all = "camelCase")]
pub struct HelloSpec {
    /// Number of replicas of the workload
    #[schemars(range(min = 0))]
    pub size: i32,
    /// Image tag of the hello-kubernetes container
    pub version: String,
}

impl HelloSpec {
    /// Image reference derived from the version tag
    pub fn image(&self, repository: &str) -> String {
        format!("{}:{}", repository, self.version)
    }

    pub fn validate(&self) -> Result<()> {
        if self.size < 0 {
            return Err(HelloError::InvalidSpec(format!(
                "size must not be negative, got {}",
                self.size
            )));
        }
        if self.version.trim().is_empty() {
            return Err(HelloError::InvalidSpec("version must not be empty".to_string()));
        }
        Ok(())
    }
}

/// Names of the resources managed on behalf of one parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildNames {
    pub deployment: String,
    pub service: String,
}

impl ChildNames {
    pub fn for_parent(parent_name: &str) -> Self {
        ChildNames {
            deployment: format!("{}{}", parent_name, DEPLOYMENT_SUFFIX),
            service: format!("{}{}", parent_name, SERVICE_SUFFIX),
        }
    }
}

impl Hello {
    /// Namespace and name of this object, both of which must be set
    pub fn object_key(&self) -> Result<ObjectKey> {
        let namespace = self
            .metadata
            .namespace
            .as_deref()
            .ok_or(HelloError::MissingObjectKey(".metadata.namespace"))?;
        let name = self
            .metadata
            .name
            .as_deref()
            .ok_or(HelloError::MissingObjectKey(".metadata.name"))?;
        Ok(ObjectKey::new(namespace, name))
    }

    pub fn child_names(&self) -> ChildNames {
        ChildNames::for_parent(&self.name_any())
    }
}
