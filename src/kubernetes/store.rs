// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Object store abstraction over the Kubernetes API

use crate::constants::OPERATOR_NAME;
use crate::error::{HelloError, Result};
use async_trait::async_trait;
use k8s_openapi::NamespaceResourceScope;
use kube::{api::PostParams, Api, Client, Resource};
use serde::{de::DeserializeOwned, Serialize};
use std::fmt;
use tracing::{debug, instrument};

/// Namespace and name of a namespaced object
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectKey {
    pub namespace: String,
    pub name: String,
}

impl ObjectKey {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        ObjectKey {
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    /// Key of an object from its metadata
    pub fn of<K: Resource>(object: &K) -> Result<Self> {
        let meta = object.meta();
        let namespace = meta
            .namespace
            .as_deref()
            .ok_or(HelloError::MissingObjectKey(".metadata.namespace"))?;
        let name = meta
            .name
            .as_deref()
            .ok_or(HelloError::MissingObjectKey(".metadata.name"))?;
        Ok(ObjectKey::new(namespace, name))
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

/// Fetch, create and update access to one kind of namespaced object.
///
/// Implementations classify failures into `HelloError::NotFound`,
/// `HelloError::AlreadyExists` and `HelloError::Conflict` so callers can act on
/// them without inspecting transport errors.
#[async_trait]
pub trait ObjectStore<K>: Send + Sync {
    async fn get(&self, key: &ObjectKey) -> Result<K>;

    /// Create the object exactly as given
    async fn create(&self, object: &K) -> Result<K>;

    /// Replace the stored object, guarded by its `resourceVersion`
    async fn update(&self, object: &K) -> Result<K>;
}

/// Object store backed by the Kubernetes API server
#[derive(Clone)]
pub struct KubeStore {
    client: Client,
}

impl KubeStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn post_params() -> PostParams {
        PostParams {
            dry_run: false,
            field_manager: Some(OPERATOR_NAME.to_string()),
        }
    }
}

#[async_trait]
impl<K> ObjectStore<K> for KubeStore
where
    K: Resource<Scope = NamespaceResourceScope, DynamicType = ()>
        + Clone
        + fmt::Debug
        + Serialize
        + DeserializeOwned
        + Send
        + Sync
        + 'static,
{
    #[instrument(skip(self), fields(kind = %K::kind(&())))]
    async fn get(&self, key: &ObjectKey) -> Result<K> {
        let api: Api<K> = Api::namespaced(self.client.clone(), &key.namespace);
        api.get(&key.name)
            .await
            .map_err(|e| HelloError::from_api(e, &K::kind(&()), key))
    }

    async fn create(&self, object: &K) -> Result<K> {
        let key = ObjectKey::of(object)?;
        debug!("Creating {} {}", K::kind(&()), key);

        let api: Api<K> = Api::namespaced(self.client.clone(), &key.namespace);
        api.create(&Self::post_params(), object)
            .await
            .map_err(|e| HelloError::from_api(e, &K::kind(&()), &key))
    }

    async fn update(&self, object: &K) -> Result<K> {
        let key = ObjectKey::of(object)?;
        debug!("Replacing {} {}", K::kind(&()), key);

        let api: Api<K> = Api::namespaced(self.client.clone(), &key.namespace);
        api.replace(&key.name, &Self::post_params(), object)
            .await
            .map_err(|e| HelloError::from_api(e, &K::kind(&()), &key))
    }
}
