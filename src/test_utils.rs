// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Test utilities: a mocked Kubernetes API server and a recording in-memory store.

use crate::error::{HelloError, Result};
use crate::kubernetes::{ObjectKey, ObjectStore};
use crate::types::{Hello, HelloSpec};
use async_trait::async_trait;
use http::{Request, Response};
use k8s_openapi::api::apps::v1::{Deployment, DeploymentSpec};
use k8s_openapi::api::core::v1::{Container, PodSpec, PodTemplateSpec};
use kube::api::ObjectMeta;
use kube::client::Body;
use kube::error::ErrorResponse;
use kube::{Client, Resource};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use tower::Service;

/// A mock HTTP service that returns predefined responses based on request paths.
#[derive(Clone)]
pub struct MockService {
    responses: Arc<Mutex<HashMap<(String, String), (u16, String)>>>,
}

impl MockService {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Add a response for GET requests matching the exact path
    pub fn on_get(self, path: &str, status: u16, body: &str) -> Self {
        self.on("GET", path, status, body)
    }

    /// Add a response for POST requests matching the exact path
    pub fn on_post(self, path: &str, status: u16, body: &str) -> Self {
        self.on("POST", path, status, body)
    }

    /// Add a response for PUT requests matching the exact path
    pub fn on_put(self, path: &str, status: u16, body: &str) -> Self {
        self.on("PUT", path, status, body)
    }

    fn on(self, method: &str, path: &str, status: u16, body: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert((method.to_string(), path.to_string()), (status, body.to_string()));
        self
    }

    /// Build a kube Client from this mock service
    pub fn into_client(self) -> Client {
        Client::new(self, "default")
    }

    fn find_response(&self, method: &str, path: &str) -> Option<(u16, String)> {
        self.responses
            .lock()
            .unwrap()
            .get(&(method.to_string(), path.to_string()))
            .cloned()
    }
}

impl Default for MockService {
    fn default() -> Self {
        Self::new()
    }
}

impl Service<Request<Body>> for MockService {
    type Response = Response<Body>;
    type Error = tower::BoxError;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = std::result::Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<std::result::Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let method = req.method().to_string();
        let path = req.uri().path().to_string();

        let (status, body) = self
            .find_response(&method, &path)
            .unwrap_or_else(|| (404, not_found_json("resource", &path)));

        Box::pin(async move {
            Ok(Response::builder()
                .status(status)
                .header("content-type", "application/json")
                .body(Body::from(body.into_bytes()))
                .unwrap())
        })
    }
}

/// Create a 404 not found response
pub fn not_found_json(resource: &str, name: &str) -> String {
    serde_json::json!({
        "kind": "Status",
        "apiVersion": "v1",
        "status": "Failure",
        "message": format!("{} \"{}\" not found", resource, name),
        "reason": "NotFound",
        "code": 404
    })
    .to_string()
}

/// Create a 409 conflict response for a stale resourceVersion
pub fn conflict_json(resource: &str, name: &str) -> String {
    serde_json::json!({
        "kind": "Status",
        "apiVersion": "v1",
        "status": "Failure",
        "message": format!(
            "Operation cannot be fulfilled on {} \"{}\": the object has been modified",
            resource, name
        ),
        "reason": "Conflict",
        "code": 409
    })
    .to_string()
}

pub fn deployment_json(namespace: &str, name: &str, replicas: i32, image: &str) -> String {
    serde_json::to_string(&make_deployment(namespace, name, Some(replicas), image)).unwrap()
}

pub fn make_hello(namespace: &str, name: &str, size: i32, version: &str) -> Hello {
    Hello {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some(namespace.to_string()),
            uid: Some(format!("uid-{}", name)),
            ..Default::default()
        },
        spec: HelloSpec {
            size,
            version: version.to_string(),
        },
    }
}

pub fn make_deployment(namespace: &str, name: &str, replicas: Option<i32>, image: &str) -> Deployment {
    Deployment {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some(namespace.to_string()),
            ..Default::default()
        },
        spec: Some(DeploymentSpec {
            replicas,
            template: PodTemplateSpec {
                metadata: None,
                spec: Some(PodSpec {
                    containers: vec![Container {
                        name: "hello".to_string(),
                        image: Some(image.to_string()),
                        ..Default::default()
                    }],
                    ..Default::default()
                }),
            },
            ..Default::default()
        }),
        ..Default::default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Get,
    Create,
    Update,
}

/// Error to inject into the next matching store call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    NotFound,
    AlreadyExists,
    Conflict,
    Internal,
}

impl Failure {
    fn into_error(self, kind: &str, key: &ObjectKey) -> HelloError {
        let kind = kind.to_string();
        let key_str = key.to_string();
        match self {
            Failure::NotFound => HelloError::NotFound { kind, key: key_str },
            Failure::AlreadyExists => HelloError::AlreadyExists { kind, key: key_str },
            Failure::Conflict => HelloError::Conflict { kind, key: key_str },
            Failure::Internal => HelloError::KubeError(kube::Error::Api(ErrorResponse {
                status: "Failure".to_string(),
                message: "injected failure".to_string(),
                reason: "InternalError".to_string(),
                code: 500,
            })),
        }
    }
}

/// A write performed through the store
#[derive(Debug, Clone)]
pub struct RecordedWrite {
    pub verb: Verb,
    pub kind: String,
    pub key: ObjectKey,
    pub object: Value,
}

struct InjectedFailure {
    verb: Verb,
    kind: String,
    skip: usize,
    failure: Failure,
}

#[derive(Default)]
struct MemoryState {
    objects: HashMap<(String, ObjectKey), Value>,
    writes: Vec<RecordedWrite>,
    failures: Vec<InjectedFailure>,
    next_version: u64,
}

impl MemoryState {
    fn take_failure(&mut self, verb: Verb, kind: &str) -> Option<Failure> {
        let index = self
            .failures
            .iter()
            .position(|f| f.verb == verb && f.kind == kind)?;
        let injected = &mut self.failures[index];
        if injected.skip > 0 {
            injected.skip -= 1;
            return None;
        }
        Some(self.failures.remove(index).failure)
    }

    fn stamp<K: Resource + Clone>(&mut self, object: &K) -> K {
        self.next_version += 1;
        let mut stamped = object.clone();
        stamped.meta_mut().resource_version = Some(self.next_version.to_string());
        stamped
    }
}

/// In-memory object store that records every write.
///
/// Objects of all kinds live in one map keyed by kind and `ObjectKey`.
/// Writes bump a global `resourceVersion`; updates carrying a stale version
/// fail with `Conflict` like the API server does.
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an object without recording a write
    pub fn insert<K>(&self, object: &K)
    where
        K: Resource<DynamicType = ()> + Serialize + Clone,
    {
        let key = ObjectKey::of(object).unwrap();
        let mut state = self.state.lock().unwrap();
        let stamped = state.stamp(object);
        state
            .objects
            .insert((K::kind(&()).to_string(), key), serde_json::to_value(&stamped).unwrap());
    }

    pub fn fetch<K>(&self, namespace: &str, name: &str) -> Option<K>
    where
        K: Resource<DynamicType = ()> + DeserializeOwned,
    {
        let state = self.state.lock().unwrap();
        state
            .objects
            .get(&(K::kind(&()).to_string(), ObjectKey::new(namespace, name)))
            .map(|v| serde_json::from_value(v.clone()).unwrap())
    }

    pub fn remove<K>(&self, namespace: &str, name: &str)
    where
        K: Resource<DynamicType = ()>,
    {
        let mut state = self.state.lock().unwrap();
        state
            .objects
            .remove(&(K::kind(&()).to_string(), ObjectKey::new(namespace, name)));
    }

    pub fn writes(&self) -> Vec<RecordedWrite> {
        self.state.lock().unwrap().writes.clone()
    }

    pub fn clear_writes(&self) {
        self.state.lock().unwrap().writes.clear();
    }

    /// Make the next `verb` call for `kind` fail with `failure`
    pub fn fail_next(&self, verb: Verb, kind: &str, failure: Failure) {
        self.fail_after(verb, kind, 0, failure);
    }

    /// Let `skip` matching calls through, then fail the one after
    pub fn fail_after(&self, verb: Verb, kind: &str, skip: usize, failure: Failure) {
        self.state.lock().unwrap().failures.push(InjectedFailure {
            verb,
            kind: kind.to_string(),
            skip,
            failure,
        });
    }
}

#[async_trait]
impl<K> ObjectStore<K> for MemoryStore
where
    K: Resource<DynamicType = ()> + Serialize + DeserializeOwned + Clone + Send + Sync + 'static,
{
    async fn get(&self, key: &ObjectKey) -> Result<K> {
        let kind = K::kind(&()).to_string();
        let mut state = self.state.lock().unwrap();
        if let Some(failure) = state.take_failure(Verb::Get, &kind) {
            return Err(failure.into_error(&kind, key));
        }

        match state.objects.get(&(kind.clone(), key.clone())) {
            Some(value) => Ok(serde_json::from_value(value.clone()).unwrap()),
            None => Err(Failure::NotFound.into_error(&kind, key)),
        }
    }

    async fn create(&self, object: &K) -> Result<K> {
        let kind = K::kind(&()).to_string();
        let key = ObjectKey::of(object)?;
        let mut state = self.state.lock().unwrap();
        if let Some(failure) = state.take_failure(Verb::Create, &kind) {
            return Err(failure.into_error(&kind, &key));
        }
        if state.objects.contains_key(&(kind.clone(), key.clone())) {
            return Err(Failure::AlreadyExists.into_error(&kind, &key));
        }

        let mut stored = state.stamp(object);
        let uid = format!("uid-{}", key.name);
        stored.meta_mut().uid.get_or_insert(uid);
        let value = serde_json::to_value(&stored).unwrap();
        state.objects.insert((kind.clone(), key.clone()), value.clone());
        state.writes.push(RecordedWrite {
            verb: Verb::Create,
            kind,
            key,
            object: value,
        });
        Ok(stored)
    }

    async fn update(&self, object: &K) -> Result<K> {
        let kind = K::kind(&()).to_string();
        let key = ObjectKey::of(object)?;
        let mut state = self.state.lock().unwrap();
        if let Some(failure) = state.take_failure(Verb::Update, &kind) {
            return Err(failure.into_error(&kind, &key));
        }

        let stored_version = match state.objects.get(&(kind.clone(), key.clone())) {
            Some(value) => value["metadata"]["resourceVersion"].as_str().map(str::to_string),
            None => return Err(Failure::NotFound.into_error(&kind, &key)),
        };
        if let Some(version) = object.meta().resource_version.as_ref() {
            if Some(version) != stored_version.as_ref() {
                return Err(Failure::Conflict.into_error(&kind, &key));
            }
        }

        let stored = state.stamp(object);
        let value = serde_json::to_value(&stored).unwrap();
        state.objects.insert((kind.clone(), key.clone()), value.clone());
        state.writes.push(RecordedWrite {
            verb: Verb::Update,
            kind,
            key,
            object: value,
        });
        Ok(stored)
    }
}
