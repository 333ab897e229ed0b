// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::kubernetes::ObjectKey;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HelloError {
    #[error("{kind} {key} not found")]
    NotFound { kind: String, key: String },

    #[error("{kind} {key} already exists")]
    AlreadyExists { kind: String, key: String },

    #[error("Conflict while writing {kind} {key}")]
    Conflict { kind: String, key: String },

    #[error("Kubernetes API error: {0}")]
    KubeError(#[from] kube::Error),

    #[error("Object is missing key: {0}")]
    MissingObjectKey(&'static str),

    #[error("Invalid spec: {0}")]
    InvalidSpec(String),
}

impl HelloError {
    /// Classify an API error for an object of the given kind.
    ///
    /// 404 becomes `NotFound`, 409 with reason `AlreadyExists` becomes
    /// `AlreadyExists`, any other 409 becomes `Conflict`. Everything else is
    /// passed through as a generic API failure.
    pub fn from_api(err: kube::Error, kind: &str, key: &ObjectKey) -> Self {
        match err {
            kube::Error::Api(ref resp) if resp.code == 404 => HelloError::NotFound {
                kind: kind.to_string(),
                key: key.to_string(),
            },
            kube::Error::Api(ref resp) if resp.code == 409 && resp.reason == "AlreadyExists" => {
                HelloError::AlreadyExists {
                    kind: kind.to_string(),
                    key: key.to_string(),
                }
            }
            kube::Error::Api(ref resp) if resp.code == 409 => HelloError::Conflict {
                kind: kind.to_string(),
                key: key.to_string(),
            },
            other => HelloError::KubeError(other),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, HelloError::NotFound { .. })
    }

    pub fn is_already_exists(&self) -> bool {
        matches!(self, HelloError::AlreadyExists { .. })
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, HelloError::Conflict { .. })
    }
}

pub type Result<T> = std::result::Result<T, HelloError>;
