// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::constants::workload::{DEFAULT_IMAGE_REPOSITORY, DEFAULT_NODE_PORT};
use anyhow::{bail, Context, Result};
use std::env;
use std::str::FromStr;

/// Operator configuration loaded from environment variables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Namespace to watch, all namespaces when unset
    pub watch_namespace: Option<String>,
    /// Repository part of the workload image reference
    pub image_repository: String,
    /// Node port of the managed Service, `None` lets the API server pick one.
    /// Node ports are unique across the cluster, so a fixed port only fits a
    /// single Hello; set `NODE_PORT=auto` to run several.
    pub node_port: Option<i32>,
    /// Maximum number of reconciliations running in parallel
    pub concurrency: u16,
    pub error_backoff_base_secs: u64,
    pub error_backoff_max_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            watch_namespace: None,
            image_repository: DEFAULT_IMAGE_REPOSITORY.to_string(),
            node_port: Some(DEFAULT_NODE_PORT),
            concurrency: 4,
            error_backoff_base_secs: 5,
            error_backoff_max_secs: 300,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let watch_namespace = lookup("WATCH_NAMESPACE").filter(|ns| !ns.is_empty());
        let image_repository =
            lookup("IMAGE_REPOSITORY").unwrap_or(defaults.image_repository);

        let node_port = match lookup("NODE_PORT").as_deref() {
            None => defaults.node_port,
            Some("auto") => None,
            Some(raw) => {
                let port: i32 = raw
                    .parse()
                    .with_context(|| format!("NODE_PORT is not a number: {}", raw))?;
                if !(30000..=32767).contains(&port) {
                    bail!("NODE_PORT {} is outside the node port range 30000-32767", port);
                }
                Some(port)
            }
        };

        let concurrency = parse_or(&lookup, "CONTROLLER_CONCURRENCY", defaults.concurrency)?;
        // kube-runtime treats a concurrency of 0 as unbounded
        if concurrency == 0 {
            bail!("CONTROLLER_CONCURRENCY must be at least 1");
        }
        let error_backoff_base_secs =
            parse_or(&lookup, "ERROR_BACKOFF_BASE_SECS", defaults.error_backoff_base_secs)?;
        let error_backoff_max_secs =
            parse_or(&lookup, "ERROR_BACKOFF_MAX_SECS", defaults.error_backoff_max_secs)?;

        if error_backoff_base_secs == 0 || error_backoff_max_secs < error_backoff_base_secs {
            bail!(
                "Invalid error backoff: base {}s must be non-zero and not exceed max {}s",
                error_backoff_base_secs,
                error_backoff_max_secs
            );
        }

        Ok(Config {
            watch_namespace,
            image_repository,
            node_port,
            concurrency,
            error_backoff_base_secs,
            error_backoff_max_secs,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .parse()
            .with_context(|| format!("{} has an invalid value: {}", key, raw)),
        None => Ok(default),
    }
}
