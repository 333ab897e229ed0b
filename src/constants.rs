// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

/// Label keys and values stamped on managed resources
pub mod labels {
    pub const APP_KEY: &str = "app";
    pub const APP_VALUE: &str = "hello";
    pub const TIER_KEY: &str = "tier";
    /// Tier of the hello-kubernetes web frontend
    pub const FRONTEND_TIER: &str = "frontend";
}

/// Shape of the managed workload and its endpoint
pub mod workload {
    /// Suffix appended to the parent name for the Deployment
    pub const DEPLOYMENT_SUFFIX: &str = "-hello";
    /// Suffix appended to the parent name for the Service
    pub const SERVICE_SUFFIX: &str = "-hello-svc";
    pub const CONTAINER_NAME: &str = "hello";
    pub const CONTAINER_PORT: i32 = 8080;
    pub const SERVICE_PORT: i32 = 8080;
    pub const DEFAULT_NODE_PORT: i32 = 30691;
    pub const DEFAULT_IMAGE_REPOSITORY: &str = "paulbouwer/hello-kubernetes";
}

/// The operator name reported to the API server
pub const OPERATOR_NAME: &str = "hello-operator";

/// CRD polling configuration
pub mod crd {
    pub const GROUP: &str = "hello.operator.dev";
    pub const VERSION: &str = "v1alpha1";
    pub const KIND: &str = "Hello";
    /// Initial polling interval in seconds when waiting for CRD
    pub const POLL_INTERVAL_SECS: u64 = 10;
    /// Maximum polling interval in seconds (exponential backoff cap)
    pub const POLL_MAX_INTERVAL_SECS: u64 = 60;
}
