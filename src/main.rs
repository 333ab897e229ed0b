// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::{Context, Result};
use kube::Client;
use tracing::info;

use hello_operator::config::Config;
use hello_operator::kubernetes::wait_for_hello_crd;
use hello_operator::reconcilers::HelloReconciler;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    info!("Starting Hello operator");

    // Load configuration
    let config = Config::from_env().context("invalid operator configuration")?;
    info!(
        "Configuration loaded: watch_namespace={}, image_repository={}, node_port={:?}",
        config.watch_namespace.as_deref().unwrap_or("<all>"),
        config.image_repository,
        config.node_port
    );
    if let Some(port) = config.node_port {
        info!(
            "Services use fixed node port {}; only one Hello per cluster can be served, set NODE_PORT=auto for more",
            port
        );
    }

    // Create Kubernetes client
    let client = Client::try_default()
        .await
        .context("failed to create Kubernetes client")?;
    info!("Connected to Kubernetes cluster");

    info!("Waiting for Hello CRD to become available...");
    wait_for_hello_crd(&client).await?;

    info!("Starting reconciler...");
    HelloReconciler::new(client, config).run().await?;

    info!("Hello reconciler stopped");
    Ok(())
}
