// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::env;
use std::sync::Arc;

use anyhow::Context;
use tonic::transport::Server;
use tracing_subscriber::EnvFilter;

use meshbench::config::load_and_validate_config;
use meshbench::dispatch::Dispatcher;
use meshbench::ingress::{self, IngressState};
use meshbench::proto::meshbench_v1::mesh_node_server::MeshNodeServer;

/// JSON logs to stdout so the benchmark harness can scrape trace events.
/// `RUST_LOG` wins, then the `LOG_LEVEL` variable from the deployment
/// manifests, then `info`.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| {
            let level = env::var("LOG_LEVEL").unwrap_or_default();
            if level.is_empty() {
                EnvFilter::try_new("info")
            } else {
                EnvFilter::try_new(level)
            }
        })
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        eprintln!("Usage: {} <config.yaml>", args[0]);
        eprintln!("Example: {} configs/svc-a.yaml", args[0]);
        std::process::exit(1);
    }

    let config = load_and_validate_config(&args[1])
        .with_context(|| format!("loading config '{}'", args[1]))?;

    let dispatcher = Arc::new(Dispatcher::new(&config));

    if config.preconnect {
        dispatcher.preconnect().await;
    }

    if config.frontend {
        let state = IngressState::new(Arc::clone(&dispatcher), &config);
        let port = config.frontend_port;
        tokio::spawn(async move {
            if let Err(error) = ingress::serve(state, port).await {
                tracing::error!(%error, "http ingress exited");
            }
        });
    }

    let addr: std::net::SocketAddr = format!("0.0.0.0:{}", config.listen_port)
        .parse()
        .context("grpc listen address")?;
    tracing::info!(
        node = %config.name,
        %addr,
        peers = config.peers.len(),
        "mesh node listening"
    );

    Server::builder()
        .add_service(MeshNodeServer::from_arc(dispatcher))
        .serve(addr)
        .await
        .context("grpc server")?;

    Ok(())
}
