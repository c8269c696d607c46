//! noaas server: provisions scheduler-managed HTTP services from fetched content.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use noaas_api::{HttpApi, ProvisionerAdapter, axum};
use noaas_core::{HttpFetcher, Provisioner};
use noaas_exec::ScriptExecutor;
use noaas_nomad::NomadClient;
use noaas_observe::logger_init;
use tokio::net::TcpListener;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

mod config;

use config::ServerConfig;

#[derive(Parser, Debug)]
#[command(name = "noaas-server")]
#[command(about = "Turn a URL into a running HTTP service on the cluster scheduler")]
#[command(version)]
struct Cli {
    /// Path to configuration file.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Listen address, overriding `server.listen`.
    #[arg(short, long, value_name = "ADDR")]
    listen: Option<SocketAddr>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut cfg =
        ServerConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    if let Some(listen) = cli.listen {
        cfg.server.listen = listen;
    }

    logger_init(&cfg.logger).context("failed to initialise logger")?;
    info!(
        listen = %cfg.server.listen,
        nomad = %cfg.nomad.address,
        namespace = cfg.nomad.namespace.as_deref().unwrap_or("default"),
        "noaas server starting"
    );

    let provisioner = provisioner(&cfg)?;
    let shutdown = CancellationToken::new();
    let adapter = ProvisionerAdapter::new(Arc::new(provisioner), shutdown.clone());
    let app = HttpApi::new(Arc::new(adapter)).router();

    let listener = TcpListener::bind(cfg.server.listen)
        .await
        .with_context(|| format!("failed to bind {}", cfg.server.listen))?;
    info!(addr = %cfg.server.listen, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            shutdown.cancel();
        })
        .await
        .context("server error")?;

    info!("noaas server stopped");
    Ok(())
}

fn provisioner(cfg: &ServerConfig) -> anyhow::Result<Provisioner> {
    let fetcher = HttpFetcher::new(&cfg.fetch).context("failed to build content fetcher")?;
    let scheduler = NomadClient::new(&cfg.nomad).context("failed to build scheduler client")?;
    let executor = ScriptExecutor::default().with_config(cfg.exec.to_exec_config());

    Ok(Provisioner::new(Arc::new(fetcher), Arc::new(scheduler))
        .with_executor(executor)
        .with_job_template(cfg.job.clone())
        .with_resolver_config(cfg.resolver))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("received Ctrl+C, shutting down"),
        () = terminate => info!("received SIGTERM, shutting down"),
    }
}
