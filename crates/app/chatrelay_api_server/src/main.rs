//! chatrelay HTTP server binary.
//!
//! Serves `POST /message` and friends, relaying to the configured backend.

use std::sync::Arc;
use std::time::Duration;

use chatrelay_api::config::ApiConfig;
use chatrelay_core::config::BackendConfig;
use chatrelay_core::messaging::rasa::RasaClient;
use clap::Parser;
use tracing::info;

/// CLI arguments for the relay server.
///
/// Each flag overrides the matching environment variable read by
/// `ApiConfig::from_env` / `BackendConfig::from_env`.
#[derive(Parser, Debug)]
#[command(name = "chatrelay_api_server", about = "chatrelay HTTP server")]
struct Args {
    /// Address to bind the HTTP listener [env: BIND_ADDR].
    #[arg(long)]
    bind_addr: Option<String>,

    /// Base URL of the conversational backend [env: BACKEND_URL].
    #[arg(long)]
    backend_url: Option<String>,

    /// Per-request timeout towards the backend, in seconds [env: BACKEND_TIMEOUT_SECS].
    #[arg(long)]
    backend_timeout_secs: Option<u64>,

    /// Skip TLS certificate verification towards the backend [env: BACKEND_ACCEPT_INVALID_CERTS].
    #[arg(long)]
    backend_accept_invalid_certs: bool,

    /// Largest accepted request body in bytes, uploads included [env: MAX_UPLOAD_BYTES].
    #[arg(long)]
    max_upload_bytes: Option<usize>,
}

impl Args {
    /// Layers explicit flags over configs resolved from the environment.
    fn apply(self, mut api: ApiConfig, mut backend: BackendConfig) -> (ApiConfig, BackendConfig) {
        if let Some(addr) = self.bind_addr {
            api.bind_addr = addr;
        }
        if let Some(max) = self.max_upload_bytes {
            api.max_upload_bytes = max;
        }
        if let Some(url) = self.backend_url {
            backend.base_url = url;
        }
        if let Some(secs) = self.backend_timeout_secs {
            backend.timeout = Duration::from_secs(secs);
        }
        if self.backend_accept_invalid_certs {
            backend.accept_invalid_certs = true;
        }
        (api, backend)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(
                    "info,chatrelay_api=debug,chatrelay_core=debug,tower_http=debug",
                )
            }),
        )
        .init();

    let args = Args::parse();

    let (config, backend) = args.apply(ApiConfig::from_env(), BackendConfig::from_env());

    info!(
        backend_url = %backend.base_url,
        timeout_secs = backend.timeout.as_secs(),
        accept_invalid_certs = backend.accept_invalid_certs,
        "starting chatrelay_api_server"
    );

    let client = RasaClient::new(&backend)?;
    let state = chatrelay_api::AppState {
        client: Arc::new(client),
        config: config.clone(),
    };
    let app = chatrelay_api::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    let local_addr = listener.local_addr()?;
    info!(addr = %local_addr, "REST API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("shutdown signal received");
            } else {
                std::future::pending::<()>().await;
            }
        })
        .await?;

    Ok(())
}
