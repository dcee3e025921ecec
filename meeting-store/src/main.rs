use std::{env, io, net::SocketAddr, process};

use meeting_store::{router, Store};
use tokio::{net::TcpListener, signal};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> io::Result<()> {
    const MEETING_STORE_ADDR: &str = "MEETING_STORE_ADDR";

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let Ok(addr) = env::var(MEETING_STORE_ADDR).map_or_else(
        |_| Ok(SocketAddr::from(([127, 0, 0, 1], 5001))),
        |value| value.parse(),
    ) else {
        eprintln!("Failed to parse `{MEETING_STORE_ADDR}` environment variable");
        process::exit(1);
    };

    let listener = TcpListener::bind(addr).await?;
    info!("Listening at http://{addr}");

    axum::serve(listener, router(Store::default()))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(err) = signal::ctrl_c().await {
        error!(error = %err, "failed to listen for shutdown signal");
        return;
    }

    info!("Shutting down");
}
