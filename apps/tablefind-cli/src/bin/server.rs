use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use tablefind_cli::server::{create_router, AppState};
use tablefind_cli::setup::{init_tracing, load_expansion, load_settings, open_executor};

/// Serve `GET /search` over the persisted dataset index.
#[derive(Debug, Parser)]
#[command(name = "tablefind-server")]
struct Args {
    /// Listen address; defaults to server.host from the config
    #[arg(long)]
    host: Option<String>,
    /// Listen port; defaults to server.port from the config
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let args = Args::parse();
    let settings = load_settings()?;

    // Both resources are loaded once and shared read-only by every request.
    let index_dir = settings.data.index_path();
    let executor = open_executor(&index_dir, &settings.search)?;
    let expansion = tokio::task::spawn_blocking({
        let settings = settings.clone();
        move || load_expansion(&settings)
    })
    .await??;

    let state = Arc::new(AppState { executor, expansion, search: settings.search.clone() });
    let app = create_router(state);

    let host = args.host.unwrap_or(settings.server.host);
    let port = args.port.unwrap_or(settings.server.port);
    let listener = TcpListener::bind((host.as_str(), port)).await?;
    tracing::info!(addr = %listener.local_addr()?, index = %index_dir.display(), "listening");
    axum::serve(listener, app).await?;
    Ok(())
}
