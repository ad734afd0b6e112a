pub mod api;
pub mod catalog;
pub mod config;
pub mod data_structures;
pub mod error;
pub mod presenter;
pub mod render;
pub mod tracker;
pub mod utils;
pub mod view;

use crate::api::AppState;
use crate::presenter::Presenter;
use crate::tracker::TrackerClient;
use crate::utils::kv_store::{FileKvStore, KeyValueStore};
use std::{net::SocketAddr, sync::Arc};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let app_config = config::AppConfig::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("atlantic_walk=info,tower_http=info")),
        )
        .with_target(false)
        .init();

    // Set a global span with site_name for all subsequent logs
    let _span = tracing::info_span!("site", name = %app_config.site_name).entered();

    tracing::info!("Starting atlantic-walk");
    tracing::info!(
        environment = %app_config.environment,
        port = app_config.port,
        reports_dir = ?app_config.reports_dir,
        tracker_url = %app_config.tracker_url,
        "Loaded configuration"
    );

    let content = Arc::new(config::load_site_content(app_config.content_file.as_deref())?);
    let store: Arc<dyn KeyValueStore> = Arc::new(FileKvStore::new(&app_config.state_file));
    let tracker_client = TrackerClient::new(&app_config.tracker_url, app_config.tracker_timeout)?;

    let presenter = Arc::new(Presenter::new(
        store,
        tracker_client,
        content,
        app_config.reports_dir.clone(),
    ));

    let addr = SocketAddr::from(([0, 0, 0, 0], app_config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Bound before restoring so a restored performance view can fetch from this server
    let _ = presenter.restore().await;

    let app = api::router(AppState {
        presenter,
        config: Arc::new(app_config),
    });

    tracing::info!(%addr, "Server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
