use anyhow::{Context, Result};
use futures::StreamExt;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use localplay::Config;
use localplay::data::{LocalPreferencesRepository, LocalVideoRepository};
use localplay::db::Database;
use localplay::db::repository::VideoStateRepositoryImpl;
use localplay::domain::{GetSortedVideos, group_by_folder};
use localplay::media::{FsMediaIndex, LocalMediaSource};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load()?;

    // RUST_LOG takes precedence over the configured filter
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.filter))
        .context("Invalid logging filter")?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Starting localplay");

    let data_dir = &config.storage.data_dir;
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create data directory {}", data_dir.display()))?;

    let db = Database::connect(&config.database_path()).await?;
    db.migrate().await?;
    let states = Arc::new(VideoStateRepositoryImpl::new(db.get_connection()));

    let preferences = Arc::new(LocalPreferencesRepository::open(data_dir).await?);

    let index = Arc::new(FsMediaIndex::new(
        config.library.roots.clone(),
        &config.library.extensions,
    ));
    if config.library.watch {
        if let Err(e) = index.start_watching() {
            warn!("Library changes will not be picked up: {:#}", e);
        }
    }

    let source = Arc::new(LocalMediaSource::new(index.clone()));
    let videos = Arc::new(LocalVideoRepository::new(source, states));
    let sorted = GetSortedVideos::new(videos, preferences.clone());

    let mut library = sorted.invoke(None);
    let watcher = tokio::spawn(async move {
        while let Some(videos) = library.next().await {
            let folders = group_by_folder(&videos);
            info!(
                "Library: {} video(s) in {} folder(s)",
                videos.len(),
                folders.len()
            );
        }
    });

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for shutdown signal")?;

    info!("Shutting down");
    watcher.abort();
    index.stop_watching();

    Ok(())
}
