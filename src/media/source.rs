use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::index::{ChangeObserver, MediaIndex, ObserverRegistration, VideoQuery};
use super::models::MediaVideo;

/// Produces video descriptors from a media index.
#[async_trait]
pub trait MediaSource: Send + Sync {
    /// Current videos matching `query`. Index failures yield an empty list.
    async fn videos(&self, query: &VideoQuery) -> Vec<MediaVideo>;

    /// Videos matching `query`, re-emitted whenever the index changes.
    ///
    /// Consecutive identical lists are emitted once. The change observer is
    /// registered when the stream is created and removed when it is dropped.
    fn videos_stream(&self, query: VideoQuery) -> BoxStream<'static, Vec<MediaVideo>>;
}

#[derive(Clone)]
pub struct LocalMediaSource {
    index: Arc<dyn MediaIndex>,
}

impl LocalMediaSource {
    pub fn new(index: Arc<dyn MediaIndex>) -> Self {
        Self { index }
    }
}

impl std::fmt::Debug for LocalMediaSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalMediaSource")
            .field("collection_uri", &self.index.collection_uri())
            .finish()
    }
}

/// Coalescing poke: a full channel already has a re-query pending.
struct RequeryObserver {
    sender: mpsc::Sender<()>,
}

impl ChangeObserver for RequeryObserver {
    fn on_change(&self) {
        let _ = self.sender.try_send(());
    }
}

struct WatchState {
    index: Arc<dyn MediaIndex>,
    query: VideoQuery,
    pokes: mpsc::Receiver<()>,
    _registration: ObserverRegistration,
    last: Option<Vec<MediaVideo>>,
    primed: bool,
}

async fn fetch(index: Arc<dyn MediaIndex>, query: VideoQuery) -> Vec<MediaVideo> {
    let result = tokio::task::spawn_blocking(move || {
        index.query(&query).map(|rows| {
            rows.into_iter()
                .map(|row| MediaVideo::from_row(index.as_ref(), row))
                .collect::<Vec<_>>()
        })
    })
    .await;

    match result {
        Ok(Ok(videos)) => videos,
        Ok(Err(e)) => {
            warn!("Media index query failed, reporting no videos: {}", e);
            Vec::new()
        }
        Err(e) => {
            warn!("Media index query task failed, reporting no videos: {}", e);
            Vec::new()
        }
    }
}

#[async_trait]
impl MediaSource for LocalMediaSource {
    async fn videos(&self, query: &VideoQuery) -> Vec<MediaVideo> {
        fetch(self.index.clone(), query.clone()).await
    }

    fn videos_stream(&self, query: VideoQuery) -> BoxStream<'static, Vec<MediaVideo>> {
        let (sender, pokes) = mpsc::channel(1);
        let registration = ObserverRegistration::register(
            self.index.clone(),
            Arc::new(RequeryObserver { sender }),
        );
        debug!("Registered media index observer {:?}", registration.id());

        let state = WatchState {
            index: self.index.clone(),
            query,
            pokes,
            _registration: registration,
            last: None,
            primed: false,
        };

        stream::unfold(state, |mut state| async move {
            loop {
                if state.primed {
                    state.pokes.recv().await?;
                } else {
                    state.primed = true;
                }

                let videos = fetch(state.index.clone(), state.query.clone()).await;
                if state.last.as_ref() == Some(&videos) {
                    continue;
                }

                state.last = Some(videos.clone());
                return Some((videos, state));
            }
        })
        .boxed()
    }
}
