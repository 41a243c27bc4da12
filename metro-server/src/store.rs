//! Shared handle to the current metro graph.
//!
//! The graph is never mutated in place. A reload builds a whole new graph
//! and swaps the handle; queries already holding the old `Arc` finish on it.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::{RwLock, watch};
use tracing::{error, info, warn};

use crate::feed::{DirectoryFeed, FeedError};
use crate::graph::{self, BuildConfig, MetroGraph};
use crate::planner::QueryError;

/// A published graph.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub graph: Arc<MetroGraph>,

    /// Increments with every publish, starting at 1.
    pub generation: u64,

    pub loaded_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct Slot {
    snapshot: Option<Snapshot>,

    /// Set when a fatal load fails before any graph was published.
    failure: Option<String>,
}

/// Thread-safe, hot-swappable graph handle with a readiness gate.
///
/// Cloning is cheap; clones share the same slot.
#[derive(Clone)]
pub struct GraphStore {
    inner: Arc<RwLock<Slot>>,
    ready: Arc<watch::Sender<bool>>,
}

impl GraphStore {
    /// Create an empty store. Queries fail with `NotInitialized` until the
    /// first [`publish`](Self::publish).
    pub fn new() -> Self {
        let (ready, _) = watch::channel(false);
        Self {
            inner: Arc::new(RwLock::new(Slot::default())),
            ready: Arc::new(ready),
        }
    }

    /// The current snapshot, failing fast if nothing is published yet.
    ///
    /// Returns `LoadFailed` rather than `NotInitialized` once the first load
    /// has failed fatally.
    pub async fn current(&self) -> Result<Snapshot, QueryError> {
        let slot = self.inner.read().await;
        match (&slot.snapshot, &slot.failure) {
            (Some(snapshot), _) => Ok(snapshot.clone()),
            (None, Some(reason)) => Err(QueryError::LoadFailed(reason.clone())),
            (None, None) => Err(QueryError::NotInitialized),
        }
    }

    /// Wait for the first publish, then return the current snapshot.
    /// Gives up with `LoadFailed` if the first load fails.
    pub async fn wait_ready(&self) -> Result<Snapshot, QueryError> {
        let mut rx = self.ready.subscribe();
        loop {
            match self.current().await {
                Err(QueryError::NotInitialized) => {}
                other => return other,
            }
            // can't fail while `self` holds the sender
            let _ = rx.changed().await;
        }
    }

    /// Why the first load failed, if it did and nothing has been published
    /// since.
    pub async fn failure(&self) -> Option<String> {
        self.inner.read().await.failure.clone()
    }

    pub fn is_ready(&self) -> bool {
        *self.ready.borrow()
    }

    /// Replace the current graph. Returns the new generation.
    pub async fn publish(&self, graph: MetroGraph) -> u64 {
        let graph = Arc::new(graph);
        let generation = {
            let mut slot = self.inner.write().await;
            let generation = slot.snapshot.as_ref().map_or(1, |s| s.generation + 1);
            slot.snapshot = Some(Snapshot {
                graph: Arc::clone(&graph),
                generation,
                loaded_at: Utc::now(),
            });
            slot.failure = None;
            generation
        };
        self.ready.send_replace(true);

        info!(
            generation,
            stations = graph.station_count(),
            lines = graph.line_count(),
            degraded = graph.is_degraded(),
            "Published metro graph"
        );
        generation
    }

    /// Build a graph from a feed directory on a blocking thread and publish
    /// it.
    ///
    /// On failure the current graph, if any, stays in place and the error is
    /// returned. A fatal failure with no graph published puts the store in
    /// the failed state reported by [`current`](Self::current).
    pub async fn reload_from(
        &self,
        dir: impl Into<PathBuf>,
        config: &BuildConfig,
    ) -> Result<u64, FeedError> {
        let dir = dir.into();
        let config = config.clone();

        let built = tokio::task::spawn_blocking(move || {
            let source = DirectoryFeed::new(dir);
            graph::build(&source, &config)
        })
        .await
        .unwrap_or_else(|e| Err(FeedError::BuildTask(e.to_string())));

        match built {
            Ok(graph) => Ok(self.publish(graph).await),
            Err(e) => {
                let mut slot = self.inner.write().await;
                if slot.snapshot.is_some() {
                    warn!(error = %e, "Feed reload failed, keeping current graph");
                } else if e.is_fatal() {
                    error!(error = %e, "Initial feed load failed");
                    slot.failure = Some(e.to_string());
                    drop(slot);
                    self.ready.send_replace(false);
                }
                Err(e)
            }
        }
    }
}

impl Default for GraphStore {
    fn default() -> Self {
        Self::new()
    }
}
