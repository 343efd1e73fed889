use std::collections::HashSet;

use async_trait::async_trait;

use crate::error::AppResult;
use crate::models::{Channel, Video};

pub mod postgres;

pub use postgres::{create_pool, PgCatalog};

/// Read-only access to the channel/video catalog
///
/// The pipeline reads the catalog through this trait so tests can substitute
/// an in-memory store. All reads are point-in-time consistent; nothing here
/// mutates catalog state.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Channels whose age band contains the given age
    async fn channels_for_age(&self, age: i32) -> AppResult<Vec<Channel>>;

    /// Videos belonging to the given channels with a duration strictly under
    /// the given bound, in seconds
    async fn videos_for_channels(
        &self,
        channel_ids: Vec<i64>,
        max_duration_secs: i64,
    ) -> AppResult<Vec<Video>>;

    /// The subset of the given video identifiers that exist in the catalog
    ///
    /// Identifiers the catalog does not know are simply absent from the
    /// result.
    async fn resolve_video_ids(&self, yt_ids: HashSet<String>) -> AppResult<HashSet<String>>;
}
