use std::collections::HashSet;

use chrono::{DateTime, Utc};
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::db::Catalog;
use crate::error::AppResult;
use crate::models::{Channel, Interest, Video};

/// Opens the connection pool backing [`PgCatalog`]
///
/// `max_connections` bounds how many catalog reads can be in flight at once;
/// it comes from configuration alongside the database URL.
pub async fn create_pool(database_url: &str, max_connections: u32) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;

    Ok(pool)
}

/// Catalog backed by the PostgreSQL channel/video tables
pub struct PgCatalog {
    pool: PgPool,
}

impl PgCatalog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Decodes raw channel tags, skipping anything outside the interest vocabulary
fn parse_tags(channel_id: i64, tags: Vec<String>) -> Vec<Interest> {
    tags.into_iter()
        .filter_map(|tag| match tag.parse::<Interest>() {
            Ok(interest) => Some(interest),
            Err(_) => {
                tracing::debug!(channel_id, tag = %tag, "Skipping unknown channel tag");
                None
            }
        })
        .collect()
}

#[async_trait::async_trait]
impl Catalog for PgCatalog {
    async fn channels_for_age(&self, age: i32) -> AppResult<Vec<Channel>> {
        let rows: Vec<(i64, Vec<String>, i32, i32)> = sqlx::query_as(
            r#"
            SELECT id, tags, min_age, max_age
            FROM channels
            WHERE $1 BETWEEN min_age AND max_age
            "#,
        )
        .bind(age)
        .fetch_all(&self.pool)
        .await?;

        let channels = rows
            .into_iter()
            .map(|(id, tags, min_age, max_age)| Channel {
                id,
                tags: parse_tags(id, tags),
                min_age,
                max_age,
            })
            .collect();

        Ok(channels)
    }

    async fn videos_for_channels(
        &self,
        channel_ids: Vec<i64>,
        max_duration_secs: i64,
    ) -> AppResult<Vec<Video>> {
        if channel_ids.is_empty() {
            return Ok(Vec::new());
        }

        // Randomization happens at the application layer, so the read is a
        // plain filtered scan.
        let rows: Vec<(String, String, String, String, i64, DateTime<Utc>)> = sqlx::query_as(
            r#"
            SELECT yt_id, title, description, thumbnail_url, duration, published_at
            FROM videos
            WHERE channel_id = ANY($1) AND duration < $2
            "#,
        )
        .bind(&channel_ids)
        .bind(max_duration_secs)
        .fetch_all(&self.pool)
        .await?;

        let videos = rows
            .into_iter()
            .map(
                |(yt_id, title, description, thumbnail_url, duration, published_at)| Video {
                    yt_id,
                    title,
                    description,
                    thumbnail_url,
                    duration,
                    published_at,
                },
            )
            .collect();

        Ok(videos)
    }

    async fn resolve_video_ids(&self, yt_ids: HashSet<String>) -> AppResult<HashSet<String>> {
        if yt_ids.is_empty() {
            return Ok(HashSet::new());
        }

        let ids: Vec<String> = yt_ids.into_iter().collect();

        let rows: Vec<(String,)> = sqlx::query_as(
            r#"
            SELECT yt_id
            FROM videos
            WHERE yt_id = ANY($1)
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|(yt_id,)| yt_id).collect())
    }
}
