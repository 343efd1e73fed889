//! Recommendation core for a children's video service.
//!
//! Selects a personalized, duration-bounded batch of video recommendations
//! for a user, excluding anything their external viewing history shows they
//! have already seen. Channel eligibility is resolved by age and interest,
//! candidates are sampled randomly under a watch-time budget, and each
//! recommendation carries a priority and an expiry.
//!
//! The HTTP surface, authentication, and account provisioning live in the
//! surrounding system; this crate exposes the pipeline itself plus the two
//! seams those collaborators plug into: [`db::Catalog`] for channel/video
//! reads and [`services::providers::HistoryProvider`] for the external
//! history service.
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use kidtube_recs::config::Config;
//! use kidtube_recs::db::{create_pool, PgCatalog};
//! use kidtube_recs::services::providers::memair::MemairClient;
//! use kidtube_recs::services::recommendations::RecommendationPipeline;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = Config::from_env()?;
//! let pool = create_pool(&config.database_url, config.database_max_connections).await?;
//!
//! let catalog = Arc::new(PgCatalog::new(pool));
//! let memair = Arc::new(MemairClient::new(
//!     config.memair_api_url.clone(),
//!     Duration::from_secs(config.history_timeout_secs),
//! )?);
//!
//! let pipeline = RecommendationPipeline::new(catalog, memair);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
