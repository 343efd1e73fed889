/// Viewing-history provider abstraction
///
/// The exclusion set is derived from an external personal-data service that
/// records what the user has already watched. The pipeline talks to it
/// through this trait so tests can script history responses.
use async_trait::async_trait;
use serde::Deserialize;

use crate::error::AppResult;

pub mod memair;

/// A single viewing-history entry
///
/// Transient: consumed only to derive excluded video identifiers.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct HistoryEntry {
    pub url: String,
}

/// Trait for viewing-history providers
///
/// Credentials are per-call parameters; implementations hold no per-user
/// state.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HistoryProvider: Send + Sync {
    /// The user's most recent watched-video entries, newest first
    ///
    /// Fails with an external service error on transport failures,
    /// non-success responses, and structurally invalid payloads. Callers must
    /// never substitute an empty history for a failed fetch.
    async fn recent_watched(&self, access_token: &str, limit: u32) -> AppResult<Vec<HistoryEntry>>;

    /// Revokes the access token held by the caller
    ///
    /// Invoked by the account-management component before a user record is
    /// removed. The recommendation pipeline itself never calls this.
    async fn revoke_token(&self, access_token: &str) -> AppResult<()>;
}
