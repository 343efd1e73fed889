use std::collections::HashSet;

use crate::db::Catalog;
use crate::error::AppResult;
use crate::services::providers::HistoryProvider;
use crate::services::youtube;

/// Number of history entries consulted when building the exclusion set
pub const HISTORY_FETCH_LIMIT: u32 = 200;

/// Builds the set of video identifiers the user has already seen
///
/// Fetches the most recent history entries, extracts video ids from their
/// URLs (entries that are not video links are skipped), deduplicates, and
/// resolves the result against the catalog; ids the catalog does not know
/// are dropped. Provider failures propagate: a failed fetch is never
/// replaced by an empty exclusion set.
pub async fn excluded_video_ids(
    history: &dyn HistoryProvider,
    catalog: &dyn Catalog,
    access_token: &str,
) -> AppResult<HashSet<String>> {
    let entries = history
        .recent_watched(access_token, HISTORY_FETCH_LIMIT)
        .await?;

    let seen: HashSet<String> = entries
        .iter()
        .filter_map(|entry| youtube::video_id(&entry.url))
        .collect();

    tracing::debug!(
        entries = entries.len(),
        extracted = seen.len(),
        "Watch history resolved to video ids"
    );

    if seen.is_empty() {
        return Ok(HashSet::new());
    }

    catalog.resolve_video_ids(seen).await
}
