use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use rand::thread_rng;

use crate::{
    db::Catalog,
    error::{AppError, AppResult},
    models::{Recommendation, RecommendationRequest, User, Video},
    services::{eligibility, exclusions, providers::HistoryProvider, sampler},
};

/// Priority attached to recommendations when the request does not specify one
pub const DEFAULT_PRIORITY: i32 = 50;

/// Expiry offset applied when the request does not specify one
pub const DEFAULT_EXPIRY_HOURS: i64 = 25;

/// The recommendation-selection pipeline
///
/// Owns the two external seams: the video/channel catalog and the viewing
/// history provider. Holds no per-request state; every call produces a fresh,
/// never-persisted batch.
pub struct RecommendationPipeline {
    catalog: Arc<dyn Catalog>,
    history: Arc<dyn HistoryProvider>,
}

impl RecommendationPipeline {
    pub fn new(catalog: Arc<dyn Catalog>, history: Arc<dyn HistoryProvider>) -> Self {
        Self { catalog, history }
    }

    /// Produces a batch of recommendations for the user
    ///
    /// Refuses to run until the user has both a functioning age and a daily
    /// watch time. The history fetch and the catalog reads are issued
    /// concurrently and combined only once both complete; a failure in either
    /// fails the request.
    pub async fn recommendations_for(
        &self,
        user: &User,
        request: RecommendationRequest,
    ) -> AppResult<Vec<Recommendation>> {
        let (Some(age), Some(daily_watch_time)) = (user.functioning_age, user.daily_watch_time)
        else {
            return Err(AppError::NotConfigured(format!(
                "User {} has no functioning age or daily watch time",
                user.id
            )));
        };

        let watch_time = request.watch_time.unwrap_or(daily_watch_time);
        if watch_time <= 0 {
            return Err(AppError::InvalidInput(format!(
                "Watch time must be positive, got {}",
                watch_time
            )));
        }
        let budget_secs = watch_time * 60;

        let priority = request.priority.unwrap_or(DEFAULT_PRIORITY);
        let now = Utc::now();
        let expires_at = match request.expires_in {
            Some(minutes) => now + Duration::minutes(minutes),
            None => now + Duration::hours(DEFAULT_EXPIRY_HOURS),
        };

        tracing::info!(
            user_id = user.id,
            age,
            watch_time,
            priority,
            "Generating recommendations"
        );

        let (excluded, pool) = tokio::try_join!(
            exclusions::excluded_video_ids(
                self.history.as_ref(),
                self.catalog.as_ref(),
                &user.memair_access_token,
            ),
            self.candidate_pool(user, age, budget_secs),
        )?;

        let sampled = sampler::sample_within_budget(pool, &excluded, budget_secs, &mut thread_rng());

        tracing::info!(
            user_id = user.id,
            excluded = excluded.len(),
            selected = sampled.len(),
            "Recommendations generated"
        );

        Ok(build_recommendations(sampled, priority, expires_at))
    }

    /// Loads candidate videos from the channels the user is eligible for
    ///
    /// When interest filtering leaves no channels, candidates are drawn from
    /// all recommendable channels instead.
    async fn candidate_pool(
        &self,
        user: &User,
        age: i32,
        budget_secs: i64,
    ) -> AppResult<Vec<Video>> {
        let recommendable = self.catalog.channels_for_age(age).await?;
        let preferred = eligibility::preferred_channels(&recommendable, &user.interests);

        let channels = if preferred.is_empty() {
            tracing::debug!(
                user_id = user.id,
                recommendable = recommendable.len(),
                "No preferred channels, drawing from all recommendable channels"
            );
            recommendable
        } else {
            preferred
        };

        let channel_ids: Vec<i64> = channels.iter().map(|channel| channel.id).collect();
        if channel_ids.is_empty() {
            return Ok(Vec::new());
        }

        self.catalog
            .videos_for_channels(channel_ids, budget_secs)
            .await
    }
}

/// Wraps sampled videos with priority and expiry metadata, preserving order
pub fn build_recommendations(
    videos: Vec<Video>,
    priority: i32,
    expires_at: DateTime<Utc>,
) -> Vec<Recommendation> {
    videos
        .into_iter()
        .map(|video| Recommendation {
            yt_id: video.yt_id,
            title: video.title,
            description: video.description,
            thumbnail_url: video.thumbnail_url,
            duration: video.duration,
            published_at: video.published_at,
            priority,
            expires_at,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MockCatalog;
    use crate::models::{Channel, Interest};
    use crate::services::providers::MockHistoryProvider;
    use std::collections::HashSet;
    use tokio_test::assert_err;

    fn configured_user(interests: Vec<Interest>) -> User {
        User {
            id: 1,
            interests,
            functioning_age: Some(5),
            daily_watch_time: Some(30),
            memair_access_token: "token".to_string(),
        }
    }

    fn video(yt_id: &str, duration: i64) -> Video {
        Video {
            yt_id: yt_id.to_string(),
            title: format!("Video {}", yt_id),
            description: String::new(),
            thumbnail_url: String::new(),
            duration,
            published_at: Utc::now(),
        }
    }

    fn pipeline(catalog: MockCatalog, history: MockHistoryProvider) -> RecommendationPipeline {
        RecommendationPipeline::new(Arc::new(catalog), Arc::new(history))
    }

    #[tokio::test]
    async fn test_unconfigured_user_is_refused() {
        let user = User {
            id: 1,
            interests: vec![],
            functioning_age: None,
            daily_watch_time: None,
            memair_access_token: "token".to_string(),
        };

        let result = pipeline(MockCatalog::new(), MockHistoryProvider::new())
            .recommendations_for(&user, RecommendationRequest::default())
            .await;

        assert!(matches!(result, Err(AppError::NotConfigured(_))));
    }

    #[tokio::test]
    async fn test_watch_time_override_does_not_bypass_configuration_gate() {
        let user = User {
            id: 1,
            interests: vec![],
            functioning_age: Some(5),
            daily_watch_time: None,
            memair_access_token: "token".to_string(),
        };

        let request = RecommendationRequest {
            watch_time: Some(30),
            ..Default::default()
        };

        let result = pipeline(MockCatalog::new(), MockHistoryProvider::new())
            .recommendations_for(&user, request)
            .await;

        assert!(matches!(result, Err(AppError::NotConfigured(_))));
    }

    #[tokio::test]
    async fn test_history_failure_fails_the_request() {
        let mut history = MockHistoryProvider::new();
        history.expect_recent_watched().returning(|_, _| {
            Err(AppError::ExternalService(
                "Memair returned status 502".to_string(),
            ))
        });

        let mut catalog = MockCatalog::new();
        catalog
            .expect_channels_for_age()
            .returning(|_| Ok(Vec::new()));
        catalog
            .expect_videos_for_channels()
            .returning(|_, _| Ok(Vec::new()));

        let result = pipeline(catalog, history)
            .recommendations_for(&configured_user(vec![]), RecommendationRequest::default())
            .await;

        let err = assert_err!(result);
        assert!(matches!(err, AppError::ExternalService(_)));
    }

    #[tokio::test]
    async fn test_catalog_failure_fails_the_request() {
        let mut history = MockHistoryProvider::new();
        history.expect_recent_watched().returning(|_, _| Ok(Vec::new()));

        let mut catalog = MockCatalog::new();
        catalog
            .expect_channels_for_age()
            .returning(|_| Err(AppError::Database(sqlx::Error::PoolClosed)));

        let result = pipeline(catalog, history)
            .recommendations_for(&configured_user(vec![]), RecommendationRequest::default())
            .await;

        assert!(matches!(result, Err(AppError::Database(_))));
    }

    #[tokio::test]
    async fn test_falls_back_to_recommendable_when_no_interest_overlap() {
        let mut history = MockHistoryProvider::new();
        history.expect_recent_watched().returning(|_, _| Ok(Vec::new()));

        let mut catalog = MockCatalog::new();
        catalog.expect_channels_for_age().returning(|_| {
            Ok(vec![
                Channel::new(10, vec![Interest::SongsAndMusic], 3, 7).unwrap()
            ])
        });
        catalog
            .expect_videos_for_channels()
            .withf(|channel_ids, _| channel_ids == &[10])
            .returning(|_, _| Ok(vec![video("aaaaaaaaaaa", 120)]));

        // The user's interests match nothing, so the pipeline falls back to
        // the full recommendable set.
        let recommendations = pipeline(catalog, history)
            .recommendations_for(
                &configured_user(vec![Interest::Maths]),
                RecommendationRequest::default(),
            )
            .await
            .unwrap();

        assert_eq!(recommendations.len(), 1);
        assert_eq!(recommendations[0].yt_id, "aaaaaaaaaaa");
    }

    #[tokio::test]
    async fn test_no_recommendable_channels_yields_empty_batch() {
        let mut history = MockHistoryProvider::new();
        history.expect_recent_watched().returning(|_, _| Ok(Vec::new()));

        let mut catalog = MockCatalog::new();
        catalog
            .expect_channels_for_age()
            .returning(|_| Ok(Vec::new()));
        catalog.expect_videos_for_channels().times(0);

        let recommendations = pipeline(catalog, history)
            .recommendations_for(&configured_user(vec![]), RecommendationRequest::default())
            .await
            .unwrap();

        assert!(recommendations.is_empty());
    }

    #[tokio::test]
    async fn test_non_positive_watch_time_override_is_rejected() {
        let request = RecommendationRequest {
            watch_time: Some(0),
            ..Default::default()
        };

        let result = pipeline(MockCatalog::new(), MockHistoryProvider::new())
            .recommendations_for(&configured_user(vec![]), request)
            .await;

        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn test_build_recommendations_copies_fields_and_preserves_order() {
        let videos = vec![video("aaaaaaaaaaa", 120), video("bbbbbbbbbbb", 240)];
        let expires_at = Utc::now() + Duration::hours(1);

        let recommendations = build_recommendations(videos.clone(), 75, expires_at);

        assert_eq!(recommendations.len(), 2);
        for (recommendation, video) in recommendations.iter().zip(&videos) {
            assert_eq!(recommendation.yt_id, video.yt_id);
            assert_eq!(recommendation.title, video.title);
            assert_eq!(recommendation.duration, video.duration);
            assert_eq!(recommendation.published_at, video.published_at);
            assert_eq!(recommendation.priority, 75);
            assert_eq!(recommendation.expires_at, expires_at);
        }
    }

    #[test]
    fn test_build_recommendations_empty_input() {
        let recommendations = build_recommendations(Vec::new(), DEFAULT_PRIORITY, Utc::now());
        assert!(recommendations.is_empty());
    }
}
