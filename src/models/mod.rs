use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

use crate::error::{AppError, AppResult};

/// The fixed interest vocabulary
///
/// User interests and channel tags both draw from this set. The wire and
/// database representation is the human-readable label (e.g. "Trains & Machines").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Interest {
    #[serde(rename = "Trains & Machines")]
    TrainsAndMachines,
    #[serde(rename = "Science & Technology")]
    ScienceAndTechnology,
    #[serde(rename = "Cartoons & Puppets")]
    CartoonsAndPuppets,
    #[serde(rename = "Songs & Music")]
    SongsAndMusic,
    #[serde(rename = "Movement & Dance")]
    MovementAndDance,
    #[serde(rename = "Crafts & Creative")]
    CraftsAndCreative,
    #[serde(rename = "Maths")]
    Maths,
    #[serde(rename = "Education")]
    Education,
    #[serde(rename = "Reading")]
    Reading,
    #[serde(rename = "Stories & Riddles")]
    StoriesAndRiddles,
    #[serde(rename = "Blogs")]
    Blogs,
    #[serde(rename = "News")]
    News,
    #[serde(rename = "Environment & Animals")]
    EnvironmentAndAnimals,
    #[serde(rename = "Computer Games")]
    ComputerGames,
}

impl Interest {
    /// Human-readable label, as stored in channel tags
    pub fn as_str(&self) -> &'static str {
        match self {
            Interest::TrainsAndMachines => "Trains & Machines",
            Interest::ScienceAndTechnology => "Science & Technology",
            Interest::CartoonsAndPuppets => "Cartoons & Puppets",
            Interest::SongsAndMusic => "Songs & Music",
            Interest::MovementAndDance => "Movement & Dance",
            Interest::CraftsAndCreative => "Crafts & Creative",
            Interest::Maths => "Maths",
            Interest::Education => "Education",
            Interest::Reading => "Reading",
            Interest::StoriesAndRiddles => "Stories & Riddles",
            Interest::Blogs => "Blogs",
            Interest::News => "News",
            Interest::EnvironmentAndAnimals => "Environment & Animals",
            Interest::ComputerGames => "Computer Games",
        }
    }

    /// All vocabulary entries, in display order
    pub const ALL: [Interest; 14] = [
        Interest::TrainsAndMachines,
        Interest::ScienceAndTechnology,
        Interest::CartoonsAndPuppets,
        Interest::SongsAndMusic,
        Interest::MovementAndDance,
        Interest::CraftsAndCreative,
        Interest::Maths,
        Interest::Education,
        Interest::Reading,
        Interest::StoriesAndRiddles,
        Interest::Blogs,
        Interest::News,
        Interest::EnvironmentAndAnimals,
        Interest::ComputerGames,
    ];
}

impl Display for Interest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Interest {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Interest::ALL
            .into_iter()
            .find(|interest| interest.as_str() == s)
            .ok_or_else(|| AppError::InvalidInput(format!("Unknown interest tag: {}", s)))
    }
}

/// A user of the service
///
/// `functioning_age` and `daily_watch_time` are set during onboarding;
/// recommendation generation refuses to run until both are present.
/// The Memair access token is an opaque credential issued by the
/// surrounding account component.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: i64,
    pub interests: Vec<Interest>,
    pub functioning_age: Option<i32>,
    /// Daily watch-time budget in minutes
    pub daily_watch_time: Option<i64>,
    pub memair_access_token: String,
}

impl User {
    /// Whether the user has completed onboarding far enough to receive
    /// recommendations
    pub fn is_configured(&self) -> bool {
        self.functioning_age.is_some() && self.daily_watch_time.is_some()
    }
}

/// A curated channel with an age band and interest tags
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Channel {
    pub id: i64,
    pub tags: Vec<Interest>,
    pub min_age: i32,
    pub max_age: i32,
}

impl Channel {
    /// Creates a channel, rejecting inverted age bands
    pub fn new(id: i64, tags: Vec<Interest>, min_age: i32, max_age: i32) -> AppResult<Self> {
        if min_age > max_age {
            return Err(AppError::InvalidInput(format!(
                "Channel {} has min_age {} greater than max_age {}",
                id, min_age, max_age
            )));
        }
        Ok(Self {
            id,
            tags,
            min_age,
            max_age,
        })
    }

    /// Whether the channel's age band contains the given age
    pub fn admits(&self, age: i32) -> bool {
        self.min_age <= age && age <= self.max_age
    }
}

/// A video in the catalog
///
/// `yt_id` is the canonical 11-character YouTube identifier. Channel
/// membership lives on the catalog side and is used only for eligibility
/// filtering.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Video {
    pub yt_id: String,
    pub title: String,
    pub description: String,
    pub thumbnail_url: String,
    /// Duration in seconds
    pub duration: i64,
    pub published_at: DateTime<Utc>,
}

/// A single recommendation returned to the caller
///
/// Ephemeral projection of a [`Video`]: built per request, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recommendation {
    pub yt_id: String,
    pub title: String,
    pub description: String,
    pub thumbnail_url: String,
    pub duration: i64,
    pub published_at: DateTime<Utc>,
    pub priority: i32,
    pub expires_at: DateTime<Utc>,
}

/// Parameters accepted by the recommendation pipeline
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecommendationRequest {
    /// Expiry offset in minutes from now; defaults to 25 hours
    pub expires_in: Option<i64>,
    /// Watch-time override in minutes; defaults to the user's configured
    /// daily watch time
    pub watch_time: Option<i64>,
    /// Priority attached to every recommendation in the batch; defaults to 50
    pub priority: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interest_serde_roundtrip() {
        let interest = Interest::TrainsAndMachines;
        let json = serde_json::to_string(&interest).unwrap();
        assert_eq!(json, r#""Trains & Machines""#);

        let deserialized: Interest = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, interest);
    }

    #[test]
    fn test_interest_from_str_matches_display() {
        for interest in Interest::ALL {
            let parsed: Interest = interest.as_str().parse().unwrap();
            assert_eq!(parsed, interest);
        }
    }

    #[test]
    fn test_interest_from_str_unknown_tag() {
        let result = "Underwater Basket Weaving".parse::<Interest>();
        assert!(result.is_err());
    }

    #[test]
    fn test_user_is_configured() {
        let user = User {
            id: 1,
            interests: vec![],
            functioning_age: Some(5),
            daily_watch_time: Some(30),
            memair_access_token: "token".to_string(),
        };
        assert!(user.is_configured());
    }

    #[test]
    fn test_user_missing_age_is_not_configured() {
        let user = User {
            id: 1,
            interests: vec![],
            functioning_age: None,
            daily_watch_time: Some(30),
            memair_access_token: "token".to_string(),
        };
        assert!(!user.is_configured());
    }

    #[test]
    fn test_user_missing_watch_time_is_not_configured() {
        let user = User {
            id: 1,
            interests: vec![],
            functioning_age: Some(5),
            daily_watch_time: None,
            memair_access_token: "token".to_string(),
        };
        assert!(!user.is_configured());
    }

    #[test]
    fn test_channel_admits_band_edges() {
        let channel = Channel::new(1, vec![], 3, 7).unwrap();
        assert!(channel.admits(3));
        assert!(channel.admits(5));
        assert!(channel.admits(7));
        assert!(!channel.admits(2));
        assert!(!channel.admits(8));
    }

    #[test]
    fn test_channel_rejects_inverted_age_band() {
        let result = Channel::new(1, vec![], 8, 3);
        assert!(result.is_err());
    }
}
