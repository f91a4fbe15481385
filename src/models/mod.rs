use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One user-video interaction event, as delivered by the client event stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSignal {
    pub video_id: String,
    /// Seconds of the video actually watched
    pub watch_duration: f64,
    /// Full video length in seconds; must be > 0
    pub total_duration: f64,
    pub liked: bool,
    pub commented: bool,
    pub shared: bool,
    pub saved: bool,
    pub skipped: bool,
    pub replayed: bool,
    pub timestamp: DateTime<Utc>,
    /// Scroll speed when the video left the viewport (px/s)
    pub scroll_velocity: f64,
}

impl SessionSignal {
    /// A signal counts as engaged when the user took any explicit action.
    pub fn is_engaged(&self) -> bool {
        self.liked || self.commented || self.shared || self.saved
    }
}

/// Duration bucket used for length-fit scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthBucket {
    Short,
    Medium,
    Long,
}

impl LengthBucket {
    /// Short: < 20s, Medium: 20-45s, Long: >= 45s
    pub fn for_duration(duration_secs: f64) -> Self {
        if duration_secs < 20.0 {
            LengthBucket::Short
        } else if duration_secs < 45.0 {
            LengthBucket::Medium
        } else {
            LengthBucket::Long
        }
    }
}

/// Durable per-user preference profile, built by external aggregation jobs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserPreference {
    pub hashtag_affinities: HashMap<String, f64>,
    pub creator_affinities: HashMap<String, f64>,
    pub sound_affinities: HashMap<String, f64>,
    pub category_affinities: HashMap<String, f64>,
    pub avg_watch_time: f64,
    pub preferred_length: Option<LengthBucket>,
    /// Hours of day (0-23) the user is typically active
    pub active_hours: Vec<u8>,
    pub engagement_rate: f64,
}

/// Merge patch for [`UserPreference`]: maps merge by key, scalars
/// overwrite when present.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PreferencePatch {
    pub hashtag_affinities: Option<HashMap<String, f64>>,
    pub creator_affinities: Option<HashMap<String, f64>>,
    pub sound_affinities: Option<HashMap<String, f64>>,
    pub category_affinities: Option<HashMap<String, f64>>,
    pub avg_watch_time: Option<f64>,
    pub preferred_length: Option<LengthBucket>,
    pub active_hours: Option<Vec<u8>>,
    pub engagement_rate: Option<f64>,
}

impl UserPreference {
    /// Apply a merge patch from the external profile job.
    pub fn apply_patch(&mut self, patch: PreferencePatch) {
        if let Some(map) = patch.hashtag_affinities {
            self.hashtag_affinities.extend(map);
        }
        if let Some(map) = patch.creator_affinities {
            self.creator_affinities.extend(map);
        }
        if let Some(map) = patch.sound_affinities {
            self.sound_affinities.extend(map);
        }
        if let Some(map) = patch.category_affinities {
            self.category_affinities.extend(map);
        }
        if let Some(v) = patch.avg_watch_time {
            self.avg_watch_time = v;
        }
        if let Some(v) = patch.preferred_length {
            self.preferred_length = Some(v);
        }
        if let Some(v) = patch.active_hours {
            self.active_hours = v;
        }
        if let Some(v) = patch.engagement_rate {
            self.engagement_rate = v;
        }
    }
}

/// Population-level aggregate supplied by the analytics batch job.
/// Read-only to the engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CohortProfile {
    pub trending_topics: Vec<String>,
    /// Category -> share of cohort watch time, in [0, 1]
    pub content_preferences: HashMap<String, f64>,
    pub avg_engagement_rate: f64,
    pub demographics: String,
}

/// Aggregate engagement counters for a candidate video.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngagementStats {
    pub views: u64,
    pub likes: u64,
    pub comments: u64,
    pub shares: u64,
    /// Mean fraction of the video watched per view, in [0, 1]
    pub completion_rate: f64,
}

/// One rankable video, pre-filtered by the upstream candidate generator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoCandidate {
    pub id: String,
    pub creator_id: String,
    pub hashtags: Vec<String>,
    pub category: String,
    pub sound_id: Option<String>,
    /// Video length in seconds
    pub duration: f64,
    /// Hours since publication
    pub freshness_hours: f64,
    pub engagement: EngagementStats,
    pub quality_score: f64,
    pub creator_followers: u64,
    pub creator_engagement_rate: f64,
}

/// Blend coefficients for the three scoring tiers.
/// Invariant: alpha + beta + gamma == 1 within floating epsilon.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DynamicWeights {
    /// Session tier (short-term)
    pub alpha: f64,
    /// Preference tier (mid-term)
    pub beta: f64,
    /// Cohort tier (long-term)
    pub gamma: f64,
}

impl DynamicWeights {
    pub fn sum(&self) -> f64 {
        self.alpha + self.beta + self.gamma
    }
}

/// Scored output for a single candidate. Not persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationResult {
    pub video: VideoCandidate,
    pub short_term_score: f64,
    pub mid_term_score: f64,
    pub long_term_score: f64,
    pub final_score: f64,
    /// Tier-prefixed human-readable scoring factors
    pub explanation: Vec<String>,
}

/// Snapshot of engine state for observability tooling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineAnalytics {
    pub weights: DynamicWeights,
    pub session_engagement_rate: f64,
    pub session_video_count: u32,
    pub window_len: usize,
}
