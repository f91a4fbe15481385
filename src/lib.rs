//! Three-tier ranking engine for short-form video feeds.
//!
//! Blends session-local behavior, durable personal preference, and
//! cohort-level trends into one adaptively-weighted score per candidate,
//! then applies a per-creator diversity constraint to the final ordering.
//!
//! The engine is pure synchronous compute: candidate generation, profile
//! persistence, and delivery all live in the surrounding services.

pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;

pub use config::{EngineConfig, WeightBounds, WeightPreset};
pub use error::{EngineError, Result};
pub use models::{
    CohortProfile, DynamicWeights, EngagementStats, EngineAnalytics, LengthBucket,
    PreferencePatch, RecommendationResult, SessionSignal, UserPreference, VideoCandidate,
};
pub use services::RecommendationEngine;
