use crate::config::WeightBounds;
use crate::models::DynamicWeights;
use tracing::debug;

/// Session engagement rate below which the controller shifts weight
/// toward the session tier (with enough observations)
const LOW_ENGAGEMENT_RATE: f64 = 0.1;
/// Minimum logged interactions before the low-engagement shift fires
const LOW_ENGAGEMENT_MIN_COUNT: u32 = 5;
/// Session engagement rate above which the controller shifts weight
/// toward the preference and cohort tiers
const HIGH_ENGAGEMENT_RATE: f64 = 0.3;

/// Maintains the three normalized blend weights and adapts them after
/// each logged interaction based on the running session engagement rate.
///
/// A disengaged session (low rate after enough videos) means the durable
/// profile is missing the mark, so weight shifts toward live session
/// signal. An engaged session shifts it back toward the profile and
/// cohort tiers.
#[derive(Debug)]
pub struct WeightController {
    bounds: WeightBounds,
    weights: DynamicWeights,
    session_engagement_rate: f64,
    session_video_count: u32,
}

impl WeightController {
    pub fn new(bounds: WeightBounds) -> Self {
        let weights = bounds.baseline;
        Self {
            bounds,
            weights,
            session_engagement_rate: 0.0,
            session_video_count: 0,
        }
    }

    pub fn weights(&self) -> DynamicWeights {
        self.weights
    }

    pub fn session_engagement_rate(&self) -> f64 {
        self.session_engagement_rate
    }

    pub fn session_video_count(&self) -> u32 {
        self.session_video_count
    }

    /// Fold one logged interaction into the running engagement mean and
    /// adjust the blend weights, renormalizing to sum exactly 1.
    pub fn observe(&mut self, engaged: bool) {
        self.session_video_count += 1;
        let n = self.session_video_count as f64;
        let observed = if engaged { 1.0 } else { 0.0 };
        self.session_engagement_rate =
            (self.session_engagement_rate * (n - 1.0) + observed) / n;

        let w = &mut self.weights;
        if self.session_engagement_rate < LOW_ENGAGEMENT_RATE
            && self.session_video_count > LOW_ENGAGEMENT_MIN_COUNT
        {
            w.alpha = (w.alpha + 0.05).min(self.bounds.alpha_ceiling);
            w.beta = (w.beta - 0.025).max(self.bounds.beta_floor);
            w.gamma = (w.gamma - 0.025).max(self.bounds.gamma_floor);
        } else if self.session_engagement_rate > HIGH_ENGAGEMENT_RATE {
            w.alpha = (w.alpha - 0.02).max(self.bounds.alpha_floor);
            w.beta = (w.beta + 0.01).min(self.bounds.beta_ceiling);
            w.gamma = (w.gamma + 0.01).min(self.bounds.gamma_ceiling);
        }

        let sum = w.sum();
        w.alpha /= sum;
        w.beta /= sum;
        w.gamma /= sum;

        debug!(
            alpha = w.alpha,
            beta = w.beta,
            gamma = w.gamma,
            engagement_rate = self.session_engagement_rate,
            video_count = self.session_video_count,
            "Weights adjusted"
        );
    }

    /// Restore baseline weights and zero the session counters.
    pub fn start_new_session(&mut self) {
        self.weights = self.bounds.baseline;
        self.session_engagement_rate = 0.0;
        self.session_video_count = 0;
    }
}
