use super::long_term::ExposureLedger;
use super::ranker::Ranker;
use super::session_window::SignalWindow;
use super::weights::WeightController;
use crate::config::EngineConfig;
use crate::error::Result;
use crate::models::{
    CohortProfile, EngineAnalytics, PreferencePatch, RecommendationResult, SessionSignal,
    UserPreference, VideoCandidate,
};
use rand::Rng;
use tracing::{debug, info};

/// Per-user recommendation engine instance.
///
/// Owns all mutable session state (signal window, blend weights, exposure
/// ledger) behind `&mut self`, so a session's interaction logging and
/// ranking calls are serialized by construction. Instances for different
/// users share nothing and run independently.
///
/// The RNG powering the exploration bonus and the scoring clock
/// (`current_hour`) are injected by the caller.
pub struct RecommendationEngine<R: Rng> {
    window: SignalWindow,
    preference: UserPreference,
    cohort: CohortProfile,
    controller: WeightController,
    ledger: ExposureLedger,
    rng: R,
}

impl<R: Rng> RecommendationEngine<R> {
    pub fn new(
        config: EngineConfig,
        preference: UserPreference,
        cohort: CohortProfile,
        rng: R,
    ) -> Result<Self> {
        config.weights.validate()?;
        Ok(Self {
            window: SignalWindow::new(),
            preference,
            cohort,
            controller: WeightController::new(config.weights),
            ledger: ExposureLedger::new(),
            rng,
        })
    }

    /// Fold one interaction into the session window and adapt the blend
    /// weights. Invalid signals are rejected without touching any state.
    pub fn log_interaction(&mut self, signal: SessionSignal) -> Result<()> {
        let engaged = signal.is_engaged();
        self.window.push(signal)?;
        self.controller.observe(engaged);
        Ok(())
    }

    /// Score, sort, and diversify a candidate batch.
    ///
    /// `current_hour` is the caller's local hour of day (0-23), used for
    /// the preference-tier time-of-day fit. Exposure for admitted results
    /// is recorded after the diversity walk so every candidate in the
    /// batch is scored against the same ledger state.
    pub fn rank_videos(
        &mut self,
        candidates: Vec<VideoCandidate>,
        current_hour: u8,
    ) -> Vec<RecommendationResult> {
        let weights = self.controller.weights();
        debug!(
            candidate_count = candidates.len(),
            alpha = weights.alpha,
            beta = weights.beta,
            gamma = weights.gamma,
            "Ranking candidate batch"
        );

        let results = Ranker::rank(
            candidates,
            &self.window,
            &self.preference,
            &self.cohort,
            &self.ledger,
            weights,
            current_hour,
            &mut self.rng,
        );

        for result in &results {
            self.ledger.record(&result.video.creator_id);
        }
        results
    }

    /// Drop all session state: window, exposure ledger, weight adaptation.
    pub fn start_new_session(&mut self) {
        info!("Starting new session");
        self.window.clear();
        self.ledger.reset();
        self.controller.start_new_session();
    }

    /// Merge a profile update from the external preference job.
    pub fn update_preference(&mut self, patch: PreferencePatch) {
        self.preference.apply_patch(patch);
    }

    /// Replace the cohort snapshot (refreshed by the analytics batch job).
    pub fn set_cohort_profile(&mut self, cohort: CohortProfile) {
        self.cohort = cohort;
    }

    /// Current weights and session counters for observability tooling.
    pub fn get_analytics(&self) -> EngineAnalytics {
        EngineAnalytics {
            weights: self.controller.weights(),
            session_engagement_rate: self.controller.session_engagement_rate(),
            session_video_count: self.controller.session_video_count(),
            window_len: self.window.len(),
        }
    }
}
