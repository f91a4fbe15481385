use super::long_term::{ExposureLedger, LongTermModel};
use super::mid_term::MidTermModel;
use super::session_window::SignalWindow;
use super::short_term::ShortTermModel;
use crate::error::{EngineError, Result};
use crate::models::{
    CohortProfile, DynamicWeights, RecommendationResult, UserPreference, VideoCandidate,
};
use rand::Rng;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Top ranking slots a single creator may hold per batch
const MAX_PER_CREATOR: usize = 2;
/// Output length past which the per-creator cap stops applying
const DIVERSITY_WINDOW: usize = 10;

/// Blends the three tier scores per candidate, sorts, and applies the
/// per-creator diversity walk over the head of the list.
pub struct Ranker;

impl Ranker {
    /// Score and order a candidate batch.
    ///
    /// Invalid candidates are skipped with a warning; the rest of the
    /// batch is unaffected. The ledger is read during scoring and is not
    /// mutated here; the engine records exposure for admitted results
    /// after the walk.
    #[allow(clippy::too_many_arguments)]
    pub fn rank<R: Rng>(
        candidates: Vec<VideoCandidate>,
        window: &SignalWindow,
        preference: &UserPreference,
        cohort: &CohortProfile,
        ledger: &ExposureLedger,
        weights: DynamicWeights,
        current_hour: u8,
        rng: &mut R,
    ) -> Vec<RecommendationResult> {
        let mut scored: Vec<RecommendationResult> = candidates
            .into_iter()
            .filter_map(|candidate| {
                if let Err(e) = Self::validate(&candidate) {
                    warn!(error = %e, "Skipping invalid candidate");
                    return None;
                }
                Some(Self::score_candidate(
                    candidate,
                    window,
                    preference,
                    cohort,
                    ledger,
                    weights,
                    current_hour,
                    rng,
                ))
            })
            .collect();

        // Note: NaN scores are treated as less than any valid score
        scored.sort_by(|a, b| {
            b.final_score
                .partial_cmp(&a.final_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let results = Self::diversify(scored);

        debug!(
            result_count = results.len(),
            top_score = results.first().map(|r| r.final_score),
            "Ranking complete"
        );
        results
    }

    fn validate(candidate: &VideoCandidate) -> Result<()> {
        let reason = if candidate.duration <= 0.0 || !candidate.duration.is_finite() {
            Some(format!("duration must be > 0 (got {})", candidate.duration))
        } else if !candidate.engagement.completion_rate.is_finite() {
            Some("non-finite completion rate".to_string())
        } else if !candidate.quality_score.is_finite() {
            Some("non-finite quality score".to_string())
        } else {
            None
        };
        match reason {
            Some(reason) => Err(EngineError::InvalidCandidate {
                id: candidate.id.clone(),
                reason,
            }),
            None => Ok(()),
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn score_candidate<R: Rng>(
        candidate: VideoCandidate,
        window: &SignalWindow,
        preference: &UserPreference,
        cohort: &CohortProfile,
        ledger: &ExposureLedger,
        weights: DynamicWeights,
        current_hour: u8,
        rng: &mut R,
    ) -> RecommendationResult {
        let (short, short_factors) = ShortTermModel::score(window, &candidate, rng);
        let (mid, mid_factors) = MidTermModel::score(preference, &candidate, current_hour);
        let (long, long_factors) = LongTermModel::score(cohort, ledger, &candidate);

        let final_score = short * weights.alpha + mid * weights.beta + long * weights.gamma;

        let mut explanation =
            Vec::with_capacity(short_factors.len() + mid_factors.len() + long_factors.len());
        explanation.extend(short_factors.into_iter().map(|f| format!("[Session] {}", f)));
        explanation.extend(mid_factors.into_iter().map(|f| format!("[Preference] {}", f)));
        explanation.extend(long_factors.into_iter().map(|f| format!("[Cohort] {}", f)));

        RecommendationResult {
            video: candidate,
            short_term_score: short,
            mid_term_score: mid,
            long_term_score: long,
            final_score,
            explanation,
        }
    }

    /// Walk the sorted list admitting at most two entries per creator
    /// while the output is shorter than the diversity window. Once ten
    /// entries are admitted every remaining candidate passes unchecked.
    fn diversify(sorted: Vec<RecommendationResult>) -> Vec<RecommendationResult> {
        let mut admitted: Vec<RecommendationResult> = Vec::with_capacity(sorted.len());
        let mut creator_counts: HashMap<String, usize> = HashMap::new();

        for result in sorted {
            let count = creator_counts
                .entry(result.video.creator_id.clone())
                .or_insert(0);
            if *count < MAX_PER_CREATOR || admitted.len() >= DIVERSITY_WINDOW {
                *count += 1;
                admitted.push(result);
            }
        }
        admitted
    }
}
