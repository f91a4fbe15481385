use super::session_window::SignalWindow;
use crate::models::VideoCandidate;
use crate::utils::clamp_unit;
use rand::Rng;
use tracing::debug;

/// Neutral score returned before any session signal exists
const BASELINE_SCORE: f64 = 0.5;

/// Session-tier scorer. Looks only at the live [`SignalWindow`]:
/// completion patterns, skip behavior, replays, and candidate freshness.
///
/// Exploration noise comes from a caller-supplied RNG so scoring stays
/// reproducible under test.
pub struct ShortTermModel;

impl ShortTermModel {
    /// Score a candidate against the current session window.
    ///
    /// Returns the score in [0, 1] plus the factors that shaped it.
    pub fn score<R: Rng>(
        window: &SignalWindow,
        candidate: &VideoCandidate,
        rng: &mut R,
    ) -> (f64, Vec<String>) {
        if window.is_empty() {
            return (
                BASELINE_SCORE,
                vec!["no session data, baseline".to_string()],
            );
        }

        let mut score = BASELINE_SCORE;
        let mut factors = Vec::new();

        let avg_completion = window.avg_completion_ratio();
        if avg_completion > 0.7 && candidate.duration > 30.0 {
            score += 0.15;
            factors.push("prefers longer content".to_string());
        } else if avg_completion <= 0.7 && candidate.duration < 20.0 {
            score += 0.10;
            factors.push("prefers shorter content".to_string());
        }

        let skip_rate = window.skip_rate();
        if skip_rate > 0.5 {
            // Bounded exploration bonus in [0, 0.2)
            let exploration = rng.gen::<f64>() * 0.2;
            score += exploration;
            factors.push("high skip rate, exploring".to_string());
            debug!(skip_rate, exploration, "Exploration bonus applied");
        }

        if window.any_replayed() {
            score += 0.10;
            factors.push("replays content".to_string());
        }

        if candidate.freshness_hours < 6.0 {
            score += 0.15;
            factors.push("fresh content boost".to_string());
        }

        (clamp_unit(score), factors)
    }
}
