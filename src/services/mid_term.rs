use crate::models::{LengthBucket, UserPreference, VideoCandidate};
use crate::utils::clamp_unit;

/// Combined hashtag contribution never exceeds this cap
const HASHTAG_CAP: f64 = 0.30;

/// Preference-tier scorer. Matches a candidate against the durable
/// per-user profile: topic, creator, sound, and category affinities
/// plus length and time-of-day fit.
pub struct MidTermModel;

impl MidTermModel {
    /// Score a candidate against the user profile.
    ///
    /// `current_hour` (0-23) is injected by the caller so scoring never
    /// reads the system clock.
    pub fn score(
        preference: &UserPreference,
        candidate: &VideoCandidate,
        current_hour: u8,
    ) -> (f64, Vec<String>) {
        let mut score = 0.0;
        let mut factors = Vec::new();

        let mut hashtag_total = 0.0;
        for tag in &candidate.hashtags {
            if let Some(&affinity) = preference.hashtag_affinities.get(tag) {
                hashtag_total += affinity * 0.15;
                if affinity > 0.7 {
                    factors.push(format!("strong interest in #{}", tag));
                }
            }
        }
        score += hashtag_total.min(HASHTAG_CAP);

        if let Some(&affinity) = preference.creator_affinities.get(&candidate.creator_id) {
            score += affinity * 0.25;
            factors.push("followed creator affinity".to_string());
        }

        if let Some(sound_id) = &candidate.sound_id {
            if let Some(&affinity) = preference.sound_affinities.get(sound_id) {
                score += affinity * 0.10;
                factors.push("familiar sound".to_string());
            }
        }

        if let Some(&affinity) = preference.category_affinities.get(&candidate.category) {
            score += affinity * 0.20;
            factors.push(format!("preferred category: {}", candidate.category));
        }

        if let Some(preferred) = preference.preferred_length {
            if LengthBucket::for_duration(candidate.duration) == preferred {
                score += 0.10;
                factors.push("matches preferred video length".to_string());
            }
        }

        if preference.active_hours.contains(&current_hour) {
            score += 0.05;
            factors.push("active hour match".to_string());
        }

        (clamp_unit(score), factors)
    }
}
