use crate::error::{EngineError, Result};
use crate::models::DynamicWeights;
use serde::Deserialize;
use std::env;

/// Per-tier floor/ceiling plus the baseline blend triple.
///
/// The controller clamps each weight into its band on every adjustment,
/// so misconfigured bands surface at construction, not at scoring time.
#[derive(Debug, Clone, Deserialize)]
pub struct WeightBounds {
    pub baseline: DynamicWeights,
    pub alpha_floor: f64,
    pub alpha_ceiling: f64,
    pub beta_floor: f64,
    pub beta_ceiling: f64,
    pub gamma_floor: f64,
    pub gamma_ceiling: f64,
}

impl WeightBounds {
    pub fn validate(&self) -> Result<()> {
        let bands = [
            ("alpha", self.baseline.alpha, self.alpha_floor, self.alpha_ceiling),
            ("beta", self.baseline.beta, self.beta_floor, self.beta_ceiling),
            ("gamma", self.baseline.gamma, self.gamma_floor, self.gamma_ceiling),
        ];
        for (name, base, floor, ceiling) in bands {
            if !(0.0..=1.0).contains(&floor) || !(0.0..=1.0).contains(&ceiling) || floor > ceiling {
                return Err(EngineError::InvalidConfig(format!(
                    "{} band [{}, {}] is not a valid sub-range of [0, 1]",
                    name, floor, ceiling
                )));
            }
            if base < floor || base > ceiling {
                return Err(EngineError::InvalidConfig(format!(
                    "{} baseline {} outside band [{}, {}]",
                    name, base, floor, ceiling
                )));
            }
        }
        let sum = self.baseline.sum();
        if (sum - 1.0).abs() > 1e-9 {
            return Err(EngineError::InvalidConfig(format!(
                "baseline weights must sum to 1.0 (got {})",
                sum
            )));
        }
        Ok(())
    }
}

/// Operator-selectable baseline presets. The admin control surface picks
/// one; the engine only sees the resulting bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeightPreset {
    /// Lean on cohort/population signal; safest for sparse profiles
    Conservative,
    /// Lean on the durable personal profile
    PersonalizationFirst,
    /// Balanced default
    Hybrid,
}

impl WeightPreset {
    pub fn parse(name: &str) -> Result<Self> {
        match name.to_ascii_lowercase().as_str() {
            "conservative" => Ok(WeightPreset::Conservative),
            "personalization-first" | "personalization_first" => {
                Ok(WeightPreset::PersonalizationFirst)
            }
            "hybrid" => Ok(WeightPreset::Hybrid),
            other => Err(EngineError::InvalidConfig(format!(
                "unknown weight preset: {}",
                other
            ))),
        }
    }

    pub fn bounds(self) -> WeightBounds {
        match self {
            WeightPreset::Hybrid => WeightBounds {
                baseline: DynamicWeights {
                    alpha: 0.3,
                    beta: 0.4,
                    gamma: 0.3,
                },
                alpha_floor: 0.2,
                alpha_ceiling: 0.5,
                beta_floor: 0.25,
                beta_ceiling: 0.45,
                gamma_floor: 0.2,
                gamma_ceiling: 0.35,
            },
            WeightPreset::Conservative => WeightBounds {
                baseline: DynamicWeights {
                    alpha: 0.2,
                    beta: 0.3,
                    gamma: 0.5,
                },
                alpha_floor: 0.1,
                alpha_ceiling: 0.35,
                beta_floor: 0.2,
                beta_ceiling: 0.4,
                gamma_floor: 0.35,
                gamma_ceiling: 0.6,
            },
            WeightPreset::PersonalizationFirst => WeightBounds {
                baseline: DynamicWeights {
                    alpha: 0.25,
                    beta: 0.55,
                    gamma: 0.2,
                },
                alpha_floor: 0.15,
                alpha_ceiling: 0.4,
                beta_floor: 0.4,
                beta_ceiling: 0.7,
                gamma_floor: 0.1,
                gamma_ceiling: 0.3,
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub weights: WeightBounds,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            weights: WeightPreset::Hybrid.bounds(),
        }
    }
}

impl EngineConfig {
    pub fn from_preset(preset: WeightPreset) -> Self {
        Self {
            weights: preset.bounds(),
        }
    }

    /// Read the preset selection from the environment, then apply
    /// per-field overrides. `WEIGHT_PRESET` defaults to `hybrid` when
    /// unset; each baseline/band value can be overridden individually
    /// (`ALPHA_BASELINE`, `ALPHA_FLOOR`, `ALPHA_CEILING`, and the beta/
    /// gamma equivalents). The merged result is validated as a whole.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let preset_name = env::var("WEIGHT_PRESET").unwrap_or_else(|_| "hybrid".to_string());
        let mut config = Self::from_preset(WeightPreset::parse(&preset_name)?);

        let w = &mut config.weights;
        w.baseline.alpha = env_f64("ALPHA_BASELINE", w.baseline.alpha)?;
        w.baseline.beta = env_f64("BETA_BASELINE", w.baseline.beta)?;
        w.baseline.gamma = env_f64("GAMMA_BASELINE", w.baseline.gamma)?;
        w.alpha_floor = env_f64("ALPHA_FLOOR", w.alpha_floor)?;
        w.alpha_ceiling = env_f64("ALPHA_CEILING", w.alpha_ceiling)?;
        w.beta_floor = env_f64("BETA_FLOOR", w.beta_floor)?;
        w.beta_ceiling = env_f64("BETA_CEILING", w.beta_ceiling)?;
        w.gamma_floor = env_f64("GAMMA_FLOOR", w.gamma_floor)?;
        w.gamma_ceiling = env_f64("GAMMA_CEILING", w.gamma_ceiling)?;

        config.weights.validate()?;
        Ok(config)
    }
}

fn env_f64(key: &str, default: f64) -> Result<f64> {
    match env::var(key) {
        Ok(raw) => raw.parse().map_err(|_| {
            EngineError::InvalidConfig(format!("{} must be a valid f64 (got {:?})", key, raw))
        }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hybrid_matches_controller_defaults() {
        let bounds = WeightPreset::Hybrid.bounds();
        assert!((bounds.baseline.alpha - 0.3).abs() < 1e-12);
        assert!((bounds.baseline.beta - 0.4).abs() < 1e-12);
        assert!((bounds.baseline.gamma - 0.3).abs() < 1e-12);
        bounds.validate().unwrap();
    }

    #[test]
    fn test_all_presets_validate() {
        for preset in [
            WeightPreset::Conservative,
            WeightPreset::PersonalizationFirst,
            WeightPreset::Hybrid,
        ] {
            preset.bounds().validate().unwrap();
        }
    }

    #[test]
    fn test_preset_parse() {
        assert_eq!(
            WeightPreset::parse("personalization-first").unwrap(),
            WeightPreset::PersonalizationFirst
        );
        assert!(WeightPreset::parse("aggressive").is_err());
    }

    #[test]
    fn test_invalid_band_rejected() {
        let mut bounds = WeightPreset::Hybrid.bounds();
        bounds.alpha_floor = 0.6; // above ceiling
        assert!(bounds.validate().is_err());
    }

    #[test]
    fn test_from_env_preset_and_field_overrides() {
        // Single test touching the process environment to avoid
        // interference between parallel test threads
        env::set_var("WEIGHT_PRESET", "conservative");
        env::set_var("GAMMA_CEILING", "0.55");
        let config = EngineConfig::from_env().unwrap();
        assert!((config.weights.baseline.gamma - 0.5).abs() < 1e-12);
        assert!((config.weights.gamma_ceiling - 0.55).abs() < 1e-12);
        // Untouched fields keep the preset values
        assert!((config.weights.alpha_floor - 0.1).abs() < 1e-12);

        // A malformed override is a config error, not a panic
        env::set_var("GAMMA_CEILING", "wide");
        assert!(EngineConfig::from_env().is_err());

        // An override that breaks a band fails validation
        env::set_var("GAMMA_CEILING", "0.45");
        assert!(EngineConfig::from_env().is_err());

        env::remove_var("WEIGHT_PRESET");
        env::remove_var("GAMMA_CEILING");
    }
}
