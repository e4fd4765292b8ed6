use serde::{Deserialize, Serialize};

use crate::error::EngineError;

// ---------------------------------------------------------------------------
// Scoring coefficients
// ---------------------------------------------------------------------------

/// Per-kingdom scoring coefficients.
///
/// Targets scale with starting power:
/// `target_kp = (start_power / kp_power_divisor)
///              * (t5_mix_ratio * t5_points + (1 - t5_mix_ratio) * t4_points)
///              * kp_multiplier`
/// `target_deads = start_power * deads_multiplier`
///
/// Mutating a kingdom's config affects only future scoring runs; the
/// last scored set stands until the next recalculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Fraction of starting power expected as casualties.
    #[serde(default = "default_deads_multiplier")]
    pub deads_multiplier: f64,
    /// Weight of casualties in the cross-kingdom composite score.
    #[serde(default = "default_deads_weight")]
    pub deads_weight: f64,
    /// Divisor applied to starting power when deriving the KP target.
    #[serde(default = "default_kp_power_divisor")]
    pub kp_power_divisor: f64,
    /// Expected share of T5 kills in the T4/T5 mix, in [0, 1].
    #[serde(default = "default_t5_mix_ratio")]
    pub t5_mix_ratio: f64,
    /// Final multiplier on the KP target.
    #[serde(default = "default_kp_multiplier")]
    pub kp_multiplier: f64,
    /// Points per T4 kill.
    #[serde(default = "default_t4_points")]
    pub t4_points: f64,
    /// Points per T5 kill.
    #[serde(default = "default_t5_points")]
    pub t5_points: f64,
}

fn default_deads_multiplier() -> f64 {
    0.02
}
fn default_deads_weight() -> f64 {
    5.0
}
fn default_kp_power_divisor() -> f64 {
    3.0
}
fn default_t5_mix_ratio() -> f64 {
    0.7
}
fn default_kp_multiplier() -> f64 {
    1.25
}
fn default_t4_points() -> f64 {
    10.0
}
fn default_t5_points() -> f64 {
    20.0
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            deads_multiplier: default_deads_multiplier(),
            deads_weight: default_deads_weight(),
            kp_power_divisor: default_kp_power_divisor(),
            t5_mix_ratio: default_t5_mix_ratio(),
            kp_multiplier: default_kp_multiplier(),
            t4_points: default_t4_points(),
            t5_points: default_t5_points(),
        }
    }
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl ScoringConfig {
    pub fn from_toml(input: &str) -> Result<Self, EngineError> {
        let config: ScoringConfig =
            toml::from_str(input).map_err(|e| EngineError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        let coefficients = [
            ("deads_multiplier", self.deads_multiplier),
            ("deads_weight", self.deads_weight),
            ("kp_power_divisor", self.kp_power_divisor),
            ("t5_mix_ratio", self.t5_mix_ratio),
            ("kp_multiplier", self.kp_multiplier),
            ("t4_points", self.t4_points),
            ("t5_points", self.t5_points),
        ];
        for (name, value) in coefficients {
            if !value.is_finite() || value < 0.0 {
                return Err(EngineError::ConfigValidation(format!(
                    "{name} must be a finite non-negative number, got {value}"
                )));
            }
        }
        if self.kp_power_divisor == 0.0 {
            return Err(EngineError::ConfigValidation(
                "kp_power_divisor must be positive".into(),
            ));
        }
        if self.t5_mix_ratio > 1.0 {
            return Err(EngineError::ConfigValidation(format!(
                "t5_mix_ratio must be within [0, 1], got {}",
                self.t5_mix_ratio
            )));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = ScoringConfig::default();
        config.validate().unwrap();
        assert_eq!(config.t4_points, 10.0);
        assert_eq!(config.t5_points, 20.0);
        assert_eq!(config.kp_power_divisor, 3.0);
    }

    #[test]
    fn parse_partial_toml_fills_defaults() {
        let config = ScoringConfig::from_toml(
            r#"
deads_multiplier = 0.015
kp_multiplier = 1.0
"#,
        )
        .unwrap();
        assert_eq!(config.deads_multiplier, 0.015);
        assert_eq!(config.kp_multiplier, 1.0);
        assert_eq!(config.t5_mix_ratio, 0.7);
        assert_eq!(config.deads_weight, 5.0);
    }

    #[test]
    fn parse_empty_toml_is_all_defaults() {
        let config = ScoringConfig::from_toml("").unwrap();
        assert_eq!(config, ScoringConfig::default());
    }

    #[test]
    fn reject_zero_divisor() {
        let err = ScoringConfig::from_toml("kp_power_divisor = 0.0").unwrap_err();
        assert!(err.to_string().contains("kp_power_divisor"));
    }

    #[test]
    fn reject_negative_coefficient() {
        let err = ScoringConfig::from_toml("t4_points = -1.0").unwrap_err();
        assert!(err.to_string().contains("t4_points"));
    }

    #[test]
    fn reject_mix_ratio_above_one() {
        let err = ScoringConfig::from_toml("t5_mix_ratio = 1.5").unwrap_err();
        assert!(err.to_string().contains("t5_mix_ratio"));
    }

    #[test]
    fn reject_malformed_toml() {
        let err = ScoringConfig::from_toml("deads_multiplier = ").unwrap_err();
        assert!(matches!(err, EngineError::ConfigParse(_)));
    }
}
