//! Configuration validation.

use crate::config::AnalysisConfig;
use crate::constants::score;
use crate::error::{Error, Result};

/// Validate analysis settings before any audio is touched.
///
/// The segmenter re-checks the derived segment and hop lengths against
/// the actual sample rate; this catches plainly invalid values early
/// with messages tied to the setting the user typed.
pub fn validate_analysis(analysis: &AnalysisConfig) -> Result<()> {
    if !analysis.segment_duration.is_finite() || analysis.segment_duration <= 0.0 {
        return Err(Error::InvalidConfiguration {
            message: format!(
                "segment duration must be positive, got {}",
                analysis.segment_duration
            ),
        });
    }

    if !(0.0..1.0).contains(&analysis.overlap) {
        return Err(Error::InvalidConfiguration {
            message: format!("overlap must be in [0.0, 1.0), got {}", analysis.overlap),
        });
    }

    if analysis.top_k == 0 {
        return Err(Error::InvalidConfiguration {
            message: "top-k must be at least 1".to_string(),
        });
    }

    if !(score::MIN..=score::MAX).contains(&analysis.min_score) {
        return Err(Error::InvalidConfiguration {
            message: format!("min-score must be in [0.0, 1.0], got {}", analysis.min_score),
        });
    }

    if analysis.top_events == 0 {
        return Err(Error::InvalidConfiguration {
            message: "top-events must be at least 1".to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> AnalysisConfig {
        AnalysisConfig::default()
    }

    #[test]
    fn default_config_is_valid() {
        assert!(validate_analysis(&base()).is_ok());
    }

    #[test]
    fn rejects_nonpositive_segment_duration() {
        let mut config = base();
        config.segment_duration = 0.0;
        assert!(validate_analysis(&config).is_err());
        config.segment_duration = f32::NAN;
        assert!(validate_analysis(&config).is_err());
    }

    #[test]
    fn rejects_overlap_of_one_or_more() {
        let mut config = base();
        config.overlap = 1.0;
        assert!(validate_analysis(&config).is_err());
        config.overlap = -0.5;
        assert!(validate_analysis(&config).is_err());
        config.overlap = 0.99;
        assert!(validate_analysis(&config).is_ok());
    }

    #[test]
    fn rejects_zero_top_k() {
        let mut config = base();
        config.top_k = 0;
        assert!(validate_analysis(&config).is_err());
    }

    #[test]
    fn rejects_out_of_range_min_score() {
        let mut config = base();
        config.min_score = 1.01;
        assert!(validate_analysis(&config).is_err());
        config.min_score = 1.0;
        assert!(validate_analysis(&config).is_ok());
    }

    #[test]
    fn rejects_zero_top_events() {
        let mut config = base();
        config.top_events = 0;
        assert!(validate_analysis(&config).is_err());
    }
}
