//! Peak normalization.

/// Scale samples in place so the absolute peak hits 1.0.
///
/// Silent or empty input is left untouched, since dividing by a zero
/// peak would produce NaNs.
pub fn normalize_peak(samples: &mut [f32]) {
    let peak = samples.iter().fold(0.0f32, |acc, &s| acc.max(s.abs()));
    if peak > 0.0 {
        let scale = 1.0 / peak;
        for s in samples.iter_mut() {
            *s *= scale;
        }
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn scales_peak_to_unity() {
        let mut samples = vec![0.1, -0.5, 0.25];
        normalize_peak(&mut samples);
        assert_eq!(samples, vec![0.2, -1.0, 0.5]);
    }

    #[test]
    fn negative_peak_counts() {
        let mut samples = vec![0.2, -0.4];
        normalize_peak(&mut samples);
        assert_eq!(samples, vec![0.5, -1.0]);
    }

    #[test]
    fn silence_is_unchanged() {
        let mut samples = vec![0.0, 0.0, 0.0];
        normalize_peak(&mut samples);
        assert_eq!(samples, vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn empty_input_is_fine() {
        let mut samples: Vec<f32> = Vec::new();
        normalize_peak(&mut samples);
        assert!(samples.is_empty());
    }

    #[test]
    fn already_normalized_is_stable() {
        let mut samples = vec![1.0, -0.5];
        normalize_peak(&mut samples);
        assert_eq!(samples, vec![1.0, -0.5]);
    }
}
