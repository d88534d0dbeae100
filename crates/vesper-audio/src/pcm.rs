//! PCM sample conversions.
//!
//! Capture and playback work in f32, while the recognition and synthesis
//! seams carry 16-bit PCM. Conversions clamp rather than wrap on overflow.

/// Convert f32 samples in [-1.0, 1.0] to 16-bit PCM.
pub fn f32_to_i16(samples: &[f32]) -> Vec<i16> {
    samples
        .iter()
        .map(|&sample| (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16)
        .collect()
}

/// Convert 16-bit PCM samples to f32 in [-1.0, 1.0].
pub fn i16_to_f32(samples: &[i16]) -> Vec<f32> {
    samples
        .iter()
        .map(|&sample| sample as f32 / i16::MAX as f32)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_silence_converts_to_zero() {
        assert_eq!(f32_to_i16(&[0.0, 0.0]), vec![0, 0]);
        assert_eq!(i16_to_f32(&[0, 0]), vec![0.0, 0.0]);
    }

    #[test]
    fn test_full_scale_positive() {
        assert_eq!(f32_to_i16(&[1.0]), vec![i16::MAX]);
    }

    #[test]
    fn test_out_of_range_is_clamped() {
        assert_eq!(f32_to_i16(&[2.5]), f32_to_i16(&[1.0]));
        assert_eq!(f32_to_i16(&[-3.0]), f32_to_i16(&[-1.0]));
    }

    #[test]
    fn test_round_trip_preserves_sign_and_scale() {
        let original = vec![0.5f32, -0.25, 0.0, 0.99];
        let restored = i16_to_f32(&f32_to_i16(&original));
        assert_eq!(restored.len(), original.len());
        for (a, b) in original.iter().zip(&restored) {
            assert!((a - b).abs() < 1e-3, "{} vs {}", a, b);
        }
    }

    #[test]
    fn test_empty_input() {
        assert!(f32_to_i16(&[]).is_empty());
        assert!(i16_to_f32(&[]).is_empty());
    }
}
