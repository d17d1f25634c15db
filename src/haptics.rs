//! Rumble requests and the collaborator that plays them.

use crate::error::HapticsError;
use serde::{Deserialize, Serialize};

/// Effect type of every request, named in backend logs. Only dual-motor
/// rumble is supported.
pub const DUAL_RUMBLE: &str = "dual-rumble";

/// A dual-motor rumble request for one pad.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RumbleEffect {
    pub start_delay_ms: u32,
    pub duration_ms: u32,
    pub weak_magnitude: f64,
    pub strong_magnitude: f64,
}

impl RumbleEffect {
    /// Build a request from caller units; duration is given in seconds.
    ///
    /// Negative or non-finite durations play for 0 ms.
    pub fn from_seconds(strong_magnitude: f64, weak_magnitude: f64, duration_secs: f64) -> Self {
        let duration_ms = duration_secs * 1000.0;
        let duration_ms = if duration_ms.is_finite() && duration_ms > 0.0 {
            duration_ms.min(u32::MAX as f64).round() as u32
        } else {
            0
        };

        Self {
            start_delay_ms: 0,
            duration_ms,
            weak_magnitude,
            strong_magnitude,
        }
    }
}

/// Something that can play rumble effects on a pad slot.
///
/// Implementations return as soon as the effect is started; they never wait
/// for it to finish.
pub trait Haptics {
    fn play(&mut self, slot: usize, effect: &RumbleEffect) -> Result<(), HapticsError>;
}

/// Map a caller magnitude onto a motor's `u16` range, clamping to `[0, 1]`.
pub fn magnitude_to_u16(magnitude: f64) -> u16 {
    if !magnitude.is_finite() || magnitude <= 0.0 {
        return 0;
    }
    (magnitude.min(1.0) * u16::MAX as f64).round() as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seconds_to_millis() {
        let effect = RumbleEffect::from_seconds(0.25, 0.5, 0.25);
        assert_eq!(effect.duration_ms, 250);
        assert_eq!(effect.start_delay_ms, 0);
        assert_eq!(effect.strong_magnitude, 0.25);
        assert_eq!(effect.weak_magnitude, 0.5);
    }

    #[test]
    fn test_bad_durations_play_for_zero() {
        assert_eq!(RumbleEffect::from_seconds(1.0, 1.0, -2.0).duration_ms, 0);
        assert_eq!(RumbleEffect::from_seconds(1.0, 1.0, f64::NAN).duration_ms, 0);
    }

    #[test]
    fn test_magnitude_clamping() {
        assert_eq!(magnitude_to_u16(0.0), 0);
        assert_eq!(magnitude_to_u16(-1.0), 0);
        assert_eq!(magnitude_to_u16(1.0), u16::MAX);
        assert_eq!(magnitude_to_u16(4.0), u16::MAX);
        assert_eq!(magnitude_to_u16(0.5), 32768);
    }
}
