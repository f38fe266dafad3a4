use crate::constants::{DUTY_RESOLUTION, MAX_ANGLE, MAX_DUTY, MAX_PULSE_US, MIN_PULSE_US, OPERATING_FREQUENCY_HZ};

/// Linear mapping from servo degrees to 12-bit duty counts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ServoCalibration {
    pub(crate) offset: f32,
    pub(crate) scale: f32,
}

impl ServoCalibration {
    pub fn new(offset: f32, scale: f32) -> Self {
        ServoCalibration { offset, scale }
    }

    /// Builds the mapping from a pulse range, where `min_pulse_us` is 0 degrees
    /// and `max_pulse_us` is `range_degrees`, at the given PWM frequency.
    pub fn from_pulse_range(min_pulse_us: f32, max_pulse_us: f32, range_degrees: f32, frequency_hz: f32) -> Self {
        let counts_per_us = DUTY_RESOLUTION as f32 * frequency_hz / 1_000_000.0;
        ServoCalibration {
            offset: min_pulse_us * counts_per_us,
            scale: (max_pulse_us - min_pulse_us) / range_degrees * counts_per_us,
        }
    }

    pub fn duty_for(&self, degrees: f32) -> u16 {
        let counts = (self.offset + degrees * self.scale).round();
        counts.max(0.0).min(MAX_DUTY as f32) as u16
    }
}

impl Default for ServoCalibration {
    fn default() -> Self {
        Self::from_pulse_range(MIN_PULSE_US, MAX_PULSE_US, MAX_ANGLE, OPERATING_FREQUENCY_HZ)
    }
}
