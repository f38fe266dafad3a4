use crate::calibration::ServoCalibration;
use crate::constants::*;
use crate::error::MountError;
use crate::types::{Axis, ServoChannel, ServoState};
use serde::Deserialize;
use std::fs;
use std::path::Path;

// Range reachable with PRESCALE in 3..=255 on the 25 MHz oscillator
const MIN_FREQUENCY_HZ: f32 = 24.0;
const MAX_FREQUENCY_HZ: f32 = 1526.0;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AxisConfig {
    pub channel: u8,
    pub home_degrees: f32,
    #[serde(default = "default_min_degrees")]
    pub min_degrees: f32,
    #[serde(default = "default_max_degrees")]
    pub max_degrees: f32,
    #[serde(default = "default_min_pulse_us")]
    pub min_pulse_us: f32,
    #[serde(default = "default_max_pulse_us")]
    pub max_pulse_us: f32,
    #[serde(default = "default_max_degrees")]
    pub range_degrees: f32,
}

fn default_min_degrees() -> f32 {
    MIN_ANGLE
}

fn default_max_degrees() -> f32 {
    MAX_ANGLE
}

fn default_min_pulse_us() -> f32 {
    MIN_PULSE_US
}

fn default_max_pulse_us() -> f32 {
    MAX_PULSE_US
}

impl AxisConfig {
    pub fn pan() -> Self {
        AxisConfig {
            channel: PAN_CHANNEL,
            home_degrees: HOME_PAN,
            ..Self::default()
        }
    }

    pub fn tilt() -> Self {
        AxisConfig {
            channel: TILT_CHANNEL,
            home_degrees: HOME_TILT,
            ..Self::default()
        }
    }

    fn validate(&self, axis: Axis) -> Result<(), MountError> {
        let invalid = |msg: String| Err(MountError::Config(format!("{}: {}", axis, msg)));

        if ServoChannel::new(self.channel).is_none() {
            return invalid(format!("channel {} exceeds {}", self.channel, CHANNEL_COUNT - 1));
        }
        let values = [
            self.home_degrees,
            self.min_degrees,
            self.max_degrees,
            self.min_pulse_us,
            self.max_pulse_us,
            self.range_degrees,
        ];
        if !values.iter().all(|v| v.is_finite()) {
            return invalid("angles and pulse range must be finite".to_string());
        }
        if !(self.min_degrees <= self.max_degrees) {
            return invalid(format!("min {} is above max {}", self.min_degrees, self.max_degrees));
        }
        if !(self.min_degrees..=self.max_degrees).contains(&self.home_degrees) {
            return invalid(format!(
                "home {} is outside [{}, {}]",
                self.home_degrees, self.min_degrees, self.max_degrees
            ));
        }
        if !(self.range_degrees > 0.0) || !(self.min_pulse_us >= 0.0) || !(self.max_pulse_us > self.min_pulse_us) {
            return invalid("pulse range must be positive and increasing".to_string());
        }
        Ok(())
    }

    pub(crate) fn servo_state(&self, frequency_hz: f32) -> Result<ServoState, MountError> {
        let channel = ServoChannel::new(self.channel)
            .ok_or_else(|| MountError::Config(format!("channel {} out of range", self.channel)))?;
        let calibration =
            ServoCalibration::from_pulse_range(self.min_pulse_us, self.max_pulse_us, self.range_degrees, frequency_hz);
        Ok(ServoState::new(channel, self.min_degrees, self.max_degrees, calibration))
    }
}

impl Default for AxisConfig {
    fn default() -> Self {
        AxisConfig {
            channel: 0,
            home_degrees: (MIN_ANGLE + MAX_ANGLE) / 2.0,
            min_degrees: MIN_ANGLE,
            max_degrees: MAX_ANGLE,
            min_pulse_us: MIN_PULSE_US,
            max_pulse_us: MAX_PULSE_US,
            range_degrees: MAX_ANGLE,
        }
    }
}

/// Everything needed to bring up the mount.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MountConfig {
    pub i2c_path: String,
    pub i2c_address: u16,
    pub calibration_frequency_hz: f32,
    pub operating_frequency_hz: f32,
    pub settle_delay_ms: u64,
    pub step_degrees: f32,
    pub pan: AxisConfig,
    pub tilt: AxisConfig,
}

impl Default for MountConfig {
    fn default() -> Self {
        MountConfig {
            i2c_path: DEFAULT_I2C_PATH.to_string(),
            i2c_address: DEFAULT_I2C_ADDRESS,
            calibration_frequency_hz: CALIBRATION_FREQUENCY_HZ,
            operating_frequency_hz: OPERATING_FREQUENCY_HZ,
            settle_delay_ms: SETTLE_DELAY_MS,
            step_degrees: STEP_DEGREES,
            pan: AxisConfig::pan(),
            tilt: AxisConfig::tilt(),
        }
    }
}

impl MountConfig {
    /// Reads a JSON config file. Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self, MountError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, MountError> {
        let config: MountConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn axis(&self, axis: Axis) -> &AxisConfig {
        match axis {
            Axis::Pan => &self.pan,
            Axis::Tilt => &self.tilt,
        }
    }

    pub fn validate(&self) -> Result<(), MountError> {
        self.pan.validate(Axis::Pan)?;
        self.tilt.validate(Axis::Tilt)?;

        if self.pan.channel == self.tilt.channel {
            return Err(MountError::Config(format!(
                "pan and tilt share channel {}",
                self.pan.channel
            )));
        }
        if !(self.step_degrees > 0.0) || !self.step_degrees.is_finite() {
            return Err(MountError::Config(format!("step {} must be positive", self.step_degrees)));
        }
        for hz in [self.calibration_frequency_hz, self.operating_frequency_hz] {
            if !(MIN_FREQUENCY_HZ..=MAX_FREQUENCY_HZ).contains(&hz) {
                return Err(MountError::Config(format!(
                    "frequency {} Hz is outside [{}, {}]",
                    hz, MIN_FREQUENCY_HZ, MAX_FREQUENCY_HZ
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_pan_tilt_hat_layout() {
        let config = MountConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.i2c_path, "/dev/i2c-1");
        assert_eq!(config.i2c_address, 0x40);
        assert_eq!(config.pan.channel, 1);
        assert_eq!(config.tilt.channel, 0);
        assert_eq!(config.pan.home_degrees, 110.0);
        assert_eq!(config.tilt.home_degrees, 95.0);
        assert_eq!(config.step_degrees, 5.0);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = MountConfig::from_json(
            r#"{ "step_degrees": 2.5, "tilt": { "channel": 3, "home_degrees": 95, "max_degrees": 150 } }"#,
        )
        .unwrap();
        assert_eq!(config.step_degrees, 2.5);
        assert_eq!(config.tilt.channel, 3);
        assert_eq!(config.tilt.max_degrees, 150.0);
        assert_eq!(config.tilt.min_degrees, 0.0);
        assert_eq!(config.tilt.max_pulse_us, 2500.0);
        assert_eq!(config.pan, AxisConfig::pan());
        assert_eq!(config.i2c_path, "/dev/i2c-1");
    }

    #[test]
    fn axis_requires_channel_and_home() {
        assert!(matches!(
            MountConfig::from_json(r#"{ "pan": { "max_degrees": 170 } }"#),
            Err(MountError::ConfigParse(_))
        ));
    }

    #[test]
    fn rejects_home_outside_bounds() {
        let mut config = MountConfig::default();
        config.pan.max_degrees = 100.0;
        assert!(matches!(config.validate(), Err(MountError::Config(_))));
    }

    #[test]
    fn rejects_non_finite_values() {
        let mut config = MountConfig::default();
        config.pan.min_degrees = f32::NEG_INFINITY;
        assert!(matches!(config.validate(), Err(MountError::Config(_))));

        let mut config = MountConfig::default();
        config.tilt.max_pulse_us = f32::INFINITY;
        assert!(matches!(config.validate(), Err(MountError::Config(_))));

        let mut config = MountConfig::default();
        config.step_degrees = f32::INFINITY;
        assert!(matches!(config.validate(), Err(MountError::Config(_))));

        let mut config = MountConfig::default();
        config.pan.home_degrees = f32::NAN;
        assert!(matches!(config.validate(), Err(MountError::Config(_))));
    }

    #[test]
    fn rejects_shared_channel() {
        let mut config = MountConfig::default();
        config.tilt.channel = config.pan.channel;
        assert!(matches!(config.validate(), Err(MountError::Config(_))));
    }

    #[test]
    fn rejects_unreachable_frequency() {
        let mut config = MountConfig::default();
        config.calibration_frequency_hz = 2000.0;
        assert!(matches!(config.validate(), Err(MountError::Config(_))));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(MountConfig::from_json("{ step_degrees"), Err(MountError::ConfigParse(_))));
    }
}
