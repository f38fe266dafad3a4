use crate::calibration::ServoCalibration;
use crate::constants::CHANNEL_COUNT;
use std::fmt;
use strum_macros::{Display, EnumIter};

#[derive(Debug, EnumIter, Display, Clone, Copy, Eq, PartialEq, Hash)]
#[strum(serialize_all = "lowercase")]
pub enum Axis {
    Pan,  // left to right
    Tilt, // down to up
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Direction {
    Increase,
    Decrease,
}

impl Direction {
    pub fn signum(self) -> f32 {
        match self {
            Direction::Increase => 1.0,
            Direction::Decrease => -1.0,
        }
    }
}

/// One PWM output of the controller.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct ServoChannel(u8);

impl ServoChannel {
    pub fn new(index: u8) -> Option<Self> {
        (index < CHANNEL_COUNT).then_some(ServoChannel(index))
    }

    pub fn index(self) -> u8 {
        self.0
    }
}

impl fmt::Display for ServoChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "channel {}", self.0)
    }
}

/// Angle state of a single servo.
///
/// `current_angle` is `None` until the first absolute write succeeds; the
/// controller does not read positions back from hardware.
#[derive(Debug, Clone)]
pub struct ServoState {
    pub(crate) channel: ServoChannel,
    pub(crate) current_angle: Option<f32>,
    pub(crate) min_angle: f32,
    pub(crate) max_angle: f32,
    pub(crate) calibration: ServoCalibration,
}

impl ServoState {
    pub fn new(channel: ServoChannel, min_angle: f32, max_angle: f32, calibration: ServoCalibration) -> Self {
        ServoState {
            channel,
            current_angle: None,
            min_angle,
            max_angle,
            calibration,
        }
    }

    pub fn channel(&self) -> ServoChannel {
        self.channel
    }

    pub fn current_angle(&self) -> Option<f32> {
        self.current_angle
    }

    pub fn bounds(&self) -> (f32, f32) {
        (self.min_angle, self.max_angle)
    }

    pub fn clamp(&self, degrees: f32) -> f32 {
        clamp_angle(degrees, self.min_angle, self.max_angle)
    }
}

pub(crate) fn clamp_angle(angle: f32, min: f32, max: f32) -> f32 {
    angle.max(min).min(max)
}
