use crate::{
    command::Command,
    config::MountConfig,
    constants::{MODE1, SOFT_RESET_VALUE},
    control_line::{ControlLine, NoControlLine},
    controller,
    error::MountError,
    transport::{self, Driver, Pca9685},
    types::{Axis, Direction, ServoState},
};
use i2cdev::linux::LinuxI2CDevice;
use log::info;
use std::thread::sleep;
use std::time::Duration;

/// Two-axis camera mount driven through one PWM controller.
///
/// Both axes start without a known angle; call [`Mount::reset_all`] (or the
/// per-axis resets) before stepping. Calls must be serialized by the caller.
pub struct Mount<D, L = NoControlLine> {
    driver: D,
    line: L,
    pan: ServoState,
    tilt: ServoState,
    config: MountConfig,
}

impl Mount<Pca9685<LinuxI2CDevice>> {
    /// Opens the I2C bus named in `config` and brings the controller up.
    pub fn initialize(config: &MountConfig) -> Result<Self, MountError> {
        Self::initialize_with_control_line(config, NoControlLine)
    }
}

impl<L: ControlLine> Mount<Pca9685<LinuxI2CDevice>, L> {
    pub fn initialize_with_control_line(config: &MountConfig, line: L) -> Result<Self, MountError> {
        config.validate()?;
        let driver = transport::open(&config.i2c_path, config.i2c_address).map_err(MountError::init)?;
        Self::with_control_line(driver, line, config)
    }
}

impl<D: Driver> Mount<D> {
    pub fn with_driver(driver: D, config: &MountConfig) -> Result<Self, MountError> {
        Self::with_control_line(driver, NoControlLine, config)
    }
}

impl<D: Driver, L: ControlLine> Mount<D, L> {
    /// Runs the controller reset sequence and returns an unhomed mount.
    /// Any failed write aborts initialization.
    pub fn with_control_line(mut driver: D, line: L, config: &MountConfig) -> Result<Self, MountError> {
        config.validate()?;
        let pan = config.pan.servo_state(config.operating_frequency_hz)?;
        let tilt = config.tilt.servo_state(config.operating_frequency_hz)?;

        info!("Resetting servo controller");
        driver.write_register(MODE1, SOFT_RESET_VALUE).map_err(MountError::init)?;
        sleep(Duration::from_millis(config.settle_delay_ms));

        // Two-stage frequency setup carried over from the vendor bring-up sequence
        driver
            .set_pwm_frequency(config.calibration_frequency_hz)
            .map_err(MountError::init)?;
        driver
            .set_pwm_frequency(config.operating_frequency_hz)
            .map_err(MountError::init)?;
        info!("Servo controller running at {} Hz", config.operating_frequency_hz);

        Ok(Mount {
            driver,
            line,
            pan,
            tilt,
            config: config.clone(),
        })
    }

    pub fn reset_all(&mut self) -> Result<(), MountError> {
        self.reset_pan()?;
        self.reset_tilt()
    }

    pub fn reset_pan(&mut self) -> Result<(), MountError> {
        self.home(Axis::Pan)
    }

    pub fn reset_tilt(&mut self) -> Result<(), MountError> {
        self.home(Axis::Tilt)
    }

    pub fn pan(&mut self, direction: Direction) -> Result<(), MountError> {
        self.step(Axis::Pan, direction)
    }

    pub fn tilt(&mut self, direction: Direction) -> Result<(), MountError> {
        self.step(Axis::Tilt, direction)
    }

    /// Moves `axis` to an absolute angle, saturated to its bounds.
    pub fn set(&mut self, axis: Axis, degrees: f32) -> Result<(), MountError> {
        self.line.flush_stale_input()?;
        let state = match axis {
            Axis::Pan => &mut self.pan,
            Axis::Tilt => &mut self.tilt,
        };
        controller::set_angle(&mut self.driver, axis, state, degrees)
    }

    pub fn apply(&mut self, command: Command) -> Result<(), MountError> {
        match command {
            Command::ResetAll => self.reset_all(),
            Command::ResetPan => self.reset_pan(),
            Command::ResetTilt => self.reset_tilt(),
            Command::TiltUp => self.tilt(Direction::Increase),
            Command::TiltDown => self.tilt(Direction::Decrease),
            Command::PanLeft => self.pan(Direction::Decrease),
            Command::PanRight => self.pan(Direction::Increase),
        }
    }

    /// Last angle successfully written to `axis`.
    pub fn angle(&self, axis: Axis) -> Option<f32> {
        self.state(axis).current_angle()
    }

    pub fn state(&self, axis: Axis) -> &ServoState {
        match axis {
            Axis::Pan => &self.pan,
            Axis::Tilt => &self.tilt,
        }
    }

    fn home(&mut self, axis: Axis) -> Result<(), MountError> {
        let home = self.config.axis(axis).home_degrees;
        self.set(axis, home)?;
        info!("{} homed to {} degrees", axis, home);
        Ok(())
    }

    fn step(&mut self, axis: Axis, direction: Direction) -> Result<(), MountError> {
        self.line.flush_stale_input()?;
        let delta = direction.signum() * self.config.step_degrees;
        let state = match axis {
            Axis::Pan => &mut self.pan,
            Axis::Tilt => &mut self.tilt,
        };
        controller::step(&mut self.driver, axis, state, delta)
    }
}
