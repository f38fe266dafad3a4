use crate::constants::*;
use crate::types::ServoChannel;
use i2cdev::core::I2CDevice;
use i2cdev::linux::{LinuxI2CDevice, LinuxI2CError};
use log::debug;
use std::error::Error;
use std::thread::sleep;
use std::time::Duration;
use thiserror::Error;

/// Operations the mount needs from a PWM controller.
pub trait Driver {
    type Error: Error + Send + Sync + 'static;

    fn write_register(&mut self, register: u8, value: u8) -> Result<(), Self::Error>;

    fn set_pwm_frequency(&mut self, hertz: f32) -> Result<(), Self::Error>;

    fn set_channel_duty(&mut self, channel: ServoChannel, duty: u16) -> Result<(), Self::Error>;
}

/// Register access on a single I2C target.
pub trait RegisterBus {
    type Error: Error + Send + Sync + 'static;

    fn read_register(&mut self, register: u8) -> Result<u8, Self::Error>;

    fn write_register(&mut self, register: u8, value: u8) -> Result<(), Self::Error>;

    fn write_block(&mut self, register: u8, values: &[u8]) -> Result<(), Self::Error>;
}

impl<T> RegisterBus for T
where
    T: I2CDevice,
    T::Error: Send + Sync + 'static,
{
    type Error = T::Error;

    fn read_register(&mut self, register: u8) -> Result<u8, Self::Error> {
        self.smbus_read_byte_data(register)
    }

    fn write_register(&mut self, register: u8, value: u8) -> Result<(), Self::Error> {
        self.smbus_write_byte_data(register, value)
    }

    fn write_block(&mut self, register: u8, values: &[u8]) -> Result<(), Self::Error> {
        self.smbus_write_i2c_block_data(register, values)
    }
}

#[derive(Error, Debug)]
pub enum DriverError<E: Error + 'static> {
    #[error("i2c transfer failed: {0}")]
    Bus(#[source] E),
    #[error("PWM frequency {0} Hz is outside the controller's range")]
    FrequencyOutOfRange(f32),
    #[error("duty {0} exceeds the 12-bit maximum of 4095")]
    DutyOutOfRange(u16),
}

/// PCA9685 16-channel PWM controller.
pub struct Pca9685<B> {
    bus: B,
}

impl<B: RegisterBus> Pca9685<B> {
    pub fn new(bus: B) -> Self {
        Pca9685 { bus }
    }

    pub fn into_inner(self) -> B {
        self.bus
    }

    fn prescale_for(hertz: f32) -> Option<u8> {
        if !hertz.is_finite() || hertz <= 0.0 {
            return None;
        }
        let prescale = (OSCILLATOR_HZ / (DUTY_RESOLUTION as f32 * hertz)).round() - 1.0;
        if prescale < MIN_PRESCALE as f32 || prescale > u8::MAX as f32 {
            return None;
        }
        Some(prescale as u8)
    }
}

impl<B: RegisterBus> Driver for Pca9685<B> {
    type Error = DriverError<B::Error>;

    fn write_register(&mut self, register: u8, value: u8) -> Result<(), Self::Error> {
        self.bus.write_register(register, value).map_err(DriverError::Bus)
    }

    fn set_pwm_frequency(&mut self, hertz: f32) -> Result<(), Self::Error> {
        let prescale = Self::prescale_for(hertz).ok_or(DriverError::FrequencyOutOfRange(hertz))?;
        debug!("Setting PWM frequency to {} Hz (prescale {})", hertz, prescale);

        // PRESCALE is only writable while the oscillator sleeps
        let old_mode = self.bus.read_register(MODE1).map_err(DriverError::Bus)?;
        let sleep_mode = (old_mode & !MODE1_RESTART) | MODE1_SLEEP;
        self.bus.write_register(MODE1, sleep_mode).map_err(DriverError::Bus)?;
        self.bus.write_register(PRESCALE, prescale).map_err(DriverError::Bus)?;
        self.bus.write_register(MODE1, old_mode).map_err(DriverError::Bus)?;
        sleep(Duration::from_millis(OSCILLATOR_WAKE_MS));
        self.bus
            .write_register(MODE1, old_mode | MODE1_RESTART | MODE1_AUTO_INCREMENT)
            .map_err(DriverError::Bus)
    }

    fn set_channel_duty(&mut self, channel: ServoChannel, duty: u16) -> Result<(), Self::Error> {
        if duty > MAX_DUTY {
            return Err(DriverError::DutyOutOfRange(duty));
        }
        let register = LED0_ON_L + 4 * channel.index();
        let [off_l, off_h] = duty.to_le_bytes();
        self.bus
            .write_block(register, &[0, 0, off_l, off_h])
            .map_err(DriverError::Bus)
    }
}

/// Opens the I2C character device at `path` and binds the controller at `address`.
pub fn open(path: &str, address: u16) -> Result<Pca9685<LinuxI2CDevice>, LinuxI2CError> {
    let device = LinuxI2CDevice::new(path, address)?;
    debug!("Opened {} at address {:#04x}", path, address);
    Ok(Pca9685::new(device))
}
