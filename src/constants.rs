pub const DEFAULT_I2C_PATH: &str = "/dev/i2c-1";
pub const DEFAULT_I2C_ADDRESS: u16 = 0x40;

// PCA9685 registers
pub const MODE1: u8 = 0x00;
pub const PRESCALE: u8 = 0xFE;
pub const LED0_ON_L: u8 = 0x06;

// MODE1 bits
pub const MODE1_RESTART: u8 = 0x80;
pub const MODE1_AUTO_INCREMENT: u8 = 0x20;
pub const MODE1_SLEEP: u8 = 0x10;

pub const SOFT_RESET_VALUE: u8 = MODE1_RESTART;
pub const CHANNEL_COUNT: u8 = 16;
pub const OSCILLATOR_HZ: f32 = 25_000_000.0;
pub const DUTY_RESOLUTION: u16 = 4096;
pub const MAX_DUTY: u16 = DUTY_RESOLUTION - 1;
pub const MIN_PRESCALE: u8 = 3;
pub const OSCILLATOR_WAKE_MS: u64 = 5;

// Init sequence
pub const CALIBRATION_FREQUENCY_HZ: f32 = 1000.0;
pub const OPERATING_FREQUENCY_HZ: f32 = 60.0;
pub const SETTLE_DELAY_MS: u64 = 10;

// Mount layout
pub const PAN_CHANNEL: u8 = 1;
pub const TILT_CHANNEL: u8 = 0;
pub const STEP_DEGREES: f32 = 5.0;
pub const HOME_PAN: f32 = 110.0;
pub const HOME_TILT: f32 = 95.0;
pub const MIN_ANGLE: f32 = 0.0;
pub const MAX_ANGLE: f32 = 180.0;

// Servo pulse range (microseconds) over MAX_ANGLE degrees
pub const MIN_PULSE_US: f32 = 500.0;
pub const MAX_PULSE_US: f32 = 2500.0;
