mod calibration;
mod command;
mod config;
mod constants;
mod control_line;
mod controller;
mod error;
mod mount;
mod simulated;
mod transport;
mod types;

pub use calibration::ServoCalibration;
pub use command::Command;
pub use config::{AxisConfig, MountConfig};
pub use control_line::{ControlLine, NoControlLine};
pub use controller::{set_angle, step};
pub use error::MountError;
pub use mount::Mount;
pub use simulated::{DriverWrite, SimulatedDriver, SimulatedFault};
pub use transport::{open, Driver, DriverError, Pca9685, RegisterBus};
pub use types::{Axis, Direction, ServoChannel, ServoState};

// Re-export commonly used items
pub use constants::{DEFAULT_I2C_ADDRESS, DEFAULT_I2C_PATH};
