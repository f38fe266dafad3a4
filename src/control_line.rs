use crate::error::MountError;
use serialport::{ClearBuffer, SerialPort};

/// Source of mount commands that may hold stale, already-superseded input.
pub trait ControlLine {
    fn flush_stale_input(&mut self) -> Result<(), MountError>;
}

/// Commands arrive from argv or a pipe; nothing to discard.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoControlLine;

impl ControlLine for NoControlLine {
    fn flush_stale_input(&mut self) -> Result<(), MountError> {
        Ok(())
    }
}

impl ControlLine for Box<dyn SerialPort> {
    fn flush_stale_input(&mut self) -> Result<(), MountError> {
        self.clear(ClearBuffer::All)?;
        Ok(())
    }
}
