use crate::transport::Driver;
use crate::types::ServoChannel;
use log::debug;
use parking_lot::Mutex;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DriverWrite {
    Register { register: u8, value: u8 },
    Frequency(f32),
    Duty { channel: u8, duty: u16 },
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("simulated write failure")]
pub struct SimulatedFault;

#[derive(Default)]
struct Log {
    writes: Vec<DriverWrite>,
    failing: bool,
}

/// In-memory [`Driver`] that records every accepted write.
///
/// Clones share the same log, so a caller can keep a handle after moving the
/// driver into a mount. While failing, writes return [`SimulatedFault`] and
/// are not recorded.
#[derive(Clone, Default)]
pub struct SimulatedDriver {
    log: Arc<Mutex<Log>>,
}

impl SimulatedDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.log.lock().failing = failing;
    }

    pub fn writes(&self) -> Vec<DriverWrite> {
        self.log.lock().writes.clone()
    }

    pub fn last_duty(&self, channel: ServoChannel) -> Option<u16> {
        self.log.lock().writes.iter().rev().find_map(|write| match *write {
            DriverWrite::Duty { channel: ch, duty } if ch == channel.index() => Some(duty),
            _ => None,
        })
    }

    pub fn clear(&self) {
        self.log.lock().writes.clear();
    }

    fn record(&self, write: DriverWrite) -> Result<(), SimulatedFault> {
        let mut log = self.log.lock();
        if log.failing {
            return Err(SimulatedFault);
        }
        debug!("Simulated write: {:?}", write);
        log.writes.push(write);
        Ok(())
    }
}

impl Driver for SimulatedDriver {
    type Error = SimulatedFault;

    fn write_register(&mut self, register: u8, value: u8) -> Result<(), SimulatedFault> {
        self.record(DriverWrite::Register { register, value })
    }

    fn set_pwm_frequency(&mut self, hertz: f32) -> Result<(), SimulatedFault> {
        self.record(DriverWrite::Frequency(hertz))
    }

    fn set_channel_duty(&mut self, channel: ServoChannel, duty: u16) -> Result<(), SimulatedFault> {
        self.record(DriverWrite::Duty {
            channel: channel.index(),
            duty,
        })
    }
}
