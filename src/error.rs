use crate::types::Axis;
use std::error::Error;
use thiserror::Error;

pub type BoxedError = Box<dyn Error + Send + Sync>;

#[derive(Error, Debug)]
pub enum MountError {
    /// Opening the bus or running the controller reset sequence failed.
    #[error("failed to initialize servo controller: {0}")]
    Init(#[source] BoxedError),
    /// A motion write failed; the axis keeps its previous angle.
    #[error("failed to move {axis} servo: {source}")]
    Hardware {
        axis: Axis,
        #[source]
        source: BoxedError,
    },
    #[error("{axis} target of {degrees} degrees is not a finite angle")]
    InvalidAngle { axis: Axis, degrees: f32 },
    #[error("{0} axis has not been homed; reset it before stepping")]
    NotHomed(Axis),
    #[error("failed to flush control line: {0}")]
    ControlLine(#[from] serialport::Error),
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("failed to read configuration: {0}")]
    ConfigRead(#[from] std::io::Error),
    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

impl MountError {
    pub(crate) fn init<E: Error + Send + Sync + 'static>(err: E) -> Self {
        MountError::Init(Box::new(err))
    }

    pub(crate) fn hardware<E: Error + Send + Sync + 'static>(axis: Axis, err: E) -> Self {
        MountError::Hardware {
            axis,
            source: Box::new(err),
        }
    }
}
