use crate::{
    error::MountError,
    transport::Driver,
    types::{Axis, ServoState},
};
use log::{debug, warn};

/// Moves `state`'s servo to `degrees`, saturated to the servo's bounds.
/// Non-finite targets are rejected before any write.
///
/// The stored angle is only updated once the driver accepted the write.
pub fn set_angle<D: Driver>(driver: &mut D, axis: Axis, state: &mut ServoState, degrees: f32) -> Result<(), MountError> {
    if !degrees.is_finite() {
        return Err(MountError::InvalidAngle { axis, degrees });
    }
    let target = state.clamp(degrees);
    if target != degrees {
        warn!("{} request of {} degrees clamped to {}", axis, degrees, target);
    }

    let duty = state.calibration.duty_for(target);
    debug!("{} -> {} degrees ({}, duty {})", axis, target, state.channel, duty);
    driver
        .set_channel_duty(state.channel, duty)
        .map_err(|e| MountError::hardware(axis, e))?;

    state.current_angle = Some(target);
    Ok(())
}

/// Moves relative to the last written angle. Fails without writing if the
/// servo has never been positioned.
pub fn step<D: Driver>(driver: &mut D, axis: Axis, state: &mut ServoState, delta_degrees: f32) -> Result<(), MountError> {
    let current = state.current_angle.ok_or(MountError::NotHomed(axis))?;
    set_angle(driver, axis, state, current + delta_degrees)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calibration::ServoCalibration;
    use crate::simulated::{DriverWrite, SimulatedDriver};
    use crate::types::ServoChannel;

    fn servo() -> ServoState {
        ServoState::new(ServoChannel::new(1).unwrap(), 0.0, 180.0, ServoCalibration::default())
    }

    #[test]
    fn set_angle_stores_clamped_value() {
        let mut driver = SimulatedDriver::new();
        let mut state = servo();

        for (requested, expected) in [(45.0, 45.0), (-30.0, 0.0), (500.0, 180.0), (180.0, 180.0)] {
            set_angle(&mut driver, Axis::Pan, &mut state, requested).unwrap();
            assert_eq!(state.current_angle(), Some(expected));
        }
    }

    #[test]
    fn set_angle_writes_calibrated_duty() {
        let mut driver = SimulatedDriver::new();
        let mut state = servo();

        set_angle(&mut driver, Axis::Pan, &mut state, 90.0).unwrap();
        assert_eq!(driver.writes(), vec![DriverWrite::Duty { channel: 1, duty: 369 }]);
    }

    #[test]
    fn step_matches_absolute_move() {
        let mut stepped_driver = SimulatedDriver::new();
        let mut absolute_driver = SimulatedDriver::new();

        for delta in [-200.0, -5.0, 0.0, 2.5, 5.0, 75.0] {
            let mut stepped = servo();
            let mut absolute = servo();
            set_angle(&mut stepped_driver, Axis::Tilt, &mut stepped, 110.0).unwrap();
            set_angle(&mut absolute_driver, Axis::Tilt, &mut absolute, 110.0).unwrap();

            step(&mut stepped_driver, Axis::Tilt, &mut stepped, delta).unwrap();
            set_angle(&mut absolute_driver, Axis::Tilt, &mut absolute, 110.0 + delta).unwrap();
            assert_eq!(stepped.current_angle(), absolute.current_angle());
        }
        assert_eq!(stepped_driver.writes(), absolute_driver.writes());
    }

    #[test]
    fn failed_write_leaves_angle_unchanged() {
        let mut driver = SimulatedDriver::new();
        let mut state = servo();
        set_angle(&mut driver, Axis::Pan, &mut state, 110.0).unwrap();

        driver.set_failing(true);
        let err = step(&mut driver, Axis::Pan, &mut state, 5.0).unwrap_err();
        assert!(matches!(err, MountError::Hardware { axis: Axis::Pan, .. }));
        assert_eq!(state.current_angle(), Some(110.0));
    }

    #[test]
    fn non_finite_targets_are_rejected_without_writing() {
        let mut driver = SimulatedDriver::new();
        let mut state = servo();
        set_angle(&mut driver, Axis::Pan, &mut state, 110.0).unwrap();
        driver.clear();

        for degrees in [f32::NAN, f32::INFINITY, f32::NEG_INFINITY] {
            let err = set_angle(&mut driver, Axis::Pan, &mut state, degrees).unwrap_err();
            assert!(matches!(err, MountError::InvalidAngle { axis: Axis::Pan, .. }));
        }
        assert_eq!(state.current_angle(), Some(110.0));
        assert!(driver.writes().is_empty());
    }

    #[test]
    fn step_requires_known_angle() {
        let mut driver = SimulatedDriver::new();
        let mut state = servo();

        let err = step(&mut driver, Axis::Tilt, &mut state, 5.0).unwrap_err();
        assert!(matches!(err, MountError::NotHomed(Axis::Tilt)));
        assert!(driver.writes().is_empty());
    }
}
