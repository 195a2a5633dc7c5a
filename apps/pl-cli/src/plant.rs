//! First-order process model used to close the loop in simulation.
//!
//! Dynamics: `dT/dt = (ambient + gain * output - T) / tau`, a lumped thermal
//! mass heated by the controller output and losing heat to ambient.

use crate::error::{CliError, CliResult};
use pl_core::Sample;

#[derive(Clone, Debug)]
pub struct FirstOrderPlant {
    /// Time constant (seconds), must be positive
    pub tau_s: f64,
    /// Steady-state rise per unit of output
    pub gain: f64,
    /// Value the process relaxes to with zero output
    pub ambient: f64,
    /// Current process value
    pub value: f64,
}

impl FirstOrderPlant {
    pub fn new(tau_s: f64, gain: f64, ambient: f64, initial: f64) -> CliResult<Self> {
        if !tau_s.is_finite() || tau_s <= 0.0 {
            return Err(CliError::InvalidArg {
                what: "tau must be positive",
            });
        }
        if !gain.is_finite() || !ambient.is_finite() || !initial.is_finite() {
            return Err(CliError::InvalidArg {
                what: "plant parameters must be finite",
            });
        }
        Ok(Self {
            tau_s,
            gain,
            ambient,
            value: initial,
        })
    }

    /// Rate of change for a given drive level.
    pub fn dvdt(&self, output: f64) -> f64 {
        (self.ambient + self.gain * output - self.value) / self.tau_s
    }

    /// Advance by `dt_s` with explicit Euler.
    pub fn step(&mut self, dt_s: f64, output: f64) {
        self.value += self.dvdt(output) * dt_s;
    }

    /// Quantized reading, as a sensor would report it.
    pub fn sample(&self) -> Sample {
        self.value
            .round()
            .clamp(f64::from(Sample::MIN), f64::from(Sample::MAX)) as Sample
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relaxes_toward_ambient_without_drive() {
        let mut plant = FirstOrderPlant::new(1.0, 1.0, 25.0, 100.0).unwrap();
        for _ in 0..1000 {
            plant.step(0.01, 0.0);
        }
        assert!((plant.value - 25.0).abs() < 0.1);
    }

    #[test]
    fn settles_at_ambient_plus_gain_times_output() {
        let mut plant = FirstOrderPlant::new(0.5, 2.0, 20.0, 20.0).unwrap();
        for _ in 0..2000 {
            plant.step(0.01, 50.0);
        }
        assert_eq!(plant.sample(), 120);
    }

    #[test]
    fn sample_saturates_at_sensor_range() {
        let plant = FirstOrderPlant::new(1.0, 1.0, 0.0, 1e9).unwrap();
        assert_eq!(plant.sample(), Sample::MAX);
    }

    #[test]
    fn invalid_parameters() {
        assert!(FirstOrderPlant::new(0.0, 1.0, 0.0, 0.0).is_err());
        assert!(FirstOrderPlant::new(-1.0, 1.0, 0.0, 0.0).is_err());
        assert!(FirstOrderPlant::new(f64::NAN, 1.0, 0.0, 0.0).is_err());
        assert!(FirstOrderPlant::new(1.0, f64::INFINITY, 0.0, 0.0).is_err());
    }
}
