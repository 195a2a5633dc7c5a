//! Closed-loop simulation: controller + first-order plant on a manual clock.

use crate::error::{CliError, CliResult};
use crate::plant::FirstOrderPlant;
use pl_controls::{ControllerConfig, ControllerStatus, LoopIo, Mode, PidController};
use pl_core::{ManualClock, Millis, MonotonicClock, Sample};
use serde::Serialize;
use tracing::{debug, info};

/// Simulation inputs that are not part of the controller config.
#[derive(Debug, Clone)]
pub struct SimulationParams {
    pub setpoint: Sample,
    pub duration_ms: u32,
    /// Main loop period. May be shorter than the controller sample time.
    pub tick_ms: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    pub ticks: u32,
    pub accepted_steps: u32,
    pub final_input: Sample,
    pub final_output: f64,
    /// Largest excursion of the input past the setpoint.
    pub max_overshoot: i32,
    pub controller: ControllerStatus,
}

pub fn run(
    config: &ControllerConfig,
    params: &SimulationParams,
    mut plant: FirstOrderPlant,
) -> CliResult<SimulationReport> {
    if params.tick_ms == 0 {
        return Err(CliError::InvalidArg {
            what: "tick must be at least 1 ms",
        });
    }

    let clock = ManualClock::new(Millis::ZERO);
    let mut pid = PidController::new(config, Millis::ZERO)?;
    let mut io = LoopIo {
        setpoint: params.setpoint,
        input: plant.sample(),
        output: 0.0,
    };
    pid.set_mode(Mode::Automatic, &io);

    let start_below = io.input <= io.setpoint;
    let dt_s = f64::from(params.tick_ms) / 1000.0;
    let ticks = params.duration_ms / params.tick_ms;
    let mut accepted_steps = 0;
    let mut max_overshoot = 0;

    for _ in 0..ticks {
        if pid.compute(&mut io, &clock) {
            accepted_steps += 1;
            if let Some(step) = pid.history().latest() {
                debug!(
                    t_ms = clock.now().as_u32(),
                    input = step.input,
                    error = step.error,
                    output = io.output,
                    "controller step"
                );
            }
        }

        plant.step(dt_s, io.output);
        io.input = plant.sample();

        let past = i32::from(io.input) - i32::from(io.setpoint);
        let overshoot = if start_below { past } else { -past };
        max_overshoot = max_overshoot.max(overshoot);

        clock.advance(params.tick_ms);
    }

    info!(
        ticks,
        accepted_steps,
        final_input = io.input,
        final_output = io.output,
        "simulation finished"
    );

    Ok(SimulationReport {
        ticks,
        accepted_steps,
        final_input: io.input,
        final_output: io.output,
        max_overshoot,
        controller: pid.status(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn heater() -> FirstOrderPlant {
        FirstOrderPlant::new(5.0, 1.0, 20.0, 20.0).unwrap()
    }

    #[test]
    fn heater_reaches_setpoint() {
        let config = ControllerConfig::default().with_gains(4.0, 1.0, 0.0);
        let params = SimulationParams {
            setpoint: 150,
            duration_ms: 120_000,
            tick_ms: 10,
        };

        let report = run(&config, &params, heater()).unwrap();

        assert!((report.final_input - 150).abs() <= 1);
        assert!(report.final_output > 0.0 && report.final_output < 255.0);
        assert_eq!(report.ticks, 12_000);
    }

    #[test]
    fn controller_runs_at_its_own_rate() {
        let config = ControllerConfig::default().with_sample_time_ms(100);
        let params = SimulationParams {
            setpoint: 50,
            duration_ms: 1_000,
            tick_ms: 10,
        };

        let report = run(&config, &params, heater()).unwrap();

        assert_eq!(report.ticks, 100);
        assert_eq!(report.accepted_steps, 10);
        assert_eq!(report.controller.history.len(), 10);
        assert!(report.controller.history.iter().all(|s| s.error == 50 - i32::from(s.input)));
    }

    #[test]
    fn unreachable_setpoint_saturates_without_windup() {
        let config = ControllerConfig::default().with_gains(10.0, 5.0, 0.0);
        let params = SimulationParams {
            setpoint: 1_000,
            duration_ms: 30_000,
            tick_ms: 100,
        };

        let report = run(&config, &params, heater()).unwrap();

        assert_eq!(report.final_output, 255.0);
        assert_eq!(report.controller.integral, 255.0);
    }

    #[test]
    fn zero_tick_is_rejected() {
        let params = SimulationParams {
            setpoint: 0,
            duration_ms: 10,
            tick_ms: 0,
        };
        assert!(run(&ControllerConfig::default(), &params, heater()).is_err());
    }
}
