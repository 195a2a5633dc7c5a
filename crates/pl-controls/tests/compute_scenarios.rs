//! Integration tests for the compute engine against the reference scenarios.

use pl_controls::{ControllerConfig, Direction, HistorySample, LoopIo, Mode, PidController};
use pl_core::{ManualClock, Millis, MonotonicClock, Tolerances, nearly_equal};

fn tol() -> Tolerances {
    Tolerances {
        abs: 1e-9,
        rel: 1e-9,
    }
}

fn reference_controller(sample_time_ms: u32, clock: &ManualClock) -> (PidController, LoopIo) {
    let config = ControllerConfig::default()
        .with_gains(2.0, 0.5, 0.0)
        .with_direction(Direction::Direct)
        .with_output_limits(0.0, 255.0)
        .with_sample_time_ms(sample_time_ms);
    let mut pid = PidController::new(&config, clock.now()).unwrap();
    let io = LoopIo {
        setpoint: 200,
        input: 150,
        output: 0.0,
    };
    pid.set_mode(Mode::Automatic, &io);
    (pid, io)
}

#[test]
fn first_step_at_100ms_sampling() {
    let clock = ManualClock::new(Millis(1_000));
    let (mut pid, mut io) = reference_controller(100, &clock);

    assert!(pid.compute(&mut io, &clock));

    // ki = 0.5/s over a 0.1 s tick: 0.05 * 50 = 2.5
    assert_eq!(pid.last_error(), 50);
    assert!(nearly_equal(pid.integral(), 2.5, tol()));
    assert!(nearly_equal(io.output, 102.5, tol()));
    assert_eq!(pid.history().to_vec(), vec![HistorySample { input: 150, error: 50 }]);
}

#[test]
fn first_step_at_one_second_sampling() {
    let clock = ManualClock::new(Millis(0));
    let (mut pid, mut io) = reference_controller(1_000, &clock);

    assert!(pid.compute(&mut io, &clock));

    // One-second tick: integral = 0.5 * 50 = 25, output = 2 * 50 + 25 = 125
    assert!(nearly_equal(pid.integral(), 25.0, tol()));
    assert!(nearly_equal(io.output, 125.0, tol()));
}

#[test]
fn second_call_within_period_is_skipped() {
    let clock = ManualClock::new(Millis(0));
    let (mut pid, mut io) = reference_controller(1_000, &clock);
    assert!(pid.compute(&mut io, &clock));

    clock.advance(10);
    assert!(!pid.compute(&mut io, &clock));
    assert!(nearly_equal(io.output, 125.0, tol()));
    assert_eq!(pid.history().len(), 1);
    assert!(nearly_equal(pid.integral(), 25.0, tol()));
}

#[test]
fn held_at_setpoint_stays_within_bounds() {
    let clock = ManualClock::new(Millis(0));
    let config = ControllerConfig::default()
        .with_gains(50.0, 20.0, 5.0)
        .with_output_limits(0.0, 100.0);
    let mut pid = PidController::new(&config, Millis(0)).unwrap();
    let mut io = LoopIo {
        setpoint: 500,
        input: 0,
        output: 0.0,
    };
    pid.set_mode(Mode::Automatic, &io);

    // Saturate first, then hold input at setpoint.
    for _ in 0..20 {
        assert!(pid.compute(&mut io, &clock));
        clock.advance(100);
    }
    assert_eq!(io.output, 100.0);
    assert_eq!(pid.integral(), 100.0);

    io.input = io.setpoint;
    let mut outputs = Vec::new();
    for _ in 0..200 {
        assert!(pid.compute(&mut io, &clock));
        outputs.push(io.output);
        assert!((0.0..=100.0).contains(&io.output));
        assert!((0.0..=100.0).contains(&pid.integral()));
        clock.advance(100);
    }

    // Zero error and a steady input: the output settles on the integral.
    let last = *outputs.last().unwrap();
    assert!(nearly_equal(last, pid.integral(), tol()));
    assert!(nearly_equal(outputs[outputs.len() - 2], last, tol()));
}

#[test]
fn manual_to_automatic_is_bumpless() {
    let clock = ManualClock::new(Millis(0));
    let config = ControllerConfig::default().with_gains(4.0, 1.0, 2.0);
    let mut pid = PidController::new(&config, Millis(0)).unwrap();

    // Operator drives the output by hand while the process sits at setpoint.
    let mut io = LoopIo {
        setpoint: 300,
        input: 300,
        output: 87.5,
    };
    assert!(!pid.compute(&mut io, &clock));

    pid.set_mode(Mode::Automatic, &io);
    let before = io.output;
    assert!(pid.compute(&mut io, &clock));
    assert!((io.output - before).abs() < 1e-9);
}

#[test]
fn automatic_to_manual_freezes_output() {
    let clock = ManualClock::new(Millis(0));
    let mut pid = PidController::new(&ControllerConfig::default(), Millis(0)).unwrap();
    let mut io = LoopIo {
        setpoint: 200,
        input: 150,
        output: 0.0,
    };
    pid.set_mode(Mode::Automatic, &io);
    assert!(pid.compute(&mut io, &clock));
    let held = io.output;

    pid.set_mode(Mode::Manual, &io);
    for _ in 0..5 {
        clock.advance(500);
        io.input -= 10;
        assert!(!pid.compute(&mut io, &clock));
    }
    assert_eq!(io.output, held);
    assert_eq!(pid.history().len(), 1);
}

#[test]
fn history_keeps_most_recent_window() {
    let clock = ManualClock::new(Millis(0));
    let config = ControllerConfig::default().with_history_capacity(4);
    let mut pid = PidController::new(&config, Millis(0)).unwrap();
    let mut io = LoopIo {
        setpoint: 100,
        input: 0,
        output: 0.0,
    };
    pid.set_mode(Mode::Automatic, &io);

    for input in 0..10 {
        io.input = input;
        assert!(pid.compute(&mut io, &clock));
        clock.advance(100);
    }

    let inputs: Vec<i16> = pid.history().iter().map(|s| s.input).collect();
    assert_eq!(inputs, vec![6, 7, 8, 9]);
    let errors: Vec<i32> = pid.history().iter().map(|s| s.error).collect();
    assert_eq!(errors, vec![94, 93, 92, 91]);
}

#[test]
fn rate_gate_across_tick_counter_wrap() {
    let clock = ManualClock::new(Millis(u32::MAX - 50));
    let (mut pid, mut io) = reference_controller(100, &clock);

    assert!(pid.compute(&mut io, &clock));
    clock.advance(60);
    assert!(!pid.compute(&mut io, &clock));
    clock.advance(40);
    assert!(pid.compute(&mut io, &clock));
    assert_eq!(pid.history().len(), 2);
}

#[test]
fn sample_time_change_preserves_continuous_response() {
    // Same display gains, one controller retuned from 100 ms to 50 ms,
    // the other built at 50 ms: internal gains must agree.
    let retuned = {
        let mut pid = PidController::new(&ControllerConfig::default().with_gains(2.0, 0.5, 0.3), Millis(0))
            .unwrap();
        pid.set_sample_time(50).unwrap();
        pid.internal_gains()
    };
    let fresh = PidController::new(
        &ControllerConfig::default()
            .with_gains(2.0, 0.5, 0.3)
            .with_sample_time_ms(50),
        Millis(0),
    )
    .unwrap()
    .internal_gains();

    assert!(nearly_equal(retuned.kp, fresh.kp, tol()));
    assert!(nearly_equal(retuned.ki, fresh.ki, tol()));
    assert!(nearly_equal(retuned.kd, fresh.kd, tol()));
}
