mod error;
mod plant;
mod simulate;

use clap::{Parser, Subcommand};
use error::{CliError, CliResult};
use pl_controls::{ControllerConfig, load_yaml};
use plant::FirstOrderPlant;
use simulate::SimulationParams;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "pl-cli")]
#[command(about = "pidloop CLI - PID controller configuration and loop simulation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the default controller configuration as YAML
    Template,
    /// Validate a controller configuration file
    Validate {
        /// Path to the controller YAML file
        config_path: PathBuf,
    },
    /// Run the controller against a first-order plant
    Simulate {
        /// Path to the controller YAML file (defaults are used if omitted)
        config_path: Option<PathBuf>,
        /// Target value on the sensor scale
        #[arg(long)]
        setpoint: i16,
        /// Starting process value
        #[arg(long, default_value_t = 20.0)]
        initial: f64,
        /// Process value with zero output
        #[arg(long, default_value_t = 20.0)]
        ambient: f64,
        /// Plant time constant in seconds
        #[arg(long, default_value_t = 5.0)]
        tau_s: f64,
        /// Steady-state process rise per unit of output
        #[arg(long, default_value_t = 1.0)]
        plant_gain: f64,
        /// Simulated duration in milliseconds
        #[arg(long, default_value_t = 60_000)]
        duration_ms: u32,
        /// Main loop period in milliseconds
        #[arg(long, default_value_t = 10)]
        tick_ms: u32,
        /// Write the final controller status and history as JSON
        #[arg(long)]
        history_json: Option<PathBuf>,
    },
}

fn main() -> CliResult<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Template => cmd_template(),
        Commands::Validate { config_path } => cmd_validate(&config_path),
        Commands::Simulate {
            config_path,
            setpoint,
            initial,
            ambient,
            tau_s,
            plant_gain,
            duration_ms,
            tick_ms,
            history_json,
        } => {
            let plant = FirstOrderPlant::new(tau_s, plant_gain, ambient, initial)?;
            let params = SimulationParams {
                setpoint,
                duration_ms,
                tick_ms,
            };
            cmd_simulate(
                config_path.as_deref(),
                &params,
                plant,
                history_json.as_deref(),
            )
        }
    }
}

fn cmd_template() -> CliResult<()> {
    print!("{}", ControllerConfig::default().to_yaml_string()?);
    Ok(())
}

fn cmd_validate(config_path: &Path) -> CliResult<()> {
    println!("Validating controller config: {}", config_path.display());
    let config = load_yaml(config_path)?;
    println!("✓ Config is valid");
    println!(
        "  gains kp={} ki={} kd={}, {:?}, {} ms, output [{}, {}], history {}",
        config.gains.kp,
        config.gains.ki,
        config.gains.kd,
        config.direction,
        config.sample_time_ms,
        config.output_limits.min,
        config.output_limits.max,
        config.history_capacity
    );
    Ok(())
}

fn cmd_simulate(
    config_path: Option<&Path>,
    params: &SimulationParams,
    plant: FirstOrderPlant,
    history_json: Option<&Path>,
) -> CliResult<()> {
    let config = match config_path {
        Some(path) => load_yaml(path)?,
        None => ControllerConfig::default(),
    };

    println!(
        "Simulating {} ms at {} ms ticks, setpoint {}",
        params.duration_ms, params.tick_ms, params.setpoint
    );
    let report = simulate::run(&config, params, plant)?;

    println!("✓ Simulation completed");
    println!(
        "  {} ticks, {} controller steps",
        report.ticks, report.accepted_steps
    );
    println!(
        "  final input {}, final output {:.3}, max overshoot {}",
        report.final_input, report.final_output, report.max_overshoot
    );
    println!(
        "  integral {:.3}, history {}/{}",
        report.controller.integral,
        report.controller.history.len(),
        report.controller.history_capacity
    );

    if let Some(path) = history_json {
        let content = serde_json::to_string_pretty(&report)?;
        std::fs::write(path, content).map_err(|source| CliError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        println!("✓ Wrote {}", path.display());
    }
    Ok(())
}
