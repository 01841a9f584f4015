use clap::{Args, Parser, Subcommand, ValueEnum};
use periodic_review::io::demand::{
    generate_constant_series, generate_normal_series, generate_step_series, PeriodSeries,
};
use periodic_review::io::reporting::{format_summary, write_simulation_log};
use periodic_review::simulation::config::{HorizonPolicy, PolicyConfig};
use periodic_review::simulation::engine::simulate;
use periodic_review::simulation::sweep::{run_sweep, SweepGrid};
use periodic_review::strategy::optimization::z_score_for_service_level;
use periodic_review::{InventoryError, InventoryResult};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(author, version, about = "Periodic-review (R,S) inventory simulation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Simulate one policy over a period,demand,forecast CSV.
    Simulate {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long, default_value = "simulation_results.csv")]
        output: PathBuf,
        #[command(flatten)]
        policy: PolicyArgs,
    },
    /// Run a grid of policies and write one summary row per policy.
    Sweep {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long, default_value = "sweep_results.csv")]
        output: PathBuf,
        #[arg(long, value_delimiter = ',')]
        lead_times: Vec<usize>,
        #[arg(long, value_delimiter = ',')]
        review_periods: Vec<usize>,
        #[arg(long, value_delimiter = ',')]
        safety_factors: Vec<f64>,
        #[arg(long, value_delimiter = ',')]
        rolling_windows: Vec<usize>,
        #[command(flatten)]
        policy: PolicyArgs,
    },
    /// Write a synthetic period,demand,forecast CSV.
    Generate {
        #[arg(short, long)]
        output: PathBuf,
        #[arg(long, value_enum, default_value_t = Pattern::Normal)]
        pattern: Pattern,
        #[arg(long, default_value_t = 52)]
        periods: usize,
        /// Forecast-only periods after the last demand.
        #[arg(long, default_value_t = 0)]
        future: usize,
        #[arg(long, default_value_t = 10.0)]
        mean: f64,
        #[arg(long, default_value_t = 2.0)]
        demand_sd: f64,
        #[arg(long, default_value_t = 1.0)]
        forecast_sd: f64,
        /// Demand after the step (step pattern).
        #[arg(long, default_value_t = 20.0)]
        high: f64,
        #[arg(long, default_value_t = 10)]
        step_at: usize,
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Pattern {
    Constant,
    Normal,
    Step,
}

/// Policy options. Flags override values from `--config`.
#[derive(Args, Debug)]
struct PolicyArgs {
    /// JSON file with the policy fields.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    lead_time: Option<usize>,
    #[arg(long)]
    review_period: Option<usize>,
    #[arg(long, conflicts_with = "service_level")]
    safety_factor: Option<f64>,
    /// Target cycle service level in (0, 1), converted to a z-score.
    #[arg(long)]
    service_level: Option<f64>,
    #[arg(long)]
    initial_inventory: Option<f64>,
    /// Enables the rolling safety stock with this window.
    #[arg(long)]
    rolling_window: Option<usize>,
    /// Use sqrt(lead time) instead of sqrt(lead time + review period).
    #[arg(long)]
    exclude_review_period: bool,
    /// Sum only the available forecasts when a horizon runs past the data.
    #[arg(long)]
    truncate_horizon: bool,
}

impl PolicyArgs {
    fn policy(&self) -> InventoryResult<PolicyConfig> {
        let mut config = match &self.config {
            Some(path) => PolicyConfig::from_json_file(path)?,
            None => PolicyConfig::new(1, 3, 1.645, 0.0),
        };

        if let Some(lead_time) = self.lead_time {
            config.lead_time = lead_time;
        }
        if let Some(review_period) = self.review_period {
            config.review_period = review_period;
            if self.config.is_none() {
                config.rolling_window = review_period.saturating_mul(2);
            }
        }
        if let Some(safety_factor) = self.safety_factor {
            config.safety_factor = safety_factor;
        }
        if let Some(level) = self.service_level {
            config.safety_factor = z_score_for_service_level(level).ok_or_else(|| {
                InventoryError::config(format!("service level must be in (0, 1), got {level}"))
            })?;
        }
        if let Some(initial) = self.initial_inventory {
            config.initial_inventory = initial;
        }
        if let Some(window) = self.rolling_window {
            config = config.with_rolling_window(window);
        }
        if self.exclude_review_period {
            config.include_review_period_in_ss = false;
        }

        config.validate()?;
        Ok(config)
    }

    fn horizon(&self) -> HorizonPolicy {
        if self.truncate_horizon {
            HorizonPolicy::Truncate
        } else {
            HorizonPolicy::Strict
        }
    }
}

fn run(cli: Cli) -> InventoryResult<()> {
    match cli.command {
        Command::Simulate {
            input,
            output,
            policy,
        } => {
            let config = policy.policy()?;
            let series = PeriodSeries::from_csv_path(&input)?;
            info!(
                input = %input.display(),
                periods = series.len(),
                projected = series.projection_len(),
                "loaded series"
            );

            let report = simulate(&config, &series, policy.horizon())?;
            write_simulation_log(&output, &report.records)?;
            println!("{}", format_summary(&report.summary));
        }
        Command::Sweep {
            input,
            output,
            lead_times,
            review_periods,
            safety_factors,
            rolling_windows,
            policy,
        } => {
            let base = policy.policy()?;
            let series = PeriodSeries::from_csv_path(&input)?;
            let grid = SweepGrid {
                lead_times,
                review_periods,
                safety_factors,
                rolling_windows,
            };
            let configs = grid.configurations(&base);
            let rows = run_sweep(&configs, &series, policy.horizon())?;
            write_simulation_log(&output, &rows)?;

            println!("=== Sweep Results ===");
            for row in &rows {
                println!(
                    "L={} R={} z={:.3} rolling={} window={}: stockouts {}, lost {:.2}, fill rate {:.1}%",
                    row.lead_time,
                    row.review_period,
                    row.safety_factor,
                    row.use_rolling_ss,
                    row.rolling_window,
                    row.stockout_periods,
                    row.stockout_quantity,
                    row.fill_rate * 100.0
                );
            }
        }
        Command::Generate {
            output,
            pattern,
            periods,
            future,
            mean,
            demand_sd,
            forecast_sd,
            high,
            step_at,
            seed,
        } => {
            let series = match pattern {
                Pattern::Constant => generate_constant_series(periods, future, mean)?,
                Pattern::Normal => {
                    let mut rng = StdRng::seed_from_u64(seed);
                    generate_normal_series(&mut rng, periods, future, mean, demand_sd, forecast_sd)?
                }
                Pattern::Step => generate_step_series(periods, future, mean, high, step_at)?,
            };
            write_simulation_log(&output, &series.to_records())?;
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "run failed");
            ExitCode::FAILURE
        }
    }
}
