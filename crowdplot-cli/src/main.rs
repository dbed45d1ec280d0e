use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod config;
mod error;

use config::Config;
use crowdplot_core::Day;
use error::{print_error_and_exit, CliError, CliResult};

#[derive(Parser)]
#[command(name = "crowdplot")]
#[command(about = "Daily crowd charts from timestamped location snapshots")]
#[command(version)]
#[command(long_about = "
crowdplot turns timestamped crowd snapshots into one SVG chart per day,
with a row per location grouped by region, and keeps a README listing current.

Examples:
  crowdplot render
  crowdplot render 20260203
  crowdplot render --date 20260203 --out-dir public/charts
  crowdplot readme --readme README.md
  crowdplot update
  crowdplot config --example > crowdplot.toml
")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Number of threads to use
    #[arg(short, long, global = true)]
    pub threads: Option<usize>,

    /// Verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render one SVG chart per day of snapshots
    Render {
        #[command(flatten)]
        render: RenderArgs,
    },

    /// Refresh the chart listing between the README markers
    Readme {
        #[command(flatten)]
        readme: ReadmeArgs,
    },

    /// Render charts, then refresh the README
    Update {
        #[command(flatten)]
        render: RenderArgs,

        /// README file to update
        #[arg(long)]
        readme: Option<PathBuf>,
    },

    /// Show the effective configuration
    Config {
        /// Print the default configuration instead
        #[arg(long)]
        example: bool,
    },
}

#[derive(Args, Debug, Default)]
pub struct RenderArgs {
    /// Only render this day (YYYYMMDD)
    #[arg(value_name = "YYYYMMDD")]
    pub day: Option<String>,

    /// Only render this day (YYYYMMDD); takes precedence over the positional day
    #[arg(long, value_name = "YYYYMMDD")]
    pub date: Option<String>,

    /// Directory holding snapshot files
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Location metadata file (JSON)
    #[arg(long)]
    pub metadata: Option<PathBuf>,

    /// Output directory for charts
    #[arg(short, long)]
    pub out_dir: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub struct ReadmeArgs {
    /// README file to update
    #[arg(long)]
    pub readme: Option<PathBuf>,

    /// Directory holding generated charts
    #[arg(long)]
    pub charts_dir: Option<PathBuf>,

    /// Directory holding snapshot files
    #[arg(long)]
    pub data_dir: Option<PathBuf>,
}

impl RenderArgs {
    /// Day filter, with `--date` winning over the positional argument.
    fn day_filter(&self) -> CliResult<Option<Day>> {
        match self.date.as_deref().or(self.day.as_deref()) {
            Some(value) => Day::parse(value).map(Some).ok_or_else(|| CliError::invalid_date(value)),
            None => Ok(None),
        }
    }

    fn apply(&self, config: &mut Config) {
        if let Some(dir) = &self.data_dir {
            config.paths.data_dir = dir.clone();
        }
        if let Some(path) = &self.metadata {
            config.paths.metadata = path.clone();
        }
        if let Some(dir) = &self.out_dir {
            config.paths.charts_dir = dir.clone();
        }
    }
}

impl ReadmeArgs {
    fn apply(&self, config: &mut Config) {
        if let Some(path) = &self.readme {
            config.paths.readme = path.clone();
        }
        if let Some(dir) = &self.charts_dir {
            config.paths.charts_dir = dir.clone();
        }
        if let Some(dir) = &self.data_dir {
            config.paths.data_dir = dir.clone();
        }
    }
}

fn setup_logging(verbose: u8, quiet: bool) -> Result<()> {
    let level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .try_init()
        .context("Failed to initialise logging")?;

    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    let mut config = Config::load(cli.config.as_deref())?;

    // Set global thread count if specified
    if let Some(threads) = cli.threads.or(config.general.threads) {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("Failed to set thread count")?;
    }

    match cli.command {
        Commands::Render { render } => {
            let date = render.day_filter()?;
            render.apply(&mut config);
            commands::render::execute(&config, date)?;
        }

        Commands::Readme { readme } => {
            readme.apply(&mut config);
            commands::readme::execute(&config)?;
        }

        Commands::Update { render, readme } => {
            let date = render.day_filter()?;
            render.apply(&mut config);
            if let Some(path) = readme {
                config.paths.readme = path;
            }
            commands::render::execute(&config, date)?;
            commands::readme::execute(&config)?;
        }

        Commands::Config { example } => {
            let text = if example {
                Config::example_toml()?
            } else {
                toml::to_string_pretty(&config)
                    .map_err(|e| CliError::config(format!("TOML serialization error: {}", e)))?
            };
            print!("{}", text);
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet)?;

    run(cli).map_err(|err| match err.downcast_ref::<CliError>() {
        Some(cli_err) => print_error_and_exit(cli_err),
        None => err,
    })
}
