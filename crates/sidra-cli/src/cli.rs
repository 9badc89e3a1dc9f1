//! CLI argument definitions for the panel builder.

use std::io::{self, IsTerminal};
use std::path::PathBuf;

use clap::{ColorChoice, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use sidra_model::IndicatorLabels;
use tracing::level_filters::LevelFilter;

use crate::logging::{LogConfig, LogFormat};

/// Goiás.
pub const DEFAULT_REGION: u32 = 52;

#[derive(Parser)]
#[command(
    name = "sidra-panel",
    version,
    about = "Build a municipality-year panel from IBGE SIDRA tables",
    long_about = "Build a municipality-year panel from IBGE SIDRA tables.\n\n\
                  Joins a value series (municipal GDP by default) with resident\n\
                  population and territorial area, and derives per-capita and\n\
                  per-km² indicators."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Build the panel from saved SIDRA responses.
    Build(BuildArgs),

    /// Show the tables and periods requested for each input.
    Plan,
}

#[derive(Parser)]
pub struct BuildArgs {
    /// Municipality list (IBGE localities JSON, or CSV with id_municipio and municipio).
    #[arg(long = "municipalities", value_name = "FILE")]
    pub municipalities: PathBuf,

    /// Raw value table (JSON records or CSV).
    #[arg(long = "value", value_name = "FILE")]
    pub value: PathBuf,

    /// Raw population table (JSON records or CSV).
    #[arg(long = "population", value_name = "FILE")]
    pub population: PathBuf,

    /// Raw area table (JSON records or CSV).
    #[arg(long = "area", value_name = "FILE")]
    pub area: PathBuf,

    /// Write the panel as CSV to this path.
    #[arg(long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// State code whose municipalities make up the panel.
    #[arg(long = "region", default_value_t = DEFAULT_REGION)]
    pub region: u32,

    /// Column name for the value series.
    #[arg(long = "value-label", default_value = "pib")]
    pub value_label: String,

    /// Column name for the population series.
    #[arg(long = "population-label", default_value = "pop")]
    pub population_label: String,

    /// Column name for the area series.
    #[arg(long = "area-label", default_value = "area")]
    pub area_label: String,

    /// List the N highest-value municipalities of the latest year.
    #[arg(long = "top", value_name = "N", default_value_t = 0)]
    pub top: usize,
}

impl BuildArgs {
    pub fn labels(&self) -> IndicatorLabels {
        IndicatorLabels::new(
            self.value_label.as_str(),
            self.population_label.as_str(),
            self.area_label.as_str(),
        )
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

impl Cli {
    /// Logging configuration from the CLI flags.
    ///
    /// `--log-level` beats `-v`/`-q`; `RUST_LOG` is honored only when
    /// neither is given.
    pub fn log_config(&self) -> LogConfig {
        let level_filter = match self.log_level {
            Some(LogLevelArg::Error) => LevelFilter::ERROR,
            Some(LogLevelArg::Warn) => LevelFilter::WARN,
            Some(LogLevelArg::Info) => LevelFilter::INFO,
            Some(LogLevelArg::Debug) => LevelFilter::DEBUG,
            Some(LogLevelArg::Trace) => LevelFilter::TRACE,
            None => self.verbosity.tracing_level_filter(),
        };
        let format = match self.log_format {
            LogFormatArg::Pretty => LogFormat::Pretty,
            LogFormatArg::Compact => LogFormat::Compact,
            LogFormatArg::Json => LogFormat::Json,
        };
        let with_ansi = match self.color.color {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => self.log_file.is_none() && io::stderr().is_terminal(),
        };
        LogConfig {
            level_filter,
            use_env_filter: !(self.verbosity.is_present() || self.log_level.is_some()),
            with_ansi,
            format,
            log_file: self.log_file.clone(),
            ..LogConfig::default()
        }
    }
}
