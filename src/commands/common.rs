//! Argument handling and setup shared by the `package` and `search` commands.

use super::config::Config;
use crate::Result;
use crate::facts::{Collector, Endpoints};
use camino::Utf8PathBuf;
use clap::{Args, ValueEnum};
use ohno::IntoAppError;

/// Color mode configuration for output
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Always use colors
    Always,

    /// Never use colors
    Never,

    /// Use colors if the output is a terminal, otherwise don't use colors
    Auto,
}

/// Log level for diagnostic output
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// No logging output
    None,

    /// Only error messages
    Error,

    /// Warning and error messages
    Warn,

    /// Info, warning, and error messages
    Info,

    /// Debug, info, warning, and error messages
    Debug,

    /// Trace, debug, info, warning, and error messages
    Trace,
}

/// Arguments shared between commands that talk to the network
#[derive(Args, Debug)]
pub struct CommonArgs {
    /// GitHub personal access token
    #[arg(long, value_name = "TOKEN", env = "GITHUB_API_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// Path to configuration file (default is `isitaccessible.toml` in the current directory)
    #[arg(long, short = 'c', value_name = "PATH")]
    pub config: Option<Utf8PathBuf>,

    /// Print the report as JSON instead of text
    #[arg(long)]
    pub json: bool,

    /// Control when to use colored output
    #[arg(long, value_name = "WHEN", default_value = "auto")]
    pub color: ColorMode,

    /// Set the logging level for diagnostic output
    #[arg(long, value_name = "LEVEL", default_value = "none", global = true)]
    pub log_level: LogLevel,
}

/// Everything a command needs once arguments have been processed
#[derive(Debug)]
pub struct Common {
    pub collector: Collector,
    pub use_colors: bool,
    pub json: bool,
}

impl Common {
    pub fn new(args: &CommonArgs) -> Result<Self> {
        init_logging(args.log_level);

        let current_dir = std::env::current_dir().into_app_err("determining the current directory")?;
        let base_dir = Utf8PathBuf::try_from(current_dir).into_app_err("current directory is not valid UTF-8")?;
        let config = Config::load(&base_dir, args.config.as_ref())?;

        let endpoints = Endpoints {
            github_api_url: &config.github_api_url,
            npms_api_url: &config.npms_api_url,
            request_timeout: config.request_timeout,
        };

        if args.github_token.is_none() {
            log::warn!("No GitHub token provided, requests will be subject to strict rate limits");
        }

        let collector = Collector::new(args.github_token.as_deref(), &endpoints)?;

        let use_colors = match args.color {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => {
                use std::io::{IsTerminal, stdout};
                stdout().is_terminal()
            }
        };

        Ok(Self {
            collector,
            use_colors,
            json: args.json,
        })
    }
}

/// Initialize logger based on log level
pub fn init_logging(log_level: LogLevel) {
    let level = match log_level {
        LogLevel::None => return,
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    };

    let env = env_logger::Env::default().filter_or("RUST_LOG", level);

    // a logger may already be installed when commands run more than once in a process
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(matches!(log_level, LogLevel::Debug | LogLevel::Trace))
        .try_init();
}
