//! Command-line interface definition.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use eventblocks_core::{BracketPolicy, TimeFormat};

use crate::config::Settings;
use crate::error::{ClientError, ClientResult};

/// eventblocks - Turn a day's calendar events into journal blocks
#[derive(Debug, Parser)]
#[command(name = "eventblocks")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, short, env = "EVENTBLOCKS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, short = 'v')]
    pub debug: bool,

    // --- Setting overrides ---
    /// Base URL of the events service
    #[arg(long)]
    pub api_url: Option<String>,

    /// Block template (`\n` for line breaks, `---CHILD---` for child blocks)
    #[arg(long)]
    pub template: Option<String>,

    /// Clock style: 12 or 24
    #[arg(long)]
    pub time_format: Option<TimeFormat>,

    /// Wrap subjects in [[...]]: all, recurring or none
    #[arg(long)]
    pub bracket_events: Option<BracketPolicy>,

    /// Keep property lines whose value is empty
    #[arg(long)]
    pub include_empty_fields: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// Loads settings from `--config` or the default path and applies overrides.
    ///
    /// The result is validated unless a `config` command runs, so those can
    /// still inspect a broken file.
    pub fn settings(&self) -> ClientResult<Settings> {
        let mut settings = match self.config {
            Some(ref path) => Settings::load_from(path),
            None => Settings::load(),
        }
        .map_err(ClientError::Config)?;
        self.apply_overrides(&mut settings);

        if !matches!(self.command, Some(Command::Config { .. })) {
            settings.validate().map_err(ClientError::Config)?;
        }
        Ok(settings)
    }

    /// Applies command-line overrides on top of file settings.
    pub fn apply_overrides(&self, settings: &mut Settings) {
        if let Some(ref url) = self.api_url {
            settings.api_url = url.clone();
        }
        if let Some(ref template) = self.template {
            settings.output_format = template.clone();
        }
        if let Some(format) = self.time_format {
            settings.time_format = format;
        }
        if let Some(policy) = self.bracket_events {
            settings.bracket_events = policy;
        }
        if self.include_empty_fields {
            settings.include_empty_fields = true;
        }
    }
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch a day's events and print them as blocks (default: today)
    Events {
        /// Day to fetch, as YYYY-MM-DD
        #[arg(long, conflicts_with = "journal_day")]
        date: Option<NaiveDate>,

        /// Day to fetch, as a YYYYMMDD journal day
        #[arg(long)]
        journal_day: Option<u32>,
    },

    /// Render events from a saved JSON file without contacting the service
    Render {
        /// File holding an events array or a saved service response
        #[arg(long, short)]
        input: PathBuf,

        /// Day to render, as YYYY-MM-DD (default: today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Check that the events service is reachable
    Health,

    /// Configuration commands
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Dump current configuration
    Dump,

    /// Validate configuration
    Validate,

    /// Show configuration file path
    Path,
}
