//! eventblocks CLI entry point.

use std::process::ExitCode;

use chrono::Local;
use clap::Parser;

use eventblocks_client::api::EventsApi;
use eventblocks_client::blocks::{BlockId, OutlineSink};
use eventblocks_client::cli::{Cli, Command, ConfigAction};
use eventblocks_client::commands;
use eventblocks_client::config::Settings;
use eventblocks_client::error::ClientResult;
use eventblocks_client::journal::JournalContext;
use eventblocks_client::source::{EventSource, FileSource};
use eventblocks_core::tracing::{TracingConfig, init_tracing};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let tracing_config = if cli.debug {
        TracingConfig::cli_debug()
    } else {
        TracingConfig::default()
    };
    if let Err(e) = init_tracing(tracing_config) {
        eprintln!("warning: {}", e);
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> ClientResult<()> {
    let config_path = cli.config.clone().unwrap_or_else(Settings::default_path);
    let settings = cli.settings()?;

    let today = Local::now().date_naive();
    let trigger = BlockId::generate();

    match cli.command {
        Some(Command::Events { date, journal_day }) => {
            let ctx = match journal_day {
                Some(day) => JournalContext::new(trigger).with_journal_day(day),
                None => JournalContext::for_date(trigger, date.unwrap_or(today)),
            };
            let api = EventsApi::new(settings.api_config())?;
            print_events(&settings, &ctx, &api).await
        }
        Some(Command::Render { input, date }) => {
            let ctx = JournalContext::for_date(trigger, date.unwrap_or(today));
            print_events(&settings, &ctx, &FileSource::new(input)).await
        }
        Some(Command::Health) => {
            let api = EventsApi::new(settings.api_config())?;
            commands::health::health(&api).await
        }
        Some(Command::Config { action }) => match action {
            ConfigAction::Dump => commands::config::dump(&settings, &config_path),
            ConfigAction::Validate => commands::config::validate(&settings),
            ConfigAction::Path => commands::config::path(&config_path),
        },
        None => {
            let ctx = JournalContext::for_date(trigger, today);
            let api = EventsApi::new(settings.api_config())?;
            print_events(&settings, &ctx, &api).await
        }
    }
}

/// Runs the events command against `source`, writing the outline to stdout.
async fn print_events(
    settings: &Settings,
    ctx: &JournalContext,
    source: &dyn EventSource,
) -> ClientResult<()> {
    let mut sink = OutlineSink::new(std::io::stdout());
    commands::events::get_events(ctx, &settings.render_config(), source, &mut sink).await?;
    Ok(())
}
