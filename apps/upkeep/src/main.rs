//! upkeep - Unattended Windows update runner
//!
//! Searches for, filters, downloads and installs Windows updates, then
//! reports through the exit code whether the host must be rebooted before
//! the next run: 0 done, 101 reboot and run again, 1 fatal error.

mod cli;
mod display;
mod error;
mod events;
mod logging;

use crate::cli::Cli;
use crate::display::OutputRenderer;
use crate::error::CliError;
use crate::events::EventHandler;
use clap::Parser;
use std::process::ExitCode;
use tokio::select;
use tracing::info;
use upkeep_config::Config;
use upkeep_events::EventReceiver;
use upkeep_ops::{OpsContextBuilder, OpsCtx};
use upkeep_platform::Platform;
use upkeep_types::{ColorChoice, RunOutcome, RunReport};

const FATAL_EXIT_CODE: u8 = 1;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            // --help and --version are not failures
            return if e.use_stderr() {
                ExitCode::from(FATAL_EXIT_CODE)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    logging::init_tracing(cli.global.json, cli.global.debug);

    match run(cli).await {
        Ok(outcome) => ExitCode::from(outcome.exit_code()),
        Err(e) => {
            info!("Application error: {}", e);
            error::print_fatal(&e);
            ExitCode::from(FATAL_EXIT_CODE)
        }
    }
}

/// Main application logic
async fn run(cli: Cli) -> Result<RunOutcome, CliError> {
    info!("Starting upkeep v{}", env!("CARGO_PKG_VERSION"));

    // Defaults < config file < environment < command line
    let mut config = Config::load_or_default(cli.global.config.as_deref()).await?;
    config.merge_env()?;
    apply_cli_config(&mut config, &cli);
    config.validate()?;

    let platform = Platform::current(&config.search.client_application_id)?;

    let (event_sender, event_receiver) = upkeep_events::channel();

    let colors_enabled = match config.general.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => console::Term::stdout().features().colors_supported(),
    };
    let json_mode = cli.global.json;
    let renderer = OutputRenderer::new(json_mode, colors_enabled);
    let mut event_handler = EventHandler::new(!json_mode, colors_enabled, cli.global.debug);

    // Filter rules compile here, so a bad rule fails before any work starts
    let ctx = OpsContextBuilder::new()
        .with_platform(platform)
        .with_event_sender(event_sender)
        .with_config(config)
        .build()?;

    let report = execute_with_events(
        &ctx,
        cli.only_check_for_reboot_required,
        event_receiver,
        &mut event_handler,
    )
    .await?;

    renderer.render_report(&report)?;

    info!(outcome = ?report.outcome, "Run completed");
    Ok(report.outcome)
}

/// Run the pipeline while rendering its events as they arrive
async fn execute_with_events(
    ctx: &OpsCtx,
    only_check_for_reboot_required: bool,
    mut event_receiver: EventReceiver,
    event_handler: &mut EventHandler,
) -> Result<RunReport, CliError> {
    let mut operation = Box::pin(async {
        if only_check_for_reboot_required {
            upkeep_ops::check_reboot_only(ctx).await
        } else {
            upkeep_ops::run(ctx).await
        }
    });

    loop {
        select! {
            // Pipeline finished
            result = &mut operation => {
                // Drain any remaining events
                while let Ok(event) = event_receiver.try_recv() {
                    event_handler.handle_event(event);
                }
                return result.map_err(CliError::from);
            }

            // Event received
            event = event_receiver.recv() => {
                if let Some(event) = event {
                    event_handler.handle_event(event);
                }
            }
        }
    }
}

/// Apply CLI configuration overrides (highest precedence)
fn apply_cli_config(config: &mut Config, cli: &Cli) {
    if let Some(color) = cli.global.color {
        config.general.color = color;
    }
    if let Some(criteria) = &cli.search_criteria {
        config.search.criteria.clone_from(criteria);
    }
    if !cli.filters.is_empty() {
        config.filter.rules.clone_from(&cli.filters);
    }
    if let Some(limit) = cli.update_limit {
        config.filter.update_limit = limit;
    }
}
