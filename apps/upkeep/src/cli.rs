//! Command line interface definition

use clap::Parser;
use std::path::PathBuf;
use upkeep_types::ColorChoice;

/// upkeep - Unattended Windows update runner
///
/// Exits 0 when the host is up to date, 101 when it must be rebooted and the
/// tool run again, and 1 on a fatal error.
#[derive(Parser)]
#[command(name = "upkeep")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Search, download and install Windows updates, then report whether a reboot is owed")]
pub struct Cli {
    /// Windows Update search criteria
    #[arg(long, value_name = "CRITERIA")]
    pub search_criteria: Option<String>,

    /// Filter rule in `action:predicate` form (repeatable, first match wins)
    ///
    /// Replaces the configured rules. Example:
    /// --filter "exclude:$_.Title -like '*Preview*'" --filter 'include:$true'
    #[arg(long = "filter", value_name = "RULE")]
    pub filters: Vec<String>,

    /// Maximum number of updates to queue in one run
    #[arg(long, value_name = "N")]
    pub update_limit: Option<usize>,

    /// Only check whether a reboot is pending, then exit
    #[arg(long)]
    pub only_check_for_reboot_required: bool,

    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Output and configuration arguments
#[derive(Parser)]
pub struct GlobalArgs {
    /// Print the run report as JSON on stdout
    #[arg(long)]
    pub json: bool,

    /// Write a JSON debug log to the upkeep logs directory
    #[arg(long)]
    pub debug: bool,

    /// Color output control
    #[arg(long, value_enum)]
    pub color: Option<ColorChoice>,

    /// Use alternate config file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}
