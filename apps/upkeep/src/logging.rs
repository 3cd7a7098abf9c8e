//! Tracing setup and structured logging of events
//!
//! Events are mirrored into tracing with structured fields so the JSON debug
//! log carries the whole run, including what the status lines leave out.

use tracing::Level;
use tracing_subscriber::EnvFilter;
use upkeep_config::Config;
use upkeep_events::{
    AppEvent, DownloadEvent, GeneralEvent, InstallEvent, RebootEvent, SearchEvent,
    SelectionEvent,
};

/// Emit a tracing event at a level only known at runtime
macro_rules! event_at {
    ($level:expr, $($rest:tt)+) => {
        match $level {
            Level::ERROR => tracing::error!($($rest)+),
            Level::WARN => tracing::warn!($($rest)+),
            Level::INFO => tracing::info!($($rest)+),
            Level::DEBUG => tracing::debug!($($rest)+),
            _ => tracing::trace!($($rest)+),
        }
    };
}

const DEBUG_FILTER: &str = "info,upkeep=debug,upkeep_ops=debug";
const DEFAULT_FILTER: &str = "warn";

fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Initialize tracing/logging
///
/// - default: human-readable records on stderr at `warn`
/// - `debug`: JSON records in a timestamped file under the logs directory
/// - `json_mode`: nothing on the console, so stdout stays machine-readable
pub fn init_tracing(json_mode: bool, debug_enabled: bool) {
    if debug_enabled {
        let log_dir = Config::logs_dir();
        let log_file = log_dir.join(format!(
            "upkeep-{}.log",
            chrono::Utc::now().format("%Y%m%d-%H%M%S")
        ));

        let file =
            std::fs::create_dir_all(&log_dir).and_then(|()| std::fs::File::create(&log_file));
        match file {
            Ok(file) => {
                tracing_subscriber::fmt()
                    .json()
                    .with_writer(file)
                    .with_env_filter(env_filter(DEBUG_FILTER))
                    .init();
                if !json_mode {
                    eprintln!("Debug logging enabled: {}", log_file.display());
                }
                return;
            }
            Err(e) => {
                if !json_mode {
                    eprintln!("Warning: Failed to create log file {}: {e}", log_file.display());
                }
            }
        }
    }

    if json_mode {
        // Keep stdout and stderr free of log records
        tracing_subscriber::fmt()
            .with_writer(std::io::sink)
            .with_env_filter("off")
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(env_filter(DEFAULT_FILTER))
            .init();
    }
}

/// Log an `AppEvent` using the tracing infrastructure with structured fields
pub fn log_event_with_tracing(event: &AppEvent) {
    let level = event.log_level();
    let target = event.log_target();

    match event {
        AppEvent::General(general) => match general {
            GeneralEvent::Warning { message, context } => {
                event_at!(level, event_target = target, context = ?context, "{message}");
            }
            GeneralEvent::OperationStarted { operation } => {
                event_at!(
                    level,
                    event_target = target,
                    operation = %operation,
                    "Operation started"
                );
            }
            GeneralEvent::OperationCompleted { operation, success } => {
                event_at!(
                    level,
                    event_target = target,
                    operation = %operation,
                    success = *success,
                    "Operation completed"
                );
            }
            GeneralEvent::OperationFailed { operation, failure } => {
                event_at!(
                    level,
                    event_target = target,
                    operation = %operation,
                    code = ?failure.code,
                    failure_message = %failure.message,
                    hint = ?failure.hint,
                    retryable = failure.retryable,
                    "Operation failed"
                );
            }
        },

        AppEvent::Search(search) => match search {
            SearchEvent::Started { criteria, attempt } => {
                event_at!(
                    level,
                    event_target = target,
                    criteria = %criteria,
                    attempt = *attempt,
                    "Search started"
                );
            }
            SearchEvent::Failed {
                result_code,
                failure,
                retry_in,
            } => {
                event_at!(
                    level,
                    event_target = target,
                    result_code = %result_code,
                    failure = ?failure.as_ref().map(|f| &f.message),
                    retry_in_secs = retry_in.as_secs(),
                    "Search failed"
                );
            }
            SearchEvent::Completed { found, attempts } => {
                event_at!(
                    level,
                    event_target = target,
                    found = *found,
                    attempts = *attempts,
                    "Search completed"
                );
            }
        },

        AppEvent::Selection(selection) => match selection {
            SelectionEvent::Included { update, rule } => {
                event_at!(
                    level,
                    event_target = target,
                    update_id = %update.id,
                    title = %update.title,
                    bytes = update.max_download_size,
                    rule = ?rule,
                    "Update included"
                );
            }
            SelectionEvent::Skipped { update, rule } => {
                event_at!(
                    level,
                    event_target = target,
                    update_id = %update.id,
                    title = %update.title,
                    rule = ?rule,
                    "Update skipped by filter"
                );
            }
            SelectionEvent::UserInputWarning { update } => {
                event_at!(
                    level,
                    event_target = target,
                    update_id = %update.id,
                    title = %update.title,
                    "Update may request user input"
                );
            }
            SelectionEvent::LimitReached { limit, remaining } => {
                event_at!(
                    level,
                    event_target = target,
                    limit = *limit,
                    remaining = *remaining,
                    "Update limit reached"
                );
            }
            SelectionEvent::Paused { duration } => {
                event_at!(
                    level,
                    event_target = target,
                    secs = duration.as_secs(),
                    "Pausing before download"
                );
            }
        },

        AppEvent::Download(download) => match download {
            DownloadEvent::Started {
                count,
                total_bytes,
                priority,
            } => {
                event_at!(
                    level,
                    event_target = target,
                    count = *count,
                    total_bytes = *total_bytes,
                    priority = %priority,
                    "Download started"
                );
            }
            DownloadEvent::Failed {
                result_code,
                failure,
                retry_in,
            } => {
                event_at!(
                    level,
                    event_target = target,
                    result_code = %result_code,
                    failure = ?failure.as_ref().map(|f| &f.message),
                    retry_in_secs = retry_in.as_secs(),
                    "Download failed"
                );
            }
            DownloadEvent::PartiallySucceeded {
                downloaded,
                requested,
            } => {
                event_at!(
                    level,
                    event_target = target,
                    downloaded = *downloaded,
                    requested = *requested,
                    "Download partially succeeded"
                );
            }
            DownloadEvent::Completed {
                result_code,
                downloaded,
            } => {
                event_at!(
                    level,
                    event_target = target,
                    result_code = %result_code,
                    downloaded = *downloaded,
                    "Download completed"
                );
            }
            DownloadEvent::UpdateDownloaded { update } => {
                event_at!(
                    level,
                    event_target = target,
                    update_id = %update.id,
                    title = %update.title,
                    "Update downloaded"
                );
            }
            DownloadEvent::UpdateNotDownloaded { update } => {
                event_at!(
                    level,
                    event_target = target,
                    update_id = %update.id,
                    title = %update.title,
                    "Update not downloaded"
                );
            }
        },

        AppEvent::Install(install) => match install {
            InstallEvent::Started { count } => {
                event_at!(level, event_target = target, count = *count, "Install started");
            }
            InstallEvent::Completed {
                result_code,
                reboot_required,
            } => {
                event_at!(
                    level,
                    event_target = target,
                    result_code = %result_code,
                    reboot_required = *reboot_required,
                    "Install completed"
                );
            }
            InstallEvent::UpdateInstalled { update } => {
                event_at!(
                    level,
                    event_target = target,
                    update_id = %update.id,
                    title = %update.title,
                    "Update installed"
                );
            }
            InstallEvent::UpdateFailed {
                update,
                result_code,
            } => {
                event_at!(
                    level,
                    event_target = target,
                    update_id = %update.id,
                    title = %update.title,
                    result_code = %result_code,
                    "Update failed to install"
                );
            }
            InstallEvent::NothingFound => {
                event_at!(level, event_target = target, "No updates found");
            }
        },

        AppEvent::Reboot(reboot) => match reboot {
            RebootEvent::Required { reason } => {
                event_at!(level, event_target = target, reason = %reason, "Reboot required");
            }
            RebootEvent::WaitingForProcess { process, debounce } => {
                event_at!(
                    level,
                    event_target = target,
                    process = %process,
                    debounce_secs = debounce.as_secs(),
                    "Waiting for blocking process"
                );
            }
            RebootEvent::ProcessSettled { process, waited } => {
                event_at!(
                    level,
                    event_target = target,
                    process = %process,
                    waited_secs = waited.as_secs(),
                    "Blocking process settled"
                );
            }
            RebootEvent::NotRequired => {
                event_at!(level, event_target = target, "Reboot not required");
            }
        },
    }
}
