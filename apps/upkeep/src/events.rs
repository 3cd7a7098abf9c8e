//! Event handling and status display
//!
//! Each event is mirrored into tracing and, unless JSON output is active,
//! rendered as one line of the human-readable operational log on stdout.

use console::Style;
use std::time::Duration;
use tracing::Level;
use upkeep_events::{
    AppEvent, DownloadEvent, GeneralEvent, InstallEvent, RebootEvent, SearchEvent,
    SelectionEvent,
};
use upkeep_types::ResultCode;

/// Event handler for status lines and user feedback
pub struct EventHandler {
    /// Whether to print status lines at all
    show_status: bool,
    /// Whether to use colors in output
    colors_enabled: bool,
    /// Also show debug events
    debug_enabled: bool,
}

impl EventHandler {
    pub fn new(show_status: bool, colors_enabled: bool, debug_enabled: bool) -> Self {
        Self {
            show_status,
            colors_enabled,
            debug_enabled,
        }
    }

    /// Handle incoming event
    pub fn handle_event(&mut self, event: AppEvent) {
        crate::logging::log_event_with_tracing(&event);

        if !self.show_status {
            return;
        }

        let level = event.log_level();
        if level == Level::DEBUG && !self.debug_enabled {
            return;
        }

        if let Some(line) = render(&event) {
            self.print_line(&line, level);
        }
    }

    fn print_line(&self, line: &str, level: Level) {
        if !self.colors_enabled {
            println!("{line}");
            return;
        }
        let style = match level {
            Level::ERROR => Style::new().red().bold(),
            Level::WARN => Style::new().yellow(),
            Level::DEBUG | Level::TRACE => Style::new().dim(),
            _ => Style::new(),
        };
        println!("{}", style.apply_to(line));
    }
}

fn megabytes(bytes: u64) -> u64 {
    bytes.div_ceil(1024 * 1024)
}

fn failure_text(
    result_code: ResultCode,
    failure: Option<&upkeep_events::FailureContext>,
) -> String {
    failure.map_or_else(|| result_code.to_string(), |f| f.message.clone())
}

/// Quote a title as a `-like` pattern that matches only itself
fn like_literal(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    for c in title.chars() {
        match c {
            '[' | ']' | '*' | '?' | '`' => {
                out.push('`');
                out.push(c);
            }
            '\'' => out.push_str("''"),
            _ => out.push(c),
        }
    }
    out
}

/// Status line for an event, if it has one
pub fn render(event: &AppEvent) -> Option<String> {
    match event {
        AppEvent::General(general) => render_general(general),
        AppEvent::Search(search) => render_search(search),
        AppEvent::Selection(selection) => render_selection(selection),
        AppEvent::Download(download) => render_download(download),
        AppEvent::Install(install) => render_install(install),
        AppEvent::Reboot(reboot) => render_reboot(reboot),
    }
}

fn render_general(event: &GeneralEvent) -> Option<String> {
    match event {
        GeneralEvent::Warning { message, context } => Some(match context {
            Some(context) => format!("WARNING: {message}: {context}"),
            None => format!("WARNING: {message}"),
        }),
        // Fatal errors are printed to stderr once the run returns
        GeneralEvent::OperationStarted { .. }
        | GeneralEvent::OperationCompleted { .. }
        | GeneralEvent::OperationFailed { .. } => None,
    }
}

fn render_search(event: &SearchEvent) -> Option<String> {
    match event {
        SearchEvent::Started { .. } => Some("Searching for Windows updates...".to_string()),
        SearchEvent::Failed {
            result_code,
            failure,
            ..
        } => Some(format!(
            "Search for Windows updates failed with '{}'. Retrying...",
            failure_text(*result_code, failure.as_ref())
        )),
        SearchEvent::Completed { .. } => None,
    }
}

fn render_selection(event: &SelectionEvent) -> Option<String> {
    match event {
        SelectionEvent::Included { update, .. } => Some(format!("Found Windows update {update}")),
        SelectionEvent::Skipped { update, .. } => {
            Some(format!("Skipped (filter) Windows update {update}"))
        }
        SelectionEvent::UserInputWarning { update } => Some(format!(
            "WARNING: Windows update {update} may request user input and block the run; \
             exclude it with --filter \"exclude:$_.Title -like '{}'\"",
            like_literal(&update.title)
        )),
        SelectionEvent::LimitReached { limit, remaining } => Some(format!(
            "Update limit of {limit} reached; {remaining} remaining update(s) deferred to the next run"
        )),
        SelectionEvent::Paused { duration } => Some(format!(
            "Waiting {} seconds before downloading...",
            duration.as_secs()
        )),
    }
}

fn render_download(event: &DownloadEvent) -> Option<String> {
    match event {
        DownloadEvent::Started {
            count, total_bytes, ..
        } => Some(format!(
            "Downloading {count} Windows update(s) ({} MB)...",
            megabytes(*total_bytes)
        )),
        DownloadEvent::Failed {
            result_code,
            failure,
            ..
        } => Some(format!(
            "Download of Windows updates failed with '{}'. Retrying...",
            failure_text(*result_code, failure.as_ref())
        )),
        DownloadEvent::PartiallySucceeded {
            downloaded,
            requested,
        } => Some(format!(
            "Downloaded {downloaded} of {requested} Windows update(s); the rest will be retried after a reboot"
        )),
        DownloadEvent::Completed { .. } => None,
        DownloadEvent::UpdateDownloaded { update } => Some(format!(
            "Downloaded Windows update: {}",
            update.title
        )),
        DownloadEvent::UpdateNotDownloaded { update } => Some(format!(
            "Windows update was not downloaded: {}",
            update.title
        )),
    }
}

fn render_install(event: &InstallEvent) -> Option<String> {
    match event {
        InstallEvent::Started { count } => {
            Some(format!("Installing {count} Windows update(s)..."))
        }
        InstallEvent::Completed { result_code, .. } => {
            Some(format!("Installing Windows updates returned '{result_code}'"))
        }
        InstallEvent::UpdateInstalled { update } => {
            Some(format!("Installed Windows update: {}", update.title))
        }
        InstallEvent::UpdateFailed {
            update,
            result_code,
        } => Some(format!(
            "WARNING: Windows update failed to install with '{result_code}': {}",
            update.title
        )),
        InstallEvent::NothingFound => Some("No Windows updates found".to_string()),
    }
}

fn render_reboot(event: &RebootEvent) -> Option<String> {
    match event {
        RebootEvent::Required { reason } => Some(format!("Reboot required: {reason}")),
        RebootEvent::WaitingForProcess { process, debounce } => Some(format!(
            "Waiting for {process} to stay stopped for {}...",
            seconds(*debounce)
        )),
        RebootEvent::ProcessSettled { process, waited } => Some(format!(
            "{process} is no longer running (waited {})",
            seconds(*waited)
        )),
        RebootEvent::NotRequired => Some("No reboot required".to_string()),
    }
}

fn seconds(duration: Duration) -> String {
    format!("{}s", duration.as_secs())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use upkeep_events::FailureContext;
    use upkeep_filter::FilterRule;
    use upkeep_types::{Update, UpdateSummary};

    fn summary() -> UpdateSummary {
        let mut update = Update::new("a", "2024-05 Cumulative Update");
        update.last_deployment_change_time = Utc.with_ymd_and_hms(2024, 5, 14, 0, 0, 0).unwrap();
        update.max_download_size = 12 * 1024 * 1024;
        update.summary()
    }

    #[test]
    fn search_lines() {
        assert_eq!(
            render(&AppEvent::Search(SearchEvent::Started {
                criteria: "IsInstalled=0".into(),
                attempt: 1,
            }))
            .unwrap(),
            "Searching for Windows updates..."
        );
        assert_eq!(
            render(&AppEvent::Search(SearchEvent::Failed {
                result_code: ResultCode::Failed,
                failure: None,
                retry_in: Duration::from_secs(5),
            }))
            .unwrap(),
            "Search for Windows updates failed with 'Failed'. Retrying..."
        );
    }

    #[test]
    fn search_exceptions_show_their_message() {
        let line = render(&AppEvent::Search(SearchEvent::Failed {
            result_code: ResultCode::Failed,
            failure: Some(FailureContext::new(
                None::<String>,
                "0x8024402C",
                None::<String>,
                true,
            )),
            retry_in: Duration::from_secs(5),
        }))
        .unwrap();
        assert!(line.contains("'0x8024402C'"));
    }

    #[test]
    fn selection_lines_show_date_size_and_title() {
        assert_eq!(
            render(&AppEvent::Selection(SelectionEvent::Included {
                update: summary(),
                rule: Some(0),
            }))
            .unwrap(),
            "Found Windows update (2024-05-14; 12 MB): 2024-05 Cumulative Update"
        );
        assert_eq!(
            render(&AppEvent::Selection(SelectionEvent::Skipped {
                update: summary(),
                rule: None,
            }))
            .unwrap(),
            "Skipped (filter) Windows update (2024-05-14; 12 MB): 2024-05 Cumulative Update"
        );
    }

    #[test]
    fn user_input_warning_suggests_a_filter() {
        let line = render(&AppEvent::Selection(SelectionEvent::UserInputWarning {
            update: summary(),
        }))
        .unwrap();
        assert!(line.starts_with("WARNING: "));
        assert!(line.contains("exclude:$_.Title -like '2024-05 Cumulative Update'"));
    }

    #[test]
    fn user_input_suggestion_escapes_wildcards() {
        let title = "Defender Update [KB2267602] *v1.2? `beta' build";
        let update = Update::new("id", title);
        let line = render(&AppEvent::Selection(SelectionEvent::UserInputWarning {
            update: update.summary(),
        }))
        .unwrap();

        let rule = line
            .split("--filter \"")
            .nth(1)
            .and_then(|rest| rest.strip_suffix('"'))
            .unwrap();
        let rule = FilterRule::parse(rule).unwrap();
        assert!(rule.matches(&update));
        assert!(!rule.matches(&Update::new(
            "other",
            "Defender Update K *v1.2? `beta' build"
        )));
        assert!(!rule.matches(&Update::new(
            "other",
            "Defender Update [KB2267602] xv1.2x `beta' build"
        )));
    }

    #[test]
    fn download_and_install_lines() {
        assert_eq!(
            render(&AppEvent::Download(DownloadEvent::UpdateDownloaded {
                update: summary()
            }))
            .unwrap(),
            "Downloaded Windows update: 2024-05 Cumulative Update"
        );
        assert_eq!(
            render(&AppEvent::Download(DownloadEvent::UpdateNotDownloaded {
                update: summary()
            }))
            .unwrap(),
            "Windows update was not downloaded: 2024-05 Cumulative Update"
        );
        assert_eq!(
            render(&AppEvent::Install(InstallEvent::UpdateInstalled {
                update: summary()
            }))
            .unwrap(),
            "Installed Windows update: 2024-05 Cumulative Update"
        );
        assert_eq!(
            render(&AppEvent::Install(InstallEvent::NothingFound)).unwrap(),
            "No Windows updates found"
        );
    }

    #[test]
    fn lifecycle_events_are_silent() {
        assert!(render(&AppEvent::General(GeneralEvent::OperationStarted {
            operation: "update".into()
        }))
        .is_none());
        assert!(render(&AppEvent::Search(SearchEvent::Completed {
            found: 2,
            attempts: 1
        }))
        .is_none());
    }
}
