//! Output rendering and formatting

use console::Style;
use std::io;
use upkeep_types::{RunOutcome, RunReport};

/// Output renderer for the run report
#[derive(Clone)]
pub struct OutputRenderer {
    /// Use JSON output format
    json_output: bool,
    /// Whether to use colors in output
    colors_enabled: bool,
}

impl OutputRenderer {
    pub fn new(json_output: bool, colors_enabled: bool) -> Self {
        Self {
            json_output,
            colors_enabled,
        }
    }

    /// Render the final report
    pub fn render_report(&self, report: &RunReport) -> io::Result<()> {
        if self.json_output {
            let json = serde_json::to_string_pretty(report).map_err(io::Error::other)?;
            println!("{json}");
        } else {
            for line in summary_lines(report) {
                println!("{}", self.style(report.outcome).apply_to(line));
            }
        }
        Ok(())
    }

    fn style(&self, outcome: RunOutcome) -> Style {
        if !self.colors_enabled {
            return Style::new();
        }
        match outcome {
            RunOutcome::Completed => Style::new().green(),
            RunOutcome::RebootRequired => Style::new().yellow().bold(),
        }
    }
}

/// Plain-text summary printed after the operational log
pub fn summary_lines(report: &RunReport) -> Vec<String> {
    let mut lines = Vec::new();

    if !report.found.is_empty() {
        lines.push(format!(
            "Windows updates: {} found, {} skipped, {} queued ({} MB), {} downloaded, {} installed",
            report.found.len(),
            report.skipped.len(),
            report.queued.len(),
            report.total_download_size.div_ceil(1024 * 1024),
            report.downloaded.len(),
            report.installed.len(),
        ));
    }
    if !report.not_downloaded.is_empty() {
        lines.push(format!(
            "{} update(s) were not downloaded and will be retried on the next run",
            report.not_downloaded.len()
        ));
    }

    match (&report.outcome, &report.reboot_reason) {
        (RunOutcome::RebootRequired, Some(reason)) => lines.push(format!(
            "Reboot required ({reason}); reboot and run upkeep again (exit code {})",
            report.outcome.exit_code()
        )),
        (RunOutcome::RebootRequired, None) => lines.push(format!(
            "Reboot required; reboot and run upkeep again (exit code {})",
            report.outcome.exit_code()
        )),
        (RunOutcome::Completed, _) => lines.push("Windows is up to date".to_string()),
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use upkeep_types::{RebootReason, Uuid};

    #[test]
    fn completed_run_without_updates() {
        let report = RunReport::new(Uuid::nil());
        assert_eq!(summary_lines(&report), ["Windows is up to date"]);
    }

    #[test]
    fn reboot_summary_names_reason_and_exit_code() {
        let mut report = RunReport::new(Uuid::nil());
        report.found = vec!["A".into(), "B".into()];
        report.queued = vec!["A".into()];
        report.skipped = vec!["B".into()];
        report.downloaded = vec!["A".into()];
        report.installed = vec!["A".into()];
        report.total_download_size = 3 * 1024 * 1024 + 1;
        report.outcome = RunOutcome::RebootRequired;
        report.reboot_reason = Some(RebootReason::InstallResult);

        let lines = summary_lines(&report);
        assert_eq!(
            lines[0],
            "Windows updates: 2 found, 1 skipped, 1 queued (4 MB), 1 downloaded, 1 installed"
        );
        assert!(lines[1].contains("installed updates require a reboot"));
        assert!(lines[1].ends_with("(exit code 101)"));
    }
}
