//! CLI error handling

use std::error::Error as _;
use std::fmt;
use std::io::Write;

use upkeep_errors::UserFacingError;

/// CLI-specific error type
#[derive(Debug)]
pub enum CliError {
    /// Any error raised by the library crates
    Ops(upkeep_errors::Error),
    /// I/O error
    Io(std::io::Error),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Ops(e) => f.write_str(&e.user_message()),
            CliError::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            // The user message already covers the top-level error itself
            CliError::Ops(e) => e.source(),
            CliError::Io(e) => Some(e),
        }
    }
}

impl CliError {
    fn hint(&self) -> Option<String> {
        match self {
            CliError::Ops(e) => e.user_hint().map(str::to_string),
            CliError::Io(_) => None,
        }
    }
}

impl From<upkeep_errors::Error> for CliError {
    fn from(e: upkeep_errors::Error) -> Self {
        CliError::Ops(e)
    }
}

impl From<upkeep_errors::ConfigError> for CliError {
    fn from(e: upkeep_errors::ConfigError) -> Self {
        CliError::Ops(e.into())
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e)
    }
}

/// Lines printed for a fatal error, each already prefixed with `ERROR: `
///
/// The message comes first, then every cause in the `source()` chain that
/// adds something new, then the hint.
pub fn fatal_lines(error: &CliError) -> Vec<String> {
    let mut seen = error.to_string();
    let mut lines: Vec<String> = seen.lines().map(|l| format!("ERROR: {l}")).collect();

    let mut cause = error.source();
    while let Some(err) = cause {
        let text = err.to_string();
        if !seen.contains(&text) {
            lines.extend(text.lines().map(|l| format!("ERROR: {l}")));
            seen.push('\n');
            seen.push_str(&text);
        }
        cause = err.source();
    }

    if let Some(hint) = error.hint() {
        lines.push(format!("ERROR: hint: {hint}"));
    }
    lines
}

/// Print a fatal error to stderr
pub fn print_fatal(error: &CliError) {
    let mut stderr = std::io::stderr().lock();
    for line in fatal_lines(error) {
        let _ = writeln!(stderr, "{line}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use upkeep_errors::{ConfigError, FilterError};

    #[test]
    fn every_line_is_prefixed() {
        let err = CliError::from(ConfigError::ParseError {
            message: "expected `=`\nat line 3".to_string(),
        });
        let lines = fatal_lines(&err);
        assert!(lines.len() >= 2);
        assert!(lines.iter().all(|l| l.starts_with("ERROR: ")));
    }

    #[test]
    fn nested_filter_errors_show_the_cause_once() {
        let inner = FilterError::UnknownProperty {
            property: "Colour".to_string(),
        };
        let err = CliError::from(upkeep_errors::Error::from(
            inner.clone().in_rule("include:$_.Colour -eq 1"),
        ));
        let lines = fatal_lines(&err);
        let mentions = lines.iter().filter(|l| l.contains("Colour")).count();
        assert!(mentions >= 1);
        let cause = inner.to_string();
        let cause_lines = lines.iter().filter(|l| **l == format!("ERROR: {cause}")).count();
        assert!(cause_lines <= 1);
    }

    #[test]
    fn hints_close_the_output() {
        let err = CliError::from(ConfigError::NotFound {
            path: "/etc/upkeep.toml".to_string(),
        });
        let lines = fatal_lines(&err);
        assert!(lines.last().unwrap().starts_with("ERROR: hint: "));
    }
}
