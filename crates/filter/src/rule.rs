//! `action:predicate` rules and first-match evaluation

use std::fmt;
use std::str::FromStr;
use upkeep_errors::FilterError;
use upkeep_types::Update;

use crate::predicate::Predicate;

/// What a matching rule does with the update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterAction {
    Include,
    Exclude,
}

/// One ordered filter rule
#[derive(Debug, Clone)]
pub enum FilterRule {
    Include(Predicate),
    Exclude(Predicate),
}

impl FilterRule {
    /// Parse `include:<predicate>` or `exclude:<predicate>`
    ///
    /// The action is case-insensitive; everything after the first `:` is
    /// the predicate.
    ///
    /// # Errors
    ///
    /// Returns a `FilterError` when the action is missing or unknown, or
    /// when the predicate does not compile.
    pub fn parse(rule: &str) -> Result<Self, FilterError> {
        let Some((action, predicate)) = rule.split_once(':') else {
            return Err(FilterError::MissingAction {
                rule: rule.to_string(),
            });
        };

        let action = match action.trim().to_ascii_lowercase().as_str() {
            "include" => FilterAction::Include,
            "exclude" => FilterAction::Exclude,
            _ => {
                return Err(FilterError::UnknownAction {
                    rule: rule.to_string(),
                    action: action.trim().to_string(),
                })
            }
        };

        if predicate.trim().is_empty() {
            return Err(FilterError::EmptyPredicate {
                rule: rule.to_string(),
            });
        }

        let predicate = Predicate::parse(predicate).map_err(|e| e.in_rule(rule))?;
        Ok(Self::new(action, predicate))
    }

    #[must_use]
    pub fn new(action: FilterAction, predicate: Predicate) -> Self {
        match action {
            FilterAction::Include => Self::Include(predicate),
            FilterAction::Exclude => Self::Exclude(predicate),
        }
    }

    #[must_use]
    pub fn action(&self) -> FilterAction {
        match self {
            Self::Include(_) => FilterAction::Include,
            Self::Exclude(_) => FilterAction::Exclude,
        }
    }

    #[must_use]
    pub fn predicate(&self) -> &Predicate {
        match self {
            Self::Include(p) | Self::Exclude(p) => p,
        }
    }

    #[must_use]
    pub fn matches(&self, update: &Update) -> bool {
        self.predicate().matches(update)
    }
}

impl fmt::Display for FilterRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let action = match self.action() {
            FilterAction::Include => "include",
            FilterAction::Exclude => "exclude",
        };
        write!(f, "{action}:{}", self.predicate())
    }
}

impl FromStr for FilterRule {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Parse an ordered rule list, failing on the first invalid rule
///
/// # Errors
///
/// Returns the `FilterError` of the first rule that does not parse.
pub fn parse_rules<I, S>(rules: I) -> Result<Vec<FilterRule>, FilterError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    rules
        .into_iter()
        .map(|rule| FilterRule::parse(rule.as_ref()))
        .collect()
}

/// Index of the first rule whose predicate matches `update`
#[must_use]
pub fn matching_rule(rules: &[FilterRule], update: &Update) -> Option<usize> {
    rules.iter().position(|rule| rule.matches(update))
}

/// Whether `update` should be acted on
///
/// The first matching rule decides; an update no rule matches is excluded.
#[must_use]
pub fn include(rules: &[FilterRule], update: &Update) -> bool {
    match matching_rule(rules, update) {
        Some(idx) => {
            let rule = &rules[idx];
            tracing::trace!(update = %update.title, rule = %rule, "filter rule matched");
            rule.action() == FilterAction::Include
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_actions_case_insensitively() {
        let rule = FilterRule::parse(" Exclude : $_.IsMandatory").unwrap();
        assert_eq!(rule.action(), FilterAction::Exclude);
        assert_eq!(rule.to_string(), "exclude:$_.IsMandatory");
    }

    #[test]
    fn predicate_may_contain_colons() {
        let rule = FilterRule::parse(
            "include:$_.LastDeploymentChangeTime -gt '2024-01-01 12:30:00'",
        )
        .unwrap();
        assert_eq!(rule.action(), FilterAction::Include);
    }

    #[test]
    fn rule_errors() {
        assert!(matches!(
            FilterRule::parse("$true").unwrap_err(),
            FilterError::MissingAction { .. }
        ));
        assert!(matches!(
            FilterRule::parse("allow:$true").unwrap_err(),
            FilterError::UnknownAction { ref action, .. } if action == "allow"
        ));
        assert!(matches!(
            FilterRule::parse("include:   ").unwrap_err(),
            FilterError::EmptyPredicate { .. }
        ));
        assert!(matches!(
            FilterRule::parse("include:$_.Colour -eq 'red'").unwrap_err(),
            FilterError::InRule { .. }
        ));
    }

    #[test]
    fn first_match_wins_and_default_excludes() {
        let rules = parse_rules([
            "exclude:$_.Title -like '*Preview*'",
            "include:$_.Title -like '*Cumulative*'",
        ])
        .unwrap();

        let preview = Update::new("1", "Cumulative Update Preview");
        let cumulative = Update::new("2", "Cumulative Update");
        let driver = Update::new("3", "Intel - Display - 31.0.101.2125");

        assert!(!include(&rules, &preview));
        assert!(include(&rules, &cumulative));
        assert!(!include(&rules, &driver));
        assert_eq!(matching_rule(&rules, &preview), Some(0));
        assert_eq!(matching_rule(&rules, &driver), None);
        assert!(!include(&[], &driver));
    }
}
