//! Operations context for dependency injection

use upkeep_config::Config;
use upkeep_errors::{Error, OpsError};
use upkeep_events::{EventEmitter, EventSender};
use upkeep_filter::{parse_rules, FilterRule};
use upkeep_platform::Platform;

/// Operations context providing access to all run collaborators
pub struct OpsCtx {
    /// Host collaborators (update service, reboot state, process probe, clock)
    pub platform: Platform,
    /// Event sender for the operational log
    pub tx: EventSender,
    /// Effective configuration
    pub config: Config,
    /// Compiled filter rules, in evaluation order
    pub rules: Vec<FilterRule>,
}

// No public constructor - use OpsContextBuilder instead

impl EventEmitter for OpsCtx {
    fn event_sender(&self) -> Option<&EventSender> {
        Some(&self.tx)
    }
}

/// Builder for operations context
pub struct OpsContextBuilder {
    platform: Option<Platform>,
    tx: Option<EventSender>,
    config: Option<Config>,
    rules: Option<Vec<FilterRule>>,
}

impl OpsContextBuilder {
    /// Create new context builder
    #[must_use]
    pub fn new() -> Self {
        Self {
            platform: None,
            tx: None,
            config: None,
            rules: None,
        }
    }

    /// Set host platform
    #[must_use]
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = Some(platform);
        self
    }

    /// Set event sender
    #[must_use]
    pub fn with_event_sender(mut self, tx: EventSender) -> Self {
        self.tx = Some(tx);
        self
    }

    /// Set configuration
    #[must_use]
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Set already-compiled filter rules
    ///
    /// Without this the rules are compiled from `config.filter.rules` at
    /// build time.
    #[must_use]
    pub fn with_rules(mut self, rules: Vec<FilterRule>) -> Self {
        self.rules = Some(rules);
        self
    }

    /// Build the context
    ///
    /// # Errors
    ///
    /// Returns an error if any required component is missing or a configured
    /// filter rule does not parse.
    pub fn build(self) -> Result<OpsCtx, Error> {
        let platform = self.platform.ok_or_else(|| OpsError::MissingComponent {
            component: "platform".to_string(),
        })?;

        let tx = self.tx.ok_or_else(|| OpsError::MissingComponent {
            component: "event_sender".to_string(),
        })?;

        let config = self.config.ok_or_else(|| OpsError::MissingComponent {
            component: "config".to_string(),
        })?;

        let rules = match self.rules {
            Some(rules) => rules,
            None => parse_rules(&config.filter.rules)?,
        };

        Ok(OpsCtx {
            platform,
            tx,
            config,
            rules,
        })
    }
}

impl Default for OpsContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}
