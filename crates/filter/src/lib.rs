#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Update filter rules for upkeep
//!
//! Rules are written as `action:predicate`, where the action is `include`
//! or `exclude` and the predicate is a PowerShell-style boolean expression
//! over the current update `$_`:
//!
//! ```text
//! exclude:$_.InstallationBehavior.CanRequestUserInput
//! exclude:$_.Title -like '*Preview*'
//! include:$_.Categories -contains 'Security Updates' -or $_.IsMandatory
//! include:$true
//! ```
//!
//! Rules are compiled once at startup. Evaluation walks them in order and
//! the first rule whose predicate matches decides; when none matches the
//! update is excluded.

pub mod lexer;
pub mod parser;
pub mod predicate;
pub mod property;
pub mod rule;
pub mod value;

pub use predicate::Predicate;
pub use property::Property;
pub use rule::{include, matching_rule, parse_rules, FilterAction, FilterRule};
pub use value::Value;
