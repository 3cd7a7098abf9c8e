//! Compiling expression trees into closures over `Update`

use regex::{Regex, RegexBuilder};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use upkeep_errors::FilterError;
use upkeep_types::Update;

use crate::lexer::CompareOp;
use crate::parser::{parse, Expr};
use crate::value::Value;

type Eval = Arc<dyn Fn(&Update) -> Value + Send + Sync>;

/// A boolean test over an update, built once and evaluated per candidate.
///
/// Evaluation never fails: comparisons whose operands cannot be converted
/// to a common type are simply false.
#[derive(Clone)]
pub struct Predicate {
    source: Arc<str>,
    test: Arc<dyn Fn(&Update) -> bool + Send + Sync>,
}

impl Predicate {
    /// Compile predicate text such as `$_.Title -like '*Preview*'`
    ///
    /// # Errors
    ///
    /// Returns a `FilterError` describing the first syntax, property or
    /// pattern problem.
    pub fn parse(source: &str) -> Result<Self, FilterError> {
        let expr = parse(source)?;
        let eval = compile(expr)?;
        Ok(Self {
            source: Arc::from(source.trim()),
            test: Arc::new(move |update: &Update| eval(update).truthy()),
        })
    }

    /// Wrap an arbitrary closure; `description` is what `Display` shows
    pub fn from_fn<F>(description: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Update) -> bool + Send + Sync + 'static,
    {
        Self {
            source: Arc::from(description.into()),
            test: Arc::new(f),
        }
    }

    #[must_use]
    pub fn matches(&self, update: &Update) -> bool {
        (self.test)(update)
    }

    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Predicate").field(&self.source).finish()
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl FromStr for Predicate {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn compile(expr: Expr) -> Result<Eval, FilterError> {
    let eval: Eval = match expr {
        Expr::Literal(value) => Arc::new(move |_: &Update| value.clone()),
        Expr::Property(property) => Arc::new(move |update: &Update| property.read(update)),
        Expr::Not(inner) => {
            let inner = compile(*inner)?;
            Arc::new(move |update: &Update| Value::Bool(!inner(update).truthy()))
        }
        Expr::And(left, right) => {
            let (left, right) = (compile(*left)?, compile(*right)?);
            Arc::new(move |update: &Update| {
                Value::Bool(left(update).truthy() && right(update).truthy())
            })
        }
        Expr::Or(left, right) => {
            let (left, right) = (compile(*left)?, compile(*right)?);
            Arc::new(move |update: &Update| {
                Value::Bool(left(update).truthy() || right(update).truthy())
            })
        }
        Expr::Compare { op, left, right } => compile_compare(op, *left, *right)?,
    };
    Ok(eval)
}

fn compile_compare(op: CompareOp, left: Expr, right: Expr) -> Result<Eval, FilterError> {
    let left = compile(left)?;

    match op {
        CompareOp::Like | CompareOp::NotLike => {
            let pattern = wildcard_regex(&literal_pattern(op, &right)?)?;
            let negate = op == CompareOp::NotLike;
            Ok(Arc::new(move |update: &Update| {
                let value = left(update);
                let hit = value
                    .elements()
                    .iter()
                    .any(|e| pattern.is_match(&e.to_text()) != negate);
                Value::Bool(hit)
            }))
        }
        CompareOp::Match | CompareOp::NotMatch => {
            let source = literal_pattern(op, &right)?;
            let pattern = RegexBuilder::new(&source)
                .case_insensitive(true)
                .build()
                .map_err(|e| FilterError::InvalidPattern {
                    pattern: source.clone(),
                    message: e.to_string(),
                })?;
            let negate = op == CompareOp::NotMatch;
            Ok(Arc::new(move |update: &Update| {
                let value = left(update);
                let hit = value
                    .elements()
                    .iter()
                    .any(|e| pattern.is_match(&e.to_text()) != negate);
                Value::Bool(hit)
            }))
        }
        CompareOp::Contains | CompareOp::NotContains => {
            let right = compile(right)?;
            let negate = op == CompareOp::NotContains;
            Ok(Arc::new(move |update: &Update| {
                let (l, r) = (left(update), right(update));
                let found = l.elements().iter().any(|e| e.equals(&r));
                Value::Bool(found != negate)
            }))
        }
        _ => {
            let right = compile(right)?;
            Ok(Arc::new(move |update: &Update| {
                let (l, r) = (left(update), right(update));
                let hit = l.elements().iter().any(|e| scalar_compare(op, e, &r));
                Value::Bool(hit)
            }))
        }
    }
}

fn scalar_compare(op: CompareOp, left: &Value, right: &Value) -> bool {
    let ordering = left.compare(right);
    match op {
        CompareOp::Eq => ordering == Some(Ordering::Equal),
        CompareOp::Ne => ordering != Some(Ordering::Equal),
        CompareOp::Gt => ordering == Some(Ordering::Greater),
        CompareOp::Ge => matches!(ordering, Some(Ordering::Greater | Ordering::Equal)),
        CompareOp::Lt => ordering == Some(Ordering::Less),
        CompareOp::Le => matches!(ordering, Some(Ordering::Less | Ordering::Equal)),
        _ => false,
    }
}

/// Pattern operators compile their right-hand side once, so it must be a literal
fn literal_pattern(op: CompareOp, right: &Expr) -> Result<String, FilterError> {
    match right {
        Expr::Literal(value @ (Value::Str(_) | Value::Int(_))) => Ok(value.to_text()),
        _ => Err(FilterError::PatternNotLiteral {
            operator: op.name().to_string(),
        }),
    }
}

/// Translate a `-like` wildcard (`*`, `?`, `[set]`, backtick escape) to an anchored regex
fn wildcard_regex(pattern: &str) -> Result<Regex, FilterError> {
    let invalid = |message: &str| FilterError::InvalidPattern {
        pattern: pattern.to_string(),
        message: message.to_string(),
    };

    let mut re = String::from("^");
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        match c {
            '*' => re.push_str(".*"),
            '?' => re.push('.'),
            '`' => match chars.next() {
                Some(escaped) => re.push_str(&regex::escape(escaped.encode_utf8(&mut [0; 4]))),
                None => return Err(invalid("trailing escape character")),
            },
            '[' => {
                let mut set = Vec::new();
                let mut closed = false;
                for c in chars.by_ref() {
                    if c == ']' {
                        closed = true;
                        break;
                    }
                    set.push(c);
                }
                if !closed {
                    return Err(invalid("unterminated character set"));
                }
                if set.is_empty() {
                    return Err(invalid("empty character set"));
                }
                re.push('[');
                let last = set.len() - 1;
                for (idx, c) in set.into_iter().enumerate() {
                    if c == '-' && idx != 0 && idx != last {
                        re.push('-');
                    } else {
                        if matches!(c, '\\' | '[' | ']' | '^' | '&' | '~' | '-') {
                            re.push('\\');
                        }
                        re.push(c);
                    }
                }
                re.push(']');
            }
            other => re.push_str(&regex::escape(other.encode_utf8(&mut [0; 4]))),
        }
    }
    re.push('$');

    RegexBuilder::new(&re)
        .case_insensitive(true)
        .dot_matches_new_line(true)
        .build()
        .map_err(|e| invalid(&e.to_string()))
}
