//! Recursive-descent parser producing an expression tree
//!
//! Precedence follows PowerShell: `-and` and `-or` share the lowest level
//! and associate left to right, comparisons bind tighter, and the unary
//! `-not`/`!` binds tightest, so `-not $a -eq $b` means `(-not $a) -eq $b`.

use upkeep_errors::FilterError;

use crate::lexer::{tokenize, CompareOp, Spanned, Token};
use crate::property::Property;
use crate::value::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Value),
    Property(Property),
    Not(Box<Expr>),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
    Compare {
        op: CompareOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
}

/// Parse predicate text into an expression tree
///
/// # Errors
///
/// Returns the first lexical or syntax error found.
pub fn parse(input: &str) -> Result<Expr, FilterError> {
    let tokens = tokenize(input)?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        end: input.chars().count(),
    };
    let expr = parser.logical()?;
    if let Some(extra) = parser.peek() {
        return Err(FilterError::UnexpectedToken {
            expected: "end of predicate".to_string(),
            found: extra.token.describe(),
            position: extra.position,
        });
    }
    Ok(expr)
}

struct Parser {
    tokens: Vec<Spanned>,
    pos: usize,
    end: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Spanned> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Spanned> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn unexpected(&self, expected: &str, found: Option<&Spanned>) -> FilterError {
        match found {
            Some(spanned) => FilterError::UnexpectedToken {
                expected: expected.to_string(),
                found: spanned.token.describe(),
                position: spanned.position,
            },
            None => FilterError::UnexpectedToken {
                expected: expected.to_string(),
                found: "end of predicate".to_string(),
                position: self.end,
            },
        }
    }

    fn logical(&mut self) -> Result<Expr, FilterError> {
        let mut left = self.comparison()?;
        loop {
            match self.peek().map(|s| &s.token) {
                Some(Token::And) => {
                    self.pos += 1;
                    let right = self.comparison()?;
                    left = Expr::And(Box::new(left), Box::new(right));
                }
                Some(Token::Or) => {
                    self.pos += 1;
                    let right = self.comparison()?;
                    left = Expr::Or(Box::new(left), Box::new(right));
                }
                _ => return Ok(left),
            }
        }
    }

    fn comparison(&mut self) -> Result<Expr, FilterError> {
        let mut left = self.unary()?;
        while let Some(Token::Compare(op)) = self.peek().map(|s| &s.token) {
            let op = *op;
            self.pos += 1;
            let right = self.unary()?;
            left = Expr::Compare {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn unary(&mut self) -> Result<Expr, FilterError> {
        if matches!(self.peek().map(|s| &s.token), Some(Token::Not)) {
            self.pos += 1;
            let operand = self.unary()?;
            return Ok(Expr::Not(Box::new(operand)));
        }
        self.primary()
    }

    fn primary(&mut self) -> Result<Expr, FilterError> {
        let Some(spanned) = self.next() else {
            return Err(self.unexpected("an operand", None));
        };

        match spanned.token {
            Token::Str(s) => Ok(Expr::Literal(Value::Str(s))),
            Token::Int(n) => Ok(Expr::Literal(Value::Int(n))),
            Token::LParen => {
                let inner = self.logical()?;
                match self.next() {
                    Some(Spanned {
                        token: Token::RParen,
                        ..
                    }) => Ok(inner),
                    other => Err(self.unexpected("`)`", other.as_ref())),
                }
            }
            Token::Variable(name) => self.variable(&name, spanned.position),
            _ => Err(self.unexpected("an operand", Some(&spanned))),
        }
    }

    fn variable(&mut self, name: &str, position: usize) -> Result<Expr, FilterError> {
        match name.to_ascii_lowercase().as_str() {
            "true" => Ok(Expr::Literal(Value::Bool(true))),
            "false" => Ok(Expr::Literal(Value::Bool(false))),
            "null" => Ok(Expr::Literal(Value::Null)),
            "_" | "psitem" => {
                let mut path = Vec::new();
                while matches!(self.peek().map(|s| &s.token), Some(Token::Dot)) {
                    self.pos += 1;
                    match self.next() {
                        Some(Spanned {
                            token: Token::Ident(word),
                            ..
                        }) => path.push(word),
                        other => return Err(self.unexpected("a property name", other.as_ref())),
                    }
                }
                if path.is_empty() {
                    return Err(self.unexpected("`.` and a property name", self.peek()));
                }
                Ok(Expr::Property(Property::resolve(&path)?))
            }
            _ => Err(FilterError::UnknownVariable {
                name: name.to_string(),
                position,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prop(p: Property) -> Box<Expr> {
        Box::new(Expr::Property(p))
    }

    fn lit(v: Value) -> Box<Expr> {
        Box::new(Expr::Literal(v))
    }

    #[test]
    fn logical_operators_share_precedence() {
        // ($true -or $false) -and $false
        let expr = parse("$true -or $false -and $false").unwrap();
        assert_eq!(
            expr,
            Expr::And(
                Box::new(Expr::Or(lit(Value::Bool(true)), lit(Value::Bool(false)))),
                lit(Value::Bool(false))
            )
        );
    }

    #[test]
    fn comparison_binds_tighter_than_logical() {
        let expr = parse("$_.IsMandatory -eq $true -and $_.Title -like '*KB*'").unwrap();
        assert_eq!(
            expr,
            Expr::And(
                Box::new(Expr::Compare {
                    op: CompareOp::Eq,
                    left: prop(Property::IsMandatory),
                    right: lit(Value::Bool(true)),
                }),
                Box::new(Expr::Compare {
                    op: CompareOp::Like,
                    left: prop(Property::Title),
                    right: lit(Value::Str("*KB*".into())),
                })
            )
        );
    }

    #[test]
    fn not_applies_to_operand() {
        assert_eq!(
            parse("!$_.IsDownloaded").unwrap(),
            Expr::Not(prop(Property::IsDownloaded))
        );
        assert_eq!(
            parse("-not ($_.IsDownloaded)").unwrap(),
            Expr::Not(prop(Property::IsDownloaded))
        );
    }

    #[test]
    fn syntax_errors() {
        assert_eq!(
            parse("$_.Title -eq").unwrap_err(),
            FilterError::UnexpectedToken {
                expected: "an operand".into(),
                found: "end of predicate".into(),
                position: 12,
            }
        );
        assert_eq!(
            parse("($true").unwrap_err(),
            FilterError::UnexpectedToken {
                expected: "`)`".into(),
                found: "end of predicate".into(),
                position: 6,
            }
        );
        assert!(matches!(
            parse("$true $false").unwrap_err(),
            FilterError::UnexpectedToken { position: 6, .. }
        ));
        assert_eq!(
            parse("$env -eq 1").unwrap_err(),
            FilterError::UnknownVariable {
                name: "env".into(),
                position: 0
            }
        );
        assert!(matches!(
            parse("$_").unwrap_err(),
            FilterError::UnexpectedToken { .. }
        ));
        assert!(matches!(
            parse("Title -eq 'x'").unwrap_err(),
            FilterError::UnexpectedToken { position: 0, .. }
        ));
    }
}
