//! Tokenizer for predicate expressions
//!
//! Positions are character offsets into the predicate text.

use upkeep_errors::FilterError;

/// Binary operators written as `-name`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
    Like,
    NotLike,
    Match,
    NotMatch,
    Contains,
    NotContains,
}

impl CompareOp {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Eq => "eq",
            Self::Ne => "ne",
            Self::Gt => "gt",
            Self::Ge => "ge",
            Self::Lt => "lt",
            Self::Le => "le",
            Self::Like => "like",
            Self::NotLike => "notlike",
            Self::Match => "match",
            Self::NotMatch => "notmatch",
            Self::Contains => "contains",
            Self::NotContains => "notcontains",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// `$name`, without the sigil
    Variable(String),
    /// Bare word, only valid as a property name after `.`
    Ident(String),
    Str(String),
    Int(i64),
    Compare(CompareOp),
    And,
    Or,
    Not,
    Dot,
    LParen,
    RParen,
}

impl Token {
    /// Short description used in error messages
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Variable(name) => format!("`${name}`"),
            Self::Ident(word) => format!("`{word}`"),
            Self::Str(s) => format!("string '{s}'"),
            Self::Int(n) => format!("number {n}"),
            Self::Compare(op) => format!("`-{}`", op.name()),
            Self::And => "`-and`".to_string(),
            Self::Or => "`-or`".to_string(),
            Self::Not => "`-not`".to_string(),
            Self::Dot => "`.`".to_string(),
            Self::LParen => "`(`".to_string(),
            Self::RParen => "`)`".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Spanned {
    pub token: Token,
    pub position: usize,
}

/// Split a predicate into tokens
///
/// # Errors
///
/// Returns a `FilterError` for unterminated strings, unknown `-operators`,
/// malformed numbers and characters that cannot start a token.
pub fn tokenize(input: &str) -> Result<Vec<Spanned>, FilterError> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while let Some(&ch) = chars.get(i) {
        let start = i;
        let token = match ch {
            c if c.is_whitespace() => {
                i += 1;
                continue;
            }
            '(' => {
                i += 1;
                Token::LParen
            }
            ')' => {
                i += 1;
                Token::RParen
            }
            '.' => {
                i += 1;
                Token::Dot
            }
            '!' => {
                i += 1;
                Token::Not
            }
            '\'' | '"' => {
                let (text, next) = parse_quoted(&chars, i, ch)?;
                i = next;
                Token::Str(text)
            }
            '$' => {
                let (name, next) = parse_variable(&chars, i);
                i = next;
                Token::Variable(name)
            }
            '-' if chars.get(i + 1).is_some_and(char::is_ascii_alphabetic) => {
                let (word, next) = parse_word(&chars, i + 1);
                i = next;
                operator(&word, start)?
            }
            c if c.is_ascii_digit() || c == '-' => {
                let (value, next) = parse_number(&chars, i)?;
                i = next;
                Token::Int(value)
            }
            c if c.is_alphabetic() || c == '_' => {
                let (word, next) = parse_word(&chars, i);
                i = next;
                Token::Ident(word)
            }
            other => {
                return Err(FilterError::UnexpectedChar {
                    found: other,
                    position: i,
                })
            }
        };
        tokens.push(Spanned {
            token,
            position: start,
        });
    }

    Ok(tokens)
}

/// Parse a quoted string; a doubled quote character is an escaped quote
fn parse_quoted(chars: &[char], start: usize, quote: char) -> Result<(String, usize), FilterError> {
    let mut text = String::new();
    let mut i = start + 1;
    loop {
        match chars.get(i).copied() {
            None => return Err(FilterError::UnterminatedString { position: start }),
            Some(c) if c == quote => {
                if chars.get(i + 1).copied() == Some(quote) {
                    text.push(quote);
                    i += 2;
                } else {
                    return Ok((text, i + 1));
                }
            }
            Some('`') if quote == '"' && i + 1 < chars.len() => {
                // backtick escapes inside double quotes
                text.push(chars[i + 1]);
                i += 2;
            }
            Some(c) => {
                text.push(c);
                i += 1;
            }
        }
    }
}

/// Parse `$name` (`$_` included)
fn parse_variable(chars: &[char], start: usize) -> (String, usize) {
    let mut i = start + 1;
    while chars
        .get(i)
        .is_some_and(|&c| c.is_alphanumeric() || c == '_')
    {
        i += 1;
    }
    (chars[start + 1..i].iter().collect(), i)
}

fn parse_word(chars: &[char], start: usize) -> (String, usize) {
    let mut i = start;
    while chars
        .get(i)
        .is_some_and(|&c| c.is_alphanumeric() || c == '_')
    {
        i += 1;
    }
    (chars[start..i].iter().collect(), i)
}

/// Parse an integer with an optional `KB`/`MB`/`GB`/`TB` multiplier suffix
fn parse_number(chars: &[char], start: usize) -> Result<(i64, usize), FilterError> {
    let (word, next) = if chars.get(start).copied() == Some('-') {
        let (digits, next) = parse_word(chars, start + 1);
        (format!("-{digits}"), next)
    } else {
        parse_word(chars, start)
    };

    parse_int_literal(&word)
        .map(|value| (value, next))
        .ok_or_else(|| FilterError::UnexpectedToken {
            expected: "a number".to_string(),
            found: format!("`{word}`"),
            position: start,
        })
}

/// Integer literal with optional size suffix, e.g. `42`, `-3`, `500MB`
#[must_use]
pub fn parse_int_literal(text: &str) -> Option<i64> {
    let text = text.trim();
    let split = text
        .char_indices()
        .find(|&(idx, c)| !(c.is_ascii_digit() || (idx == 0 && c == '-')))
        .map_or(text.len(), |(idx, _)| idx);
    let (digits, suffix) = text.split_at(split);
    let value: i64 = digits.parse().ok()?;
    let multiplier: i64 = match suffix.to_ascii_lowercase().as_str() {
        "" => 1,
        "kb" => 1 << 10,
        "mb" => 1 << 20,
        "gb" => 1 << 30,
        "tb" => 1 << 40,
        _ => return None,
    };
    value.checked_mul(multiplier)
}

fn operator(word: &str, position: usize) -> Result<Token, FilterError> {
    let token = match word.to_ascii_lowercase().as_str() {
        "eq" | "ieq" => Token::Compare(CompareOp::Eq),
        "ne" | "ine" => Token::Compare(CompareOp::Ne),
        "gt" | "igt" => Token::Compare(CompareOp::Gt),
        "ge" | "ige" => Token::Compare(CompareOp::Ge),
        "lt" | "ilt" => Token::Compare(CompareOp::Lt),
        "le" | "ile" => Token::Compare(CompareOp::Le),
        "like" | "ilike" => Token::Compare(CompareOp::Like),
        "notlike" | "inotlike" => Token::Compare(CompareOp::NotLike),
        "match" | "imatch" => Token::Compare(CompareOp::Match),
        "notmatch" | "inotmatch" => Token::Compare(CompareOp::NotMatch),
        "contains" | "icontains" => Token::Compare(CompareOp::Contains),
        "notcontains" | "inotcontains" => Token::Compare(CompareOp::NotContains),
        "and" => Token::And,
        "or" => Token::Or,
        "not" => Token::Not,
        _ => {
            return Err(FilterError::UnknownOperator {
                operator: word.to_string(),
                position,
            })
        }
    };
    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<Token> {
        tokenize(input)
            .unwrap()
            .into_iter()
            .map(|s| s.token)
            .collect()
    }

    #[test]
    fn tokenizes_property_comparison() {
        assert_eq!(
            kinds("$_.Title -like '*Preview*'"),
            vec![
                Token::Variable("_".into()),
                Token::Dot,
                Token::Ident("Title".into()),
                Token::Compare(CompareOp::Like),
                Token::Str("*Preview*".into()),
            ]
        );
    }

    #[test]
    fn operators_are_case_insensitive() {
        assert_eq!(
            kinds("-NOT $true -And $false -OR $null"),
            vec![
                Token::Not,
                Token::Variable("true".into()),
                Token::And,
                Token::Variable("false".into()),
                Token::Or,
                Token::Variable("null".into()),
            ]
        );
    }

    #[test]
    fn doubled_quotes_escape() {
        assert_eq!(kinds("'it''s'"), vec![Token::Str("it's".into())]);
        assert_eq!(kinds(r#""say ""hi""""#), vec![Token::Str("say \"hi\"".into())]);
    }

    #[test]
    fn numbers_with_size_suffix() {
        assert_eq!(kinds("500MB"), vec![Token::Int(500 * 1024 * 1024)]);
        assert_eq!(kinds("-3"), vec![Token::Int(-3)]);
        assert_eq!(parse_int_literal("2gb"), Some(2 * 1024 * 1024 * 1024));
        assert_eq!(parse_int_literal("12XB"), None);
    }

    #[test]
    fn reports_positions() {
        assert_eq!(
            tokenize("$_.Title -frobnicate 'x'").unwrap_err(),
            FilterError::UnknownOperator {
                operator: "frobnicate".into(),
                position: 9
            }
        );
        assert_eq!(
            tokenize("$_.Title -eq 'open").unwrap_err(),
            FilterError::UnterminatedString { position: 13 }
        );
        assert_eq!(
            tokenize("$_.Title == 'x'").unwrap_err(),
            FilterError::UnexpectedChar {
                found: '=',
                position: 9
            }
        );
    }
}
