//! Tokenizer for calculator expressions.

use crate::context::CalcContext;
use crate::error::CalcError;

/// A single lexical token.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// A decimal or scientific-notation literal.
    Number(f64),
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// One of the binary/unary operator symbols.
    Op(String),
    /// A name already known to belong to the function, constant, or
    /// variable tables of the [`CalcContext`] that scanned it.
    Ident(String),
}

/// Two-character operators must be tried before their one-character
/// prefixes (`**` before a bare `*`, `<=` before `<`, ...).
const MULTI_CHAR_OPS: &[&str] = &["**", "==", "!=", "<=", ">="];
const SINGLE_CHAR_OPS: &[char] = &['+', '-', '*', '/', '%', '<', '>', '&', '^', '|'];

/// Scans `source` into a flat list of [`Token`]s, using `ctx` to validate
/// identifiers as they are read.
pub fn tokenize(source: &str, ctx: &CalcContext) -> Result<Vec<Token>, CalcError> {
    let chars: Vec<char> = source.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if c.is_whitespace() {
            i += 1;
            continue;
        }

        if c == '(' {
            tokens.push(Token::LParen);
            i += 1;
            continue;
        }

        if c == ')' {
            tokens.push(Token::RParen);
            i += 1;
            continue;
        }

        if c.is_ascii_digit() || c == '.' {
            let (number, consumed) = scan_number(&chars[i..])?;
            tokens.push(Token::Number(number));
            i += consumed;
            continue;
        }

        if c.is_alphabetic() || c == '_' {
            let (ident, consumed) = scan_ident(&chars[i..]);
            ctx.classify(&ident)?;
            tokens.push(Token::Ident(ident));
            i += consumed;
            continue;
        }

        if let Some((op, consumed)) = scan_operator(&chars[i..]) {
            tokens.push(Token::Op(op));
            i += consumed;
            continue;
        }

        return Err(CalcError::UnexpectedCharacter {
            found: c,
            expected: None,
        });
    }

    Ok(tokens)
}

/// Scans a number: digits and dots, with an optional `e[+-]digits` suffix.
fn scan_number(rest: &[char]) -> Result<(f64, usize), CalcError> {
    let mut end = 0;
    while end < rest.len() && (rest[end].is_ascii_digit() || rest[end] == '.') {
        end += 1;
    }

    if end < rest.len() && rest[end] == 'e' {
        let mut exp_end = end + 1;
        if exp_end < rest.len() && (rest[exp_end] == '-' || rest[exp_end] == '+') {
            exp_end += 1;
        }
        let digits_start = exp_end;
        while exp_end < rest.len() && (rest[exp_end].is_ascii_digit() || rest[exp_end] == '.') {
            exp_end += 1;
        }
        if exp_end > digits_start {
            end = exp_end;
        }
    }

    let text: String = rest[..end].iter().collect();
    text.parse::<f64>()
        .map(|value| (value, end))
        .map_err(|_| CalcError::BadNumber(text))
}

/// Scans a contiguous run of alphanumeric/underscore characters.
fn scan_ident(rest: &[char]) -> (String, usize) {
    let mut end = 0;
    while end < rest.len() && (rest[end].is_alphanumeric() || rest[end] == '_') {
        end += 1;
    }
    (rest[..end].iter().collect(), end)
}

/// Tries the longest operator match first.
fn scan_operator(rest: &[char]) -> Option<(String, usize)> {
    for op in MULTI_CHAR_OPS {
        let len = op.chars().count();
        if rest.len() >= len && rest[..len].iter().collect::<String>() == *op {
            return Some(((*op).to_string(), len));
        }
    }
    if !rest.is_empty() && SINGLE_CHAR_OPS.contains(&rest[0]) {
        return Some((rest[0].to_string(), 1));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scans_basic_expression() {
        let ctx = CalcContext::default();
        let tokens = tokenize("11 * (2 + 3)", &ctx).unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Number(11.0),
                Token::Op("*".into()),
                Token::LParen,
                Token::Number(2.0),
                Token::Op("+".into()),
                Token::Number(3.0),
                Token::RParen,
            ]
        );
    }

    #[test]
    fn scans_scientific_notation() {
        let ctx = CalcContext::default();
        let tokens = tokenize("1.333e3", &ctx).unwrap();
        assert_eq!(tokens, vec![Token::Number(1333.0)]);
    }

    #[test]
    fn rejects_unknown_character() {
        let ctx = CalcContext::default();
        let err = tokenize("2 + @", &ctx).unwrap_err();
        assert_eq!(
            err,
            CalcError::UnexpectedCharacter {
                found: '@',
                expected: None
            }
        );
    }

    #[test]
    fn rejects_bad_number() {
        let ctx = CalcContext::default();
        let err = tokenize("3.3.3", &ctx).unwrap_err();
        assert_eq!(err, CalcError::BadNumber("3.3.3".into()));
    }

    #[test]
    fn rejects_bad_function() {
        let ctx = CalcContext::default();
        let err = tokenize("son(3)", &ctx).unwrap_err();
        assert!(matches!(err, CalcError::BadFunction { name, .. } if name == "son"));
    }
}
