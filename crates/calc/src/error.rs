//! Errors produced while scanning, parsing, or evaluating an expression.

use thiserror::Error;

/// Everything that can go wrong turning a user-entered string into a
/// callable numeric function.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CalcError {
    /// A character does not belong to any recognized token.
    #[error("unexpected character {found:?}{}", format_expected(expected))]
    UnexpectedCharacter {
        /// The offending character.
        found: char,
        /// Tokens that would have been accepted instead, if known.
        expected: Option<Vec<String>>,
    },

    /// A run of digits and dots could not be parsed as a float.
    #[error("unable to scan number: {0}")]
    BadNumber(String),

    /// An identifier did not match any known function, constant, or variable.
    #[error("unexpected function {name}, list of supported functions: {supported:?}")]
    BadFunction {
        /// The unrecognized identifier.
        name: String,
        /// The function names the calculator does recognize.
        supported: Vec<String>,
    },

    /// The token stream ended while more input was expected.
    #[error("found end, but expected: {0:?}")]
    UnexpectedEnd(Vec<String>),

    /// A compiled expression was invoked with the wrong number of arguments.
    #[error("got {got} arguments, but expected {expected}")]
    WrongArgsLen {
        /// Number of arguments actually supplied.
        got: usize,
        /// Number of free variables the expression was compiled with.
        expected: usize,
    },

    /// An attempt was made to redefine a protected constant or variable.
    #[error("cannot modify read-only variable: {0}")]
    ReadOnly(String),
}

fn format_expected(expected: &Option<Vec<String>>) -> String {
    match expected {
        Some(tokens) => format!(", expected: {tokens:?}"),
        None => String::new(),
    }
}
