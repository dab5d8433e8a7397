//! Recursive-descent parser over a token stream.

use crate::context::CalcContext;
use crate::error::CalcError;
use crate::expr::{BinOp, Expr};
use crate::token::Token;

/// Operator symbols grouped by precedence level, from lowest (index 0,
/// logical-or) to highest before `factor` (index 7, exponentiation).
const LEVELS: [&[&str]; 8] = [
    &["|"],
    &["^"],
    &["&"],
    &["==", "!="],
    &["<", "<=", ">", ">="],
    &["+", "-"],
    &["*", "/", "%"],
    &["**"],
];

/// Parses `tokens` into an [`Expr`] tree plus the distinct free-variable
/// names observed, in order of first occurrence.
pub fn parse(tokens: &[Token], ctx: &CalcContext) -> Result<(Expr, Vec<String>), CalcError> {
    let mut parser = Parser {
        tokens,
        pos: 0,
        ctx,
        vars: Vec::new(),
    };
    let expr = parser.parse_level(0)?;
    if parser.pos != parser.tokens.len() {
        return Err(parser.unexpected(&["end of expression"]));
    }
    Ok((expr, parser.vars))
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    ctx: &'a CalcContext,
    vars: Vec<String>,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn bump(&mut self) -> Option<&Token> {
        let tok = self.tokens.get(self.pos);
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn parse_level(&mut self, level: usize) -> Result<Expr, CalcError> {
        if level == LEVELS.len() {
            return self.parse_factor();
        }

        let mut lhs = self.parse_level(level + 1)?;
        while let Some(op) = self.match_op(LEVELS[level]) {
            let rhs = self.parse_level(level + 1)?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    /// Consumes and returns the operator at the current position if its
    /// symbol is one of `symbols`.
    fn match_op(&mut self, symbols: &[&str]) -> Option<BinOp> {
        if let Some(Token::Op(sym)) = self.peek() {
            if symbols.contains(&sym.as_str()) {
                let op = BinOp::from_symbol(sym).expect("symbol came from a known operator set");
                self.pos += 1;
                return Some(op);
            }
        }
        None
    }

    fn parse_factor(&mut self) -> Result<Expr, CalcError> {
        match self.peek() {
            Some(Token::Number(value)) => {
                let value = *value;
                self.pos += 1;
                Ok(Expr::Const(value))
            }
            Some(Token::Ident(name)) if self.ctx.is_variable(name) => {
                let name = name.clone();
                self.pos += 1;
                let index = self.var_index(&name);
                Ok(Expr::VarRef(index))
            }
            Some(Token::Op(sym)) if sym == "+" || sym == "-" => {
                let sym = sym.clone();
                self.pos += 1;
                let operand = self.parse_factor()?;
                Ok(if sym == "-" {
                    Expr::Neg(Box::new(operand))
                } else {
                    Expr::Pos(Box::new(operand))
                })
            }
            Some(Token::Ident(name)) if self.ctx.is_constant(name) => {
                let value = self.ctx.constant_value(name).expect("checked above");
                self.pos += 1;
                Ok(Expr::Const(value))
            }
            Some(Token::Ident(name)) if self.ctx.is_function(name) => {
                let func = self.ctx.function(name).expect("checked above");
                self.pos += 1;
                self.expect_lparen()?;
                let inner = self.parse_level(0)?;
                self.expect_rparen()?;
                Ok(Expr::Call(func, Box::new(inner)))
            }
            Some(Token::LParen) => {
                self.pos += 1;
                let inner = self.parse_level(0)?;
                self.expect_rparen()?;
                Ok(inner)
            }
            _ => Err(self.unexpected(&["number", "(", "function"])),
        }
    }

    fn expect_lparen(&mut self) -> Result<(), CalcError> {
        match self.bump() {
            Some(Token::LParen) => Ok(()),
            _ => {
                self.pos -= 1;
                Err(self.unexpected(&["("]))
            }
        }
    }

    fn expect_rparen(&mut self) -> Result<(), CalcError> {
        match self.peek() {
            Some(Token::RParen) => {
                self.pos += 1;
                Ok(())
            }
            _ => Err(self.unexpected(&[")"])),
        }
    }

    fn var_index(&mut self, name: &str) -> usize {
        if let Some(index) = self.vars.iter().position(|v| v == name) {
            index
        } else {
            self.vars.push(name.to_string());
            self.vars.len() - 1
        }
    }

    fn unexpected(&self, expected: &[&str]) -> CalcError {
        let expected: Vec<String> = expected.iter().map(|s| (*s).to_string()).collect();
        match self.peek() {
            Some(Token::Number(n)) => CalcError::UnexpectedCharacter {
                found: n.to_string().chars().next().unwrap_or('0'),
                expected: Some(expected),
            },
            Some(Token::Ident(name)) => CalcError::UnexpectedCharacter {
                found: name.chars().next().unwrap_or(' '),
                expected: Some(expected),
            },
            Some(Token::Op(sym)) => CalcError::UnexpectedCharacter {
                found: sym.chars().next().unwrap_or(' '),
                expected: Some(expected),
            },
            Some(Token::LParen) => CalcError::UnexpectedCharacter {
                found: '(',
                expected: Some(expected),
            },
            Some(Token::RParen) => CalcError::UnexpectedCharacter {
                found: ')',
                expected: Some(expected),
            },
            None => CalcError::UnexpectedEnd(expected),
        }
    }
}
