//! Recursive-descent expression calculator.
//!
//! Turns a user-entered string like `"1.333e3*(Emin+(Emax-Emin)*(t<=T2))"`
//! into a first-class numeric function of time, with named constants, user
//! variable aliases, and a handful of standard math primitives. Parsing
//! produces a tagged expression tree (see [`expr::Expr`]) rather than a
//! closure, so evaluation never redispatches on node kind through a boxed
//! `Fn` — it walks a flat tree against positional bindings.

mod context;
mod error;
mod expr;
mod parser;
mod token;

pub use context::{CalcContext, CompiledExpr, TimeFunction, deriv_finite_diff};
pub use error::CalcError;
pub use expr::{BinOp, Expr, Function};
pub use token::{Token, tokenize};
