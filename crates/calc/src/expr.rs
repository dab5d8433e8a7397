//! The compiled expression tree and its evaluator.
//!
//! A parsed expression never re-walks token text at evaluation time: parsing
//! produces this tagged tree once, and [`Expr::eval`] walks it directly
//! against a slice of argument values indexed by position, one slot per
//! free variable observed during parsing (in order of first occurrence).

/// A single-argument built-in math function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Function {
    /// `sin`
    Sin,
    /// `cos`
    Cos,
    /// `tan`
    Tan,
    /// `asin`
    Asin,
    /// `acos`
    Acos,
    /// `atan`
    Atan,
    /// `abs`
    Abs,
    /// `floor`
    Floor,
}

impl Function {
    /// All built-in function names, in the order they are offered to users.
    pub const ALL: [(&'static str, Function); 8] = [
        ("sin", Function::Sin),
        ("cos", Function::Cos),
        ("tan", Function::Tan),
        ("asin", Function::Asin),
        ("acos", Function::Acos),
        ("atan", Function::Atan),
        ("abs", Function::Abs),
        ("floor", Function::Floor),
    ];

    /// Applies the function to `x`.
    #[must_use]
    pub fn apply(self, x: f64) -> f64 {
        match self {
            Function::Sin => x.sin(),
            Function::Cos => x.cos(),
            Function::Tan => x.tan(),
            Function::Asin => x.asin(),
            Function::Acos => x.acos(),
            Function::Atan => x.atan(),
            Function::Abs => x.abs(),
            Function::Floor => x.floor(),
        }
    }
}

/// A binary operator, at one of the eight precedence levels in the grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    /// `|`
    Or,
    /// `^`
    Xor,
    /// `&`
    And,
    /// `==`
    Eq,
    /// `!=`
    Ne,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `%`
    Rem,
    /// `**`
    Pow,
}

impl BinOp {
    /// Parses the textual symbol used by the tokenizer, if recognized.
    #[must_use]
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Some(match symbol {
            "|" => BinOp::Or,
            "^" => BinOp::Xor,
            "&" => BinOp::And,
            "==" => BinOp::Eq,
            "!=" => BinOp::Ne,
            "<" => BinOp::Lt,
            "<=" => BinOp::Le,
            ">" => BinOp::Gt,
            ">=" => BinOp::Ge,
            "+" => BinOp::Add,
            "-" => BinOp::Sub,
            "*" => BinOp::Mul,
            "/" => BinOp::Div,
            "%" => BinOp::Rem,
            "**" => BinOp::Pow,
            _ => return None,
        })
    }

    /// Applies the operator to two operands.
    ///
    /// Comparisons and logical operators yield `1.0`/`0.0`, the same
    /// convention used when a boolean sub-expression (e.g. `(t<=T2)`) is
    /// multiplied into an arithmetic one, as the example expressions in the
    /// grammar do.
    #[must_use]
    pub fn apply(self, lhs: f64, rhs: f64) -> f64 {
        match self {
            BinOp::Or => truthy(lhs != 0.0 || rhs != 0.0),
            BinOp::Xor => truthy((lhs != 0.0) ^ (rhs != 0.0)),
            BinOp::And => truthy(lhs != 0.0 && rhs != 0.0),
            BinOp::Eq => truthy(lhs == rhs),
            BinOp::Ne => truthy(lhs != rhs),
            BinOp::Lt => truthy(lhs < rhs),
            BinOp::Le => truthy(lhs <= rhs),
            BinOp::Gt => truthy(lhs > rhs),
            BinOp::Ge => truthy(lhs >= rhs),
            BinOp::Add => lhs + rhs,
            BinOp::Sub => lhs - rhs,
            BinOp::Mul => lhs * rhs,
            BinOp::Div => lhs / rhs,
            BinOp::Rem => floored_mod(lhs, rhs),
            BinOp::Pow => lhs.powf(rhs),
        }
    }
}

fn truthy(value: bool) -> f64 {
    if value { 1.0 } else { 0.0 }
}

/// Python-compatible floored modulo: the result takes the sign of `rhs`.
fn floored_mod(lhs: f64, rhs: f64) -> f64 {
    let r = lhs % rhs;
    if r != 0.0 && (r < 0.0) != (rhs < 0.0) {
        r + rhs
    } else {
        r
    }
}

/// A parsed expression node.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A literal number, or a constant inlined to its value at parse time.
    Const(f64),
    /// A reference to the `n`th free variable, by order of first occurrence.
    VarRef(usize),
    /// Unary minus.
    Neg(Box<Expr>),
    /// Unary plus (kept distinct from a no-op so the tree mirrors the
    /// grammar exactly; evaluates identically to its operand).
    Pos(Box<Expr>),
    /// A single-argument function call.
    Call(Function, Box<Expr>),
    /// A binary operation.
    Binary(BinOp, Box<Expr>, Box<Expr>),
}

impl Expr {
    /// Evaluates the tree against positional bindings for its free
    /// variables.
    #[must_use]
    pub fn eval(&self, args: &[f64]) -> f64 {
        match self {
            Expr::Const(value) => *value,
            Expr::VarRef(index) => args[*index],
            Expr::Neg(inner) => -inner.eval(args),
            Expr::Pos(inner) => inner.eval(args),
            Expr::Call(func, inner) => func.apply(inner.eval(args)),
            Expr::Binary(op, lhs, rhs) => op.apply(lhs.eval(args), rhs.eval(args)),
        }
    }
}
