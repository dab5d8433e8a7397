//! The calculator context: constants, variable aliases, functions, and the
//! entry points that turn a string into a callable.

use std::collections::HashMap;

use crate::error::CalcError;
use crate::expr::{Expr, Function};
use crate::parser;
use crate::token::tokenize;

/// A parsed expression together with the free variables it was compiled
/// against, in order of first occurrence. With zero free variables the
/// expression is effectively a 0-ary constant; with one (`t`) it is usable
/// as a scalar or vectorized function of time.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledExpr {
    tree: Expr,
    ordered_vars: Vec<String>,
}

impl CompiledExpr {
    /// The distinct free-variable names, in order of first occurrence.
    #[must_use]
    pub fn ordered_vars(&self) -> &[String] {
        &self.ordered_vars
    }

    /// Evaluates the expression against positional bindings, one per free
    /// variable.
    ///
    /// # Errors
    /// Returns [`CalcError::WrongArgsLen`] if `args.len()` does not match
    /// [`CompiledExpr::ordered_vars`].
    pub fn eval(&self, args: &[f64]) -> Result<f64, CalcError> {
        if args.len() != self.ordered_vars.len() {
            return Err(CalcError::WrongArgsLen {
                got: args.len(),
                expected: self.ordered_vars.len(),
            });
        }
        Ok(self.tree.eval(args))
    }
}

/// A compiled function of time, resolved so that any user-defined variable
/// aliases appearing in the original expression have themselves been
/// compiled down to functions of `t`.
#[derive(Debug, Clone)]
pub enum TimeFunction {
    /// An expression with no free variables, evaluated once.
    Const(f64),
    /// An expression whose only free variable is `t`.
    Direct(CompiledExpr),
    /// An expression with additional variable aliases, each resolved to its
    /// own function of `t`. `None` marks the slot occupied by `t` itself.
    Composed {
        /// The top-level compiled expression.
        expr: CompiledExpr,
        /// One resolved sub-function per entry in `expr`'s `ordered_vars`.
        args: Vec<Option<Box<TimeFunction>>>,
    },
    /// A centered finite-difference derivative of another [`TimeFunction`].
    FiniteDiff(Box<TimeFunction>, f64),
}

/// Default half-step used by [`TimeFunction::FiniteDiff`] when none is
/// specified via [`deriv_finite_diff`].
pub const DEFAULT_DERIV_STEP: f64 = 1e-6;

impl TimeFunction {
    /// Evaluates the function at a single time.
    #[must_use]
    pub fn eval(&self, t: f64) -> f64 {
        match self {
            TimeFunction::Const(value) => *value,
            TimeFunction::Direct(expr) => expr.eval(&[t]).expect("direct function takes only t"),
            TimeFunction::Composed { expr, args } => {
                let bindings: Vec<f64> = args
                    .iter()
                    .map(|slot| match slot {
                        Some(sub) => sub.eval(t),
                        None => t,
                    })
                    .collect();
                expr.eval(&bindings)
                    .expect("bindings match ordered_vars by construction")
            }
            TimeFunction::FiniteDiff(inner, h) => {
                (inner.eval(t + h) - inner.eval(t - h)) / (2.0 * h)
            }
        }
    }

    /// Evaluates the function over a slice of times.
    #[must_use]
    pub fn eval_many(&self, times: &[f64]) -> Vec<f64> {
        times.iter().map(|&t| self.eval(t)).collect()
    }
}

/// Returns the centered finite-difference derivative of `f`, using the
/// default half-step (`h ≈ 1e-6`).
#[must_use]
pub fn deriv_finite_diff(f: TimeFunction) -> TimeFunction {
    TimeFunction::FiniteDiff(Box::new(f), DEFAULT_DERIV_STEP)
}

/// A configurable calculator: constants, variable aliases, and functions,
/// plus the entry points that parse and evaluate expressions against them.
///
/// The protected constants `e` and `pi`, the protected variable `t`, and
/// the eight built-in functions can never be removed or rebound to a
/// different value; attempting to do so returns [`CalcError::ReadOnly`].
#[derive(Debug, Clone)]
pub struct CalcContext {
    constants: HashMap<String, f64>,
    protected_constants: Vec<String>,
    variables: HashMap<String, String>,
    protected_variables: Vec<String>,
    functions: HashMap<String, Function>,
}

impl Default for CalcContext {
    fn default() -> Self {
        let mut constants = HashMap::new();
        constants.insert("e".to_string(), std::f64::consts::E);
        constants.insert("pi".to_string(), std::f64::consts::PI);

        let mut variables = HashMap::new();
        variables.insert("t".to_string(), "t".to_string());

        let functions = Function::ALL
            .iter()
            .map(|(name, func)| ((*name).to_string(), *func))
            .collect();

        Self {
            constants,
            protected_constants: vec!["e".to_string(), "pi".to_string()],
            variables,
            protected_variables: vec!["t".to_string()],
            functions,
        }
    }
}

impl CalcContext {
    /// Returns `true` if `name` is a protected constant.
    #[must_use]
    pub fn is_protected_constant(&self, name: &str) -> bool {
        self.protected_constants.iter().any(|n| n == name)
    }

    /// Returns `true` if `name` is a protected variable.
    #[must_use]
    pub fn is_protected_variable(&self, name: &str) -> bool {
        self.protected_variables.iter().any(|n| n == name)
    }

    pub(crate) fn is_constant(&self, name: &str) -> bool {
        self.constants.contains_key(name)
    }

    pub(crate) fn is_variable(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }

    pub(crate) fn is_function(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    pub(crate) fn constant_value(&self, name: &str) -> Option<f64> {
        self.constants.get(name).copied()
    }

    pub(crate) fn function(&self, name: &str) -> Option<Function> {
        self.functions.get(name).copied()
    }

    /// Validates that `name` is a known function, constant, or variable
    /// alias; used by the tokenizer to reject unrecognized identifiers as
    /// early as possible.
    ///
    /// # Errors
    /// Returns [`CalcError::BadFunction`] if `name` is not recognized.
    pub(crate) fn classify(&self, name: &str) -> Result<(), CalcError> {
        if self.is_function(name) || self.is_constant(name) || self.is_variable(name) {
            return Ok(());
        }
        let mut supported: Vec<String> = self.functions.keys().cloned().collect();
        supported.sort();
        Err(CalcError::BadFunction {
            name: name.to_string(),
            supported,
        })
    }

    /// Creates or updates a constant. Protected constants may be "set" to
    /// their current value as a no-op; any other attempt to change a
    /// protected constant is rejected.
    ///
    /// # Errors
    /// Returns [`CalcError::ReadOnly`] if `name` is protected and `value`
    /// differs from its current value.
    pub fn set_constant(&mut self, name: &str, value: f64) -> Result<(), CalcError> {
        if self.is_protected_constant(name) {
            let current = self.constants.get(name).copied();
            if current != Some(value) {
                return Err(CalcError::ReadOnly(name.to_string()));
            }
            return Ok(());
        }
        self.constants.insert(name.to_string(), value);
        Ok(())
    }

    /// Creates or updates a variable alias mapping `name` to `expr`.
    ///
    /// # Errors
    /// Returns [`CalcError::ReadOnly`] if `name` is protected and `expr`
    /// differs from its current definition.
    pub fn set_variable(&mut self, name: &str, expr: &str) -> Result<(), CalcError> {
        if self.is_protected_variable(name) {
            let current = self.variables.get(name).map(String::as_str);
            if current != Some(expr) {
                return Err(CalcError::ReadOnly(name.to_string()));
            }
            return Ok(());
        }
        self.variables.insert(name.to_string(), expr.to_string());
        Ok(())
    }

    /// Removes a constant, unless it is protected.
    ///
    /// # Errors
    /// Returns [`CalcError::ReadOnly`] if `name` is protected.
    pub fn remove_constant(&mut self, name: &str) -> Result<(), CalcError> {
        if self.is_protected_constant(name) {
            return Err(CalcError::ReadOnly(name.to_string()));
        }
        self.constants.remove(name);
        Ok(())
    }

    /// Removes a variable alias, unless it is protected.
    ///
    /// # Errors
    /// Returns [`CalcError::ReadOnly`] if `name` is protected.
    pub fn remove_variable(&mut self, name: &str) -> Result<(), CalcError> {
        if self.is_protected_variable(name) {
            return Err(CalcError::ReadOnly(name.to_string()));
        }
        self.variables.remove(name);
        Ok(())
    }

    /// Parses `source`, returning the compiled expression and its ordered
    /// free variables. Does not resolve variable aliases to functions of
    /// time; see [`CalcContext::compile_time_function`] for that.
    ///
    /// # Errors
    /// Returns a [`CalcError`] if `source` fails to scan or parse.
    pub fn compile(&self, source: &str) -> Result<CompiledExpr, CalcError> {
        let tokens = tokenize(source, self)?;
        let (tree, ordered_vars) = parser::parse(&tokens, self)?;
        Ok(CompiledExpr { tree, ordered_vars })
    }

    /// Parses and immediately evaluates `source`, supplying `bindings`
    /// positionally for its free variables. This is the core's
    /// `evaluate_expression` entry point.
    ///
    /// # Errors
    /// Returns a [`CalcError`] if `source` fails to compile, or if
    /// `bindings.len()` does not match the number of free variables.
    pub fn evaluate_expression(&self, source: &str, bindings: &[f64]) -> Result<f64, CalcError> {
        self.compile(source)?.eval(bindings)
    }

    /// Compiles `source` into a function of time, resolving any
    /// non-`t` variable aliases (recursively) to their own functions of
    /// `t`, exactly as the element value `"1.333e3*(Emin+(Emax-Emin)*..."`
    /// would pull in `Emin`/`Emax`/... as nested time functions.
    ///
    /// # Errors
    /// Returns a [`CalcError`] if `source`, or any alias it refers to,
    /// fails to compile.
    pub fn compile_time_function(&self, source: &str) -> Result<TimeFunction, CalcError> {
        let expr = self.compile(source)?;

        if expr.ordered_vars.is_empty() {
            return Ok(TimeFunction::Const(
                expr.eval(&[]).expect("zero-ary expression"),
            ));
        }

        if expr.ordered_vars == ["t"] {
            return Ok(TimeFunction::Direct(expr));
        }

        let mut args = Vec::with_capacity(expr.ordered_vars.len());
        for var in &expr.ordered_vars {
            if var == "t" {
                args.push(None);
                continue;
            }
            let alias_source = self
                .variables
                .get(var)
                .expect("tokenizer already validated this identifier as a known variable");
            let sub = self.compile_time_function(alias_source)?;
            args.push(Some(Box::new(sub)));
        }

        Ok(TimeFunction::Composed { expr, args })
    }
}
