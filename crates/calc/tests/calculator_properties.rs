//! End-to-end calculator properties, exercised only through the public
//! `lupine_calc` API: parse/eval accuracy, the protected-name invariant,
//! the `free_vars` round-trip, and the scanner/parser error taxonomy.

use lupine_calc::{CalcContext, CalcError};

/// Plain arithmetic with no free variables should match a hand-computed
/// reference to the bit, since there is nothing but IEEE-754 f64 ops
/// between the parse tree and the result.
#[test]
fn constant_expression_matches_reference_evaluation() {
    let ctx = CalcContext::default();
    let compiled = ctx.compile("2 + 3 * 4 - 10 / 5").unwrap();
    assert_eq!(compiled.eval(&[]).unwrap(), 2.0 + 3.0 * 4.0 - 10.0 / 5.0);
}

/// An expression of `t` alone should agree with a reference evaluation at
/// every sample in a small test set.
#[test]
fn time_expression_matches_reference_over_a_sample_set() {
    let ctx = CalcContext::default();
    let compiled = ctx.compile("sin(2*pi*t) + t^2").unwrap();
    for &t in &[0.0, 0.1, 0.25, 1.0, 3.3, -2.5] {
        let expected = (2.0 * std::f64::consts::PI * t).sin() + t * t;
        let got = compiled.eval(&[t]).unwrap();
        assert!((got - expected).abs() < 1e-12, "t={t}: got {got}, expected {expected}");
    }
}

/// `pi` and `e` reject any change to a different value but accept a
/// no-op "change" to their own current value, for both the constant and
/// the removal entry points.
#[test]
fn protected_names_reject_change_but_allow_noop() {
    let mut ctx = CalcContext::default();

    assert_eq!(ctx.set_constant("pi", 4.0), Err(CalcError::ReadOnly("pi".to_string())));
    assert!(ctx.set_constant("pi", std::f64::consts::PI).is_ok());

    assert_eq!(ctx.set_constant("e", 1.0), Err(CalcError::ReadOnly("e".to_string())));
    assert!(ctx.set_constant("e", std::f64::consts::E).is_ok());

    assert_eq!(ctx.remove_constant("pi"), Err(CalcError::ReadOnly("pi".to_string())));
    assert_eq!(ctx.remove_variable("t"), Err(CalcError::ReadOnly("t".to_string())));
    assert_eq!(ctx.set_variable("t", "5"), Err(CalcError::ReadOnly("t".to_string())));
}

/// `ordered_vars` must list exactly the identifiers that occur in the
/// source and aren't constants or functions, in order of first occurrence,
/// with duplicates collapsed.
#[test]
fn free_vars_round_trips_the_identifiers_in_source_order() {
    let ctx = CalcContext::default();
    let compiled = ctx.compile("x + sin(y) * x - y / pi").unwrap();
    assert_eq!(compiled.ordered_vars(), &["x", "y"]);
}

/// A user-defined variable alias does not itself count as a free variable
/// of an expression that refers to it, once resolved through
/// `compile_time_function`.
#[test]
fn variable_alias_is_not_a_free_variable_of_the_composed_function() {
    let mut ctx = CalcContext::default();
    ctx.set_variable("vin", "5*t").unwrap();
    let f = ctx.compile_time_function("vin + 1").unwrap();
    assert_eq!(f.eval(3.0), 5.0 * 3.0 + 1.0);
}

#[test]
fn unrecognized_character_is_reported_as_unexpected_character() {
    let ctx = CalcContext::default();
    let err = ctx.compile("2 + @").unwrap_err();
    assert!(matches!(err, CalcError::UnexpectedCharacter { found: '@', .. }));
}

#[test]
fn malformed_number_is_reported_as_bad_number() {
    let ctx = CalcContext::default();
    let err = ctx.compile("3.3.3").unwrap_err();
    assert!(matches!(err, CalcError::BadNumber(_)));
}

#[test]
fn unknown_identifier_called_as_a_function_is_reported_as_bad_function() {
    let ctx = CalcContext::default();
    let err = ctx.compile("son(3)").unwrap_err();
    assert!(matches!(err, CalcError::BadFunction { name, .. } if name == "son"));
}

#[test]
fn truncated_input_is_reported_as_unexpected_end() {
    let ctx = CalcContext::default();
    let err = ctx.compile("2 + (3 * 4").unwrap_err();
    assert!(matches!(err, CalcError::UnexpectedEnd(_)));
}

/// Calling a compiled expression with the wrong number of positional
/// arguments is a `WrongArgsLen`, not a panic.
#[test]
fn wrong_arity_call_is_reported_as_wrong_args_len() {
    let ctx = CalcContext::default();
    let compiled = ctx.compile("x + y").unwrap();
    let err = compiled.eval(&[1.0]).unwrap_err();
    assert_eq!(err, CalcError::WrongArgsLen { got: 1, expected: 2 });
}
