// Integration tests for the expression calculator client: its
// operation menu against the core, exercised end to end through
// `calc::eval`.

use softfp::calc;
use softfp::context::{Context, RoundingMode, Tininess};
use softfp::Number;

fn ctx() -> Context {
    Context::new(RoundingMode::NearestEven, Tininess::BeforeRounding)
}

fn eval_bits(src: &str) -> u32 {
    let mut c = ctx();
    calc::eval(&mut c, src).unwrap().value.bits
}

#[test]
fn arithmetic_precedence() {
    assert_eq!(eval_bits("1 + 2 * 3"), 7.0f32.to_bits());
    assert_eq!(eval_bits("(1 + 2) * 3"), 9.0f32.to_bits());
}

#[test]
fn unary_minus_and_subtraction() {
    assert_eq!(eval_bits("-5"), (-5.0f32).to_bits());
    assert_eq!(eval_bits("3 - 5"), (-2.0f32).to_bits());
}

#[test]
fn relational_yields_boolean_as_float() {
    assert_eq!(eval_bits("2 < 3"), 1.0f32.to_bits());
    assert_eq!(eval_bits("3 < 2"), 0.0f32.to_bits());
    assert_eq!(eval_bits("2 = 2"), 1.0f32.to_bits());
}

#[test]
fn function_calls() {
    assert_eq!(eval_bits("sqrt(9)"), 3.0f32.to_bits());
    assert_eq!(eval_bits("abs(-4)"), 4.0f32.to_bits());
    assert_eq!(eval_bits("min(1, 2)"), 1.0f32.to_bits());
    assert_eq!(eval_bits("max(1, 2)"), 2.0f32.to_bits());
}

#[test]
fn constants_table() {
    let mut c = ctx();
    let pi = calc::eval(&mut c, "pi").unwrap();
    assert_eq!(pi.value.bits, 0x4049_0fdb);
}

#[test]
fn sequence_evaluates_left_to_right_and_keeps_last() {
    assert_eq!(eval_bits("1; 2; 3"), 3.0f32.to_bits());
}

#[test]
fn error_propagates_through_arithmetic() {
    let mut c = ctx();
    let a = calc::eval(&mut c, "1.0").unwrap();
    let b = calc::eval(&mut c, "1.0 + 1.0").unwrap();
    // a literal is exact; adding two exact constants still picks up the
    // rounding-error term for the sum itself, so the bound grows from
    // zero but stays finite.
    assert_eq!(a.eps.bits, 0);
    assert!(b.eps.bits != 0);
    assert!(!b.eps.is_nan());
}

#[test]
fn unknown_identifier_is_a_parse_error() {
    let mut c = ctx();
    assert!(calc::eval(&mut c, "bogus").is_err());
}

#[test]
fn division_by_zero_is_logged_not_fatal() {
    let mut c = ctx();
    let r = calc::eval(&mut c, "1 / 0").unwrap();
    assert_eq!(r.value.bits, 0x7f80_0000); // +inf
    assert!(c.exceptions().iter().any(|e| e.divide_by_zero));
}
