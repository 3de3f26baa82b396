use super::*;
use crate::expression::compile::{compile_flat, compile_tree};
use crate::expression::ops::ValueType;

fn eval(src: &str, x: u32, y: u32) -> f32 {
    eval_program(&compile_flat(src).unwrap(), x, y).unwrap()
}

#[test]
fn arithmetic_uses_left_pushed_operand_first() {
    assert_eq!(eval("3 4 +", 0, 0), 7.0);
    assert_eq!(eval("10 4 -", 0, 0), 6.0);
    assert_eq!(eval("10 4 /", 0, 0), 2.5);
    assert_eq!(eval("2 10 pow", 0, 0), 1024.0);
    assert_eq!(eval("7 3 %", 0, 0), 1.0);
    assert_eq!(eval("-7 3 %", 0, 0), -1.0);
    assert_eq!(eval("2 9 max", 0, 0), 9.0);
    assert_eq!(eval("2 9 min", 0, 0), 2.0);
    assert_eq!(eval("-2.5 abs", 0, 0), 2.5);
}

#[test]
fn coordinates_are_pushed_as_floats() {
    assert_eq!(eval("x", 17, 3), 17.0);
    assert_eq!(eval("y", 17, 3), 3.0);
    assert_eq!(eval("x y -", 2, 5), -3.0);
}

#[test]
fn comparisons_and_ternary() {
    assert_eq!(eval("1 2 <", 0, 0), 1.0);
    assert_eq!(eval("1 2 >", 0, 0), 0.0);
    assert_eq!(eval("2 2 >=", 0, 0), 1.0);
    assert_eq!(eval("3 2 <=", 0, 0), 0.0);
    assert_eq!(eval("1 2 < 5 6 ?", 0, 0), 5.0);
    assert_eq!(eval("1 2 > 5 6 ?", 0, 0), 6.0);
}

#[test]
fn boolean_operators() {
    assert_eq!(eval("1 2 < 2 1 < and", 0, 0), 0.0);
    assert_eq!(eval("1 2 < 2 1 < or", 0, 0), 1.0);
    assert_eq!(eval("1 2 < not", 0, 0), 0.0);
    assert_eq!(eval("x 4 < y 4 < and 100 0 ?", 3, 3), 100.0);
    assert_eq!(eval("x 4 < y 4 < and 100 0 ?", 3, 5), 0.0);
}

#[test]
fn equality_uses_fixed_epsilon() {
    assert_eq!(eval("1 1 =", 0, 0), 1.0);
    assert_eq!(eval("0.1 0.2 + 0.3 =", 0, 0), 1.0);
    assert_eq!(eval("1 1.001 =", 0, 0), 0.0);
    // No relative scaling: one ulp apart at 2^24 is not "equal".
    assert_eq!(eval("16777216 16777218 =", 0, 0), 0.0);
}

#[test]
fn division_by_zero_follows_ieee() {
    assert_eq!(eval("5 0 /", 0, 0), f32::INFINITY);
    assert_eq!(eval("-5 0 /", 0, 0), f32::NEG_INFINITY);
    assert!(eval("0 0 /", 0, 0).is_nan());
    assert!(eval("5 0 %", 0, 0).is_nan());
}

#[test]
fn literal_round_trip() {
    assert_eq!(eval("-3.25", 0, 0), -3.25);
}

#[test]
fn stack_is_reused_between_calls() {
    let p = compile_tree("x y *").unwrap().lower().unwrap();
    let mut stack = Vec::new();
    assert_eq!(eval_program_with_stack(&p, &mut stack, 3, 4).unwrap(), 12.0);
    assert_eq!(eval_program_with_stack(&p, &mut stack, 5, 6).unwrap(), 30.0);
    assert_eq!(stack.len(), 1);
}

#[test]
fn runtime_checks_catch_malformed_programs() {
    let underflow = Program::new(vec![Op::PushConst(1.0), Op::Add], ValueType::Float);
    assert!(matches!(
        eval_program(&underflow, 0, 0),
        Err(DrawError::Arity(_))
    ));

    let leftover = Program::new(vec![Op::LoadX, Op::LoadY], ValueType::Float);
    assert!(matches!(
        eval_program(&leftover, 0, 0),
        Err(DrawError::Balance(_))
    ));

    let empty = Program::new(vec![], ValueType::Float);
    assert!(matches!(
        eval_program(&empty, 0, 0),
        Err(DrawError::Balance(_))
    ));
}

#[test]
fn operand_to_sample_converts_bools() {
    assert_eq!(Operand::Bool(true).to_sample(), 1.0);
    assert_eq!(Operand::Bool(false).to_sample(), 0.0);
    assert_eq!(Operand::Float(2.5).to_sample(), 2.5);
}
