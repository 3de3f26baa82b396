use crate::expression::bytecode::{Op, Program};
use crate::foundation::error::{DrawError, DrawResult};

/// Stack slot of the evaluator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Operand {
    Bool(bool),
    Float(f32),
}

impl Operand {
    /// Read as a float. The compiler's type check guarantees the tag.
    #[inline]
    pub fn float(self) -> f32 {
        debug_assert!(
            matches!(self, Self::Float(_)),
            "expected float operand, got {self:?}"
        );
        match self {
            Self::Float(v) => v,
            Self::Bool(b) => bool_to_f32(b),
        }
    }

    /// Read as a bool. The compiler's type check guarantees the tag.
    #[inline]
    pub fn boolean(self) -> bool {
        debug_assert!(
            matches!(self, Self::Bool(_)),
            "expected bool operand, got {self:?}"
        );
        match self {
            Self::Bool(b) => b,
            Self::Float(v) => v != 0.0,
        }
    }

    /// Final sample value: booleans become `1.0` / `0.0`.
    pub fn to_sample(self) -> f32 {
        match self {
            Self::Float(v) => v,
            Self::Bool(b) => bool_to_f32(b),
        }
    }
}

fn bool_to_f32(b: bool) -> f32 {
    if b { 1.0 } else { 0.0 }
}

/// Evaluate `p` at `(x, y)` on a freshly allocated stack.
pub fn eval_program(p: &Program, x: u32, y: u32) -> DrawResult<f32> {
    let mut stack: Vec<Operand> = Vec::with_capacity(p.len());
    eval_program_with_stack(p, &mut stack, x, y)
}

/// Evaluate `p` at `(x, y)` reusing `stack` (cleared first).
pub fn eval_program_with_stack(
    p: &Program,
    stack: &mut Vec<Operand>,
    x: u32,
    y: u32,
) -> DrawResult<f32> {
    stack.clear();
    stack.reserve(p.len());

    for &op in p.ops() {
        match op {
            Op::PushConst(v) => stack.push(Operand::Float(v)),
            Op::LoadX => stack.push(Operand::Float(x as f32)),
            Op::LoadY => stack.push(Operand::Float(y as f32)),

            Op::Not => {
                let top = top_mut(stack, op)?;
                *top = Operand::Bool(!top.boolean());
            }
            Op::Abs => {
                let top = top_mut(stack, op)?;
                *top = Operand::Float(top.float().abs());
            }

            Op::And => bin_bool(stack, op, |a, b| a && b)?,
            Op::Or => bin_bool(stack, op, |a, b| a || b)?,

            Op::Gt => bin_cmp(stack, op, |a, b| a > b)?,
            Op::Lt => bin_cmp(stack, op, |a, b| a < b)?,
            Op::Ge => bin_cmp(stack, op, |a, b| a >= b)?,
            Op::Le => bin_cmp(stack, op, |a, b| a <= b)?,
            Op::Eq => bin_cmp(stack, op, |a, b| (a - b).abs() <= f32::EPSILON)?,

            Op::Add => bin_f32(stack, op, |a, b| a + b)?,
            Op::Sub => bin_f32(stack, op, |a, b| a - b)?,
            Op::Mul => bin_f32(stack, op, |a, b| a * b)?,
            Op::Div => bin_f32(stack, op, |a, b| a / b)?,
            Op::Pow => bin_f32(stack, op, f32::powf)?,
            Op::Max => bin_f32(stack, op, f32::max)?,
            Op::Min => bin_f32(stack, op, f32::min)?,
            Op::Mod => bin_f32(stack, op, |a, b| a % b)?,

            Op::Select => {
                let on_false = pop(stack, op)?.float();
                let on_true = pop(stack, op)?.float();
                let cond = pop(stack, op)?.boolean();
                stack.push(Operand::Float(if cond { on_true } else { on_false }));
            }
        }
    }

    match stack.as_slice() {
        [v] => Ok(v.to_sample()),
        [] => Err(DrawError::balance("empty stack at end of program")),
        rest => Err(DrawError::balance(format!(
            "stack has {} values at end of program",
            rest.len()
        ))),
    }
}

fn underflow(op: Op) -> DrawError {
    DrawError::arity(format!("stack underflow at {op:?}"))
}

fn pop(stack: &mut Vec<Operand>, op: Op) -> DrawResult<Operand> {
    stack.pop().ok_or_else(|| underflow(op))
}

fn top_mut(stack: &mut [Operand], op: Op) -> DrawResult<&mut Operand> {
    stack.last_mut().ok_or_else(|| underflow(op))
}

fn bin_f32(stack: &mut Vec<Operand>, op: Op, f: impl FnOnce(f32, f32) -> f32) -> DrawResult<()> {
    let b = pop(stack, op)?.float();
    let a = top_mut(stack, op)?;
    *a = Operand::Float(f(a.float(), b));
    Ok(())
}

fn bin_cmp(stack: &mut Vec<Operand>, op: Op, f: impl FnOnce(f32, f32) -> bool) -> DrawResult<()> {
    let b = pop(stack, op)?.float();
    let a = top_mut(stack, op)?;
    *a = Operand::Bool(f(a.float(), b));
    Ok(())
}

fn bin_bool(
    stack: &mut Vec<Operand>,
    op: Op,
    f: impl FnOnce(bool, bool) -> bool,
) -> DrawResult<()> {
    let b = pop(stack, op)?.boolean();
    let a = top_mut(stack, op)?;
    *a = Operand::Bool(f(a.boolean(), b));
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/expression/vm.rs"]
mod tests;
