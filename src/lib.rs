//! planedraw fills video planes from postfix expressions over pixel coordinates.
//!
//! An expression such as `x y + 2 /` is compiled once, evaluated at every
//! `(x, y)` of each plane to build a float lookup table, and the tables are
//! then copied into frames by a [`FrameSink`].
//!
//! # Pipeline overview
//!
//! 1. **Compile**: `&str -> CompiledExpr` (lex, arity and type checks, flat or tree form)
//! 2. **Build**: `CompiledExpr + PlaneDims -> Lut` (rayon-parallel over rows)
//! 3. **Apply**: `Lut -> FrameSink` (the sink converts floats into samples)
//!
//! [`DrawFilter`] bundles all three for a given [`VideoFormat`].
#![forbid(unsafe_code)]

pub mod expression;
mod filter;
mod foundation;
mod lut;
mod sink;

pub use expression::bytecode::{Op, Program};
pub use expression::compile::{compile_flat, compile_tree};
pub use expression::lexer::{Token, is_number, lex, normalize, parse_number};
pub use expression::ops::{OpId, OperatorDesc, ValueType, arity_of, operation_of};
pub use expression::tree::{ExprTree, NodeIdx, TreeNode};
pub use expression::vm::{Operand, eval_program, eval_program_with_stack};
pub use expression::{CompiledExpr, Representation, eval_str};
pub use filter::{DrawConfig, DrawFilter};
pub use foundation::core::{MAX_PLANES, PlaneDims, SampleType, VideoFormat};
pub use foundation::error::{DrawError, DrawResult};
pub use lut::{Lut, LutBuilder, LutThreading, build_lut};
pub use sink::{Frame, FrameSink, Plane, PlaneData};
