//! Postfix expression language: lexing, compilation and evaluation.
//!
//! An expression is a whitespace separated list of literals, the `x` / `y`
//! placeholders and operators from [`ops::OPERATORS`]. Both compiled forms
//! (flat and tree) execute through the same [`bytecode::Program`].

pub mod bytecode;
pub mod compile;
pub mod lexer;
pub mod ops;
pub mod tree;
pub mod vm;

use crate::expression::bytecode::Program;
use crate::expression::lexer::normalize;
use crate::expression::tree::ExprTree;
use crate::foundation::error::DrawResult;

/// Which compiled form to build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Representation {
    #[default]
    Flat,
    Tree,
}

/// Immutable, thread-shareable compiled expression.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledExpr {
    source: String,
    program: Program,
    tree: Option<ExprTree>,
}

impl CompiledExpr {
    pub fn compile(src: &str, repr: Representation) -> DrawResult<Self> {
        let source = normalize(src).trim_end().to_owned();
        match repr {
            Representation::Flat => Ok(Self {
                program: compile::compile_flat(src)?,
                source,
                tree: None,
            }),
            Representation::Tree => {
                let tree = compile::compile_tree(src)?;
                Ok(Self {
                    program: tree.lower()?,
                    source,
                    tree: Some(tree),
                })
            }
        }
    }

    /// Normalized source text.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    pub fn tree(&self) -> Option<&ExprTree> {
        self.tree.as_ref()
    }

    pub fn representation(&self) -> Representation {
        if self.tree.is_some() {
            Representation::Tree
        } else {
            Representation::Flat
        }
    }

    pub fn evaluate(&self, x: u32, y: u32) -> DrawResult<f32> {
        vm::eval_program(&self.program, x, y)
    }
}

/// Compile `src` into the flat form and evaluate it once.
pub fn eval_str(src: &str, x: u32, y: u32) -> DrawResult<f32> {
    CompiledExpr::compile(src, Representation::Flat)?.evaluate(x, y)
}
