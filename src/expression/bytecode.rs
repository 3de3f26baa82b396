use crate::expression::lexer::Token;
use crate::expression::ops::{OpId, ValueType};
use crate::foundation::error::{DrawError, DrawResult};

/// One instruction of the postfix stack machine.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Op {
    PushConst(f32),
    LoadX,
    LoadY,

    Not,
    And,
    Or,
    Gt,
    Lt,
    Ge,
    Le,
    Eq,

    Abs,
    Add,
    Sub,
    Mul,
    Div,
    Pow,
    Max,
    Min,
    Mod,

    Select,
}

impl Op {
    pub fn from_token(token: &Token) -> DrawResult<Self> {
        Ok(match token.op {
            OpId::Num => {
                let v = token.literal.ok_or_else(|| {
                    DrawError::lex(format!("literal token \"{}\" has no value", token.text))
                })?;
                Self::PushConst(v)
            }
            OpId::X => Self::LoadX,
            OpId::Y => Self::LoadY,
            OpId::Not => Self::Not,
            OpId::And => Self::And,
            OpId::Or => Self::Or,
            OpId::Gt => Self::Gt,
            OpId::Lt => Self::Lt,
            OpId::Ge => Self::Ge,
            OpId::Le => Self::Le,
            OpId::Eq => Self::Eq,
            OpId::Abs => Self::Abs,
            OpId::Add => Self::Add,
            OpId::Sub => Self::Sub,
            OpId::Mul => Self::Mul,
            OpId::Div => Self::Div,
            OpId::Pow => Self::Pow,
            OpId::Max => Self::Max,
            OpId::Min => Self::Min,
            OpId::Mod => Self::Mod,
            OpId::Select => Self::Select,
        })
    }

    pub fn op_id(self) -> OpId {
        match self {
            Self::PushConst(_) => OpId::Num,
            Self::LoadX => OpId::X,
            Self::LoadY => OpId::Y,
            Self::Not => OpId::Not,
            Self::And => OpId::And,
            Self::Or => OpId::Or,
            Self::Gt => OpId::Gt,
            Self::Lt => OpId::Lt,
            Self::Ge => OpId::Ge,
            Self::Le => OpId::Le,
            Self::Eq => OpId::Eq,
            Self::Abs => OpId::Abs,
            Self::Add => OpId::Add,
            Self::Sub => OpId::Sub,
            Self::Mul => OpId::Mul,
            Self::Div => OpId::Div,
            Self::Pow => OpId::Pow,
            Self::Max => OpId::Max,
            Self::Min => OpId::Min,
            Self::Mod => OpId::Mod,
            Self::Select => OpId::Select,
        }
    }

    pub fn arity(self) -> u8 {
        self.op_id().arity()
    }
}

/// Validated postfix program, the single executable form of an expression.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Program {
    pub(crate) ops: Vec<Op>,
    pub(crate) result_type: ValueType,
}

impl Program {
    pub(crate) fn new(ops: Vec<Op>, result_type: ValueType) -> Self {
        Self { ops, result_type }
    }

    pub fn ops(&self) -> &[Op] {
        &self.ops
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Type left on the stack by the final instruction.
    pub fn result_type(&self) -> ValueType {
        self.result_type
    }
}
