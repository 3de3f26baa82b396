use crate::expression::lexer::is_number;
use crate::foundation::error::{DrawError, DrawResult};

/// Operation identifiers of the expression language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpId {
    Not,
    And,
    Or,
    Gt,
    Lt,
    Ge,
    Le,
    Eq,
    Add,
    Sub,
    Mul,
    Div,
    Pow,
    Max,
    Min,
    Mod,
    Abs,
    Select,
    Num,
    X,
    Y,
}

/// Static type of a stack slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    Bool,
    Float,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperatorDesc {
    pub symbol: &'static str,
    pub arity: u8,
    pub op: OpId,
}

const fn desc(symbol: &'static str, arity: u8, op: OpId) -> OperatorDesc {
    OperatorDesc { symbol, arity, op }
}

/// Every non-literal symbol the language accepts.
pub static OPERATORS: [OperatorDesc; 20] = [
    // boolean
    desc("not", 1, OpId::Not),
    desc("and", 2, OpId::And),
    desc("or", 2, OpId::Or),
    desc(">", 2, OpId::Gt),
    desc("<", 2, OpId::Lt),
    desc(">=", 2, OpId::Ge),
    desc("<=", 2, OpId::Le),
    desc("=", 2, OpId::Eq),
    // numeric
    desc("abs", 1, OpId::Abs),
    desc("+", 2, OpId::Add),
    desc("-", 2, OpId::Sub),
    desc("*", 2, OpId::Mul),
    desc("/", 2, OpId::Div),
    desc("pow", 2, OpId::Pow),
    desc("max", 2, OpId::Max),
    desc("min", 2, OpId::Min),
    desc("%", 2, OpId::Mod),
    // ternary
    desc("?", 3, OpId::Select),
    // placeholders
    desc("x", 0, OpId::X),
    desc("y", 0, OpId::Y),
];

pub fn lookup(symbol: &str) -> Option<&'static OperatorDesc> {
    OPERATORS.iter().find(|d| d.symbol == symbol)
}

pub fn arity_of(symbol: &str) -> DrawResult<u8> {
    if is_number(symbol) {
        return Ok(0);
    }
    lookup(symbol)
        .map(|d| d.arity)
        .ok_or_else(|| unknown_operator(symbol))
}

pub fn operation_of(symbol: &str) -> DrawResult<OpId> {
    if is_number(symbol) {
        return Ok(OpId::Num);
    }
    lookup(symbol)
        .map(|d| d.op)
        .ok_or_else(|| unknown_operator(symbol))
}

fn unknown_operator(symbol: &str) -> DrawError {
    DrawError::lex(format!("unknown operator \"{symbol}\""))
}

impl OpId {
    pub fn arity(self) -> u8 {
        match self {
            Self::Num | Self::X | Self::Y => 0,
            Self::Not | Self::Abs => 1,
            Self::Select => 3,
            _ => 2,
        }
    }

    /// Types this operation expects for its operands, in push order.
    pub fn operand_types(self) -> &'static [ValueType] {
        use ValueType::{Bool, Float};
        match self {
            Self::Num | Self::X | Self::Y => &[],
            Self::Not => &[Bool],
            Self::And | Self::Or => &[Bool, Bool],
            Self::Abs => &[Float],
            Self::Select => &[Bool, Float, Float],
            Self::Gt
            | Self::Lt
            | Self::Ge
            | Self::Le
            | Self::Eq
            | Self::Add
            | Self::Sub
            | Self::Mul
            | Self::Div
            | Self::Pow
            | Self::Max
            | Self::Min
            | Self::Mod => &[Float, Float],
        }
    }

    pub fn result_type(self) -> ValueType {
        match self {
            Self::Not
            | Self::And
            | Self::Or
            | Self::Gt
            | Self::Lt
            | Self::Ge
            | Self::Le
            | Self::Eq => ValueType::Bool,
            _ => ValueType::Float,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/expression/ops.rs"]
mod tests;
