pub type DrawResult<T> = Result<T, DrawError>;

#[derive(thiserror::Error, Debug)]
pub enum DrawError {
    /// Token is neither a numeric literal nor a known operator.
    #[error("lex error: {0}")]
    Lex(String),

    /// An operator saw fewer operands than it consumes.
    #[error("arity error: {0}")]
    Arity(String),

    /// A program left zero or several results behind.
    #[error("balance error: {0}")]
    Balance(String),

    /// An operand has the wrong type for its operator.
    #[error("type error: {0}")]
    Type(String),

    /// Bad filter/format/sink configuration.
    #[error("config error: {0}")]
    Config(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DrawError {
    pub fn lex(msg: impl Into<String>) -> Self {
        Self::Lex(msg.into())
    }

    pub fn arity(msg: impl Into<String>) -> Self {
        Self::Arity(msg.into())
    }

    pub fn balance(msg: impl Into<String>) -> Self {
        Self::Balance(msg.into())
    }

    pub fn type_mismatch(msg: impl Into<String>) -> Self {
        Self::Type(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
