use crate::expression::ops::{OpId, lookup};
use crate::foundation::error::{DrawError, DrawResult};

/// One classified token of a postfix expression.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Token {
    pub text: String,
    pub op: OpId,
    pub arity: u8,
    /// Parsed value of a numeric literal.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub literal: Option<f32>,
    /// Position of the token in the normalized expression (0-based).
    pub index: usize,
}

impl Token {
    /// Classify `text`, checking the literal grammar before the operator table.
    pub fn classify(text: &str, index: usize) -> DrawResult<Self> {
        if is_number(text) {
            return Ok(Self {
                text: text.to_owned(),
                op: OpId::Num,
                arity: 0,
                literal: Some(parse_number(text)),
                index,
            });
        }
        let Some(d) = lookup(text) else {
            return Err(DrawError::lex(format!(
                "unknown operator \"{text}\" at token {index}"
            )));
        };
        Ok(Self {
            text: text.to_owned(),
            op: d.op,
            arity: d.arity,
            literal: None,
            index,
        })
    }
}

/// Collapse whitespace runs into single spaces and end with one separator.
pub fn normalize(src: &str) -> String {
    let mut out = String::with_capacity(src.len() + 1);
    for word in src.split_ascii_whitespace() {
        out.push_str(word);
        out.push(' ');
    }
    if out.is_empty() {
        out.push(' ');
    }
    out
}

/// Split an expression into classified tokens.
pub fn lex(src: &str) -> DrawResult<Vec<Token>> {
    let normalized = normalize(src);
    let mut out = Vec::new();
    let mut start = 0usize;

    for (i, b) in normalized.bytes().enumerate() {
        if b != b' ' {
            continue;
        }
        let text = &normalized[start..i];
        if !text.is_empty() {
            out.push(Token::classify(text, out.len())?);
        }
        start = i + 1;
    }

    Ok(out)
}

/// `-?[0-9]*(\.[0-9]*)?`, excluding a lone `-` or `.`.
pub fn is_number(text: &str) -> bool {
    if text.is_empty() {
        return false;
    }
    let single = text.len() == 1;
    let mut seen_dot = false;

    for (i, b) in text.bytes().enumerate() {
        match b {
            b'.' => {
                if seen_dot || single {
                    return false;
                }
                seen_dot = true;
            }
            b'-' => {
                if i > 0 || single {
                    return false;
                }
            }
            b'0'..=b'9' => {}
            _ => return false,
        }
    }

    true
}

/// Parse a literal accepted by [`is_number`].
///
/// Digits are accumulated in `f32` one at a time; the fraction is divided by
/// `10^n` afterwards and the sign is applied last.
pub fn parse_number(text: &str) -> f32 {
    let bytes = text.as_bytes();
    let mut i = 0usize;
    let negative = bytes.first() == Some(&b'-');
    if negative {
        i += 1;
    }

    let mut value = 0.0f32;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        value = value * 10.0 + f32::from(bytes[i] - b'0');
        i += 1;
    }

    if i < bytes.len() && bytes[i] == b'.' {
        i += 1;
        let mut frac = 0.0f32;
        let mut n = 0i32;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            frac = frac * 10.0 + f32::from(bytes[i] - b'0');
            i += 1;
            n += 1;
        }
        value += frac / 10f64.powi(n) as f32;
    }

    if negative { -value } else { value }
}

#[cfg(test)]
#[path = "../../tests/unit/expression/lexer.rs"]
mod tests;
