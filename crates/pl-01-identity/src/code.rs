//! Rendezvous code generation and validation.

use rand::Rng;
use shared_types::{Code, CodeError};

/// Draw a fresh code uniformly from `[Code::MIN, Code::MAX]`.
#[must_use]
pub fn generate_code() -> Code {
    generate_code_with(&mut rand::thread_rng())
}

/// Draw a code from an injected RNG (deterministic in tests).
pub fn generate_code_with<R: Rng + ?Sized>(rng: &mut R) -> Code {
    let value = rng.gen_range(Code::MIN..=Code::MAX);
    // gen_range is inclusive of both bounds, so this is always a valid code.
    Code::new(value).unwrap_or_else(|_| unreachable!("{value} drawn inside the code range"))
}

/// Raw input a caller may hand over as a code: typed text or a number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodeCandidate {
    /// Text, e.g. straight from an input field.
    Text(String),
    /// An integer of any width.
    Number(i64),
}

impl CodeCandidate {
    /// Normalize into a [`Code`].
    ///
    /// Text must parse as an integer with nothing left over; the integer must
    /// then lie inside the code range.
    pub fn normalize(&self) -> Result<Code, CodeError> {
        match self {
            Self::Text(text) => text.parse(),
            Self::Number(value) => u32::try_from(*value)
                .map_err(|_| CodeError::OutOfRange(*value))
                .and_then(Code::new),
        }
    }
}

impl std::fmt::Display for CodeCandidate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Number(value) => write!(f, "{value}"),
        }
    }
}

impl From<&str> for CodeCandidate {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for CodeCandidate {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&String> for CodeCandidate {
    fn from(text: &String) -> Self {
        Self::Text(text.clone())
    }
}

impl From<i64> for CodeCandidate {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for CodeCandidate {
    fn from(value: i32) -> Self {
        Self::Number(i64::from(value))
    }
}

impl From<u32> for CodeCandidate {
    fn from(value: u32) -> Self {
        Self::Number(i64::from(value))
    }
}

impl From<Code> for CodeCandidate {
    fn from(code: Code) -> Self {
        Self::Number(i64::from(code.value()))
    }
}

/// Whether `input`, once normalized, is a code in `10000..=99999`.
///
/// Non-numeric strings, empty strings and out-of-range integers are all
/// `false`. No side effects.
pub fn is_valid_code(input: impl Into<CodeCandidate>) -> bool {
    input.into().normalize().is_ok()
}

/// Normalize `input` into a [`Code`], keeping the reason on failure.
pub fn parse_code(input: impl Into<CodeCandidate>) -> Result<Code, CodeError> {
    input.into().normalize()
}
