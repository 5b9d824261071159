use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChimeraError {
    /// A recurrence generator at `index` asked for `requested >= index`.
    UpwardReference { index: usize, requested: usize },
    /// A wheel modulus other than 2, 6, 30 or 210.
    UnsupportedWheel(String),
}

impl fmt::Display for ChimeraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChimeraError::UpwardReference { index, requested } => write!(
                f,
                "recurrence at index {index} read index {requested}, which is not strictly smaller"
            ),
            ChimeraError::UnsupportedWheel(value) => {
                write!(f, "unsupported wheel modulus '{value}' (expected 2, 6, 30 or 210)")
            }
        }
    }
}

impl std::error::Error for ChimeraError {}

pub type Result<T> = std::result::Result<T, ChimeraError>;
