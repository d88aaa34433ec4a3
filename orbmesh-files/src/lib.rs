use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParserError {
    /// A grammar violation: missing section, bad token count, index out of range, premature end of file.
    #[error("Malformed mesh file at line {line}: {reason}")]
    MalformedMeshFile { line: usize, reason: String },

    /// A material color/power token that isn't a number.
    #[error("Invalid material value {value:?} at line {line}")]
    InvalidMaterialValue { line: usize, value: String },

    /// Represents all other cases of `std::io::Error`.
    #[error(transparent)]
    IOError(#[from] std::io::Error),
}

impl ParserError {
    pub(crate) fn malformed(line: usize, reason: impl Into<String>) -> Self {
        ParserError::MalformedMeshFile {
            line,
            reason: reason.into(),
        }
    }
}

pub mod common;
pub mod msh;
