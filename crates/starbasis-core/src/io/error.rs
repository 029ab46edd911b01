use crate::core::crystal::CrystalError;
use crate::core::field::ComparisonError;
use crate::engine::error::BasisError;
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FieldIoError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Parse error on line {line}: {kind}")]
    Parse { line: usize, kind: ParseErrorKind },

    #[error("File header does not match the domain: {0}")]
    HeaderMismatch(String),

    #[error("Basis error: {0}")]
    Basis(#[from] BasisError),

    #[error("Crystal error: {0}")]
    Crystal(#[from] CrystalError),

    #[error("Comparison error: {0}")]
    Comparison(#[from] ComparisonError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    #[error("unexpected end of file, expected {expected}")]
    UnexpectedEof { expected: String },
    #[error("expected keyword '{expected}', found '{found}'")]
    UnexpectedKeyword { expected: String, found: String },
    #[error("invalid integer '{value}'")]
    InvalidInt { value: String },
    #[error("invalid number '{value}'")]
    InvalidFloat { value: String },
    #[error("expected {expected} field(s), found {found}")]
    FieldCount { expected: usize, found: usize },
    #[error("{0}")]
    Invalid(String),
}
