//! Domain-level errors (no external dependencies)

use std::path::PathBuf;
use thiserror::Error;

/// Domain errors represent violations in declaration input.
/// Malformed tags inside a valid declaration are not errors: the reconciler drops them.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("declaration file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("cycle detected in declaration chain: {0}")]
    CycleDetected(PathBuf),

    #[error("unsupported declaration format: {0} (expected .toml or .json)")]
    UnsupportedFormat(PathBuf),

    #[error("invalid declaration in {path}: {message}")]
    InvalidDeclaration { path: PathBuf, message: String },
}
