//! Error types for blockgrad

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Block `{block}` does not implement `{operation}`")]
    NotImplemented {
        block: &'static str,
        operation: &'static str,
    },

    #[error("Shape mismatch in {context}: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        context: String,
        expected: Vec<usize>,
        got: Vec<usize>,
    },

    #[error("Block `{block}` expects {expected} input(s), got {got}")]
    Arity {
        block: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("Mode mismatch: expected a {expected} variable, got a {got} variable")]
    ModeMismatch {
        expected: crate::config::Mode,
        got: crate::config::Mode,
    },

    #[error("Block `{block}` received no differentiable input in forward mode")]
    NoDifferentiableInput { block: &'static str },

    #[error("Inputs were created under different leaf layouts ({first} and {second})")]
    LeafLayoutMismatch { first: u64, second: u64 },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
