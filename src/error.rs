use thiserror::Error;

use crate::Wire;

/// Failures raised while building or serializing a [`Circuit`](crate::Circuit).
#[derive(Debug, Error)]
pub enum CircuitError {
    #[error("wrong number of inputs to component: expected {expected}, got {got}")]
    InputCount { expected: usize, got: usize },
    #[error("bad input length for input {input}: expected {expected} wires, got {got}")]
    InputWidth {
        input: usize,
        expected: usize,
        got: usize,
    },
    #[error("bad wire spec: {0}")]
    BadSpec(String),
    /// The wire was allocated by a different circuit.
    #[error("{0:?} is not a wire of this circuit")]
    ForeignWire(Wire),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Failures raised while reading a Bristol Fashion template.
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("line {line}: bad header: {reason}")]
    Header { line: usize, reason: String },
    #[error("line {line}: malformed gate: {reason}")]
    MalformedGate { line: usize, reason: String },
    #[error("bad gate count: expected {expected}, got {got}")]
    GateCount { expected: usize, got: usize },
    #[error("bad cached template: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = CircuitError> = std::result::Result<T, E>;
