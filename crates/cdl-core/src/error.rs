//! Error types for the CDL pipeline

use thiserror::Error;

/// Result type alias for the CDL pipeline
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while preprocessing, lexing, parsing or building
/// geometry from a CDL expression.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Input was blank before or after preprocessing.
    #[error("input is empty")]
    EmptyInput,

    /// Input exceeded the 5000-character pre-preprocess budget.
    #[error("input too long: {len} chars (max 5000)")]
    InputTooLong { len: usize },

    /// A `$name` macro reference had no matching `@name = ...` definition.
    #[error("unresolved reference: ${name}")]
    UnresolvedReference { name: String },

    /// A `[` feature block had no matching `]`.
    #[error("unterminated features block")]
    UnterminatedFeatures,

    /// The lexer hit a character it doesn't recognize.
    #[error("unexpected character {char:?} at position {pos}")]
    LexError { pos: usize, char: char },

    /// The parser hit a token it didn't expect.
    #[error("expected {expected}, got {got} at position {position}")]
    ParseError {
        expected: String,
        got: String,
        position: usize,
    },

    /// A Miller brace had a component count other than 3 or 4.
    #[error("Miller index must have 3 or 4 components, got {got}")]
    MillerArity { got: usize },

    /// The system keyword did not match one of the seven crystal systems.
    #[error("unknown crystal system: {0}")]
    UnknownSystem(String),

    /// Internal invariant violation; should not normally be reachable.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a new generic/internal error.
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }
}

/// Non-fatal diagnostics collected alongside a successful parse or render.
///
/// Unlike [`Error`], a [`Warning`] never aborts the pipeline — it is
/// logged and attached to the pipeline's output.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub enum Warning {
    /// The point group named in the CDL is not in the enumerated set for
    /// the given crystal system. Parsing continues; symmetry expansion
    /// falls back to whatever generator set (if any) is registered for
    /// that point-group string.
    UnknownPointGroup { point_group: String },

    /// The twin law named in the `twin(...)` clause is not in the twin
    /// law table. The twin composer falls back to the base mesh.
    UnknownTwinLaw { law: String },
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Warning::UnknownPointGroup { point_group } => {
                write!(f, "unknown point group: {point_group}")
            }
            Warning::UnknownTwinLaw { law } => write!(f, "unknown twin law: {law}"),
        }
    }
}
