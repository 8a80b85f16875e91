use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("initial state '{name}' does not exist")]
    UnknownInitialState { name: String },

    #[error("unknown state: {name}")]
    UnknownState { name: String },

    #[error("invalid segment [{start}, {end}] for state '{state}'")]
    InvalidSegment { state: String, start: f64, end: f64 },

    #[error("invalid value: {message}")]
    InvalidValue { message: String },

    #[error("unsupported interactivity version: {value}")]
    UnsupportedVersion { value: String },

    #[error(transparent)]
    Expression(#[from] ExpressionError),

    #[cfg(feature = "json")]
    #[error("failed to parse Lottie JSON: {message}")]
    JsonParse { message: String },
}

/// Failures produced while tokenizing, parsing or evaluating a formula.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ExpressionError {
    #[error("invalid token '{token}' at position {position}")]
    InvalidToken { token: String, position: usize },

    #[error("unexpected {token} at position {position}")]
    UnexpectedToken { token: String, position: usize },

    #[error("symbol '{name}' is not defined and not a built-in symbol")]
    UndefinedSymbol { name: String },

    #[error("symbol '{name}' is a value and is not callable")]
    NotCallable { name: String },

    #[error("symbol '{name}' is a function and must be used in a function call")]
    NotAValue { name: String },

    #[error("expected {expected} operands for '{name}', received {received}")]
    Arity {
        name: String,
        expected: usize,
        received: usize,
    },
}

impl ExpressionError {
    /// Whether the error was raised before evaluation, while reading the formula text.
    pub fn is_syntax(&self) -> bool {
        matches!(
            self,
            ExpressionError::InvalidToken { .. } | ExpressionError::UnexpectedToken { .. }
        )
    }
}
