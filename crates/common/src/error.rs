pub type Result<T> = std::result::Result<T, Error>;

#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("type mismatch: expected {expected}, got {actual}")]
    TypeMismatch { expected: String, actual: String },

    #[error("{function} expects {expected} arguments, got {actual}")]
    InvalidArgumentCount {
        function: String,
        expected: String,
        actual: usize,
    },

    #[error("Function not found: {0}")]
    FunctionNotFound(String),

    #[error("Overflow: {0}")]
    Overflow(String),

    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Execution error in {function}: {message}")]
    ExecutionError { function: String, message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    pub fn type_mismatch(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Error::TypeMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn invalid_argument_count(
        function: impl Into<String>,
        expected: impl Into<String>,
        actual: usize,
    ) -> Self {
        Error::InvalidArgumentCount {
            function: function.into(),
            expected: expected.into(),
            actual,
        }
    }

    pub fn function_not_found(name: impl Into<String>) -> Self {
        Error::FunctionNotFound(name.into())
    }

    pub fn overflow(msg: impl Into<String>) -> Self {
        Error::Overflow(msg.into())
    }

    pub fn column_not_found(msg: impl Into<String>) -> Self {
        Error::ColumnNotFound(msg.into())
    }

    pub fn schema_mismatch(msg: impl Into<String>) -> Self {
        Error::SchemaMismatch(msg.into())
    }

    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }

    pub fn execution(function: impl Into<String>, message: impl Into<String>) -> Self {
        Error::ExecutionError {
            function: function.into(),
            message: message.into(),
        }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Error::Internal(msg.into())
    }
}
