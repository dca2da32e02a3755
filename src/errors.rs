// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use core::fmt;

/// Category of a compilation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompileErrorKind {
    Syntax,
    TooDeep,
    Empty,
}

impl fmt::Display for CompileErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Syntax => "syntax error",
            Self::TooDeep => "query nests too deeply",
            Self::Empty => "empty query",
        };
        f.write_str(s)
    }
}

/// Failure to turn query text into a [`crate::Program`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct CompileError {
    pub kind: CompileErrorKind,
    pub message: String,
}

impl CompileError {
    pub fn new(kind: CompileErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Failure while evaluating a program against a particular object.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RuntimeError {
    #[error("no such key: {0}")]
    NoSuchKey(String),

    #[error("undeclared reference to `{0}`")]
    UndeclaredReference(String),

    /// Any other failure reported by the expression engine.
    #[error("{0}")]
    Execution(String),

    #[error("engine produced a {0} value")]
    UnsupportedValue(&'static str),
}

impl From<cel_interpreter::ExecutionError> for RuntimeError {
    fn from(error: cel_interpreter::ExecutionError) -> Self {
        use cel_interpreter::ExecutionError;
        match error {
            ExecutionError::NoSuchKey(key) => Self::NoSuchKey(key.to_string()),
            ExecutionError::UndeclaredReference(name) => {
                Self::UndeclaredReference(name.to_string())
            }
            other => Self::Execution(other.to_string()),
        }
    }
}

/// Any failure along the compile, evaluate, format path of a single query.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ResolveError {
    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error(transparent)]
    Runtime(#[from] RuntimeError),

    #[error("unsupported result of type {0}")]
    UnsupportedResult(&'static str),
}

impl ResolveError {
    /// Stage at which resolution failed, for diagnostics.
    pub fn stage(&self) -> &'static str {
        match self {
            Self::Compile(_) => "compile",
            Self::Runtime(_) => "evaluate",
            Self::UnsupportedResult(_) => "format",
        }
    }
}
