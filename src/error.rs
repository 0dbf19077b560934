//! Error types for every stage of the pipeline.
//!
//! Lexical and syntax problems surface as [`ParseError`], tag rewriting as
//! [`RewriteError`], value lookups as [`TargetError`]. Validator functions
//! report through [`FunctionError`]; only its [`FunctionError::Field`] variant
//! is recoverable. Anything else that goes wrong during a traversal is an
//! [`EvalError`]. The crate-level [`Error`] wraps them all and carries the
//! aggregate [`ValidationError`] of a failed validation.

use serde::Serialize;
use thiserror::Error;

use crate::ast::{FunctionArg, TokenKind};
use crate::function::{ArgType, ErrCode};

/// Syntax errors, including lexical errors reported by the scanner.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    /// The scanner produced an illegal token
    #[error("{message} at position {position}")]
    Illegal { message: String, position: usize },

    #[error("unexpected token {found} at position {position}")]
    UnexpectedToken { found: TokenKind, position: usize },

    /// `&&`, `||` or `!` without an expression after it
    #[error("missing operand after {after} at position {position}")]
    MissingOperand { after: TokenKind, position: usize },

    #[error("function {function:?}: argument #{ordinal}: missing argument")]
    MissingArgument { function: String, ordinal: usize },

    /// A numeric argument that does not fit its type
    #[error("function {function:?}: argument #{ordinal}: {reason}")]
    InvalidArgument {
        function: String,
        ordinal: usize,
        reason: String,
    },

    #[error("function {function:?}: expected '(' but found {found} at position {position}")]
    ExpectedCall {
        function: String,
        found: TokenKind,
        position: usize,
    },

    #[error("empty expression")]
    EmptyExpression,

    #[error("empty group at position {position}")]
    EmptyGroup { position: usize },

    #[error("unbalanced parentheses: group opened at position {position} is never closed")]
    UnclosedGroup { position: usize },

    /// More nested operators and groups than the parser accepts
    #[error("expression nests deeper than {limit} levels at position {position}")]
    TooDeep { limit: usize, position: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RewriteError {
    #[error("unexpected end of input at position {position}")]
    UnexpectedEnd { position: usize },
}

/// Failure to resolve a field reference against a target.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TargetError {
    #[error("field {0:?} not found")]
    NotFound(String),

    #[error("invalid target: {0}")]
    Invalid(String),
}

/// A single failed function evaluation.
///
/// Produced through [`EvalContext::field_error`](crate::function::EvalContext::field_error).
#[derive(Debug, Clone, PartialEq, Serialize, Error)]
#[error("{field}: {function} failed with {code}")]
pub struct FieldError {
    pub code: ErrCode,
    /// Reference of the field that declared the expression
    pub field: String,
    /// Reference of the field the function evaluated
    pub target: String,
    /// Alias of the declaring field, set by struct validation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    pub function: String,
    pub args: Vec<FunctionArg>,
}

/// The aggregate result of a failed validation, in evaluation order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Error)]
#[error("validation failed with {} error(s)", .errors.len())]
pub struct ValidationError {
    pub errors: Vec<FieldError>,
}

impl ValidationError {
    pub fn new(errors: Vec<FieldError>) -> Self {
        ValidationError { errors }
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldError> {
        self.errors.iter()
    }

    pub fn codes(&self) -> Vec<&str> {
        self.errors.iter().map(|e| e.code.as_str()).collect()
    }
}

impl<'a> IntoIterator for &'a ValidationError {
    type Item = &'a FieldError;
    type IntoIter = std::slice::Iter<'a, FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

/// Errors a validator function may return.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FunctionError {
    /// The value is invalid; recorded and evaluation continues
    #[error(transparent)]
    Field(FieldError),

    #[error(transparent)]
    Target(#[from] TargetError),

    #[error("unsupported value type {found}, expected {expected}")]
    UnsupportedType {
        expected: &'static str,
        found: &'static str,
    },

    #[error("{0}")]
    Message(String),
}

/// Fatal errors raised while evaluating an expression.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error("function {0:?} is not registered")]
    UnknownFunction(String),

    #[error("function {0:?}: eval context requires owner and target field references")]
    MissingFieldRefs(String),

    #[error("function {function:?}: expected {expected} argument(s), found {found}")]
    ArgumentCount {
        function: String,
        expected: usize,
        found: usize,
    },

    #[error("function {function:?}: argument #{ordinal}: expected {expected}, found {found}")]
    ArgumentType {
        function: String,
        ordinal: usize,
        expected: ArgType,
        found: ArgType,
    },

    #[error("function {function:?}: {source}")]
    Function {
        function: String,
        #[source]
        source: FunctionError,
    },
}

/// Crate-level error.
#[derive(Debug, Error)]
pub enum Error {
    /// A structural error attributed to a record field
    #[error("field {field:?}: {source}")]
    Field {
        field: String,
        #[source]
        source: Box<Error>,
    },

    /// A structural error attributed to an ad hoc expression
    #[error("expression {expr:?}: {source}")]
    Expression {
        expr: String,
        #[source]
        source: Box<Error>,
    },

    #[error("syntax error: {0}")]
    Parse(#[from] ParseError),

    #[error("rewrite: {0}")]
    Rewrite(#[from] RewriteError),

    #[error("invalid tag on field {0:?}")]
    InvalidTag(String),

    #[error("function {0:?} is already registered")]
    DuplicateFunction(String),

    #[error("invalid target: {0}")]
    InvalidTarget(String),

    #[error(transparent)]
    Eval(#[from] EvalError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl Error {
    pub fn field(field: impl Into<String>, source: impl Into<Error>) -> Self {
        Error::Field {
            field: field.into(),
            source: Box::new(source.into()),
        }
    }

    pub fn expression(expr: impl Into<String>, source: impl Into<Error>) -> Self {
        Error::Expression {
            expr: expr.into(),
            source: Box::new(source.into()),
        }
    }

    /// The aggregate validation failure, if this error is one.
    pub fn validation(&self) -> Option<&ValidationError> {
        match self {
            Error::Validation(e) => Some(e),
            Error::Field { source, .. } | Error::Expression { source, .. } => source.validation(),
            _ => None,
        }
    }

    pub fn is_validation(&self) -> bool {
        self.validation().is_some()
    }
}
