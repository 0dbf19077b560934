//! A tag-driven validation engine built on a small boolean expression
//! language.
//!
//! Expressions such as `required() && email()` are attached to values or to
//! record fields, parsed once and evaluated against the data through a
//! registry of validator functions. See [`ast`] for the language and
//! [`Validator`] for the entry points.

pub mod ast;
pub mod builtin;
pub mod cli;
pub mod compiler;
pub mod error;
pub mod evaluator;
pub mod function;
pub mod output;
pub mod parser;
pub mod registry;
pub mod rewrite;
pub mod scanner;
pub mod target;
pub mod validator;
pub mod value;

pub use ast::{Function as Call, FunctionArg, LogicOp, Node, Token, TokenKind, Visitor};
pub use compiler::{FieldEntry, FieldTag, StructCache, StructEntry, Tagged};
pub use error::{
    Error, EvalError, FieldError, FunctionError, ParseError, RewriteError, TargetError,
    ValidationError,
};
pub use evaluator::{Evaluator, Outcome};
pub use function::{ArgType, CancelFlag, ErrCode, EvalContext, Function, from_fn};
pub use output::Report;
pub use parser::{Parser, parse};
pub use registry::Registry;
pub use rewrite::rewrite;
pub use scanner::Scanner;
pub use target::{JsonTarget, Target, VALUE_REF, ValueTarget};
pub use validator::Validator;
