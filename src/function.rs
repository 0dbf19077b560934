//! The validator function capability.
//!
//! Every atom of an expression is a call to a [`Function`] looked up by name
//! in a [`Registry`](crate::registry::Registry). The evaluator hands each call
//! an [`EvalContext`] describing the call site and the [`Target`] holding the
//! values under validation.

use std::borrow::Cow;
use std::fmt;
use std::ops::BitOr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;

use crate::ast::{self, FunctionArg};
use crate::error::{EvalError, FieldError, FunctionError};
use crate::target::Target;

/// A validator function.
///
/// `evaluate` returns `Ok(true)` when the value is valid. An invalid value is
/// reported with `Err(FunctionError::Field(..))`, built through
/// [`EvalContext::field_error`]; every other error aborts the evaluation.
pub trait Function: Send + Sync {
    fn evaluate(
        &self,
        cancel: &CancelFlag,
        ctx: &EvalContext<'_>,
        target: &dyn Target,
    ) -> Result<bool, FunctionError>;

    /// Declared types of the arguments following the owner and target
    /// references. `None` accepts anything.
    fn arg_types(&self) -> Option<Vec<ArgType>> {
        None
    }

    /// Error codes this function may report.
    fn err_codes(&self) -> Vec<ErrCode> {
        Vec::new()
    }
}

/// A [`Function`] backed by a closure, see [`from_fn`].
pub struct FnFunction<F> {
    f: F,
}

/// Wraps a closure as a [`Function`] without declared argument types.
///
/// # Examples
/// ```
/// use vally::function::{from_fn, CancelFlag, EvalContext};
/// use vally::target::Target;
///
/// let positive = from_fn(|_: &CancelFlag, ctx: &EvalContext<'_>, target: &dyn Target| {
///     let value = target.value_of(ctx.target_ref())?;
///     match value.as_i64() {
///         Some(n) if n > 0 => Ok(true),
///         _ => Err(ctx.field_error("positive").into()),
///     }
/// });
/// # let _ = positive;
/// ```
pub fn from_fn<F>(f: F) -> FnFunction<F>
where
    F: Fn(&CancelFlag, &EvalContext<'_>, &dyn Target) -> Result<bool, FunctionError> + Send + Sync,
{
    FnFunction { f }
}

impl<F> Function for FnFunction<F>
where
    F: Fn(&CancelFlag, &EvalContext<'_>, &dyn Target) -> Result<bool, FunctionError> + Send + Sync,
{
    fn evaluate(
        &self,
        cancel: &CancelFlag,
        ctx: &EvalContext<'_>,
        target: &dyn Target,
    ) -> Result<bool, FunctionError> {
        (self.f)(cancel, ctx, target)
    }
}

impl From<FieldError> for FunctionError {
    fn from(err: FieldError) -> Self {
        FunctionError::Field(err)
    }
}

/// Machine-readable error code, e.g. `required` or `email/invalid_format`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ErrCode(Cow<'static, str>);

impl ErrCode {
    pub const fn new(code: &'static str) -> Self {
        ErrCode(Cow::Borrowed(code))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ErrCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for ErrCode {
    fn from(code: &'static str) -> Self {
        ErrCode::new(code)
    }
}

impl From<String> for ErrCode {
    fn from(code: String) -> Self {
        ErrCode(Cow::Owned(code))
    }
}

impl PartialEq<str> for ErrCode {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for ErrCode {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

/// Set of accepted argument kinds.
///
/// Kinds combine with `|`:
/// ```
/// use vally::function::ArgType;
///
/// let number = ArgType::INTEGER | ArgType::FLOAT;
/// assert!(number.contains(ArgType::FLOAT));
/// assert!(!number.contains(ArgType::STRING));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ArgType(u8);

impl ArgType {
    pub const FIELD_REF: ArgType = ArgType(1);
    pub const STRING: ArgType = ArgType(1 << 1);
    pub const INTEGER: ArgType = ArgType(1 << 2);
    pub const FLOAT: ArgType = ArgType(1 << 3);
    pub const NUMBER: ArgType = ArgType(Self::INTEGER.0 | Self::FLOAT.0);
    pub const ANY: ArgType =
        ArgType(Self::FIELD_REF.0 | Self::STRING.0 | Self::INTEGER.0 | Self::FLOAT.0);

    pub const fn contains(self, other: ArgType) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn accepts(self, arg: &FunctionArg) -> bool {
        self.contains(arg.arg_type())
    }
}

impl BitOr for ArgType {
    type Output = ArgType;

    fn bitor(self, rhs: ArgType) -> ArgType {
        ArgType(self.0 | rhs.0)
    }
}

impl fmt::Display for ArgType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == ArgType::ANY {
            return f.write_str("any");
        }
        let names = [
            (ArgType::FIELD_REF, "field_ref"),
            (ArgType::STRING, "string"),
            (ArgType::INTEGER, "integer"),
            (ArgType::FLOAT, "float"),
        ];
        let parts: Vec<&str> = names
            .iter()
            .filter(|(kind, _)| self.contains(*kind))
            .map(|(_, name)| *name)
            .collect();
        if parts.is_empty() {
            f.write_str("none")
        } else {
            f.write_str(&parts.join("|"))
        }
    }
}

/// Call site of a single function evaluation.
///
/// The first two arguments of every call are the owner and target field
/// references; [`EvalContext::args`] holds the rest.
#[derive(Debug, Clone, Copy)]
pub struct EvalContext<'a> {
    function: &'a ast::Function,
    field_ref: &'a str,
    target_ref: &'a str,
}

impl<'a> EvalContext<'a> {
    pub fn new(function: &'a ast::Function) -> Result<Self, EvalError> {
        let missing = || EvalError::MissingFieldRefs(function.name.clone());
        let field_ref = function
            .args
            .first()
            .and_then(FunctionArg::as_field_ref)
            .ok_or_else(missing)?;
        let target_ref = function
            .args
            .get(1)
            .and_then(FunctionArg::as_field_ref)
            .ok_or_else(missing)?;
        Ok(EvalContext {
            function,
            field_ref,
            target_ref,
        })
    }

    /// Reference of the field that declared the expression.
    pub fn field_ref(&self) -> &'a str {
        self.field_ref
    }

    /// Reference of the field to evaluate.
    pub fn target_ref(&self) -> &'a str {
        self.target_ref
    }

    pub fn function_name(&self) -> &'a str {
        &self.function.name
    }

    pub fn args(&self) -> &'a [FunctionArg] {
        &self.function.args[2..]
    }

    pub fn field_error(&self, code: impl Into<ErrCode>) -> FieldError {
        FieldError {
            code: code.into(),
            field: self.field_ref.to_string(),
            target: self.target_ref.to_string(),
            alias: None,
            function: self.function.name.clone(),
            args: self.args().to_vec(),
        }
    }
}

/// Cooperative cancellation signal shared between a caller and the
/// functions it runs.
///
/// Evaluation never polls the flag itself; long-running functions may.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        CancelFlag::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(args: Vec<FunctionArg>) -> ast::Function {
        ast::Function {
            name: "eq".to_string(),
            args,
        }
    }

    #[test]
    fn test_context_splits_references() {
        let function = call(vec![
            FunctionArg::FieldRef(".Email".into()),
            FunctionArg::FieldRef(".Country".into()),
            FunctionArg::String("GB".into()),
        ]);
        let ctx = EvalContext::new(&function).unwrap();
        assert_eq!(ctx.field_ref(), ".Email");
        assert_eq!(ctx.target_ref(), ".Country");
        assert_eq!(ctx.args(), &[FunctionArg::String("GB".into())]);

        let err = ctx.field_error("eq/not_equal");
        assert_eq!(err.code, "eq/not_equal");
        assert_eq!(err.field, ".Email");
        assert_eq!(err.target, ".Country");
        assert_eq!(err.args.len(), 1);
    }

    #[test]
    fn test_context_requires_references() {
        let function = call(vec![
            FunctionArg::FieldRef(".Email".into()),
            FunctionArg::String("GB".into()),
        ]);
        assert_eq!(
            EvalContext::new(&function).unwrap_err(),
            EvalError::MissingFieldRefs("eq".into())
        );
        assert!(EvalContext::new(&call(vec![])).is_err());
    }

    #[test]
    fn test_arg_type_display() {
        assert_eq!(ArgType::ANY.to_string(), "any");
        assert_eq!(ArgType::NUMBER.to_string(), "integer|float");
        assert_eq!((ArgType::FIELD_REF | ArgType::STRING).to_string(), "field_ref|string");
    }

    #[test]
    fn test_cancel_flag_is_shared() {
        let flag = CancelFlag::new();
        let clone = flag.clone();
        assert!(!flag.is_cancelled());
        clone.cancel();
        assert!(flag.is_cancelled());
    }
}
