use std::sync::Arc;

use serde_json::Value;

use crate::{
    ast::Node,
    compiler::{StructCache, StructEntry, Tagged},
    error::{Error, FieldError, ValidationError},
    evaluator::{Evaluator, resolve},
    function::{CancelFlag, Function},
    parser::parse,
    registry::Registry,
    rewrite::rewrite,
    target::{JsonTarget, VALUE_REF, ValueTarget},
};

/// Entry point for validating values and tagged records.
///
/// A validator owns its function registry and a cache of compiled record
/// types. Functions are registered while the validator is still exclusively
/// owned; afterwards it can be shared across threads.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use vally::Validator;
///
/// let validator = Validator::with_builtins();
/// assert!(validator.validate_value("required() && email()", &json!("a@b.c")).is_ok());
///
/// let err = validator.validate_value("required() && email()", &json!("")).unwrap_err();
/// assert_eq!(err.validation().unwrap().codes(), vec!["required"]);
/// ```
#[derive(Debug, Default)]
pub struct Validator {
    registry: Registry,
    cache: StructCache,
}

impl Validator {
    pub fn new(registry: Registry) -> Self {
        Validator {
            registry,
            cache: StructCache::new(),
        }
    }

    /// A validator with the builtin functions registered.
    pub fn with_builtins() -> Self {
        Validator::new(Registry::with_builtins())
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn register(&mut self, name: impl Into<String>, f: impl Function + 'static) -> Result<(), Error> {
        self.registry.register(name, f)
    }

    /// Panics if `name` is taken.
    pub fn must_register(&mut self, name: impl Into<String>, f: impl Function + 'static) {
        self.registry.must_register(name, f)
    }

    pub fn replace(&mut self, name: impl Into<String>, f: impl Function + 'static) -> Option<Arc<dyn Function>> {
        self.registry.replace(name, f)
    }

    /// Compiles the tags of `T` ahead of its first validation and checks
    /// every call against the registry.
    pub fn register_struct<T: Tagged>(&self) -> Result<Arc<StructEntry>, Error> {
        let entry = self.cache.get_or_compile(T::FIELDS)?;
        self.resolve_struct(&entry)?;
        Ok(entry)
    }

    /// Checks an expression's syntax, that every function it calls is
    /// registered and that the arguments match the declared types.
    pub fn check(&self, expr: &str) -> Result<(), Error> {
        self.compile_value(expr).map(drop)
    }

    fn compile_value(&self, expr: &str) -> Result<Node, Error> {
        let node = compile_value_expr(expr)?;
        resolve(&self.registry, &node).map_err(|e| Error::expression(expr, e))?;
        Ok(node)
    }

    /// Resolves each field's expression, naming the field on failure.
    fn resolve_struct(&self, entry: &StructEntry) -> Result<(), Error> {
        let Some(expr) = entry.expr() else {
            return Ok(());
        };
        for (field, node) in entry.fields().iter().zip(expr.conjuncts()) {
            resolve(&self.registry, node).map_err(|e| Error::field(&field.name, e))?;
        }
        Ok(())
    }

    /// Validates a single value against an expression.
    ///
    /// Calls without an explicit target evaluate `value` itself.
    pub fn validate_value(&self, expr: &str, value: &Value) -> Result<(), Error> {
        self.validate_value_with(&CancelFlag::new(), expr, value)
    }

    pub fn validate_value_with(&self, cancel: &CancelFlag, expr: &str, value: &Value) -> Result<(), Error> {
        let node = self.compile_value(expr)?;
        let target = ValueTarget::new(value);
        let outcome = Evaluator::new(&self.registry, &target, cancel)
            .evaluate(&node)
            .map_err(|e| Error::expression(expr, e))?;
        finish(outcome.errors)
    }

    /// Validates a record against the tags of its type.
    ///
    /// Every tagged field is evaluated, so the error lists one entry per
    /// failing field at least. Errors carry the alias of their field.
    pub fn validate_struct<T: Tagged>(&self, record: &T) -> Result<(), Error> {
        self.validate_struct_with(&CancelFlag::new(), record)
    }

    pub fn validate_struct_with<T: Tagged>(&self, cancel: &CancelFlag, record: &T) -> Result<(), Error> {
        let entry = self.register_struct::<T>()?;
        let Some(expr) = entry.expr() else {
            return Ok(());
        };

        let value = serde_json::to_value(record).map_err(|e| Error::InvalidTarget(e.to_string()))?;
        let target = JsonTarget::new(&value).map_err(|e| Error::InvalidTarget(e.to_string()))?;
        let mut evaluator = Evaluator::new(&self.registry, &target, cancel);

        let mut errors = Vec::new();
        for (field, node) in entry.fields().iter().zip(expr.conjuncts()) {
            let outcome = evaluator
                .evaluate(node)
                .map_err(|e| Error::field(&field.name, e))?;
            errors.extend(outcome.errors.into_iter().map(|err| FieldError {
                alias: field.alias.clone(),
                ..err
            }));
        }
        finish(errors)
    }
}

/// Parses an ad hoc expression against the synthetic value reference.
///
/// The raw text is checked first so that syntax errors point into what the
/// caller wrote rather than into the rewritten text.
pub fn compile_value_expr(expr: &str) -> Result<Node, Error> {
    parse(expr).map_err(|e| Error::expression(expr, e))?;
    let rewritten = rewrite(expr, VALUE_REF).map_err(|e| Error::expression(expr, e))?;
    parse(&rewritten).map_err(|e| Error::expression(rewritten.as_str(), e))
}

fn finish(errors: Vec<FieldError>) -> Result<(), Error> {
    if errors.is_empty() {
        return Ok(());
    }
    tracing::debug!(errors = errors.len(), "validation failed");
    Err(ValidationError::new(errors).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EvalError;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_validator_is_send_sync() {
        assert_send_sync::<Validator>();
    }

    #[test]
    fn test_check_covers_untaken_branches() {
        let validator = Validator::with_builtins();
        assert!(matches!(
            validator.check("true() || eq()").unwrap_err(),
            Error::Expression { source, .. } if matches!(*source, Error::Eval(EvalError::ArgumentCount { .. }))
        ));
    }

    #[test]
    fn test_check() {
        let validator = Validator::with_builtins();
        assert!(validator.check("required() && (email() || eq('x'))").is_ok());
        let err = validator.check("required() && nope()").unwrap_err();
        assert!(matches!(
            err,
            Error::Expression { source, .. } if matches!(*source, Error::Eval(EvalError::UnknownFunction(ref n)) if n == "nope")
        ));
        assert!(validator.check("required(").is_err());
    }

    #[test]
    fn test_compile_value_expr() {
        let node = compile_value_expr("!eq('GB') || required()").unwrap();
        assert_eq!(node.to_string(), "!eq(.Value,.Value,'GB') || required(.Value,.Value)");
    }
}
