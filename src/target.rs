use serde_json::Value;

use crate::error::TargetError;

/// Synthetic reference naming the value under ad hoc validation.
pub const VALUE_REF: &str = ".Value";

/// Source of the values validator functions inspect.
pub trait Target {
    /// Resolves a field reference such as `.Address.City`.
    fn value_of(&self, field_ref: &str) -> Result<&Value, TargetError>;
}

/// A record serialized to JSON, addressed by dotted paths.
///
/// `.Address.City` walks the `Address` object and returns its `City` member.
#[derive(Debug, Clone, Copy)]
pub struct JsonTarget<'a> {
    root: &'a Value,
}

impl<'a> JsonTarget<'a> {
    pub fn new(root: &'a Value) -> Result<Self, TargetError> {
        match root {
            Value::Object(_) => Ok(JsonTarget { root }),
            other => Err(TargetError::Invalid(format!(
                "expected an object, found {}",
                crate::value::type_name(other)
            ))),
        }
    }
}

impl Target for JsonTarget<'_> {
    fn value_of(&self, field_ref: &str) -> Result<&Value, TargetError> {
        let path = field_ref
            .strip_prefix('.')
            .filter(|p| !p.is_empty())
            .ok_or_else(|| TargetError::NotFound(field_ref.to_string()))?;

        let mut current = self.root;
        for segment in path.split('.') {
            current = current
                .as_object()
                .and_then(|map| map.get(segment))
                .ok_or_else(|| TargetError::NotFound(field_ref.to_string()))?;
        }
        Ok(current)
    }
}

/// A single value, answering only [`VALUE_REF`].
#[derive(Debug, Clone, Copy)]
pub struct ValueTarget<'a> {
    value: &'a Value,
}

impl<'a> ValueTarget<'a> {
    pub fn new(value: &'a Value) -> Self {
        ValueTarget { value }
    }
}

impl Target for ValueTarget<'_> {
    fn value_of(&self, field_ref: &str) -> Result<&Value, TargetError> {
        if field_ref == VALUE_REF {
            Ok(self.value)
        } else {
            Err(TargetError::NotFound(field_ref.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_target_walks_paths() {
        let record = json!({"Email": "a@b.c", "Address": {"City": "Leeds"}});
        let target = JsonTarget::new(&record).unwrap();
        assert_eq!(target.value_of(".Email").unwrap(), "a@b.c");
        assert_eq!(target.value_of(".Address.City").unwrap(), "Leeds");
        assert_eq!(
            target.value_of(".Address.Zip"),
            Err(TargetError::NotFound(".Address.Zip".into()))
        );
        assert!(target.value_of(".Email.Domain").is_err());
        assert!(target.value_of(".").is_err());
    }

    #[test]
    fn test_json_target_rejects_scalars() {
        assert!(matches!(JsonTarget::new(&json!(3)), Err(TargetError::Invalid(_))));
    }

    #[test]
    fn test_value_target() {
        let value = json!("");
        let target = ValueTarget::new(&value);
        assert_eq!(target.value_of(VALUE_REF).unwrap(), "");
        assert!(target.value_of(".Other").is_err());
    }
}
