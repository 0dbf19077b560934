//! Helpers over `serde_json::Value` shared by the builtin functions.
//!
//! JSON has a single number type while expression literals distinguish
//! integers from floats. Numbers are therefore compared as [`Decimal`]s, so
//! `1`, `1.0` and `1.00` are all equal and no float rounding leaks in.

use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde_json::Value;

use crate::ast::FunctionArg;
use crate::error::{FunctionError, TargetError};
use crate::target::Target;

/// Whether the value is its type's zero value.
///
/// `null`, `false`, `0`, `""` and empty arrays and objects are zero.
pub fn is_zero(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(_) => to_decimal(value).is_some_and(|d| d.is_zero()),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// The string a format check applies to.
///
/// `null` yields `None`: an absent value is not malformed, presence is
/// `required`'s concern. Other non-strings are unsupported.
pub fn format_subject(value: &Value) -> Result<Option<&str>, FunctionError> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        other => Err(FunctionError::UnsupportedType {
            expected: "string",
            found: type_name(other),
        }),
    }
}

/// Converts a JSON number to a decimal.
pub fn to_decimal(value: &Value) -> Option<Decimal> {
    let Value::Number(n) = value else {
        return None;
    };
    if let Some(i) = n.as_i64() {
        Decimal::from_i64(i)
    } else if let Some(u) = n.as_u64() {
        Decimal::from_u64(u)
    } else {
        n.as_f64().and_then(Decimal::from_f64)
    }
}

/// Structural equality with numbers compared by value.
pub fn json_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(_), Value::Number(_)) => match (to_decimal(a), to_decimal(b)) {
            (Some(x), Some(y)) => x == y,
            _ => a == b,
        },
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| json_eq(x, y))
        }
        (Value::Object(xs), Value::Object(ys)) => {
            xs.len() == ys.len()
                && xs
                    .iter()
                    .all(|(k, x)| ys.get(k).is_some_and(|y| json_eq(x, y)))
        }
        _ => a == b,
    }
}

/// Compares a value against an expression argument.
///
/// Field references are resolved through `target` first. Literal strings
/// only match JSON strings and numeric literals only match JSON numbers.
pub fn matches_arg(
    value: &Value,
    arg: &FunctionArg,
    target: &dyn Target,
) -> Result<bool, TargetError> {
    let matched = match arg {
        FunctionArg::FieldRef(path) => json_eq(value, target.value_of(path)?),
        FunctionArg::String(s) => value.as_str() == Some(s.as_str()),
        FunctionArg::Integer(n) => to_decimal(value) == Decimal::from_i64(*n),
        FunctionArg::Float(n) => {
            to_decimal(value).is_some_and(|d| Decimal::from_f64(*n) == Some(d))
        }
    };
    Ok(matched)
}
