//! Rendering of validation results.
//!
//! A [`Report`] is the serializable summary of one validation call. It renders
//! either as JSON, compact or pretty, or as plain text with one line per
//! field error:
//!
//! ```text
//! .Email: required [required()]
//! .Country (country): one_of/not_allowed [one_of('GB','IT','US')]
//! ```

use std::fmt::Write;

use serde::Serialize;

use crate::error::{Error, FieldError};

/// Outcome of a validation call.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Report {
    pub valid: bool,
    pub errors: Vec<FieldError>,
}

impl Report {
    pub fn valid() -> Self {
        Report {
            valid: true,
            errors: Vec::new(),
        }
    }

    /// Turns a validation result into a report.
    ///
    /// Validation failures become an invalid report; every other error is
    /// returned unchanged.
    pub fn from_result(result: Result<(), Error>) -> Result<Self, Error> {
        match result {
            Ok(()) => Ok(Report::valid()),
            Err(Error::Validation(e)) => Ok(Report {
                valid: false,
                errors: e.errors,
            }),
            Err(e) => Err(e),
        }
    }

    pub fn to_json(&self, pretty: bool) -> Result<String, serde_json::Error> {
        to_json(self, pretty)
    }

    pub fn to_text(&self) -> String {
        if self.valid {
            return "valid\n".to_string();
        }
        let mut out = String::new();
        for err in &self.errors {
            let _ = writeln!(out, "{}", render_field_error(err));
        }
        out
    }
}

/// Serializes any value as compact or pretty JSON.
pub fn to_json<T: Serialize + ?Sized>(value: &T, pretty: bool) -> Result<String, serde_json::Error> {
    if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
}

pub fn render_field_error(err: &FieldError) -> String {
    let mut line = err.field.clone();
    if let Some(alias) = &err.alias {
        let _ = write!(line, " ({alias})");
    }
    let args: Vec<String> = err.args.iter().map(ToString::to_string).collect();
    let _ = write!(line, ": {} [{}({})]", err.code, err.function, args.join(","));
    if err.target != err.field {
        let _ = write!(line, " on {}", err.target);
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::FunctionArg;
    use crate::error::ValidationError;
    use crate::function::ErrCode;

    fn field_error(code: &'static str, function: &str, args: Vec<FunctionArg>) -> FieldError {
        FieldError {
            code: ErrCode::new(code),
            field: ".Country".to_string(),
            target: ".Country".to_string(),
            alias: Some("country".to_string()),
            function: function.to_string(),
            args,
        }
    }

    #[test]
    fn test_text_rendering() {
        let report = Report {
            valid: false,
            errors: vec![field_error(
                "one_of/not_allowed",
                "one_of",
                vec![FunctionArg::String("GB".into()), FunctionArg::String("IT".into())],
            )],
        };
        assert_eq!(
            report.to_text(),
            ".Country (country): one_of/not_allowed [one_of('GB','IT')]\n"
        );
        assert_eq!(Report::valid().to_text(), "valid\n");
    }

    #[test]
    fn test_json_rendering() {
        let report = Report {
            valid: false,
            errors: vec![field_error("eq/not_equal", "eq", vec![FunctionArg::Integer(3)])],
        };
        let json: serde_json::Value = serde_json::from_str(&report.to_json(false).unwrap()).unwrap();
        assert_eq!(json["valid"], false);
        assert_eq!(json["errors"][0]["code"], "eq/not_equal");
        assert_eq!(json["errors"][0]["alias"], "country");
        assert_eq!(json["errors"][0]["args"][0]["integer"], 3);
    }

    #[test]
    fn test_from_result() {
        let failed = Err(Error::Validation(ValidationError::new(vec![field_error(
            "required",
            "required",
            vec![],
        )])));
        let report = Report::from_result(failed).unwrap();
        assert!(!report.valid);
        assert_eq!(report.errors.len(), 1);

        assert!(Report::from_result(Err(Error::InvalidTag("A".into()))).is_err());
    }
}
