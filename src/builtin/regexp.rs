use std::sync::LazyLock;

use regex::Regex;

use crate::error::FunctionError;
use crate::function::{ArgType, CancelFlag, ErrCode, EvalContext, Function};
use crate::target::Target;
use crate::value;

pub const EMAIL_INVALID_FORMAT: ErrCode = ErrCode::new("email/invalid_format");

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .expect("email pattern is valid")
});

/// Matches the target's string value against a regular expression.
///
/// A value that does not match reports the function's error code. `null`
/// passes; other non-strings are rejected with
/// [`FunctionError::UnsupportedType`].
#[derive(Debug, Clone)]
pub struct RegexFunction {
    re: Regex,
    code: ErrCode,
}

impl RegexFunction {
    pub fn new(re: Regex, code: impl Into<ErrCode>) -> Self {
        RegexFunction {
            re,
            code: code.into(),
        }
    }
}

/// The `email` builtin.
pub fn email() -> RegexFunction {
    RegexFunction::new(EMAIL.clone(), EMAIL_INVALID_FORMAT)
}

impl Function for RegexFunction {
    fn evaluate(
        &self,
        _cancel: &CancelFlag,
        ctx: &EvalContext<'_>,
        target: &dyn Target,
    ) -> Result<bool, FunctionError> {
        let Some(s) = value::format_subject(target.value_of(ctx.target_ref())?)? else {
            return Ok(true);
        };
        if !self.re.is_match(s) {
            return Err(ctx.field_error(self.code.clone()).into());
        }
        Ok(true)
    }

    fn arg_types(&self) -> Option<Vec<ArgType>> {
        Some(Vec::new())
    }

    fn err_codes(&self) -> Vec<ErrCode> {
        vec![self.code.clone()]
    }
}
