use crate::error::FunctionError;
use crate::function::{ArgType, CancelFlag, ErrCode, EvalContext, Function};
use crate::target::Target;
use crate::value;

pub const EQ_NOT_EQUAL: ErrCode = ErrCode::new("eq/not_equal");
pub const ONE_OF_NOT_ALLOWED: ErrCode = ErrCode::new("one_of/not_allowed");

/// `eq(x)`: the target equals `x`.
///
/// `x` may be a literal or another field reference: on a confirmation field
/// `eq(.Confirm, .Password)` compares the two fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct EqualFunction;

impl Function for EqualFunction {
    fn evaluate(
        &self,
        _cancel: &CancelFlag,
        ctx: &EvalContext<'_>,
        target: &dyn Target,
    ) -> Result<bool, FunctionError> {
        let v = target.value_of(ctx.target_ref())?;
        let [expected] = ctx.args() else {
            return Err(FunctionError::Message(format!(
                "expected 1 argument, found {}",
                ctx.args().len()
            )));
        };
        if value::matches_arg(v, expected, target)? {
            Ok(true)
        } else {
            Err(ctx.field_error(EQ_NOT_EQUAL).into())
        }
    }

    fn arg_types(&self) -> Option<Vec<ArgType>> {
        Some(vec![ArgType::ANY])
    }

    fn err_codes(&self) -> Vec<ErrCode> {
        vec![EQ_NOT_EQUAL]
    }
}

/// `one_of(a, b, ...)`: the target equals one of the arguments.
#[derive(Debug, Clone, Copy, Default)]
pub struct OneOfFunction;

impl Function for OneOfFunction {
    fn evaluate(
        &self,
        _cancel: &CancelFlag,
        ctx: &EvalContext<'_>,
        target: &dyn Target,
    ) -> Result<bool, FunctionError> {
        if ctx.args().is_empty() {
            return Err(FunctionError::Message(
                "expected at least 1 argument".to_string(),
            ));
        }
        let v = target.value_of(ctx.target_ref())?;
        for allowed in ctx.args() {
            if value::matches_arg(v, allowed, target)? {
                return Ok(true);
            }
        }
        Err(ctx.field_error(ONE_OF_NOT_ALLOWED).into())
    }

    fn err_codes(&self) -> Vec<ErrCode> {
        vec![ONE_OF_NOT_ALLOWED]
    }
}
