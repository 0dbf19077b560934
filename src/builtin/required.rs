use crate::error::FunctionError;
use crate::function::{ArgType, CancelFlag, ErrCode, EvalContext, Function};
use crate::target::Target;
use crate::value;

pub const REQUIRED: ErrCode = ErrCode::new("required");

/// Fails when the target holds its type's zero value.
///
/// See [`value::is_zero`] for what counts as zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequiredFunction;

impl Function for RequiredFunction {
    fn evaluate(
        &self,
        _cancel: &CancelFlag,
        ctx: &EvalContext<'_>,
        target: &dyn Target,
    ) -> Result<bool, FunctionError> {
        let v = target.value_of(ctx.target_ref())?;
        if value::is_zero(v) {
            return Err(ctx.field_error(REQUIRED).into());
        }
        Ok(true)
    }

    fn arg_types(&self) -> Option<Vec<ArgType>> {
        Some(Vec::new())
    }

    fn err_codes(&self) -> Vec<ErrCode> {
        vec![REQUIRED]
    }
}
