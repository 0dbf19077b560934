use crate::error::FunctionError;
use crate::function::{ArgType, CancelFlag, EvalContext, Function};
use crate::target::Target;

/// Evaluates to a constant without inspecting the target.
///
/// A constant `false` records no error, so on its own it does not fail a
/// validation; it only steers `&&`, `||` and `!`.
#[derive(Debug, Clone, Copy)]
pub struct BoolFunction {
    value: bool,
}

impl BoolFunction {
    pub fn new(value: bool) -> Self {
        BoolFunction { value }
    }
}

impl Function for BoolFunction {
    fn evaluate(
        &self,
        _cancel: &CancelFlag,
        _ctx: &EvalContext<'_>,
        _target: &dyn Target,
    ) -> Result<bool, FunctionError> {
        Ok(self.value)
    }

    fn arg_types(&self) -> Option<Vec<ArgType>> {
        Some(Vec::new())
    }
}
