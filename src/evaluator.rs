use crate::{
    ast::{self, LogicOp, Node, Visitor},
    error::{EvalError, FieldError, FunctionError},
    function::{ArgType, CancelFlag, ErrCode, EvalContext},
    registry::Registry,
    target::Target,
};

/// Reported when a negated expression holds.
pub const NOT_SATISFIED: ErrCode = ErrCode::new("not");

/// Result of evaluating an expression or one of its sub-expressions.
///
/// `errors` explains a `false` result; a passing outcome carries none.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Outcome {
    pub passed: bool,
    pub errors: Vec<FieldError>,
}

impl Outcome {
    fn pass() -> Self {
        Outcome {
            passed: true,
            errors: Vec::new(),
        }
    }

    fn fail(errors: Vec<FieldError>) -> Self {
        Outcome {
            passed: false,
            errors,
        }
    }

    /// Whether the evaluation recorded no field errors.
    ///
    /// A `false` result without errors (e.g. `false()`) still counts as valid.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Post-order evaluator of compiled expressions.
///
/// `&&` stops at the first failing operand and `||` at the first passing
/// one; operands that are not evaluated report nothing. A passing `||`
/// discards the errors of its failed operands. `!` discards the errors of
/// the expression it negates and reports [`NOT_SATISFIED`] when that
/// expression holds.
pub struct Evaluator<'a> {
    registry: &'a Registry,
    target: &'a dyn Target,
    cancel: &'a CancelFlag,
    stack: Vec<Outcome>,
}

impl<'a> Evaluator<'a> {
    pub fn new(registry: &'a Registry, target: &'a dyn Target, cancel: &'a CancelFlag) -> Self {
        Evaluator {
            registry,
            target,
            cancel,
            stack: Vec::new(),
        }
    }

    /// Evaluates a single expression.
    pub fn evaluate(&mut self, node: &Node) -> Result<Outcome, EvalError> {
        self.stack.clear();
        node.visit(self)?;
        Ok(self.pop())
    }

    fn pop(&mut self) -> Outcome {
        self.stack.pop().unwrap_or_default()
    }
}

/// Checks every call of `node` against `registry` without evaluating it.
///
/// Each function must be registered, carry its owner and target references
/// and match its declared argument types. Calls that short-circuiting would
/// skip are checked too.
pub fn resolve(registry: &Registry, node: &Node) -> Result<(), EvalError> {
    node.visit(&mut Resolver { registry })
}

struct Resolver<'a> {
    registry: &'a Registry,
}

impl Visitor for Resolver<'_> {
    type Error = EvalError;

    fn visit_function(&mut self, function: &ast::Function) -> Result<(), EvalError> {
        let f = self
            .registry
            .get(&function.name)
            .ok_or_else(|| EvalError::UnknownFunction(function.name.clone()))?;
        let ctx = EvalContext::new(function)?;
        match f.arg_types() {
            Some(expected) => check_args(&function.name, &expected, ctx.args()),
            None => Ok(()),
        }
    }

    fn visit_group(&mut self, _expr: &Node) -> Result<(), EvalError> {
        Ok(())
    }

    fn visit_logic_and(&mut self, _left: &Node, _right: &Node) -> Result<(), EvalError> {
        Ok(())
    }

    fn visit_logic_or(&mut self, _left: &Node, _right: &Node) -> Result<(), EvalError> {
        Ok(())
    }

    fn visit_logic_not(&mut self, _expr: &Node) -> Result<(), EvalError> {
        Ok(())
    }
}

fn check_args(function: &str, expected: &[ArgType], args: &[ast::FunctionArg]) -> Result<(), EvalError> {
    if expected.len() != args.len() {
        return Err(EvalError::ArgumentCount {
            function: function.to_string(),
            expected: expected.len(),
            found: args.len(),
        });
    }
    for (i, (kind, arg)) in expected.iter().zip(args).enumerate() {
        if !kind.accepts(arg) {
            return Err(EvalError::ArgumentType {
                function: function.to_string(),
                ordinal: i + 1,
                expected: *kind,
                found: arg.arg_type(),
            });
        }
    }
    Ok(())
}

impl Visitor for Evaluator<'_> {
    type Error = EvalError;

    fn visit_function(&mut self, function: &ast::Function) -> Result<(), EvalError> {
        let f = self
            .registry
            .get(&function.name)
            .ok_or_else(|| EvalError::UnknownFunction(function.name.clone()))?;
        let ctx = EvalContext::new(function)?;
        if let Some(expected) = f.arg_types() {
            check_args(&function.name, &expected, ctx.args())?;
        }

        let outcome = match f.evaluate(self.cancel, &ctx, self.target) {
            Ok(true) => Outcome::pass(),
            Ok(false) => Outcome::fail(Vec::new()),
            Err(FunctionError::Field(err)) => Outcome::fail(vec![err]),
            Err(source) => {
                return Err(EvalError::Function {
                    function: function.name.clone(),
                    source,
                });
            }
        };
        tracing::trace!(
            function = %function.name,
            field = ctx.field_ref(),
            target = ctx.target_ref(),
            passed = outcome.passed,
            "evaluated function"
        );
        self.stack.push(outcome);
        Ok(())
    }

    fn visit_group(&mut self, _expr: &Node) -> Result<(), EvalError> {
        Ok(())
    }

    fn visit_logic_and(&mut self, _left: &Node, _right: &Node) -> Result<(), EvalError> {
        let right = self.pop();
        let mut left = self.pop();
        left.passed &= right.passed;
        left.errors.extend(right.errors);
        self.stack.push(left);
        Ok(())
    }

    fn visit_logic_or(&mut self, _left: &Node, _right: &Node) -> Result<(), EvalError> {
        let right = self.pop();
        let mut left = self.pop();
        if right.passed {
            self.stack.push(Outcome::pass());
        } else {
            left.errors.extend(right.errors);
            self.stack.push(Outcome::fail(left.errors));
        }
        Ok(())
    }

    fn visit_logic_not(&mut self, expr: &Node) -> Result<(), EvalError> {
        let negated = self.pop();
        let outcome = if negated.passed {
            let ctx = EvalContext::new(expr.leftmost_function())?;
            Outcome::fail(vec![ctx.field_error(NOT_SATISFIED)])
        } else {
            Outcome::pass()
        };
        self.stack.push(outcome);
        Ok(())
    }

    fn short_circuit(&mut self, op: LogicOp) -> bool {
        self.stack
            .last()
            .is_some_and(|left| left.passed == op.deciding_value())
    }
}
