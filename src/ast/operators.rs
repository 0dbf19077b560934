use std::fmt;

/// Binary logical connectives.
///
/// `And` binds tighter than `Or`; there are no other binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicOp {
    /// Logical AND (`&&`)
    And,
    /// Logical OR (`||`)
    Or,
}

impl LogicOp {
    /// The value of the left operand that decides the connective on its own.
    pub fn deciding_value(self) -> bool {
        match self {
            LogicOp::And => false,
            LogicOp::Or => true,
        }
    }
}

impl fmt::Display for LogicOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogicOp::And => f.write_str("&&"),
            LogicOp::Or => f.write_str("||"),
        }
    }
}
