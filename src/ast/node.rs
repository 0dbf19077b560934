use std::fmt;

use serde::Serialize;

use crate::ast::{LogicOp, Visitor};
use crate::function::ArgType;

/// A single argument of a function call.
///
/// # Examples
/// ```text
/// .Country       // FieldRef(".Country")
/// 'GB'           // String("GB")
/// -12            // Integer(-12)
/// 0.5            // Float(0.5)
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FunctionArg {
    /// Dotted path into the validated value
    FieldRef(String),
    /// Single-quoted string literal, without the quotes
    String(String),
    /// Signed 64-bit integer literal
    Integer(i64),
    /// Signed floating-point literal
    Float(f64),
}

impl FunctionArg {
    pub fn arg_type(&self) -> ArgType {
        match self {
            FunctionArg::FieldRef(_) => ArgType::FIELD_REF,
            FunctionArg::String(_) => ArgType::STRING,
            FunctionArg::Integer(_) => ArgType::INTEGER,
            FunctionArg::Float(_) => ArgType::FLOAT,
        }
    }

    pub fn as_field_ref(&self) -> Option<&str> {
        match self {
            FunctionArg::FieldRef(path) => Some(path),
            _ => None,
        }
    }
}

impl fmt::Display for FunctionArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FunctionArg::FieldRef(path) => f.write_str(path),
            FunctionArg::String(s) => write!(f, "'{}'", s),
            FunctionArg::Integer(n) => write!(f, "{}", n),
            FunctionArg::Float(n) if n.fract() == 0.0 && n.is_finite() => write!(f, "{:.1}", n),
            FunctionArg::Float(n) => write!(f, "{}", n),
        }
    }
}

/// A call to a registered validator function.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Function {
    pub name: String,
    pub args: Vec<FunctionArg>,
}

/// Abstract Syntax Tree node of a validation expression.
///
/// The tree is exclusively owned: every child is boxed and belongs to exactly
/// one parent. `Display` renders the canonical source text of trees produced
/// by the parser.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Node {
    /// Function call
    ///
    /// # Examples
    /// ```text
    /// required()
    /// eq(.Country, 'GB')
    /// ```
    Function(Function),

    /// Parenthesized sub-expression
    ///
    /// Transparent to evaluation, only significant for parsing.
    Group(Box<Node>),

    /// Logical AND
    LogicAnd { left: Box<Node>, right: Box<Node> },

    /// Logical OR
    LogicOr { left: Box<Node>, right: Box<Node> },

    /// Logical NOT
    LogicNot(Box<Node>),
}

impl Node {
    pub fn function(name: impl Into<String>, args: Vec<FunctionArg>) -> Self {
        Node::Function(Function {
            name: name.into(),
            args,
        })
    }

    pub fn group(expr: Node) -> Self {
        Node::Group(Box::new(expr))
    }

    pub fn and(left: Node, right: Node) -> Self {
        Node::LogicAnd {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn or(left: Node, right: Node) -> Self {
        Node::LogicOr {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn not(expr: Node) -> Self {
        Node::LogicNot(Box::new(expr))
    }

    /// Walks the tree in post-order, calling `visitor` for every node.
    ///
    /// Children are visited before their parent: left before right for binary
    /// nodes, the wrapped expression for groups and negations. Between the two
    /// operands of a binary node the visitor may ask to short-circuit, in which
    /// case neither the right operand nor the node's own handler runs.
    ///
    /// The first handler error aborts the walk and is returned.
    pub fn visit<V: Visitor + ?Sized>(&self, visitor: &mut V) -> Result<(), V::Error> {
        match self {
            Node::Function(function) => visitor.visit_function(function),
            Node::Group(expr) => {
                expr.visit(visitor)?;
                visitor.visit_group(expr)
            }
            Node::LogicAnd { left, right } => {
                left.visit(visitor)?;
                if visitor.short_circuit(LogicOp::And) {
                    return Ok(());
                }
                right.visit(visitor)?;
                visitor.visit_logic_and(left, right)
            }
            Node::LogicOr { left, right } => {
                left.visit(visitor)?;
                if visitor.short_circuit(LogicOp::Or) {
                    return Ok(());
                }
                right.visit(visitor)?;
                visitor.visit_logic_or(left, right)
            }
            Node::LogicNot(expr) => {
                expr.visit(visitor)?;
                visitor.visit_logic_not(expr)
            }
        }
    }

    /// The first function call in source order.
    pub fn leftmost_function(&self) -> &Function {
        match self {
            Node::Function(function) => function,
            Node::Group(expr) | Node::LogicNot(expr) => expr.leftmost_function(),
            Node::LogicAnd { left, .. } | Node::LogicOr { left, .. } => left.leftmost_function(),
        }
    }

    /// Splits a chain of top-level ANDs into its operands, left to right.
    ///
    /// Groups are not entered, so `(a() || b()) && c()` yields two conjuncts.
    pub fn conjuncts(&self) -> Vec<&Node> {
        let mut out = Vec::new();
        let mut pending = vec![self];
        while let Some(node) = pending.pop() {
            match node {
                Node::LogicAnd { left, right } => {
                    pending.push(right);
                    pending.push(left);
                }
                other => out.push(other),
            }
        }
        out
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Function(function) => {
                write!(f, "{}(", function.name)?;
                for (i, arg) in function.args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}", arg)?;
                }
                f.write_str(")")
            }
            Node::Group(expr) => write!(f, "({})", expr),
            Node::LogicAnd { left, right } => write!(f, "{} && {}", left, right),
            Node::LogicOr { left, right } => write!(f, "{} || {}", left, right),
            Node::LogicNot(expr) => write!(f, "!{}", expr),
        }
    }
}
