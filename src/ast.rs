//! # Validation Expressions - Abstract Syntax Tree
//!
//! This module defines the tokens and the Abstract Syntax Tree of the
//! validation expression language, a deliberately small boolean language
//! whose only atoms are calls to registered validator functions.
//!
//! ## Architecture Overview
//!
//! - **[tokens]** - Lexical tokens produced by the scanner
//! - **[node]** - Expression nodes (function calls, groups, connectives)
//! - **[operators]** - Binary logical connectives
//! - **[visitor]** - Post-order traversal contract
//!
//! ## Quick Start
//!
//! ```text
//! required() && (email() || eq('n/a'))
//! ```
//!
//! This expression requires a value that is either an email address or the
//! literal string `n/a`.
//!
//! ## Core Concepts
//!
//! ### Function Calls
//!
//! Functions are referenced by bare lowercase identifiers. Arguments are
//! field references (`.Name`, `.Address.City`), single-quoted strings, signed
//! integers and signed decimals.
//!
//! ### Precedence
//!
//! `!` negates the expression that follows it, `&&` binds tighter than `||`
//! and parentheses override both:
//!
//! ```text
//! a() || b() && c()      // a() || (b() && c())
//! a() && b() || c()      // (a() && b()) || c()
//! a() && (b() || c())    // explicit group
//! ```
//!
//! ### Implicit Field References
//!
//! Expressions attached to a field omit that field's reference. Before
//! parsing they are rewritten (see [`crate::rewrite`]) so that every call
//! carries its owner and target references as its first two arguments:
//!
//! ```text
//! required()             // required(.Email,.Email)
//! eq(.Country, 'GB')     // eq(.Email,.Country, 'GB')
//! ```
pub mod node;
pub mod operators;
pub mod tokens;
pub mod visitor;

pub use node::{Function, FunctionArg, Node};
pub use operators::LogicOp;
pub use tokens::{Token, TokenKind};
pub use visitor::Visitor;
