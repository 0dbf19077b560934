//! Builtin validator functions.
//!
//! | Name | Arguments | Error code |
//! |---|---|---|
//! | `true`, `false` | none | none |
//! | `required` | none | `required` |
//! | `email` | none | `email/invalid_format` |
//! | `isbn10`, `isbn13` | none | `isbn10/invalid`, `isbn13/invalid` |
//! | `eq` | one value | `eq/not_equal` |
//! | `one_of` | one or more values | `one_of/not_allowed` |
//!
//! Every function evaluates the call's target reference, which defaults to
//! the field the expression is declared on.

mod boolean;
mod equality;
mod isbn;
mod regexp;
mod required;

pub use boolean::BoolFunction;
pub use equality::{EqualFunction, OneOfFunction};
pub use isbn::IsbnFunction;
pub use regexp::{RegexFunction, email};
pub use required::RequiredFunction;

use crate::registry::Registry;

/// Registers every builtin under its default name.
///
/// Panics if one of the names is already taken.
pub fn register_all(registry: &mut Registry) {
    registry.must_register("false", BoolFunction::new(false));
    registry.must_register("true", BoolFunction::new(true));
    registry.must_register("required", RequiredFunction);
    registry.must_register("email", email());
    registry.must_register("isbn10", IsbnFunction::isbn10());
    registry.must_register("isbn13", IsbnFunction::isbn13());
    registry.must_register("eq", EqualFunction);
    registry.must_register("one_of", OneOfFunction);
}
