use std::sync::LazyLock;

use regex::Regex;

use crate::error::FunctionError;
use crate::function::{ArgType, CancelFlag, ErrCode, EvalContext, Function};
use crate::target::Target;
use crate::value;

pub const ISBN10_INVALID: ErrCode = ErrCode::new("isbn10/invalid");
pub const ISBN13_INVALID: ErrCode = ErrCode::new("isbn13/invalid");

// Groups may be separated by single hyphens or spaces.
static ISBN10: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[0-9][- ]?){9}[0-9X]$").expect("isbn10 pattern is valid")
});
static ISBN13: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^97[89][- ]?(?:[0-9][- ]?){9}[0-9]$").expect("isbn13 pattern is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Isbn10,
    Isbn13,
}

/// Validates an ISBN string: layout first, then the check digit.
#[derive(Debug, Clone, Copy)]
pub struct IsbnFunction {
    kind: Kind,
}

impl IsbnFunction {
    pub fn isbn10() -> Self {
        IsbnFunction { kind: Kind::Isbn10 }
    }

    pub fn isbn13() -> Self {
        IsbnFunction { kind: Kind::Isbn13 }
    }

    fn code(&self) -> ErrCode {
        match self.kind {
            Kind::Isbn10 => ISBN10_INVALID,
            Kind::Isbn13 => ISBN13_INVALID,
        }
    }

    fn is_valid(&self, s: &str) -> bool {
        let digits = s.chars().filter(|c| !matches!(c, '-' | ' '));
        match self.kind {
            Kind::Isbn10 => ISBN10.is_match(s) && isbn10_checksum(digits),
            Kind::Isbn13 => ISBN13.is_match(s) && isbn13_checksum(digits),
        }
    }
}

/// Weighted sum 10..1 must be divisible by 11; `X` stands for 10.
fn isbn10_checksum(digits: impl Iterator<Item = char>) -> bool {
    let sum: u32 = digits
        .zip((1..=10).rev())
        .map(|(c, weight)| {
            let d = if c == 'X' { 10 } else { c.to_digit(10).unwrap_or(0) };
            d * weight
        })
        .sum();
    sum % 11 == 0
}

/// Alternating weights 1 and 3 must sum to a multiple of 10.
fn isbn13_checksum(digits: impl Iterator<Item = char>) -> bool {
    let sum: u32 = digits
        .filter_map(|c| c.to_digit(10))
        .enumerate()
        .map(|(i, d)| if i % 2 == 0 { d } else { d * 3 })
        .sum();
    sum % 10 == 0
}

impl Function for IsbnFunction {
    fn evaluate(
        &self,
        _cancel: &CancelFlag,
        ctx: &EvalContext<'_>,
        target: &dyn Target,
    ) -> Result<bool, FunctionError> {
        let Some(s) = value::format_subject(target.value_of(ctx.target_ref())?)? else {
            return Ok(true);
        };
        if !self.is_valid(s) {
            return Err(ctx.field_error(self.code()).into());
        }
        Ok(true)
    }

    fn arg_types(&self) -> Option<Vec<ArgType>> {
        Some(Vec::new())
    }

    fn err_codes(&self) -> Vec<ErrCode> {
        vec![self.code()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_isbn10() {
        let f = IsbnFunction::isbn10();
        assert!(f.is_valid("0306406152"));
        assert!(f.is_valid("0-306-40615-2"));
        assert!(f.is_valid("080442957X"));
        assert!(!f.is_valid("0306406153"));
        assert!(!f.is_valid("030640615"));
        assert!(!f.is_valid("9780306406157"));
    }

    #[test]
    fn test_isbn13() {
        let f = IsbnFunction::isbn13();
        assert!(f.is_valid("9780306406157"));
        assert!(f.is_valid("978-0-306-40615-7"));
        assert!(!f.is_valid("9780306406158"));
        assert!(!f.is_valid("1230306406157"));
        assert!(!f.is_valid("0306406152"));
    }
}
