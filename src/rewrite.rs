//! Implicit field reference injection.
//!
//! Expressions attached to a field are written without that field's
//! reference. Rewriting prepends the owner and target references to every
//! call so that the evaluator sees a uniform calling convention:
//!
//! ```text
//! required()          ->  required(.Email,.Email)
//! eq(.Other)          ->  eq(.Email,.Other)
//! eq('GB', 2)         ->  eq(.Email,.Email,'GB', 2)
//! ```
//!
//! The rewriter is a text-to-text pass and does not validate syntax; text it
//! does not recognise is copied through for the parser to reject.

use crate::error::RewriteError;

/// Rewrites `expr` so that every call carries `field_ref` as its owner
/// reference and, unless an explicit one is given, as its target reference.
pub fn rewrite(expr: &str, field_ref: &str) -> Result<String, RewriteError> {
    Rewriter::new(expr, field_ref).run()
}

struct Rewriter<'a> {
    input: Vec<char>,
    position: usize,
    field_ref: &'a str,
    output: String,
}

impl<'a> Rewriter<'a> {
    fn new(expr: &str, field_ref: &'a str) -> Self {
        Rewriter {
            input: expr.chars().collect(),
            position: 0,
            field_ref,
            output: String::with_capacity(expr.len() + 4 * field_ref.len()),
        }
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    /// Returns the current character, failing at end of input.
    fn expect_char(&self) -> Result<char, RewriteError> {
        self.current_char().ok_or(RewriteError::UnexpectedEnd {
            position: self.position,
        })
    }

    fn copy(&mut self, ch: char) {
        self.output.push(ch);
        self.position += 1;
    }

    fn run(mut self) -> Result<String, RewriteError> {
        while let Some(ch) = self.current_char() {
            if ch.is_lowercase() {
                self.rewrite_call()?;
            } else {
                self.copy(ch);
            }
        }
        Ok(self.output)
    }

    fn rewrite_call(&mut self) -> Result<(), RewriteError> {
        // Identifier
        loop {
            let ch = self.expect_char()?;
            if !(ch.is_alphanumeric() || ch == '_') {
                break;
            }
            self.copy(ch);
        }
        while let Some(ch @ (' ' | '\t')) = self.current_char() {
            self.copy(ch);
        }
        if self.expect_char()? != '(' {
            return Ok(());
        }
        self.copy('(');

        while let Some(' ' | '\t') = self.current_char() {
            self.position += 1;
        }
        let owner = self.field_ref;
        match self.expect_char()? {
            ')' => {
                self.output.push_str(owner);
                self.output.push(',');
                self.output.push_str(owner);
            }
            '.' => {
                self.output.push_str(owner);
                self.output.push(',');
            }
            _ => {
                self.output.push_str(owner);
                self.output.push(',');
                self.output.push_str(owner);
                self.output.push(',');
            }
        }

        // Remaining arguments, up to the closing parenthesis
        let mut quoted = false;
        loop {
            let ch = self.expect_char()?;
            self.copy(ch);
            match ch {
                '\'' => quoted = !quoted,
                ')' if !quoted => return Ok(()),
                _ => {}
            }
        }
    }
}
