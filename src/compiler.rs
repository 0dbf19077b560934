//! Compilation of record field tags into a single expression.
//!
//! A record type lists its validation tags through [`Tagged`]. Every tag is
//! `alias;expression` or a bare `expression`; `-` or an empty tag leaves the
//! field out. The expressions are syntax-checked one by one, rewritten with
//! their field's reference and joined into one tree:
//!
//! ```text
//! Email    "required() && email()"
//! Country  "country;one_of('GB','IT','US')"
//!
//! (required(.Email,.Email) && email(.Email,.Email))&&(one_of(.Country,.Country,'GB','IT','US'))
//! ```
//!
//! Compiled entries are memoized by [`StructCache`] and shared through `Arc`.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;
use sha1::{Digest, Sha1};

use crate::ast::Node;
use crate::error::Error;
use crate::parser::parse;
use crate::rewrite::rewrite;

/// Validation tag of a single record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldTag {
    /// Field name as it appears in the serialized record
    pub name: &'static str,
    pub tag: &'static str,
}

impl FieldTag {
    pub const fn new(name: &'static str, tag: &'static str) -> Self {
        FieldTag { name, tag }
    }
}

/// A record type carrying validation tags.
///
/// # Examples
/// ```
/// use serde::Serialize;
/// use vally::{FieldTag, Tagged};
///
/// #[derive(Serialize)]
/// struct Signup {
///     email: String,
///     country: String,
/// }
///
/// impl Tagged for Signup {
///     const FIELDS: &'static [FieldTag] = &[
///         FieldTag::new("email", "required() && email()"),
///         FieldTag::new("country", "country;one_of('GB','IT','US')"),
///     ];
/// }
/// ```
pub trait Tagged: Serialize {
    /// Tags in field declaration order.
    const FIELDS: &'static [FieldTag];
}

/// Splits a tag into its optional alias and its expression.
///
/// Returns `None` for excluded fields.
pub fn parse_tag<'t>(field: &str, tag: &'t str) -> Result<Option<(Option<&'t str>, &'t str)>, Error> {
    let tag = tag.trim();
    if tag.is_empty() || tag == "-" {
        return Ok(None);
    }
    let parts: Vec<&str> = tag.split(';').map(str::trim).collect();
    match parts.as_slice() {
        [expr] => Ok(Some((None, *expr))),
        [alias, expr] => Ok(Some(((!alias.is_empty()).then_some(*alias), *expr))),
        _ => Err(Error::InvalidTag(field.to_string())),
    }
}

/// A compiled field expression.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldEntry {
    pub alias: Option<String>,
    /// Expression as written in the tag
    pub expr: String,
    /// Expression with field references injected
    pub rewritten: String,
    pub name: String,
    pub field_ref: String,
}

/// The compiled, shareable form of a record type's tags.
#[derive(Debug, Clone, PartialEq)]
pub struct StructEntry {
    fields: Vec<FieldEntry>,
    expr: Option<Node>,
}

impl StructEntry {
    pub fn fields(&self) -> &[FieldEntry] {
        &self.fields
    }

    /// The combined expression, `None` when no field is tagged.
    pub fn expr(&self) -> Option<&Node> {
        self.expr.as_ref()
    }

    /// Looks up the entry declared for a field reference.
    pub fn field(&self, field_ref: &str) -> Option<&FieldEntry> {
        self.fields.iter().find(|f| f.field_ref == field_ref)
    }
}

/// Compiles a record type's tags.
///
/// Errors name the offending field; an error in the combined expression
/// names the combined text.
pub fn compile(tags: &[FieldTag]) -> Result<StructEntry, Error> {
    let mut fields = Vec::new();
    for field in tags {
        let Some((alias, expr)) = parse_tag(field.name, field.tag)? else {
            continue;
        };
        parse(expr).map_err(|e| Error::field(field.name, e))?;

        let field_ref = format!(".{}", field.name);
        let rewritten = rewrite(expr, &field_ref).map_err(|e| Error::field(field.name, e))?;
        fields.push(FieldEntry {
            alias: alias.map(str::to_string),
            expr: expr.to_string(),
            rewritten,
            name: field.name.to_string(),
            field_ref,
        });
    }

    if fields.is_empty() {
        return Ok(StructEntry { fields, expr: None });
    }

    let combined = fields
        .iter()
        .map(|f| format!("({})", f.rewritten))
        .collect::<Vec<_>>()
        .join("&&");
    let expr = parse(&combined).map_err(|e| Error::expression(&combined, e))?;
    Ok(StructEntry {
        fields,
        expr: Some(expr),
    })
}

/// SHA-1 over every field name and tag, in order.
fn cache_key(tags: &[FieldTag]) -> String {
    let mut hasher = Sha1::new();
    for field in tags {
        hasher.update(field.name.as_bytes());
        hasher.update([0]);
        hasher.update(field.tag.as_bytes());
        hasher.update([0]);
    }
    format!("{:x}", hasher.finalize())
}

/// Process-local memo of compiled record types.
///
/// Entries are never evicted. Lookup and compilation run under one lock, so
/// concurrent first uses of a record type compile it once.
#[derive(Debug, Default)]
pub struct StructCache {
    entries: Mutex<HashMap<String, Arc<StructEntry>>>,
}

impl StructCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_compile(&self, tags: &[FieldTag]) -> Result<Arc<StructEntry>, Error> {
        let key = cache_key(tags);
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(entry) = entries.get(&key) {
            return Ok(Arc::clone(entry));
        }

        tracing::debug!(key = %key, fields = tags.len(), "compiling struct tags");
        let entry = Arc::new(compile(tags)?);
        entries.insert(key, Arc::clone(&entry));
        Ok(entry)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
