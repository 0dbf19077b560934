//! Introspection commands: token stream, AST and function listing

use std::fmt::Write;

use serde::Serialize;

use super::CliError;
use crate::{
    Node, Registry, Token,
    function::ErrCode,
    parser::parse,
    rewrite::rewrite,
    scanner::Scanner,
    target::VALUE_REF,
};

/// Every token of `expr`, ending with the end-of-input token.
///
/// Scanning stops at the first illegal token.
pub fn tokens(expr: &str) -> Vec<Token> {
    Scanner::new(expr).collect()
}

/// Rewritten text and tree of an expression
#[derive(Debug, Serialize)]
pub struct AstOutput {
    pub rewritten: String,
    pub ast: Node,
}

/// Rewrites `expr` for `field` (the value itself by default) and parses it.
pub fn ast(expr: &str, field: Option<&str>) -> Result<AstOutput, CliError> {
    parse(expr)?;
    let rewritten = rewrite(expr, field.unwrap_or(VALUE_REF)).map_err(crate::Error::from)?;
    let ast = parse(&rewritten)?;
    Ok(AstOutput { rewritten, ast })
}

/// Description of a registered function
#[derive(Debug, Serialize)]
pub struct FunctionInfo {
    pub name: String,
    /// `None` when the function accepts any arguments
    pub arg_types: Option<Vec<String>>,
    pub err_codes: Vec<ErrCode>,
}

pub fn functions(registry: &Registry) -> Vec<FunctionInfo> {
    registry
        .names()
        .into_iter()
        .filter_map(|name| {
            let f = registry.get(name)?;
            Some(FunctionInfo {
                name: name.to_string(),
                arg_types: f
                    .arg_types()
                    .map(|types| types.iter().map(ToString::to_string).collect()),
                err_codes: f.err_codes(),
            })
        })
        .collect()
}

/// One line per function: `name(arg, ...)  code, ...`
pub fn functions_text(registry: &Registry) -> String {
    let mut out = String::new();
    for info in functions(registry) {
        let args = match &info.arg_types {
            Some(types) => types.join(", "),
            None => "...".to_string(),
        };
        let signature = format!("{}({})", info.name, args);
        let codes: Vec<&str> = info.err_codes.iter().map(ErrCode::as_str).collect();
        let _ = writeln!(out, "{:<20}{}", signature, codes.join(", "));
    }
    out
}
