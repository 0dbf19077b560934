use std::fmt;

/// The kind of a lexical token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Special
    /// End of input
    Eof,

    /// Illegal input; the token literal describes the problem
    ///
    /// # Examples
    /// ```text
    /// $
    /// 'unterminated
    /// 012
    /// ```
    Illegal,

    // Delimiters and operators
    /// Left parenthesis for grouping or function calls
    LParen,

    /// Right parenthesis
    RParen,

    /// Comma separating function arguments
    Comma,

    /// Logical AND
    ///
    /// # Examples
    /// ```text
    /// required() && email()
    /// ```
    And,

    /// Logical NOT
    ///
    /// # Examples
    /// ```text
    /// !eq('GB')
    /// ```
    Not,

    /// Logical OR
    ///
    /// # Examples
    /// ```text
    /// isbn10() || isbn13()
    /// ```
    Or,

    // Identifiers and literals
    /// Function name
    ///
    /// Must start with a lowercase letter, followed by letters, digits, or underscores.
    ///
    /// # Examples
    /// ```text
    /// required
    /// one_of
    /// isbn13
    /// ```
    Ident,

    /// String literal enclosed in single quotes
    ///
    /// # Examples
    /// ```text
    /// 'GB'
    /// 'hello world'
    /// ```
    String,

    /// Floating-point number
    ///
    /// # Examples
    /// ```text
    /// 3.14
    /// -0.5
    /// ```
    Float,

    /// Integer
    ///
    /// # Examples
    /// ```text
    /// 42
    /// +7
    /// -10
    /// ```
    Integer,

    /// Field reference, a dotted path into the validated value
    ///
    /// # Examples
    /// ```text
    /// .Email
    /// .Address.City
    /// ```
    FieldRef,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Eof => "EOF",
            TokenKind::Illegal => "ILLEGAL",
            TokenKind::LParen => "LPAREN",
            TokenKind::RParen => "RPAREN",
            TokenKind::Comma => "COMMA",
            TokenKind::And => "LAND",
            TokenKind::Not => "LNOT",
            TokenKind::Or => "LOR",
            TokenKind::Ident => "IDENT",
            TokenKind::String => "STRING",
            TokenKind::Float => "FLOAT",
            TokenKind::Integer => "INT",
            TokenKind::FieldRef => "FIELDREF",
        };
        f.write_str(name)
    }
}

/// A token produced by the [`Scanner`](crate::scanner::Scanner).
///
/// `start` is the character offset of the first character of the token and
/// `end` the offset one past its last character. String literals exclude the
/// surrounding quotes; illegal tokens carry a description of the problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub literal: String,
    pub start: usize,
    pub end: usize,
}

impl Token {
    pub fn new(kind: TokenKind, literal: impl Into<String>, start: usize, end: usize) -> Self {
        Token {
            kind,
            literal: literal.into(),
            start,
            end,
        }
    }

    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pos = format!("{}-{}", self.start, self.end);
        write!(f, "{:<10}{:<10} {}", pos, self.kind.to_string(), self.literal)
    }
}
