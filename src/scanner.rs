use crate::ast::{Token, TokenKind};

/// Single-pass scanner for validation expressions.
///
/// The scanner never fails: malformed input produces a [`TokenKind::Illegal`]
/// token whose literal describes the problem. After an illegal token or the
/// end of input every further call to [`Scanner::scan`] returns
/// [`TokenKind::Eof`].
///
/// Expressions are single-line: input containing a carriage return or line
/// feed scans as a lone illegal token.
pub struct Scanner {
    input: Vec<char>,
    position: usize,
    done: bool,
    exhausted: bool,
    line_break: Option<usize>,
}

impl Scanner {
    pub fn new(input: &str) -> Self {
        let input: Vec<char> = input.chars().collect();
        let line_break = input.iter().position(|&c| c == '\r' || c == '\n');
        Scanner {
            input,
            position: 0,
            done: false,
            exhausted: false,
            line_break,
        }
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_char(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    fn single(&mut self, kind: TokenKind, literal: &str) -> Token {
        let start = self.position;
        self.advance();
        Token::new(kind, literal, start, self.position)
    }

    fn illegal(&mut self, message: impl Into<String>, start: usize) -> Token {
        self.done = true;
        Token::new(TokenKind::Illegal, message, start, self.position)
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.current_char() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Returns the next token.
    pub fn next_token(&mut self) -> Token {
        if self.done {
            return Token::new(TokenKind::Eof, "", self.position, self.position);
        }
        if let Some(at) = self.line_break.take() {
            self.position = at + 1;
            return self.illegal("illegal multiple lines", at);
        }

        self.skip_whitespace();

        let start = self.position;
        match self.current_char() {
            None => {
                self.done = true;
                Token::new(TokenKind::Eof, "", start, start)
            }
            Some('(') => self.single(TokenKind::LParen, "("),
            Some(')') => self.single(TokenKind::RParen, ")"),
            Some(',') => self.single(TokenKind::Comma, ","),
            Some('!') => self.single(TokenKind::Not, "!"),
            Some('&') => self.scan_operator('&', TokenKind::And),
            Some('|') => self.scan_operator('|', TokenKind::Or),
            Some('\'') => self.scan_string(),
            Some('.') => self.scan_field_ref(),
            Some(ch) if ch.is_lowercase() => self.scan_ident(),
            Some(ch) if ch.is_ascii_digit() || ch == '+' || ch == '-' => self.scan_number(),
            Some(ch) => {
                self.advance();
                self.illegal(format!("illegal character {:?}", ch), start)
            }
        }
    }

    /// `&&` and `||`: the operator character must be doubled.
    fn scan_operator(&mut self, op: char, kind: TokenKind) -> Token {
        let start = self.position;
        self.advance();
        match self.current_char() {
            Some(ch) if ch == op => {
                self.advance();
                Token::new(kind, format!("{op}{op}"), start, self.position)
            }
            Some(ch) => {
                self.advance();
                self.illegal(format!("illegal operator \"{op}{ch}\""), start)
            }
            None => self.illegal(format!("illegal operator \"{op}\""), start),
        }
    }

    fn scan_string(&mut self) -> Token {
        let start = self.position;
        let mut literal = String::new();
        self.advance(); // Consume opening quote

        while let Some(ch) = self.current_char() {
            match ch {
                '\'' => {
                    self.advance();
                    return Token::new(TokenKind::String, literal, start, self.position);
                }
                c if c.is_control() => {
                    return self.illegal(format!("illegal string character {:?}", c), start);
                }
                c => {
                    literal.push(c);
                    self.advance();
                }
            }
        }

        self.illegal(format!("unterminated string \"'{}\"", literal), start)
    }

    fn scan_field_ref(&mut self) -> Token {
        let start = self.position;
        let mut literal = String::from('.');
        self.advance(); // Consume leading '.'

        match self.current_char() {
            Some(ch) if ch.is_alphabetic() || ch == '_' => {}
            Some(ch) if !is_terminator(ch) => {
                self.advance();
                return self.illegal(format!("illegal field reference start {:?}", ch), start);
            }
            _ => return self.illegal("empty field reference", start),
        }

        while let Some(ch) = self.current_char() {
            if is_terminator(ch) {
                break;
            }
            if !(ch.is_alphanumeric() || ch == '_' || ch == '.') {
                return self.illegal(format!("illegal field reference character {:?}", ch), start);
            }
            literal.push(ch);
            self.advance();
        }

        Token::new(TokenKind::FieldRef, literal, start, self.position)
    }

    fn scan_ident(&mut self) -> Token {
        let start = self.position;
        let mut literal = String::new();

        while let Some(ch) = self.current_char() {
            if ch == '(' || is_terminator(ch) {
                break;
            }
            if !(ch.is_alphanumeric() || ch == '_') {
                return self.illegal(format!("illegal identifier character {:?}", ch), start);
            }
            literal.push(ch);
            self.advance();
        }

        Token::new(TokenKind::Ident, literal, start, self.position)
    }

    fn scan_number(&mut self) -> Token {
        let start = self.position;
        let mut literal = String::new();
        let mut is_float = false;

        while let Some(ch) = self.current_char() {
            match ch {
                c if is_terminator(c) => break,
                '+' | '-' => {
                    literal.push(ch);
                    self.advance();
                    if literal.len() > 1 {
                        return self.illegal(format!("illegal numeric value {:?}", literal), start);
                    }
                }
                '.' => {
                    if is_float {
                        return self.illegal("numbers cannot have multiple decimal separators", start);
                    }
                    is_float = true;
                    literal.push(ch);
                    self.advance();
                }
                '0' if !is_float
                    && !literal.chars().any(|c| c.is_ascii_digit())
                    && self.peek_char(1).is_some_and(|c| c.is_ascii_digit()) =>
                {
                    return self.illegal("integer numbers cannot begin with 0", start);
                }
                c if c.is_ascii_digit() => {
                    literal.push(c);
                    self.advance();
                }
                c => {
                    self.advance();
                    return self.illegal(format!("illegal digit {:?}", c), start);
                }
            }
        }

        let kind = if is_float {
            TokenKind::Float
        } else {
            TokenKind::Integer
        };
        Token::new(kind, literal, start, self.position)
    }
}

/// Characters that end a field reference, identifier or number.
fn is_terminator(ch: char) -> bool {
    matches!(ch, ',' | ')' | ' ' | '\t')
}

impl Iterator for Scanner {
    type Item = Token;

    /// Yields every token up to and including the first end-of-input.
    fn next(&mut self) -> Option<Token> {
        if self.exhausted {
            return None;
        }
        let token = self.next_token();
        if token.is_eof() {
            self.exhausted = true;
        }
        Some(token)
    }
}

#[test]
fn test_positions() {
    let mut scanner = Scanner::new("fn(.A, 'x')");
    let tokens: Vec<_> = std::iter::from_fn(|| Some(scanner.next_token()))
        .take_while(|t| !t.is_eof())
        .map(|t| (t.kind, t.start, t.end))
        .collect();
    assert_eq!(
        tokens,
        vec![
            (TokenKind::Ident, 0, 2),
            (TokenKind::LParen, 2, 3),
            (TokenKind::FieldRef, 3, 5),
            (TokenKind::Comma, 5, 6),
            (TokenKind::String, 7, 10),
            (TokenKind::RParen, 10, 11),
        ]
    );
}

#[test]
fn test_done_after_illegal() {
    let mut scanner = Scanner::new("$ fn()");
    assert_eq!(scanner.next_token().kind, TokenKind::Illegal);
    assert_eq!(scanner.next_token().kind, TokenKind::Eof);
    assert_eq!(scanner.next_token().kind, TokenKind::Eof);
}
