use crate::{
    ast::{FunctionArg, Node, Token, TokenKind},
    error::ParseError,
    scanner::Scanner,
};

/// Recursive-descent parser for validation expressions.
///
/// ```text
/// expr := atom ( ("&&" | "||") expr )*
/// atom := "!" expr | "(" expr ")" | IDENT "(" args? ")"
/// args := arg ("," arg)*
/// arg  := FIELDREF | STRING | INT | FLOAT
/// ```
///
/// Binary operators parse the rest of the expression as their right-hand
/// side. `&&` is then rotated above a right-hand `||`, so that
/// `a() && b() || c()` yields `Or(And(a, b), c)`.
pub struct Parser {
    scanner: Scanner,
    current_token: Token,
    depth: usize,
}

/// Maximum nesting of operators and groups.
///
/// Every `&&`, `||`, `!` and group adds a level, so this also bounds the
/// length of operator chains. Trees are walked recursively, and the bound
/// keeps them shallow enough for small thread stacks.
pub const MAX_DEPTH: usize = 256;

/// Parses a complete expression.
pub fn parse(input: &str) -> Result<Node, ParseError> {
    Parser::new(Scanner::new(input)).parse()
}

impl Parser {
    pub fn new(mut scanner: Scanner) -> Self {
        let current_token = scanner.next_token();
        Parser {
            scanner,
            current_token,
            depth: 0,
        }
    }

    fn advance(&mut self) {
        self.current_token = self.scanner.next_token();
    }

    fn unexpected(&self) -> ParseError {
        match self.current_token.kind {
            TokenKind::Illegal => ParseError::Illegal {
                message: self.current_token.literal.clone(),
                position: self.current_token.start,
            },
            found => ParseError::UnexpectedToken {
                found,
                position: self.current_token.start,
            },
        }
    }

    pub fn parse(&mut self) -> Result<Node, ParseError> {
        if self.current_token.is_eof() {
            return Err(ParseError::EmptyExpression);
        }
        self.parse_expression(None)
    }

    /// Parses up to the end of input, or up to the `)` closing the group
    /// opened at `group`. The closing `)` is left for the caller.
    fn parse_expression(&mut self, group: Option<usize>) -> Result<Node, ParseError> {
        if self.depth == MAX_DEPTH {
            return Err(ParseError::TooDeep {
                limit: MAX_DEPTH,
                position: self.current_token.start,
            });
        }
        self.depth += 1;
        let result = self.parse_levels(group);
        self.depth -= 1;
        result
    }

    fn parse_levels(&mut self, group: Option<usize>) -> Result<Node, ParseError> {
        let mut node = self.parse_atom(group)?;

        loop {
            match self.current_token.kind {
                TokenKind::Eof => {
                    return match group {
                        None => Ok(node),
                        Some(position) => Err(ParseError::UnclosedGroup { position }),
                    };
                }
                TokenKind::RParen if group.is_some() => return Ok(node),
                TokenKind::And => {
                    let right = self.parse_operand(group)?;
                    node = logic_and(node, right);
                }
                TokenKind::Or => {
                    let right = self.parse_operand(group)?;
                    node = Node::or(node, right);
                }
                _ => return Err(self.unexpected()),
            }
        }
    }

    /// Consumes an operator and parses the expression it applies to.
    fn parse_operand(&mut self, group: Option<usize>) -> Result<Node, ParseError> {
        let after = self.current_token.kind;
        let position = self.current_token.start;
        self.advance();

        match self.current_token.kind {
            TokenKind::Eof | TokenKind::RParen => {
                Err(ParseError::MissingOperand { after, position })
            }
            _ => self.parse_expression(group),
        }
    }

    fn parse_atom(&mut self, group: Option<usize>) -> Result<Node, ParseError> {
        match self.current_token.kind {
            TokenKind::Not => Ok(Node::not(self.parse_operand(group)?)),
            TokenKind::LParen => {
                let position = self.current_token.start;
                self.advance();
                match self.current_token.kind {
                    TokenKind::RParen => return Err(ParseError::EmptyGroup { position }),
                    TokenKind::Eof => return Err(ParseError::UnclosedGroup { position }),
                    _ => {}
                }
                let expr = self.parse_expression(Some(position))?;
                self.advance(); // Consume ')'
                Ok(Node::group(expr))
            }
            TokenKind::Ident => self.parse_function(),
            TokenKind::Eof => Err(ParseError::EmptyExpression),
            _ => Err(self.unexpected()),
        }
    }

    fn parse_function(&mut self) -> Result<Node, ParseError> {
        let name = std::mem::take(&mut self.current_token.literal);
        self.advance();

        if self.current_token.kind != TokenKind::LParen {
            if self.current_token.kind == TokenKind::Illegal {
                return Err(self.unexpected());
            }
            return Err(ParseError::ExpectedCall {
                function: name,
                found: self.current_token.kind,
                position: self.current_token.start,
            });
        }
        self.advance();

        let mut args = Vec::new();
        if self.current_token.kind == TokenKind::RParen {
            self.advance();
            return Ok(Node::function(name, args));
        }

        loop {
            let ordinal = args.len() + 1;
            let arg = self.parse_arg(&name, ordinal)?;
            args.push(arg);
            self.advance();

            match self.current_token.kind {
                TokenKind::Comma => self.advance(),
                TokenKind::RParen => {
                    self.advance();
                    return Ok(Node::function(name, args));
                }
                _ => return Err(self.unexpected()),
            }
        }
    }

    fn parse_arg(&self, function: &str, ordinal: usize) -> Result<FunctionArg, ParseError> {
        let token = &self.current_token;
        let invalid = |reason: String| ParseError::InvalidArgument {
            function: function.to_string(),
            ordinal,
            reason,
        };

        match token.kind {
            TokenKind::FieldRef => Ok(FunctionArg::FieldRef(token.literal.clone())),
            TokenKind::String => Ok(FunctionArg::String(token.literal.clone())),
            TokenKind::Integer => token
                .literal
                .parse::<i64>()
                .map(FunctionArg::Integer)
                .map_err(|e| invalid(format!("invalid integer {:?}: {}", token.literal, e))),
            TokenKind::Float => match token.literal.parse::<f64>() {
                Ok(n) if n.is_finite() => Ok(FunctionArg::Float(n)),
                Ok(_) => Err(invalid(format!("float {:?} out of range", token.literal))),
                Err(e) => Err(invalid(format!("invalid float {:?}: {}", token.literal, e))),
            },
            TokenKind::Comma | TokenKind::RParen => Err(ParseError::MissingArgument {
                function: function.to_string(),
                ordinal,
            }),
            _ => Err(self.unexpected()),
        }
    }
}

/// Builds `left && right`, keeping `&&` above `||`.
///
/// The right-hand side was parsed as the rest of the expression, so a
/// right-hand `Or(l, r)` really means `(left && l) || r`.
fn logic_and(left: Node, right: Node) -> Node {
    match right {
        Node::LogicOr { left: l, right: r } => Node::LogicOr {
            left: Box::new(logic_and(left, *l)),
            right: r,
        },
        right => Node::and(left, right),
    }
}
