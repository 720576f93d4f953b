//! Recursive-descent parser (spec.md §4.2).
//!
//! Grounded on the teacher's hand-rolled `FromTokens`/`ParseState` shape in
//! `src/parser.rs` and `src/parser/mod.rs` (a `Peekable`-token cursor, one
//! parse function per grammar rule) rather than the teacher's later
//! PEG-generator (`pest`) or parser-combinator rewrites — spec.md's grammar
//! is given as an explicit recursive-descent contract with one token of
//! lookahead, so that's the shape this keeps.

use crate::ast::{AssignOp, BinaryOp, Expr, Stmt, UnaryOp};
use crate::error::{GlintError, ParseError, Position};
use crate::lexer::{Lexer, Token, TokenKind};

/// Both lexing and parsing happen inside this recursive descent (the
/// grammar asks the lexer for the next token on demand), so a failure
/// during either phase has to keep its own classification: `GlintError`
/// lets a `LexError` surfacing mid-parse stay a LexicalError rather than
/// being relabeled a SyntaxError.
type PResult<T> = Result<T, GlintError>;

pub struct Parser<'a> {
    lexer: Lexer<'a>,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str) -> PResult<Self> {
        let lexer = Lexer::new(source)?;
        Ok(Self { lexer })
    }

    pub fn parse_program(&mut self) -> PResult<Vec<Stmt>> {
        let mut statements = vec![];
        while self.peek().kind != TokenKind::EndOfInput {
            statements.push(self.statement()?);
        }
        Ok(statements)
    }

    // ---- token plumbing ----

    fn peek(&self) -> &Token {
        self.lexer.peek()
    }

    fn peek_kind(&self) -> TokenKind {
        self.lexer.peek().kind
    }

    fn position(&self) -> Position {
        self.lexer.peek().position()
    }

    fn bump(&mut self) -> PResult<Token> {
        Ok(self.lexer.advance()?)
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.peek_kind() == kind
    }

    fn expect(&mut self, kind: TokenKind, what: &str) -> PResult<Token> {
        if self.check(kind) {
            self.bump()
        } else {
            let tok = self.peek().clone();
            Err(ParseError::new(
                format!("expected {what}, found '{}'", tok.lexeme_or_kind()),
                tok.position(),
            )
            .into())
        }
    }

    // ---- statements ----

    fn statement(&mut self) -> PResult<Stmt> {
        match self.peek_kind() {
            TokenKind::If => self.if_statement(true),
            TokenKind::While => self.while_statement(),
            TokenKind::For => self.for_statement(),
            TokenKind::Return => self.return_statement(),
            TokenKind::Break => {
                let pos = self.position();
                self.bump()?;
                Ok(Stmt::Break(pos))
            }
            TokenKind::Continue => {
                let pos = self.position();
                self.bump()?;
                Ok(Stmt::Continue(pos))
            }
            _ => Ok(Stmt::Expression(self.expression()?)),
        }
    }

    /// Parses statements until one of `terminators` is the lookahead kind.
    /// Unexpected end-of-input inside a block is a SyntaxError.
    fn block(&mut self, terminators: &[TokenKind]) -> PResult<Vec<Stmt>> {
        let mut statements = vec![];
        loop {
            let kind = self.peek_kind();
            if terminators.contains(&kind) {
                break;
            }
            if kind == TokenKind::EndOfInput {
                return Err(ParseError::new(
                    "unexpected end of input inside block",
                    self.position(),
                )
                .into());
            }
            statements.push(self.statement()?);
        }
        Ok(statements)
    }

    /// Parses an `if`. `consume_end` is false for an `else if` tail, whose
    /// closing `end if` belongs to the outermost `if` in the chain.
    fn if_statement(&mut self, consume_end: bool) -> PResult<Stmt> {
        self.expect(TokenKind::If, "'if'")?;
        let condition = self.expression()?;
        self.expect(TokenKind::Then, "'then'")?;
        let then_body = self.block(&[TokenKind::Else, TokenKind::End])?;

        let else_body = if self.check(TokenKind::Else) {
            self.bump()?;
            if self.check(TokenKind::If) {
                Some(vec![self.if_statement(false)?])
            } else {
                Some(self.block(&[TokenKind::End])?)
            }
        } else {
            None
        };

        if consume_end {
            self.expect(TokenKind::End, "'end'")?;
            self.expect(TokenKind::If, "'if' after 'end'")?;
        }

        Ok(Stmt::If {
            condition,
            then_body,
            else_body,
        })
    }

    fn while_statement(&mut self) -> PResult<Stmt> {
        self.expect(TokenKind::While, "'while'")?;
        let condition = self.expression()?;
        let body = self.block(&[TokenKind::End])?;
        self.expect(TokenKind::End, "'end'")?;
        self.expect(TokenKind::While, "'while' after 'end'")?;
        Ok(Stmt::While { condition, body })
    }

    fn for_statement(&mut self) -> PResult<Stmt> {
        self.expect(TokenKind::For, "'for'")?;
        let var_tok = self.expect(TokenKind::Identifier, "loop variable")?;
        self.expect(TokenKind::In, "'in'")?;
        let iterable = self.expression()?;
        let body = self.block(&[TokenKind::End])?;
        self.expect(TokenKind::End, "'end'")?;
        self.expect(TokenKind::For, "'for' after 'end'")?;
        Ok(Stmt::For {
            var: var_tok.lexeme,
            iterable,
            body,
        })
    }

    fn return_statement(&mut self) -> PResult<Stmt> {
        let pos = self.position();
        self.bump()?;
        let value = if starts_expression(self.peek_kind()) {
            Some(self.expression()?)
        } else {
            None
        };
        Ok(Stmt::Return(value, pos))
    }

    // ---- expressions, precedence ladder ----

    fn expression(&mut self) -> PResult<Expr> {
        self.assignment()
    }

    fn assignment(&mut self) -> PResult<Expr> {
        let target = self.or_expr()?;

        let Some(op) = assign_op(self.peek_kind()) else {
            return Ok(target);
        };
        let position = self.position();
        self.bump()?;

        let Expr::Variable(name, _) = target else {
            return Err(ParseError::new("invalid assignment target", position).into());
        };

        let right = self.assignment()?;
        Ok(Expr::Assign {
            name,
            op,
            right: Box::new(right),
            position,
        })
    }

    fn or_expr(&mut self) -> PResult<Expr> {
        let mut left = self.and_expr()?;
        while self.check(TokenKind::Or) {
            let position = self.position();
            self.bump()?;
            let right = self.and_expr()?;
            left = Expr::Binary {
                op: BinaryOp::Or,
                left: Box::new(left),
                right: Box::new(right),
                position,
            };
        }
        Ok(left)
    }

    fn and_expr(&mut self) -> PResult<Expr> {
        let mut left = self.equality()?;
        while self.check(TokenKind::And) {
            let position = self.position();
            self.bump()?;
            let right = self.equality()?;
            left = Expr::Binary {
                op: BinaryOp::And,
                left: Box::new(left),
                right: Box::new(right),
                position,
            };
        }
        Ok(left)
    }

    fn equality(&mut self) -> PResult<Expr> {
        let mut left = self.comparison()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::EqualEqual => BinaryOp::Eq,
                TokenKind::BangEqual => BinaryOp::NotEq,
                _ => break,
            };
            let position = self.position();
            self.bump()?;
            let right = self.comparison()?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
                position,
            };
        }
        Ok(left)
    }

    fn comparison(&mut self) -> PResult<Expr> {
        let mut left = self.term()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Less => BinaryOp::Less,
                TokenKind::LessEqual => BinaryOp::LessEq,
                TokenKind::Greater => BinaryOp::Greater,
                TokenKind::GreaterEqual => BinaryOp::GreaterEq,
                _ => break,
            };
            let position = self.position();
            self.bump()?;
            let right = self.term()?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
                position,
            };
        }
        Ok(left)
    }

    fn term(&mut self) -> PResult<Expr> {
        let mut left = self.factor()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => break,
            };
            let position = self.position();
            self.bump()?;
            let right = self.factor()?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
                position,
            };
        }
        Ok(left)
    }

    fn factor(&mut self) -> PResult<Expr> {
        let mut left = self.unary()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                TokenKind::Percent => BinaryOp::Mod,
                TokenKind::Caret => BinaryOp::Pow,
                _ => break,
            };
            let position = self.position();
            self.bump()?;
            let right = self.unary()?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
                position,
            };
        }
        Ok(left)
    }

    fn unary(&mut self) -> PResult<Expr> {
        match self.peek_kind() {
            TokenKind::Not => {
                let position = self.position();
                self.bump()?;
                let operand = self.unary()?;
                Ok(Expr::Unary {
                    op: UnaryOp::Not,
                    operand: Box::new(operand),
                    position,
                })
            }
            TokenKind::Minus => {
                let position = self.position();
                self.bump()?;
                let operand = self.unary()?;
                Ok(Expr::Unary {
                    op: UnaryOp::Neg,
                    operand: Box::new(operand),
                    position,
                })
            }
            TokenKind::Plus => {
                let tok = self.peek().clone();
                Err(ParseError::new("unary '+' is not supported", tok.position()).into())
            }
            _ => self.postfix(),
        }
    }

    fn postfix(&mut self) -> PResult<Expr> {
        let mut expr = self.primary()?;
        loop {
            match self.peek_kind() {
                TokenKind::LParen => {
                    let position = self.position();
                    self.bump()?;
                    let mut args = vec![];
                    if !self.check(TokenKind::RParen) {
                        args.push(self.expression()?);
                        while self.check(TokenKind::Comma) {
                            self.bump()?;
                            args.push(self.expression()?);
                        }
                    }
                    self.expect(TokenKind::RParen, "')'")?;
                    expr = Expr::Call {
                        callee: Box::new(expr),
                        args,
                        position,
                    };
                }
                TokenKind::LBracket => {
                    expr = self.index_or_slice(expr)?;
                }
                _ => break,
            }
        }
        Ok(expr)
    }

    fn index_or_slice(&mut self, object: Expr) -> PResult<Expr> {
        let position = self.position();
        self.bump()?; // '['

        if self.check(TokenKind::Colon) {
            self.bump()?;
            let to = if self.check(TokenKind::RBracket) {
                None
            } else {
                Some(Box::new(self.expression()?))
            };
            self.expect(TokenKind::RBracket, "']'")?;
            return Ok(Expr::Slice {
                object: Box::new(object),
                from: None,
                to,
                position,
            });
        }

        let first = self.expression()?;

        if self.check(TokenKind::Colon) {
            self.bump()?;
            let to = if self.check(TokenKind::RBracket) {
                None
            } else {
                Some(Box::new(self.expression()?))
            };
            self.expect(TokenKind::RBracket, "']'")?;
            return Ok(Expr::Slice {
                object: Box::new(object),
                from: Some(Box::new(first)),
                to,
                position,
            });
        }

        self.expect(TokenKind::RBracket, "']'")?;
        Ok(Expr::Index {
            object: Box::new(object),
            index: Box::new(first),
            position,
        })
    }

    fn primary(&mut self) -> PResult<Expr> {
        let tok = self.peek().clone();
        match tok.kind {
            TokenKind::Number => {
                self.bump()?;
                let value: f64 = tok.lexeme.parse().map_err(|_| {
                    GlintError::from(ParseError::new(
                        format!("invalid number literal '{}'", tok.lexeme),
                        tok.position(),
                    ))
                })?;
                Ok(Expr::Number(value, tok.position()))
            }
            TokenKind::String => {
                self.bump()?;
                let position = tok.position();
                Ok(Expr::Str(tok.lexeme, position))
            }
            TokenKind::Boolean => {
                self.bump()?;
                Ok(Expr::Boolean(tok.lexeme == "true", tok.position()))
            }
            TokenKind::Nil => {
                self.bump()?;
                Ok(Expr::Nil(tok.position()))
            }
            TokenKind::Identifier => {
                self.bump()?;
                let position = tok.position();
                Ok(Expr::Variable(tok.lexeme, position))
            }
            TokenKind::LBracket => {
                self.bump()?;
                let mut elements = vec![];
                if !self.check(TokenKind::RBracket) {
                    elements.push(self.expression()?);
                    while self.check(TokenKind::Comma) {
                        self.bump()?;
                        elements.push(self.expression()?);
                    }
                }
                self.expect(TokenKind::RBracket, "']'")?;
                Ok(Expr::List {
                    elements,
                    position: tok.position(),
                })
            }
            TokenKind::Function => {
                self.bump()?;
                self.expect(TokenKind::LParen, "'('")?;
                let mut params = vec![];
                if !self.check(TokenKind::RParen) {
                    let p = self.expect(TokenKind::Identifier, "parameter name")?;
                    params.push(p.lexeme);
                    while self.check(TokenKind::Comma) {
                        self.bump()?;
                        let p = self.expect(TokenKind::Identifier, "parameter name")?;
                        params.push(p.lexeme);
                    }
                }
                self.expect(TokenKind::RParen, "')'")?;
                let body = self.block(&[TokenKind::End])?;
                self.expect(TokenKind::End, "'end'")?;
                self.expect(TokenKind::Function, "'function' after 'end'")?;
                Ok(Expr::Function {
                    params,
                    body,
                    position: tok.position(),
                })
            }
            TokenKind::LParen => {
                self.bump()?;
                let inner = self.expression()?;
                self.expect(TokenKind::RParen, "')'")?;
                Ok(inner)
            }
            _ => Err(ParseError::new(
                format!("unexpected token '{}' in expression", tok.lexeme_or_kind()),
                tok.position(),
            )
            .into()),
        }
    }
}

fn assign_op(kind: TokenKind) -> Option<AssignOp> {
    Some(match kind {
        TokenKind::Equal => AssignOp::Set,
        TokenKind::PlusEqual => AssignOp::AddSet,
        TokenKind::MinusEqual => AssignOp::SubSet,
        TokenKind::StarEqual => AssignOp::MulSet,
        TokenKind::SlashEqual => AssignOp::DivSet,
        TokenKind::PercentEqual => AssignOp::ModSet,
        TokenKind::CaretEqual => AssignOp::PowSet,
        _ => return None,
    })
}

fn starts_expression(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Number
            | TokenKind::String
            | TokenKind::Boolean
            | TokenKind::Nil
            | TokenKind::Identifier
            | TokenKind::LBracket
            | TokenKind::LParen
            | TokenKind::Function
            | TokenKind::Not
            | TokenKind::Minus
    )
}

impl Token {
    fn lexeme_or_kind(&self) -> String {
        if self.kind == TokenKind::EndOfInput {
            "end of input".to_string()
        } else {
            self.lexeme.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> Vec<Stmt> {
        Parser::new(source).unwrap().parse_program().unwrap()
    }

    #[test]
    fn empty_program_parses_to_no_statements() {
        assert!(parse("").is_empty());
    }

    #[test]
    fn nested_parens_around_identifier() {
        let stmts = parse("(((x)))");
        assert!(matches!(
            stmts.as_slice(),
            [Stmt::Expression(Expr::Variable(name, _))] if name == "x"
        ));
    }

    #[test]
    fn assignment_target_must_be_identifier() {
        let err = Parser::new("1 = 2").unwrap().parse_program().unwrap_err();
        assert!(err.to_string().contains("invalid assignment target"));
    }

    #[test]
    fn else_if_chain_needs_one_end() {
        let stmts = parse("if a then b else if c then d else e end if");
        assert_eq!(stmts.len(), 1);
        assert!(matches!(stmts[0], Stmt::If { .. }));
    }

    #[test]
    fn slice_with_no_from() {
        let stmts = parse("s[:4]");
        assert!(matches!(
            &stmts[0],
            Stmt::Expression(Expr::Slice { from: None, to: Some(_), .. })
        ));
    }

    #[test]
    fn index_vs_slice_disambiguation() {
        let stmts = parse("s[1]");
        assert!(matches!(&stmts[0], Stmt::Expression(Expr::Index { .. })));
    }

    #[test]
    fn unary_plus_is_rejected() {
        assert!(Parser::new("+1").unwrap().parse_program().is_err());
    }

    #[test]
    fn two_statements_with_no_separator() {
        let stmts = parse("a = 0 b = 1");
        assert_eq!(stmts.len(), 2);
    }

    #[test]
    fn function_literal_with_no_params_or_body() {
        let stmts = parse("function() end function");
        assert!(matches!(
            &stmts[0],
            Stmt::Expression(Expr::Function { params, body, .. })
                if params.is_empty() && body.is_empty()
        ));
    }
}
