use std::fmt::Display;

use thiserror::Error;

use crate::ast::{
    CallExpression, Expression, ExpressionKind, IdentifierLiteral, InfixExpression,
    PrefixExpression, Program, Statement,
};
use crate::lexer::{LexError, Lexer};
use crate::span::{Span, WithSpan};
use crate::token::{Token, TokenKind};

/// Something the parser would have accepted at the position of an error.
#[derive(Debug, Clone, PartialEq)]
pub enum Expected {
    /// Any token of the given kind (e.g. any number)
    Kind(TokenKind),
    /// This exact token (e.g. `)`)
    Token(Token),
    /// A line break separating two statements
    Newline,
}

impl Display for Expected {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expected::Kind(kind) => write!(f, "{}", kind),
            Expected::Token(token) => write!(f, "\"{}\"", token),
            Expected::Newline => write!(f, "newline"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error("unexpected {}, expected {}", describe_found(&.found.value), describe_expected(.expected))]
    Unexpected {
        found: WithSpan<Token>,
        expected: Vec<Expected>,
    },
}

impl ParseError {
    pub fn span(&self) -> Span {
        match self {
            ParseError::Lex(error) => error.span(),
            ParseError::Unexpected { found, .. } => found.span,
        }
    }

    /// What would have been accepted instead (empty for lexical errors).
    pub fn expected(&self) -> &[Expected] {
        match self {
            ParseError::Lex(_) => &[],
            ParseError::Unexpected { expected, .. } => expected,
        }
    }

    /// Whether parsing failed only because the input ended too early.
    pub fn is_incomplete(&self) -> bool {
        matches!(self, ParseError::Unexpected { found, .. } if found.value == Token::Eof)
    }
}

fn describe_found(token: &Token) -> String {
    match token {
        Token::Eof => TokenKind::End.to_string(),
        token => format!("{} \"{}\"", token.kind(), token),
    }
}

fn describe_expected(expected: &[Expected]) -> String {
    match expected {
        [] => "nothing".to_owned(),
        [single] => single.to_string(),
        many => format!(
            "one of {}",
            many.iter()
                .map(|e| e.to_string())
                .collect::<Vec<String>>()
                .join(", ")
        ),
    }
}

pub type ParseResult<T> = Result<T, ParseError>;

/// Lex and parse a whole program (one statement per line).
pub fn parse_program(source: &str) -> ParseResult<Program> {
    Parser::new(Lexer::new(source))?.parse_program()
}

/// Lex and parse exactly one statement.
pub fn parse_statement(source: &str) -> ParseResult<Statement> {
    Parser::new(Lexer::new(source))?.parse_statement()
}

/// Recursive descent parser over a fully lexed token stream.
///
/// Every time the parser looks for a token and does not find it, that token is
/// remembered in `expected`; consuming a token clears the set. Errors therefore
/// report everything that was acceptable at the offending token.
pub struct Parser {
    tokens: Vec<WithSpan<Token>>,
    position: usize,
    expected: Vec<Expected>,
    statement_start: usize,
    previous_end_line: usize,
}

impl Parser {
    pub fn new(lexer: Lexer<'_>) -> ParseResult<Parser> {
        Ok(Parser::from_tokens(lexer.tokenize()?))
    }

    pub fn from_tokens(mut tokens: Vec<WithSpan<Token>>) -> Parser {
        let needs_eof = tokens.last().map_or(true, |token| token.value != Token::Eof);
        if needs_eof {
            let span = tokens.last().map_or(Span::empty(), |token| token.span);
            tokens.push(WithSpan::new(Token::Eof, span));
        }

        Parser {
            tokens,
            position: 0,
            expected: Vec::new(),
            statement_start: 0,
            previous_end_line: 0,
        }
    }

    pub fn parse_program(&mut self) -> ParseResult<Program> {
        let mut program = Program::new();

        while self.current().value != Token::Eof {
            program.statements.push(self.parse_any_statement()?);

            let next = self.current();
            if next.value != Token::Eof && next.span.line() <= self.previous_end_line {
                self.expect_more(Expected::Kind(TokenKind::End));
                self.expect_more(Expected::Newline);
                return Err(self.error());
            }
        }

        Ok(program)
    }

    pub fn parse_statement(&mut self) -> ParseResult<Statement> {
        let statement = self.parse_any_statement()?;

        if self.current().value != Token::Eof {
            self.expect_more(Expected::Kind(TokenKind::End));
            return Err(self.error());
        }

        Ok(statement)
    }

    fn parse_any_statement(&mut self) -> ParseResult<Statement> {
        self.statement_start = self.position;

        if self.check(&Token::Print) {
            return self.parse_print_statement();
        }

        match self.current().value {
            Token::Identifier(_) if self.peek_is(&Token::Equal) => self.parse_assignment(),
            _ => self.parse_expression_statement(),
        }
    }

    fn parse_assignment(&mut self) -> ParseResult<Statement> {
        let (identifier, name_span) = self.expect_identifier()?;

        self.expect(&Token::Equal)?;
        let value = self.parse_expression()?;

        Ok(Statement::Assignment {
            name: identifier,
            span: name_span.to(value.span),
            value,
        })
    }

    fn parse_print_statement(&mut self) -> ParseResult<Statement> {
        let keyword = self.advance();

        self.expect(&Token::LeftParen)?;
        let argument = self.parse_expression()?;
        let close = self.expect(&Token::RightParen)?;

        Ok(Statement::Print {
            argument,
            span: keyword.span.to(close.span),
        })
    }

    fn parse_expression_statement(&mut self) -> ParseResult<Statement> {
        let expression = self.parse_expression()?;
        Ok(Statement::Expression { expression })
    }

    /// expr := term (("+"|"-") term)*
    fn parse_expression(&mut self) -> ParseResult<Expression> {
        let mut left = self.parse_term()?;

        while let Some(operator) = self.eat_any(&[Token::Plus, Token::Minus]) {
            let right = self.parse_term()?;
            left = infix(left, operator, right);
        }

        Ok(left)
    }

    /// term := unary (("*"|"/") unary)*
    fn parse_term(&mut self) -> ParseResult<Expression> {
        let mut left = self.parse_unary()?;

        while let Some(operator) = self.eat_any(&[Token::Star, Token::Slash]) {
            let right = self.parse_unary()?;
            left = infix(left, operator, right);
        }

        Ok(left)
    }

    /// unary := "-" unary | factor
    fn parse_unary(&mut self) -> ParseResult<Expression> {
        match self.eat(&Token::Minus) {
            Some(operator) => {
                let right = self.parse_unary()?;
                let span = operator.span.to(right.span);
                Ok(Expression::new(
                    ExpressionKind::Prefix(Box::new(PrefixExpression { operator, right })),
                    span,
                ))
            }
            None => self.parse_factor(),
        }
    }

    /// factor := NUMBER | STRING | IDENTIFIER | call | "(" expr ")"
    fn parse_factor(&mut self) -> ParseResult<Expression> {
        let kind = match &self.current().value {
            Token::Integer(value) => ExpressionKind::Integer(*value),
            Token::Float(value) => ExpressionKind::Float(*value),
            Token::String(value) => ExpressionKind::String(value.clone()),
            Token::Identifier(_) => return self.parse_identifier_or_call(),
            Token::LeftParen => return self.parse_grouped_expression(),
            _ => {
                self.expect_more(Expected::Kind(TokenKind::Number));
                self.expect_more(Expected::Kind(TokenKind::String));
                self.expect_more(Expected::Kind(TokenKind::Identifier));
                self.expect_more(Expected::Token(Token::LeftParen));
                return Err(self.error());
            }
        };

        let token = self.advance();
        Ok(Expression::new(kind, token.span))
    }

    fn parse_identifier_or_call(&mut self) -> ParseResult<Expression> {
        let (identifier, name_span) = self.expect_identifier()?;

        // A statement made of a lone identifier could also have been an assignment
        if self.position == self.statement_start + 1 {
            self.expect_more(Expected::Token(Token::Equal));
        }

        if self.eat(&Token::LeftParen).is_none() {
            return Ok(Expression::new(
                ExpressionKind::Identifier(identifier),
                name_span,
            ));
        }

        let (arguments, close) = self.parse_call_arguments()?;

        Ok(Expression::new(
            ExpressionKind::Call(Box::new(CallExpression {
                function: identifier,
                arguments,
            })),
            name_span.to(close),
        ))
    }

    /// Parse `(expr ("," expr)*)? ")"`, the opening parenthesis already consumed.
    fn parse_call_arguments(&mut self) -> ParseResult<(Vec<Expression>, Span)> {
        let mut arguments = Vec::new();

        if let Some(close) = self.eat(&Token::RightParen) {
            return Ok((arguments, close.span));
        }

        loop {
            arguments.push(self.parse_expression()?);

            if self.eat(&Token::Comma).is_none() {
                let close = self.expect(&Token::RightParen)?;
                return Ok((arguments, close.span));
            }
        }
    }

    /// A parenthesized expression is located at its opening parenthesis.
    fn parse_grouped_expression(&mut self) -> ParseResult<Expression> {
        let open = self.advance();
        let mut expression = self.parse_expression()?;
        let close = self.expect(&Token::RightParen)?;

        expression.span = open.span.to(close.span);
        Ok(expression)
    }

    fn current(&self) -> &WithSpan<Token> {
        // `from_tokens` guarantees a trailing Eof, which is never stepped over
        &self.tokens[self.position.min(self.tokens.len() - 1)]
    }

    fn peek_is(&self, token: &Token) -> bool {
        self.tokens
            .get(self.position + 1)
            .map_or(false, |next| next.value.same_variant(token))
    }

    /// Consume the current token.
    fn advance(&mut self) -> WithSpan<Token> {
        let token = self.current().clone();

        if token.value != Token::Eof {
            self.position += 1;
        }
        self.expected.clear();
        self.previous_end_line = end_line(&token);

        token
    }

    fn expect_more(&mut self, expected: Expected) {
        if !self.expected.contains(&expected) {
            self.expected.push(expected);
        }
    }

    /// Whether the current token is the given one (payload ignored), remembering it as expected if not.
    fn check(&mut self, token: &Token) -> bool {
        if self.current().value.same_variant(token) {
            true
        } else {
            self.expect_more(Expected::Token(token.clone()));
            false
        }
    }

    fn eat(&mut self, token: &Token) -> Option<WithSpan<Token>> {
        if self.check(token) {
            Some(self.advance())
        } else {
            None
        }
    }

    fn eat_any(&mut self, tokens: &[Token]) -> Option<WithSpan<Token>> {
        tokens.iter().find_map(|token| self.eat(token))
    }

    fn expect_identifier(&mut self) -> ParseResult<(IdentifierLiteral, Span)> {
        match self.current().value.clone() {
            Token::Identifier(name) => {
                let token = self.advance();
                Ok((IdentifierLiteral::from(name), token.span))
            }
            _ => {
                self.expect_more(Expected::Kind(TokenKind::Identifier));
                Err(self.error())
            }
        }
    }

    fn expect(&mut self, token: &Token) -> ParseResult<WithSpan<Token>> {
        self.eat(token).ok_or_else(|| self.error())
    }

    fn error(&mut self) -> ParseError {
        ParseError::Unexpected {
            found: self.current().clone(),
            expected: std::mem::take(&mut self.expected),
        }
    }
}

fn infix(left: Expression, operator: WithSpan<Token>, right: Expression) -> Expression {
    let span = left.span.to(right.span);
    Expression::new(
        ExpressionKind::Infix(Box::new(InfixExpression {
            left,
            operator,
            right,
        })),
        span,
    )
}

/// The line a token ends on; only string literals can span several lines.
fn end_line(token: &WithSpan<Token>) -> usize {
    match &token.value {
        Token::String(value) => token.span.line() + value.matches('\n').count(),
        _ => token.span.line(),
    }
}
