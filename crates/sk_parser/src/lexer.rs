use std::iter::Peekable;
use std::str::Chars;

use thiserror::Error;

use crate::span::{BytePos, LineCol, Span, WithSpan};
use crate::token::Token;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LexError {
    #[error("unexpected character '{character}'")]
    UnexpectedCharacter { character: char, span: Span },
    #[error("expected closing {quote} of string literal but reached end of input")]
    StringNotClosed { quote: char, span: Span },
    #[error("invalid number literal `{text}`: {reason}")]
    InvalidNumber {
        text: String,
        reason: String,
        span: Span,
    },
}

impl LexError {
    pub fn span(&self) -> Span {
        match self {
            LexError::UnexpectedCharacter { span, .. } => *span,
            LexError::StringNotClosed { span, .. } => *span,
            LexError::InvalidNumber { span, .. } => *span,
        }
    }
}

pub type LexResult<T> = Result<T, LexError>;

pub struct Lexer<'a> {
    input_iter: Peekable<Chars<'a>>,
    current_position: BytePos,
    current_location: LineCol,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Lexer<'a> {
        Lexer {
            input_iter: input.chars().peekable(),
            current_position: BytePos::new(0),
            current_location: LineCol::start(),
        }
    }

    /// Lex the whole input, up to and including the final `Eof` token.
    pub fn tokenize(mut self) -> LexResult<Vec<WithSpan<Token>>> {
        let mut tokens = Vec::new();

        loop {
            let token = self.next_token()?;
            let is_eof = token.value == Token::Eof;
            tokens.push(token);

            if is_eof {
                return Ok(tokens);
            }
        }
    }

    /// Consume the next character from the list.
    fn read_char(&mut self) -> Option<char> {
        let next = self.input_iter.next();
        if let Some(c) = next {
            self.current_position = self.current_position.shift(c);
            self.current_location = self.current_location.advance(c);
        }
        next
    }

    /// Get the next character from the list without consuming it.
    fn peek_char(&mut self) -> Option<&char> {
        self.input_iter.peek()
    }

    /// Consume whitespace until a non-whitespace character is found.
    fn skip_whitespace(&mut self) {
        while let Some(&c) = self.peek_char() {
            if c.is_whitespace() {
                self.read_char();
            } else {
                break;
            }
        }
    }

    /// Span from the given start up to the current position.
    fn span_from(&self, start: BytePos, location: LineCol) -> Span {
        Span::new(start, self.current_position, location)
    }

    /// Read the characters up to the closing quote as a string.
    /// A backslash has no special meaning.
    fn read_string(&mut self, opening: char, start: BytePos, location: LineCol) -> LexResult<Token> {
        let mut str = String::new();

        loop {
            match self.read_char() {
                Some(ch) if ch == opening => break,
                Some(ch) => str.push(ch),
                None => {
                    return Err(LexError::StringNotClosed {
                        quote: opening,
                        span: self.span_from(start, location),
                    })
                }
            }
        }

        Ok(Token::String(str))
    }

    /// Read the current and following characters as a number token.
    fn read_number(&mut self, first: char, start: BytePos, location: LineCol) -> LexResult<Token> {
        let mut seen_dot = false;

        let mut s = String::new();
        s.push(first);

        while let Some(&ch) = self.peek_char() {
            if is_digit(ch) {
                s.push(ch);
                self.read_char();
            } else if ch == '.' && !seen_dot {
                seen_dot = true;
                s.push(ch);
                self.read_char();
            } else {
                break;
            }
        }

        if seen_dot {
            s.parse()
                .map(Token::Float)
                .map_err(|error: std::num::ParseFloatError| LexError::InvalidNumber {
                    reason: error.to_string(),
                    span: self.span_from(start, location),
                    text: s.clone(),
                })
        } else {
            s.parse()
                .map(Token::Integer)
                .map_err(|error: std::num::ParseIntError| LexError::InvalidNumber {
                    reason: error.to_string(),
                    span: self.span_from(start, location),
                    text: s.clone(),
                })
        }
    }

    /// Read the current and following characters as an identifier or a keyword (if it exists).
    fn read_identifier_or_keyword(&mut self, first: char) -> Token {
        let mut identifier = String::new();
        identifier.push(first);

        while let Some(&ch) = self.peek_char() {
            if is_identifier_char(ch) {
                identifier.push(ch);
                self.read_char();
            } else {
                break;
            }
        }

        Token::lookup_keyword(&identifier).unwrap_or(Token::Identifier(identifier))
    }

    /// Read a new token from the characters list.
    pub fn next_token(&mut self) -> LexResult<WithSpan<Token>> {
        self.skip_whitespace();

        let initial_position = self.current_position;
        let initial_location = self.current_location;

        let token = if let Some(c) = self.read_char() {
            match c {
                '+' => Token::Plus,
                '-' => Token::Minus,
                '*' => Token::Star,
                '/' => Token::Slash,
                '=' => Token::Equal,

                ',' => Token::Comma,
                '(' => Token::LeftParen,
                ')' => Token::RightParen,

                '"' | '\'' => self.read_string(c, initial_position, initial_location)?,

                c if is_digit(c) => self.read_number(c, initial_position, initial_location)?,
                c if is_identifier_start(c) => self.read_identifier_or_keyword(c),

                _ => {
                    return Err(LexError::UnexpectedCharacter {
                        character: c,
                        span: self.span_from(initial_position, initial_location),
                    })
                }
            }
        } else {
            Token::Eof
        };

        let span = self.span_from(initial_position, initial_location);

        Ok(WithSpan::new(token, span))
    }
}

/// Whether or not the given character is a decimal digit
fn is_digit(c: char) -> bool {
    c.is_ascii_digit()
}

/// Whether or not the given character can start an identifier
fn is_identifier_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

/// Whether or not the given character is valid inside an identifier
fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use crate::lexer::{LexError, Lexer};
    use crate::span::{BytePos, LineCol, Span};
    use crate::token::Token;

    fn tokens(input: &str) -> Vec<Token> {
        Lexer::new(input)
            .tokenize()
            .unwrap()
            .into_iter()
            .map(|token| token.value)
            .collect()
    }

    #[test]
    fn test_operators_and_punctuation() {
        assert_eq!(
            tokens("+-*/=,()"),
            vec![
                Token::Plus,
                Token::Minus,
                Token::Star,
                Token::Slash,
                Token::Equal,
                Token::Comma,
                Token::LeftParen,
                Token::RightParen,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_identifier() {
        assert_eq!(
            tokens("hello _world _hello_world_ x1"),
            vec![
                Token::Identifier("hello".to_owned()),
                Token::Identifier("_world".to_owned()),
                Token::Identifier("_hello_world_".to_owned()),
                Token::Identifier("x1".to_owned()),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_keyword() {
        assert_eq!(
            tokens("print printer"),
            vec![
                Token::Print,
                Token::Identifier("printer".to_owned()),
                Token::Eof
            ]
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(
            tokens("012312 3.25 7."),
            vec![
                Token::Integer(12312),
                Token::Float(3.25),
                Token::Float(7.0),
                Token::Eof
            ]
        );
    }

    #[test]
    fn test_number_then_identifier() {
        assert_eq!(
            tokens("1abc"),
            vec![
                Token::Integer(1),
                Token::Identifier("abc".to_owned()),
                Token::Eof
            ]
        );
    }

    #[test]
    fn test_integer_too_large() {
        match Lexer::new("x = 99999999999999999999").tokenize() {
            Err(LexError::InvalidNumber { text, span, .. }) => {
                assert_eq!(text, "99999999999999999999");
                assert_eq!(span.location(), LineCol::new(1, 5));
            }
            result => panic!("expected invalid number error but got {:?}", result),
        }
    }

    #[test]
    fn test_string() {
        assert_eq!(
            tokens("\"foobar\" 'foo bar' \"it's\" 'a\\b'"),
            vec![
                Token::String("foobar".to_string()),
                Token::String("foo bar".to_string()),
                Token::String("it's".to_string()),
                Token::String("a\\b".to_string()),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_string_not_closed() {
        match Lexer::new("x = \"not closed").tokenize() {
            Err(LexError::StringNotClosed { quote: '"', span }) => {
                assert_eq!(span.location(), LineCol::new(1, 5));
            }
            result => panic!("expected unclosed string error for \" but got {:?}", result),
        }
    }

    #[test]
    fn test_unexpected_character() {
        let tests = vec![
            ("x = 1 % 2", '%', LineCol::new(1, 7)),
            ("a\nb = $", '$', LineCol::new(2, 5)),
            ("é", 'é', LineCol::new(1, 1)),
            ("print(1);", ';', LineCol::new(1, 9)),
        ];

        for (input, expected_char, expected_location) in tests {
            match Lexer::new(input).tokenize() {
                Err(LexError::UnexpectedCharacter { character, span }) => {
                    assert_eq!(character, expected_char);
                    assert_eq!(span.location(), expected_location);
                }
                result => panic!("expected unexpected character error but got {:?}", result),
            }
        }
    }

    #[test]
    fn test_eof() {
        assert_eq!(tokens(""), vec![Token::Eof]);
        assert_eq!(tokens("  \n\t "), vec![Token::Eof]);
    }

    #[test]
    fn test_spans_eof() {
        let mut lex = Lexer::new("1");

        // Skip the `1`
        lex.next_token().unwrap();

        let final_span = Span::new(BytePos::new(1), BytePos::new(1), LineCol::new(1, 2));
        // Make sure that the span does not change upon hitting eof
        assert_eq!(lex.next_token().unwrap().span, final_span);
        assert_eq!(lex.next_token().unwrap().span, final_span);
    }

    #[test]
    fn test_spans() {
        let input = "abc 12 +\n  print";
        let spans: Vec<Span> = Lexer::new(input)
            .tokenize()
            .unwrap()
            .into_iter()
            .map(|token| token.span)
            .collect();

        assert_eq!(
            spans,
            vec![
                Span::new(BytePos::new(0), BytePos::new(3), LineCol::new(1, 1)),
                Span::new(BytePos::new(4), BytePos::new(6), LineCol::new(1, 5)),
                Span::new(BytePos::new(7), BytePos::new(8), LineCol::new(1, 8)),
                Span::new(BytePos::new(11), BytePos::new(16), LineCol::new(2, 3)),
                Span::new(BytePos::new(16), BytePos::new(16), LineCol::new(2, 8)),
            ]
        );
    }

    #[test]
    fn test_token_text() {
        let input = "x = 'hi' + 1.50";
        let texts: Vec<&str> = Lexer::new(input)
            .tokenize()
            .unwrap()
            .iter()
            .map(|token| token.span.text(input))
            .collect();

        assert_eq!(texts, vec!["x", "=", "'hi'", "+", "1.50", ""]);
    }

    #[test]
    fn test_columns_count_characters() {
        let input = "'héllo' + x";
        let locations: Vec<LineCol> = Lexer::new(input)
            .tokenize()
            .unwrap()
            .into_iter()
            .map(|token| token.span.location())
            .collect();

        assert_eq!(
            locations,
            vec![
                LineCol::new(1, 1),
                LineCol::new(1, 9),
                LineCol::new(1, 11),
                LineCol::new(1, 12),
            ]
        );
    }
}
