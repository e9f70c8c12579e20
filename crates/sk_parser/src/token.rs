use std::fmt;

#[derive(Debug, PartialEq, Clone)]
pub enum Token {
    // Operators
    Plus,
    Minus,
    Star,
    Slash,
    Equal,

    // Punctuation
    Comma,
    LeftParen,
    RightParen,

    // Identifiers & Literals
    Identifier(String),
    Integer(i64),
    Float(f64),
    String(String),

    // Keywords
    Print,

    // Special
    Eof,
}

/// The coarse category of a token, as reported in diagnostics.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord)]
pub enum TokenKind {
    Number,
    String,
    Identifier,
    Operator,
    Keyword,
    Punctuation,
    End,
}

impl Token {
    /// Get the Token for the given keyword, if valid.
    pub fn lookup_keyword(s: &str) -> Option<Token> {
        match s {
            "print" => Some(Token::Print),
            _ => None,
        }
    }

    pub fn kind(&self) -> TokenKind {
        use Token::*;

        match self {
            Plus | Minus | Star | Slash | Equal => TokenKind::Operator,
            Comma | LeftParen | RightParen => TokenKind::Punctuation,
            Identifier(_) => TokenKind::Identifier,
            Integer(_) | Float(_) => TokenKind::Number,
            String(_) => TokenKind::String,
            Print => TokenKind::Keyword,
            Eof => TokenKind::End,
        }
    }

    /// Whether two tokens are the same, ignoring any literal payload.
    pub fn same_variant(&self, other: &Token) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Token::*;

        match self {
            Plus => write!(f, "+"),
            Minus => write!(f, "-"),
            Star => write!(f, "*"),
            Slash => write!(f, "/"),
            Equal => write!(f, "="),

            Comma => write!(f, ","),
            LeftParen => write!(f, "("),
            RightParen => write!(f, ")"),

            Identifier(name) => write!(f, "{}", name),
            Integer(value) => write!(f, "{}", value),
            Float(value) => {
                // Force one-decimal value for floats with no decimal place
                // e.g. 1.0 instead of 1
                if value.fract() == 0.0 {
                    write!(f, "{:.1}", value)
                } else {
                    write!(f, "{}", value)
                }
            }
            String(value) => write!(f, "\"{}\"", value),

            Print => write!(f, "print"),

            Eof => write!(f, "EOF"),
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use TokenKind::*;

        match self {
            Number => write!(f, "number"),
            String => write!(f, "string"),
            Identifier => write!(f, "identifier"),
            Operator => write!(f, "operator"),
            Keyword => write!(f, "keyword"),
            Punctuation => write!(f, "punctuation"),
            End => write!(f, "end of input"),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::token::{Token, TokenKind};

    #[test]
    fn float_formatting() {
        assert_eq!(format!("{}", Token::Float(12345.0)), "12345.0");
        assert_eq!(format!("{}", Token::Float(1.0)), "1.0");
        assert_eq!(format!("{}", Token::Float(0.0)), "0.0");
        assert_eq!(format!("{}", Token::Float(0.1)), "0.1");
        assert_eq!(format!("{}", Token::Float(0.12345)), "0.12345");
    }

    #[test]
    fn token_kinds() {
        let tests = vec![
            (Token::Plus, TokenKind::Operator),
            (Token::Equal, TokenKind::Operator),
            (Token::Comma, TokenKind::Punctuation),
            (Token::RightParen, TokenKind::Punctuation),
            (Token::Identifier("x".into()), TokenKind::Identifier),
            (Token::Integer(1), TokenKind::Number),
            (Token::Float(1.5), TokenKind::Number),
            (Token::String("s".into()), TokenKind::String),
            (Token::Print, TokenKind::Keyword),
            (Token::Eof, TokenKind::End),
        ];

        for (token, kind) in tests {
            assert_eq!(token.kind(), kind, "wrong kind for {}", token);
        }
    }

    #[test]
    fn keyword_lookup() {
        assert_eq!(Token::lookup_keyword("print"), Some(Token::Print));
        assert_eq!(Token::lookup_keyword("Print"), None);
        assert_eq!(Token::lookup_keyword("len"), None);
    }
}
