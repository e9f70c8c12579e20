use thiserror::Error;

use crate::builtin::Builtin;
use crate::diagnostic::{Diagnostic, ErrorCategory};
use crate::value::{Value, ValueKind};
use sk_parser::{
    parser::ParseError,
    span::{Span, WithSpan},
    token::Token,
};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuntimeError {
    /// When referencing a variable that has not been assigned
    #[error("identifier '{}' not found", .0.value)]
    IdentifierNotFound(WithSpan<String>),
    /// When calling a name that is not a builtin function
    #[error("function '{}' not found", .0.value)]
    FunctionNotFound(WithSpan<String>),
    /// When a call's argument count does not match the builtin's arity
    #[error("{}() expected {expected} argument(s) but got {got}", .function.value.name())]
    BadArity {
        function: WithSpan<Builtin>,
        expected: usize,
        got: usize,
    },
    /// When attempting a prefix operation on an invalid type (e.g. -"abc")
    #[error("unsupported operand type for {} operator: `{}` ({})", .0.value, .1.typename(), .1.to_code_string())]
    InvalidPrefixOperandType(WithSpan<Token>, Value),
    /// When attempting an infix operation on invalid types/types that are not compatible (e.g. "a" + 1)
    #[error(
        "unsupported operand type(s) for {} operator: `{}` ({}) and `{}` ({})",
        .0.value,
        .1.typename(),
        .1.to_code_string(),
        .2.typename(),
        .2.to_code_string()
    )]
    InvalidInfixOperandType(WithSpan<Token>, Value, Value),
    /// When a call to builtin function passes an argument of an invalid/unsupported type
    #[error("unsupported argument type for {} function: `{}` ({})", .0.value.name(), .1.typename(), .1.to_code_string())]
    InvalidArgumentType(WithSpan<Builtin>, Value),
    #[error("division by zero")]
    DivisionByZero(WithSpan<Token>),
    /// When `int()` is given something that is not an integer literal
    #[error("invalid literal for int(): \"{}\"", .0.value)]
    InvalidConversion(WithSpan<String>),
    #[error("integer overflow in {} operation", .0.value)]
    IntegerOverflow(WithSpan<Token>),
}

impl RuntimeError {
    pub fn span(&self) -> Span {
        use RuntimeError::*;

        match self {
            IdentifierNotFound(name) | FunctionNotFound(name) | InvalidConversion(name) => name.span,
            BadArity { function, .. } => function.span,
            InvalidArgumentType(function, _) => function.span,
            InvalidPrefixOperandType(operator, _)
            | InvalidInfixOperandType(operator, _, _)
            | DivisionByZero(operator)
            | IntegerOverflow(operator) => operator.span,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        use RuntimeError::*;

        match self {
            IdentifierNotFound(_) | FunctionNotFound(_) => ErrorCategory::UndefinedName,
            BadArity { .. }
            | InvalidPrefixOperandType(_, _)
            | InvalidInfixOperandType(_, _, _)
            | InvalidArgumentType(_, _) => ErrorCategory::Type,
            DivisionByZero(_) => ErrorCategory::DivisionByZero,
            InvalidConversion(_) => ErrorCategory::Conversion,
            IntegerOverflow(_) => ErrorCategory::Overflow,
        }
    }

    /// The kinds of the offending operands/arguments of a type error, in source order.
    pub fn operand_kinds(&self) -> Vec<ValueKind> {
        match self {
            RuntimeError::InvalidPrefixOperandType(_, operand) => vec![operand.kind()],
            RuntimeError::InvalidInfixOperandType(_, left, right) => vec![left.kind(), right.kind()],
            RuntimeError::InvalidArgumentType(_, argument) => vec![argument.kind()],
            _ => Vec::new(),
        }
    }
}

/// Everything that can go wrong while running source text in a session.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Parse(ParseError::Lex(_)) => ErrorCategory::Lexical,
            Error::Parse(ParseError::Unexpected { .. }) => ErrorCategory::Syntax,
            Error::Runtime(error) => error.category(),
            Error::Io(_) => ErrorCategory::Output,
        }
    }

    pub fn span(&self) -> Option<Span> {
        match self {
            Error::Parse(error) => Some(error.span()),
            Error::Runtime(error) => Some(error.span()),
            Error::Io(_) => None,
        }
    }

    /// Whether this is a syntax error caused only by the input ending too early.
    pub fn is_incomplete(&self) -> bool {
        matches!(self, Error::Parse(error) if error.is_incomplete())
    }

    pub fn diagnostic(&self) -> Diagnostic {
        let expected = match self {
            Error::Parse(error) => error.expected().iter().map(|e| e.to_string()).collect(),
            _ => Vec::new(),
        };

        Diagnostic {
            category: self.category(),
            message: self.to_string(),
            position: self.span().map(|span| span.location()),
            expected,
        }
    }
}
