use crate::span::{Span, WithSpan};
use crate::token::Token;
use std::fmt::Display;

#[derive(Debug, Default, PartialEq, Clone)]
pub struct Program {
    pub statements: Vec<Statement>,
}

impl Program {
    pub fn new() -> Program {
        Program {
            statements: Vec::new(),
        }
    }
}

impl Display for Program {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = self
            .statements
            .iter()
            .map(|stmt| stmt.to_string())
            .collect::<Vec<String>>()
            .join("\n");

        write!(f, "{}", s)
    }
}

#[derive(Debug, PartialEq, Clone)]
pub enum Statement {
    Assignment {
        /// The name/identifier of the variable
        name: IdentifierLiteral,
        /// The value being assigned
        value: Expression,
        span: Span,
    },
    Print {
        /// The value being printed
        argument: Expression,
        span: Span,
    },
    Expression {
        /// The expression for this statement
        expression: Expression,
    },
}

impl Statement {
    pub fn span(&self) -> Span {
        match self {
            Statement::Assignment { span, .. } => *span,
            Statement::Print { span, .. } => *span,
            Statement::Expression { expression } => expression.span,
        }
    }
}

impl Display for Statement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use Statement::*;

        match self {
            Assignment { name, value, .. } => write!(
                f,
                "{ident} {tok} {val}",
                ident = name,
                tok = Token::Equal,
                val = value
            ),
            Print { argument, .. } => write!(f, "{}({})", Token::Print, argument),
            Expression { expression } => write!(f, "{}", expression),
        }
    }
}

/// An expression together with the span it was parsed from.
///
/// The span's location is always that of the expression's leading token.
#[derive(Debug, PartialEq, Clone)]
pub struct Expression {
    pub kind: ExpressionKind,
    pub span: Span,
}

impl Expression {
    pub fn new(kind: ExpressionKind, span: Span) -> Expression {
        Expression { kind, span }
    }
}

impl Display for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.kind)
    }
}

#[derive(Debug, PartialEq, Clone)]
pub enum ExpressionKind {
    // Literal
    Identifier(IdentifierLiteral),
    Integer(i64),
    Float(f64),
    String(String),

    // Complex
    Prefix(Box<PrefixExpression>),
    Infix(Box<InfixExpression>),
    Call(Box<CallExpression>),
}

impl Display for ExpressionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use ExpressionKind::*;

        match self {
            Identifier(name) => write!(f, "{}", name),
            Integer(value) => write!(f, "{}", Token::Integer(*value)),
            Float(value) => write!(f, "{}", Token::Float(*value)),
            String(value) => write!(f, "\"{}\"", value),

            Prefix(prefix) => write!(f, "{}", prefix),
            Infix(infix) => write!(f, "{}", infix),
            Call(call) => write!(f, "{}", call),
        }
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct IdentifierLiteral {
    pub name: String,
}

impl Display for IdentifierLiteral {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl From<&str> for IdentifierLiteral {
    fn from(name: &str) -> Self {
        Self {
            name: name.to_owned(),
        }
    }
}

impl From<String> for IdentifierLiteral {
    fn from(name: String) -> Self {
        Self { name }
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct PrefixExpression {
    pub operator: WithSpan<Token>,
    pub right: Expression,
}

impl Display for PrefixExpression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({op}{r})", op = self.operator.value, r = self.right)
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct InfixExpression {
    pub left: Expression,
    pub operator: WithSpan<Token>,
    pub right: Expression,
}

impl Display for InfixExpression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({l} {op} {r})",
            l = self.left,
            op = self.operator.value,
            r = self.right
        )
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct CallExpression {
    pub function: IdentifierLiteral,
    pub arguments: Vec<Expression>,
}

impl Display for CallExpression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}({})",
            self.function,
            self.arguments
                .iter()
                .map(|arg| arg.to_string())
                .collect::<Vec<String>>()
                .join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::{
        CallExpression, Expression, ExpressionKind, IdentifierLiteral, InfixExpression, Program,
        Statement,
    };
    use crate::span::{Span, WithSpan};
    use crate::token::Token;

    fn expr(kind: ExpressionKind) -> Expression {
        Expression::new(kind, Span::empty())
    }

    #[test]
    fn test_display_program() {
        let program = Program {
            statements: vec![
                Statement::Assignment {
                    name: IdentifierLiteral::from("myVar"),
                    value: expr(ExpressionKind::Infix(Box::new(InfixExpression {
                        left: expr(ExpressionKind::Identifier("anotherVar".into())),
                        operator: WithSpan::new(Token::Plus, Span::empty()),
                        right: expr(ExpressionKind::Float(2.0)),
                    }))),
                    span: Span::empty(),
                },
                Statement::Print {
                    argument: expr(ExpressionKind::Call(Box::new(CallExpression {
                        function: "upper".into(),
                        arguments: vec![expr(ExpressionKind::String("hi".into()))],
                    }))),
                    span: Span::empty(),
                },
            ],
        };

        assert_eq!(
            program.to_string(),
            "myVar = (anotherVar + 2.0)\nprint(upper(\"hi\"))"
        )
    }
}
