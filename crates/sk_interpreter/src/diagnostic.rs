use std::fmt::Display;

use sk_parser::span::LineCol;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    Lexical,
    Syntax,
    UndefinedName,
    Type,
    DivisionByZero,
    Conversion,
    Overflow,
    /// The output sink could not be written to
    Output,
}

impl Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use ErrorCategory::*;

        match self {
            Lexical => write!(f, "Lexical"),
            Syntax => write!(f, "Syntax"),
            UndefinedName => write!(f, "Name"),
            Type => write!(f, "Type"),
            DivisionByZero => write!(f, "Division by zero"),
            Conversion => write!(f, "Conversion"),
            Overflow => write!(f, "Overflow"),
            Output => write!(f, "Output"),
        }
    }
}

/// A structured, presentation-independent description of a failure.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub category: ErrorCategory,
    pub message: String,
    /// Where the offending token/node starts, when the failure has a source position
    pub position: Option<LineCol>,
    /// For syntax errors, descriptions of every token that would have been accepted
    pub expected: Vec<String>,
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} error", self.category)?;

        if let Some(position) = self.position {
            write!(f, " at {}", position)?;
        }

        write!(f, ": {}", self.message)
    }
}

#[cfg(test)]
mod tests {
    use sk_parser::span::LineCol;

    use crate::diagnostic::{Diagnostic, ErrorCategory};

    #[test]
    fn display() {
        let diagnostic = Diagnostic {
            category: ErrorCategory::UndefinedName,
            message: "identifier 'y' not found".into(),
            position: Some(LineCol::new(1, 7)),
            expected: Vec::new(),
        };
        assert_eq!(
            diagnostic.to_string(),
            "Name error at 1:7: identifier 'y' not found"
        );

        let diagnostic = Diagnostic {
            category: ErrorCategory::Output,
            message: "failed to write output: broken pipe".into(),
            position: None,
            expected: Vec::new(),
        };
        assert_eq!(
            diagnostic.to_string(),
            "Output error: failed to write output: broken pipe"
        );
    }
}
