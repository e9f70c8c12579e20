use std::fmt::Display;

use sk_parser::span::{Span, WithSpan};

use crate::error::RuntimeError;
use crate::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Len,
    Upper,
    Lower,
    Str,
    Int,
}

impl Builtin {
    pub fn lookup(name: &str) -> Option<Builtin> {
        match name {
            "len" => Some(Builtin::Len),
            "upper" => Some(Builtin::Upper),
            "lower" => Some(Builtin::Lower),
            "str" => Some(Builtin::Str),
            "int" => Some(Builtin::Int),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Builtin::Len => "len",
            Builtin::Upper => "upper",
            Builtin::Lower => "lower",
            Builtin::Str => "str",
            Builtin::Int => "int",
        }
    }

    /// Number of arguments the builtin takes.
    pub fn arity(&self) -> usize {
        match self {
            Builtin::Len | Builtin::Upper | Builtin::Lower | Builtin::Str | Builtin::Int => 1,
        }
    }

    /// Apply the builtin to already evaluated arguments; `span` is the call site.
    pub fn apply(&self, args: Vec<Value>, span: Span) -> Result<Value, RuntimeError> {
        let [arg]: [Value; 1] = args.try_into().map_err(|args: Vec<Value>| {
            RuntimeError::BadArity {
                function: WithSpan::new(*self, span),
                expected: self.arity(),
                got: args.len(),
            }
        })?;

        match (self, arg) {
            (Builtin::Len, Value::String(value)) => Ok(Value::Integer(value.chars().count() as i64)),
            (Builtin::Upper, Value::String(value)) => Ok(Value::String(value.to_ascii_uppercase())),
            (Builtin::Lower, Value::String(value)) => Ok(Value::String(value.to_ascii_lowercase())),
            (Builtin::Str, value) => Ok(Value::String(value.to_string())),
            (Builtin::Int, value) => convert_to_integer(value, span),
            (builtin, arg) => Err(RuntimeError::InvalidArgumentType(
                WithSpan::new(*builtin, span),
                arg,
            )),
        }
    }
}

fn convert_to_integer(value: Value, span: Span) -> Result<Value, RuntimeError> {
    match value {
        Value::Integer(value) => Ok(Value::Integer(value)),
        Value::Float(value) => {
            let truncated = value.trunc();
            // i64::MAX as f64 rounds up to 2^63, which is itself out of range
            if (i64::MIN as f64..i64::MAX as f64).contains(&truncated) {
                Ok(Value::Integer(truncated as i64))
            } else {
                Err(RuntimeError::InvalidConversion(WithSpan::new(
                    Value::Float(value).to_string(),
                    span,
                )))
            }
        }
        Value::String(text) => match text.trim().parse::<i64>() {
            Ok(value) => Ok(Value::Integer(value)),
            Err(_) => Err(RuntimeError::InvalidConversion(WithSpan::new(text, span))),
        },
    }
}

impl Display for Builtin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "builtin function {}", self.name())
    }
}
