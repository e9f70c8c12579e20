use std::fmt::Display;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Integer(i64),
    Float(f64),
    String(String),
}

/// The runtime type of a value, as named in type errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Integer,
    Float,
    String,
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Integer(_) => ValueKind::Integer,
            Value::Float(_) => ValueKind::Float,
            Value::String(_) => ValueKind::String,
        }
    }

    pub fn typename(&self) -> &'static str {
        self.kind().name()
    }

    /// Converts the given value to a string (in the format of a code object).
    ///
    /// Use this anywhere a programmer expects to see the code-version of a value (e.g. in the REPL).
    /// # Examples
    /// ```rust
    /// use sk_interpreter::value::Value;
    ///
    /// let value = Value::String("hello world".to_string());
    ///
    /// assert_eq!(value.to_code_string(), "\"hello world\"");
    /// assert_eq!(Value::Float(2.0).to_code_string(), "2.0");
    /// ```
    pub fn to_code_string(&self) -> String {
        match self {
            Value::String(value) => format!("\"{}\"", value),
            value => value.to_string(),
        }
    }
}

impl ValueKind {
    pub fn name(&self) -> &'static str {
        match self {
            ValueKind::Integer => "integer",
            ValueKind::Float => "float",
            ValueKind::String => "string",
        }
    }
}

impl Display for ValueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl Display for Value {
    /// The canonical rendering, shared by `print` and `str`
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Integer(value) => write!(f, "{}", value),
            Value::Float(value) => write!(f, "{}", format_float(*value)),
            Value::String(value) => write!(f, "{}", value),
        }
    }
}

/// Shortest round-trip text for `value`, always in positional form with a decimal point.
fn format_float(value: f64) -> String {
    let mut buffer = ryu::Buffer::new();
    let text = buffer.format(value);

    if !value.is_finite() || !text.contains('e') {
        return text.to_owned();
    }

    // ryu switches to exponent form at large and small magnitudes
    let mut text = value.to_string();
    if !text.contains('.') {
        text.push_str(".0");
    }
    text
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

#[cfg(test)]
mod tests {
    use crate::value::{Value, ValueKind};

    #[test]
    fn canonical_rendering() {
        let tests = vec![
            (Value::Integer(42), "42"),
            (Value::Integer(-7), "-7"),
            (Value::Float(1.0), "1.0"),
            (Value::Float(2.5), "2.5"),
            (Value::Float(0.1), "0.1"),
            (Value::Float(-3.0), "-3.0"),
            (Value::Float(1e16), "10000000000000000.0"),
            (Value::Float(-2.5e20), "-250000000000000000000.0"),
            (Value::Float(0.00001), "0.00001"),
            (Value::Float(1.5e-7), "0.00000015"),
            (Value::String("hello".into()), "hello"),
            (Value::String("".into()), ""),
        ];

        for (value, expected) in tests {
            assert_eq!(value.to_string(), expected);
        }
    }

    #[test]
    fn kinds() {
        assert_eq!(Value::Integer(1).kind(), ValueKind::Integer);
        assert_eq!(Value::Float(1.0).kind(), ValueKind::Float);
        assert_eq!(Value::from("a").kind(), ValueKind::String);
        assert_eq!(Value::from("a").typename(), "string");
    }
}
