use std::io::{self, Write};

use tracing::debug;

use sk_parser::parser::parse_program;

use crate::{environment::Environment, error::Error, evaluator::Evaluator, value::Value};

/// One lifetime of an environment across a sequence of source texts.
///
/// Sessions share nothing with each other; everything `print`ed goes to `output`.
pub struct Session<W: Write> {
    env: Environment,
    output: W,
}

impl Session<io::Stdout> {
    pub fn stdout() -> Self {
        Session::new(io::stdout())
    }
}

impl<W: Write> Session<W> {
    pub fn new(output: W) -> Self {
        Session {
            env: Environment::new(),
            output,
        }
    }

    /// Lex, parse and evaluate `source`.
    ///
    /// Nothing runs unless the whole source parses. Returns the value of the
    /// final statement when it is an expression statement.
    pub fn run(&mut self, source: &str) -> Result<Option<Value>, Error> {
        let program = parse_program(source)?;
        debug!(statements = program.statements.len(), "parsed program");

        let result = Evaluator::new(&mut self.env, &mut self.output).eval(&program);
        // Output printed before a runtime error is still flushed, but that error wins
        let flushed = self.output.flush();

        let value = result?;
        flushed?;
        Ok(value)
    }

    pub fn environment(&self) -> &Environment {
        &self.env
    }

    pub fn environment_mut(&mut self) -> &mut Environment {
        &mut self.env
    }

    pub fn output(&self) -> &W {
        &self.output
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

#[cfg(test)]
mod tests {
    use std::io::{self, Write};

    use crate::{error::Error, session::Session, value::Value};

    /// Accepts writes but can never flush them.
    struct UnflushableOutput;

    impl Write for UnflushableOutput {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }
    }

    #[test]
    fn session_keeps_variables_between_runs() {
        let mut session = Session::new(Vec::new());

        assert_eq!(session.run("x = 40").unwrap(), None);
        assert_eq!(session.run("x + 2").unwrap(), Some(Value::Integer(42)));
        assert_eq!(session.run("print(x)").unwrap(), None);

        assert_eq!(String::from_utf8(session.into_output()).unwrap(), "40\n");
    }

    #[test]
    fn syntax_error_runs_nothing() {
        let mut session = Session::new(Vec::new());

        let result = session.run("print(1)\nx = (2");
        assert!(matches!(result, Err(Error::Parse(_))));
        assert!(session.output().is_empty());
        assert!(session.environment().is_empty());
    }

    #[test]
    fn runtime_error_keeps_earlier_statements() {
        let mut session = Session::new(Vec::new());

        let result = session.run("a = 1\nprint(a)\nb = a / 0\nc = 3");
        assert!(matches!(result, Err(Error::Runtime(_))));
        assert_eq!(session.environment().get("a"), Some(&Value::Integer(1)));
        assert!(!session.environment().contains("b"));
        assert!(!session.environment().contains("c"));
        assert_eq!(session.output(), b"1\n");
    }

    #[test]
    fn runtime_error_outranks_flush_failure() {
        let mut session = Session::new(UnflushableOutput);

        assert!(matches!(session.run("print(1)"), Err(Error::Io(_))));
        assert!(matches!(
            session.run("print(1)\nx = missing"),
            Err(Error::Runtime(_))
        ));
        assert!(matches!(session.run("x = (1"), Err(Error::Parse(_))));
    }
}
