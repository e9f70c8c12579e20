use std::fs;
use std::io;
use std::mem;
use std::time::Instant;

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::{debug, warn};

use sk_interpreter::{Environment, Session};
use sk_parser::parser::parse_program;

use crate::config::ReplConfig;
use crate::report::report_error;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const PROMPT: &str = ">>> ";
const CONTINUATION_PROMPT: &str = "... ";
const SOURCE_NAME: &str = "<repl>";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command<'a> {
    Help,
    Exit,
    Vars,
    Reset,
    Load(&'a str),
    Time,
    Unknown(&'a str),
}

impl<'a> Command<'a> {
    fn parse(line: &'a str) -> Command<'a> {
        let line = line.trim();
        let (name, argument) = match line.split_once(char::is_whitespace) {
            Some((name, argument)) => (name, argument.trim()),
            None => (line, ""),
        };

        match name {
            ":help" | ":h" => Command::Help,
            ":exit" | ":quit" => Command::Exit,
            ":vars" => Command::Vars,
            ":reset" => Command::Reset,
            ":load" => Command::Load(argument),
            ":time" => Command::Time,
            _ => Command::Unknown(line),
        }
    }
}

/// `name = <code form>` for every variable, sorted by name.
fn format_vars(env: &Environment) -> Vec<String> {
    env.bindings()
        .into_iter()
        .map(|(name, value)| format!("{} = {}", name, value.to_code_string()))
        .collect()
}

/// Whether `source` only fails to parse because it ends too early.
fn needs_more_input(source: &str) -> bool {
    matches!(parse_program(source), Err(error) if error.is_incomplete())
}

pub struct Repl {
    editor: DefaultEditor,
    session: Session<io::Stdout>,
    config: ReplConfig,
    /// Lines of a statement that is still being typed
    pending: String,
}

impl Repl {
    pub fn new(config: ReplConfig) -> rustyline::Result<Self> {
        let mut editor = DefaultEditor::new()?;

        if let Some(path) = &config.history_path {
            if let Err(err) = editor.load_history(path) {
                debug!(path = %path.display(), %err, "no history loaded");
            }
        }

        Ok(Repl {
            editor,
            session: Session::stdout(),
            config,
            pending: String::new(),
        })
    }

    pub fn run(&mut self) -> rustyline::Result<()> {
        println!("Asterisk v{}", VERSION);
        println!("Type :help for help, exit to leave.");

        loop {
            let prompt = if self.pending.is_empty() {
                PROMPT
            } else {
                CONTINUATION_PROMPT
            };

            match self.editor.readline(prompt) {
                Ok(line) => {
                    if self.handle_line(&line) {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    self.pending.clear();
                    println!("^C");
                }
                Err(ReadlineError::Eof) => break,
                Err(err) => {
                    self.save_history();
                    return Err(err);
                }
            }
        }

        self.save_history();
        Ok(())
    }

    /// Returns true when the REPL should exit.
    fn handle_line(&mut self, line: &str) -> bool {
        let trimmed = line.trim();

        if self.pending.is_empty() {
            if trimmed.is_empty() {
                return false;
            }
            let _ = self.editor.add_history_entry(trimmed);

            if trimmed == "exit" || trimmed == "quit" {
                return true;
            }
            if trimmed.starts_with(':') {
                return self.handle_command(Command::parse(trimmed));
            }

            self.pending.push_str(line);
        } else if trimmed.is_empty() {
            // A blank continuation line gives up waiting and reports the error
            let source = mem::take(&mut self.pending);
            self.eval_source(SOURCE_NAME, &source);
            return false;
        } else {
            let _ = self.editor.add_history_entry(trimmed);
            self.pending.push('\n');
            self.pending.push_str(line);
        }

        if !needs_more_input(&self.pending) {
            let source = mem::take(&mut self.pending);
            self.eval_source(SOURCE_NAME, &source);
        }

        false
    }

    /// Returns true when the REPL should exit.
    fn handle_command(&mut self, command: Command) -> bool {
        match command {
            Command::Help => print_help(),
            Command::Exit => return true,
            Command::Vars => {
                let vars = format_vars(self.session.environment());
                if vars.is_empty() {
                    println!("(no variables)");
                }
                for var in vars {
                    println!("{}", var);
                }
            }
            Command::Reset => {
                self.session.environment_mut().clear();
                println!("Environment cleared.");
            }
            Command::Load("") => println!("Usage: :load <path>"),
            Command::Load(path) => match fs::read_to_string(path) {
                Ok(source) => self.eval_source(path, &source),
                Err(err) => eprintln!("Error: could not read {}: {}", path, err),
            },
            Command::Time => {
                self.config.show_timing = !self.config.show_timing;
                let state = if self.config.show_timing { "on" } else { "off" };
                println!("Timing {}.", state);
            }
            Command::Unknown(command) => {
                println!("Unknown command: {}", command);
                println!("Type :help for help.");
            }
        }

        false
    }

    fn eval_source(&mut self, name: &str, source: &str) {
        let start = Instant::now();
        let result = self.session.run(source);
        let elapsed = start.elapsed();

        match result {
            Ok(Some(value)) => println!("{}", value.to_code_string()),
            Ok(None) => {}
            Err(error) => {
                if let Err(err) = report_error(name, source, &error) {
                    debug!(%err, "failed to render report");
                    eprintln!("Error: {}", error.diagnostic());
                }
            }
        }

        if self.config.show_timing {
            println!("({:.3?})", elapsed);
        }
    }

    fn save_history(&mut self) {
        if let Some(path) = &self.config.history_path {
            if let Err(err) = self.editor.save_history(path) {
                warn!(path = %path.display(), %err, "failed to save history");
            }
        }
    }
}

fn print_help() {
    println!("Commands:");
    println!("  :help, :h       Show this help");
    println!("  :exit, :quit    Leave the REPL (or type exit / quit)");
    println!("  :vars           List variables");
    println!("  :reset          Clear all variables");
    println!("  :load <path>    Run a file in this session");
    println!("  :time           Toggle execution timing");
    println!();
    println!("Statements:");
    println!("  x = 1 + 2       Assignment");
    println!("  print(x)        Print a value");
    println!("  len(\"abc\")      Expressions are echoed");
    println!();
    println!("Builtins: len, upper, lower, str, int");
}

#[cfg(test)]
mod tests {
    use sk_interpreter::{Environment, Value};

    use crate::repl::{format_vars, needs_more_input, Command};

    #[test]
    fn parse_commands() {
        let tests = vec![
            (":help", Command::Help),
            (":h", Command::Help),
            (":exit", Command::Exit),
            (":quit", Command::Exit),
            (":vars", Command::Vars),
            (":reset", Command::Reset),
            (":time", Command::Time),
            (":load prog.sk", Command::Load("prog.sk")),
            (":load   spaced.sk  ", Command::Load("spaced.sk")),
            (":load", Command::Load("")),
            (":frobnicate", Command::Unknown(":frobnicate")),
            (":", Command::Unknown(":")),
        ];

        for (input, expected) in tests {
            assert_eq!(Command::parse(input), expected, "for {}", input);
        }
    }

    #[test]
    fn vars_listing() {
        let mut env = Environment::new();
        assert!(format_vars(&env).is_empty());

        env.set("name".into(), Value::from("asterisk"));
        env.set("count".into(), Value::Integer(3));
        env.set("ratio".into(), Value::Float(0.5));

        assert_eq!(
            format_vars(&env),
            vec!["count = 3", "name = \"asterisk\"", "ratio = 0.5"]
        );
    }

    #[test]
    fn continuation() {
        let tests = vec![
            ("x = (1 +", true),
            ("print(", true),
            ("len(\"abc\",", true),
            ("x =", true),
            ("x = 1", false),
            ("print(1 +)", false),
            ("x = 3 ^ 2", false),
            ("x = 'open", false),
            ("", false),
        ];

        for (input, expected) in tests {
            assert_eq!(needs_more_input(input), expected, "for {}", input);
        }
    }
}
