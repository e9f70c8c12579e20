pub mod builtin;
pub mod diagnostic;
mod environment;
pub mod error;
mod evaluator;
mod session;
pub mod value;

pub use diagnostic::{Diagnostic, ErrorCategory};
pub use environment::Environment;
pub use error::{Error, RuntimeError};
pub use evaluator::Evaluator;
pub use session::Session;
pub use value::{Value, ValueKind};
