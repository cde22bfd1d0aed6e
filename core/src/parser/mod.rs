pub mod error;
#[allow(clippy::module_inception)]
mod parser;

// Re-export the parser and rule enum for external use
pub use error::{ParseError, ParseErrorKind};
pub use parser::{Rule, SourceParser, parse};


#[cfg(test)]
mod precedence_test;
