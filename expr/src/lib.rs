//! FILENAME: expr/src/lib.rs
//! PURPOSE: Library root for the expression language.
//! CONTEXT: Exposes the lexer, parser and AST, the evaluator that runs a
//! tree against a binding environment, and the static column-dependency
//! and rename analysis.
//!
//! PIPELINE: Expression String --> Lexer --> Tokens --> Parser --> AST --> Evaluator
//!                                                                  \--> Dependencies

pub mod ast;
pub mod bindings;
pub mod dependencies;
pub mod evaluator;
pub mod functions;
pub mod lexer;
pub mod parser;
pub mod token;

#[cfg(test)]
mod tests;

// Re-export commonly used types for convenience
pub use ast::{Expression, CELLS_ROOTS};
pub use bindings::Bindings;
pub use dependencies::{ColumnSet, DependencyCache};
pub use evaluator::Evaluator;
pub use lexer::Lexer;
pub use parser::{parse, ParseError, ParseResult, Parser};
pub use token::Token;
