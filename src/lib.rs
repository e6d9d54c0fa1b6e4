//! Front end for a small C-like language.
//!
//! ```text
//! source text -> lexer -> tokens -> parser -> statements (AstNode)
//! ```
//!
//! Every stage fails with a [`error::SyntaxError`] on the first problem it
//! finds; nothing is recovered.

pub mod ast;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod scope;
pub mod token;
