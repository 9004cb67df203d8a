//! # night
//!
//! Night is an interpreter for a small dynamically typed imperative
//! language with booleans, integers, floats, strings, heterogeneous
//! arrays, conditionals, loops, user-defined functions with recursion, and
//! a handful of builtin calls.
//!
//! Execution is a strict pipeline: the lexer turns source text into a
//! located token stream, the parser builds an AST and rejects undeclared
//! names, and the tree-walking evaluator runs the AST against a chain of
//! lexical scopes.

#![warn(
    clippy::redundant_clone,
    clippy::needless_pass_by_value,
    clippy::large_enum_variant,
    clippy::string_lit_as_bytes,
    clippy::match_same_arms,
    clippy::cargo,
    clippy::nursery,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    clippy::correctness,
    clippy::complexity,
    clippy::pedantic,
)]
#![allow(clippy::missing_errors_doc)]

use crate::interpreter::{lexer, parser::core::parse_program, parser::scope::ParserScope};

pub use crate::interpreter::evaluator::core::Context;

/// Defines the structure of parsed code.
///
/// This module declares the statement and expression enums that represent
/// the syntactic structure of a program as a tree. The AST is built by the
/// parser and walked by the evaluator; every node carries its source
/// location for diagnostics.
pub mod ast;
/// Provides unified error types for the whole pipeline.
///
/// This module defines the shared `Location` type plus the compile and
/// runtime error enums. Errors carry the exact source position they arose
/// at and render as a primary message with an optional note.
pub mod error;
/// Orchestrates the process of code execution.
///
/// This module ties together lexing, parsing, evaluation, and the value
/// representation to provide the complete runtime for Night programs.
pub mod interpreter;

/// Runs a whole program against the given context.
///
/// The source is scanned into tokens, parsed into an AST (rejecting
/// references to undeclared names along the way), and executed. `file` is
/// the name diagnostics point at.
///
/// # Errors
/// Returns the first compile or runtime error the pipeline produces.
///
/// # Examples
/// ```
/// use night::Context;
///
/// let mut context = Context::new();
/// assert!(night::run_source("let x = 1 + 2;", "ok.night", &mut context).is_ok());
///
/// // 'y' is never declared
/// let mut context = Context::new();
/// assert!(night::run_source("let x = y;", "bad.night", &mut context).is_err());
/// ```
pub fn run_source(source: &str,
                  file: &str,
                  context: &mut Context)
                  -> Result<(), Box<dyn std::error::Error>> {
    let tokens = lexer::scan(source, file)?;

    let mut iter = tokens.iter().peekable();
    let mut scope = ParserScope::new();
    let program = parse_program(&mut iter, &mut scope)?;

    context.run(&program)?;

    Ok(())
}
