/// Program and block parsing.
///
/// Contains the top-level statement loop and block parsing shared by
/// conditionals, loops, and function bodies.
pub mod core;

/// Expression parsing.
///
/// Implements the precedence-climbing descent over all operators, plus
/// postfix subscripts and method calls.
pub mod expr;

/// The parse-time scope.
///
/// Tracks declared variable names and the function table so undeclared
/// references are compile errors.
pub mod scope;

/// Statement parsing.
///
/// Dispatches on the leading token and parses declarations, assignments,
/// conditionals, loops, function definitions, and returns.
pub mod statement;

/// Utility functions for the parser.
///
/// Provides comma-separated list parsing, token expectation helpers, and
/// separator skipping.
pub mod utils;
