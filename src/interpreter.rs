/// The evaluator module executes AST nodes and produces effects.
///
/// The evaluator walks the statement list, maintains the chain of runtime
/// scopes and the function table, evaluates expressions into values, and
/// raises typed runtime errors. It is the execution engine of the
/// interpreter.
///
/// # Responsibilities
/// - Executes statements for their effects and propagates `return`.
/// - Evaluates expressions, enforcing operand types dynamically.
/// - Dispatches builtin and user-defined function calls.
pub mod evaluator;
/// The lexer module tokenizes source code for parsing.
///
/// The lexer reads raw source text and produces a stream of tokens, each
/// paired with its source location. This is the first stage of
/// interpretation.
///
/// # Responsibilities
/// - Converts the input text into tokens with type and location.
/// - Handles literals, identifiers, keywords, and operators.
/// - Reports lexical errors for unknown or malformed input.
pub mod lexer;
/// The parser module builds the abstract syntax tree from tokens.
///
/// The parser consumes the token stream and constructs the statement and
/// expression trees the evaluator walks. It also keeps a parse-time scope
/// so references to undeclared names are rejected before anything runs.
///
/// # Responsibilities
/// - Converts tokens into structured AST nodes.
/// - Validates grammar, reporting errors with location info.
/// - Tracks declared variables and defined functions.
pub mod parser;
/// The value module defines the runtime data types.
///
/// This module declares the tagged value the interpreter computes with and
/// its conversion and formatting helpers.
///
/// # Responsibilities
/// - Defines the `Value` enum over the six value kinds.
/// - Provides checked accessors used by the evaluator's type checks.
/// - Renders the canonical text form `print` and `str` produce.
pub mod value;
