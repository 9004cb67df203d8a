use std::rc::Rc;

/// Compile errors.
///
/// Defines all error types that can occur while lexing or parsing source
/// code. Compile errors include unknown symbols, unterminated strings,
/// unexpected tokens, missing punctuation, and references to undeclared
/// names.
pub mod compile_error;
/// Runtime errors.
///
/// Contains all error types that can be raised while the interpreter walks
/// the tree. Runtime errors include type mismatches, bad subscripts,
/// division by zero, argument count mismatches, and the recursion limit.
pub mod runtime_error;

pub use compile_error::CompileError;
pub use runtime_error::RuntimeError;

/// A position in a source file.
///
/// Every token, AST node, and error carries one of these so that
/// diagnostics can point at the exact place in the program they refer to.
/// The file name is shared between all locations of one scan, so cloning a
/// `Location` is cheap.
///
/// ## Example
/// ```
/// use night::error::Location;
///
/// let loc = Location::new("demo.night".into(), 3, 7);
/// assert_eq!(loc.to_string(), "demo.night:3:7");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    /// Name of the source file.
    pub file:   Rc<str>,
    /// One-based line number.
    pub line:   usize,
    /// One-based column number.
    pub column: usize,
}

impl Location {
    /// Creates a new location.
    #[must_use]
    pub const fn new(file: Rc<str>, line: usize, column: usize) -> Self {
        Self { file, line, column }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}
