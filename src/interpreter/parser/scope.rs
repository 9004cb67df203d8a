use std::collections::HashMap;

use crate::ast::DeclaredType;

/// The signature a function definition was parsed with.
///
/// Types are recorded here for diagnostics and future consumers; the
/// interpreter only enforces them dynamically, operation by operation.
#[derive(Debug, Clone)]
pub struct FunctionSig {
    /// Declared parameter types, in order.
    pub params: Vec<DeclaredType>,
    /// Declared return type, if one was written.
    pub rtn:    Option<DeclaredType>,
}

/// The parser's view of what names exist.
///
/// A stack of maps from variable name to its declared type (if any),
/// chained lexically, plus the single program-wide function table. The
/// parser uses this purely to reject references to undeclared names; it
/// performs no type checking.
#[derive(Debug, Default)]
pub struct ParserScope {
    scopes: Vec<HashMap<String, Option<DeclaredType>>>,
    funcs:  HashMap<String, FunctionSig>,
}

impl ParserScope {
    /// Creates the scope for a fresh program, containing only the global
    /// level.
    #[must_use]
    pub fn new() -> Self {
        Self { scopes: vec![HashMap::new()],
               funcs:  HashMap::new(), }
    }

    /// Opens a nested lexical scope.
    pub fn enter(&mut self) {
        self.scopes.push(HashMap::new());
    }

    /// Closes the innermost lexical scope.
    pub fn exit(&mut self) {
        self.scopes.pop();
    }

    /// Records a variable declaration in the innermost scope.
    pub fn declare(&mut self, name: &str, ty: Option<DeclaredType>) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.to_string(), ty);
        }
    }

    /// Whether `name` is declared in this scope or any enclosing one.
    #[must_use]
    pub fn is_declared(&self, name: &str) -> bool {
        self.scopes.iter().rev().any(|scope| scope.contains_key(name))
    }

    /// Records a function definition.
    ///
    /// Returns `false` when a definition with this name already existed (a
    /// warning condition; the new signature replaces the old one).
    pub fn declare_function(&mut self, name: &str, sig: FunctionSig) -> bool {
        self.funcs.insert(name.to_string(), sig).is_none()
    }

    /// Whether a function with this name has been defined so far.
    #[must_use]
    pub fn has_function(&self, name: &str) -> bool {
        self.funcs.contains_key(name)
    }
}
