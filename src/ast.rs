use crate::error::Location;

/// Represents a literal value in the language.
///
/// `Literal` covers the raw constant forms that can appear directly in
/// source code. It is embedded in the AST and converted into a runtime
/// value when evaluated.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// A boolean literal: `true` or `false`.
    Bool(bool),
    /// A decimal integer literal.
    Int(i64),
    /// A decimal literal with a fractional part.
    Float(f32),
    /// A double-quoted string literal, escapes already resolved.
    Str(String),
}

/// A type keyword as written in a declaration or function signature.
///
/// These are recorded by the parser but only enforced dynamically, at the
/// operations the interpreter performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclaredType {
    /// `bool`
    Bool,
    /// `int`
    Int,
    /// `float`
    Float,
    /// `str`
    Str,
}

impl std::fmt::Display for DeclaredType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::Str => "str",
        };
        write!(f, "{name}")
    }
}

/// Represents a binary operator.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BinaryOp {
    /// Addition or string concatenation (`+`)
    Add,
    /// Subtraction (`-`)
    Sub,
    /// Multiplication (`*`)
    Mul,
    /// Division (`/`)
    Div,
    /// Modulo (`%`)
    Mod,
    /// Less than (`<`)
    Less,
    /// Greater than (`>`)
    Greater,
    /// Less than or equal (`<=`)
    LessEqual,
    /// Greater than or equal (`>=`)
    GreaterEqual,
    /// Equal to (`==`)
    Equal,
    /// Not equal to (`!=`)
    NotEqual,
    /// Logical and (`&&`)
    And,
    /// Logical or (`||`)
    Or,
    /// Range construction (`..`)
    Range,
}

impl std::fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use BinaryOp::{
            Add, And, Div, Equal, Greater, GreaterEqual, Less, LessEqual, Mod, Mul, NotEqual, Or,
            Range, Sub,
        };
        let operator = match self {
            Add => "+",
            Sub => "-",
            Mul => "*",
            Div => "/",
            Mod => "%",
            Less => "<",
            Greater => ">",
            LessEqual => "<=",
            GreaterEqual => ">=",
            Equal => "==",
            NotEqual => "!=",
            And => "&&",
            Or => "||",
            Range => "..",
        };
        write!(f, "{operator}")
    }
}

/// Represents a unary operator.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum UnaryOp {
    /// Arithmetic negation (`-x`).
    Negate,
    /// Logical NOT (`!x`).
    Not,
}

impl std::fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", match self {
            Self::Negate => "-",
            Self::Not => "!",
        })
    }
}

/// The operator of an assignment statement.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AssignOp {
    /// `=`
    Assign,
    /// `+=`
    Add,
    /// `-=`
    Sub,
    /// `*=`
    Mul,
    /// `/=`
    Div,
    /// `%=`
    Mod,
}

impl std::fmt::Display for AssignOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", match self {
            Self::Assign => "=",
            Self::Add => "+=",
            Self::Sub => "-=",
            Self::Mul => "*=",
            Self::Div => "/=",
            Self::Mod => "%=",
        })
    }
}

/// An abstract syntax tree node representing an expression.
///
/// `Expr` covers all expression forms, from literals and variables to
/// operators, subscripts, calls, and method calls. Each variant carries the
/// source [`Location`] it was parsed at.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A literal value.
    Literal {
        /// The constant value.
        value: Literal,
        /// Source position.
        loc:   Location,
    },
    /// Reference to a variable by name.
    Variable {
        /// Name of the variable.
        name: String,
        /// Source position.
        loc:  Location,
    },
    /// Array literal expression, e.g. `[1, 2, 3]`.
    ///
    /// Elements that evaluate to a range expand in place.
    Array {
        /// Element expressions in order.
        elements: Vec<Expr>,
        /// Source position.
        loc:      Location,
    },
    /// A unary operation.
    Unary {
        /// The operator to apply.
        op:   UnaryOp,
        /// The operand expression.
        expr: Box<Expr>,
        /// Source position.
        loc:  Location,
    },
    /// A binary operation.
    Binary {
        /// The operator.
        op:    BinaryOp,
        /// Left operand.
        left:  Box<Expr>,
        /// Right operand.
        right: Box<Expr>,
        /// Source position.
        loc:   Location,
    },
    /// Subscript expression, e.g. `xs[0]`.
    Subscript {
        /// The value being indexed.
        value: Box<Expr>,
        /// The index expression.
        index: Box<Expr>,
        /// Source position.
        loc:   Location,
    },
    /// Function call expression, e.g. `fact(5)`.
    Call {
        /// Name of the function being called.
        name:      String,
        /// Argument expressions in order.
        arguments: Vec<Expr>,
        /// Source position.
        loc:       Location,
    },
    /// Method call expression, e.g. `xs.push(4)`.
    Method {
        /// The receiver expression.
        object:    Box<Expr>,
        /// Name of the method.
        name:      String,
        /// Argument expressions in order.
        arguments: Vec<Expr>,
        /// Source position.
        loc:       Location,
    },
}

impl Expr {
    /// Gets the source location of `self`.
    #[must_use]
    pub const fn loc(&self) -> &Location {
        match self {
            Self::Literal { loc, .. }
            | Self::Variable { loc, .. }
            | Self::Array { loc, .. }
            | Self::Unary { loc, .. }
            | Self::Binary { loc, .. }
            | Self::Subscript { loc, .. }
            | Self::Call { loc, .. }
            | Self::Method { loc, .. } => loc,
        }
    }
}

/// One section of a `loop (...)` header.
///
/// A loop carries any number of comma separated sections. Init sections run
/// once before the first iteration; condition and range sections are
/// re-evaluated on every iteration.
#[derive(Debug, Clone, PartialEq)]
pub enum LoopSection {
    /// `name = expr`: evaluated once into the loop scope.
    Init {
        /// Variable to initialise.
        name:  String,
        /// Initial value expression.
        value: Expr,
    },
    /// A bare boolean expression: the loop exits when it turns false.
    Condition(Expr),
    /// `name : expr`: binds `name` to successive elements of the range,
    /// string, or array the expression produces.
    Range {
        /// Iterator variable.
        name:  String,
        /// Expression producing the sequence.
        value: Expr,
    },
}

/// A single parameter of a function definition.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    /// Parameter name.
    pub name: String,
    /// Declared parameter type (recorded, not statically enforced).
    pub ty:   DeclaredType,
}

/// An abstract syntax tree node representing a statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// A `let` declaration, with optional type, dimensions, and initializer.
    VariableInit {
        /// Name of the variable.
        name: String,
        /// Declared type, if one was written.
        ty:   Option<DeclaredType>,
        /// Array dimension expressions, one per `[...]`. `None` marks an
        /// empty pair of brackets.
        dims: Vec<Option<Expr>>,
        /// Initializer expression, if one was written.
        init: Option<Expr>,
        /// Source position.
        loc:  Location,
    },
    /// An assignment to an existing variable, plain or compound.
    VariableAssign {
        /// Target variable name.
        name:  String,
        /// The assignment operator.
        op:    AssignOp,
        /// Right hand side expression.
        value: Expr,
        /// Source position.
        loc:   Location,
    },
    /// An assignment through one or more subscripts, e.g. `xs[0][1] = v`.
    ElementAssign {
        /// Target variable name.
        name:       String,
        /// Subscript expressions, outermost first.
        subscripts: Vec<Expr>,
        /// The value to store.
        value:      Expr,
        /// Source position.
        loc:        Location,
    },
    /// An `if`/`elif`/`else` chain.
    ///
    /// Branches run in order; a `None` condition marks the `else`.
    If {
        /// `(condition, body)` pairs in source order.
        branches: Vec<(Option<Expr>, Vec<Stmt>)>,
        /// Source position.
        loc:      Location,
    },
    /// A `loop (...)` statement.
    Loop {
        /// The comma separated header sections.
        sections: Vec<LoopSection>,
        /// The loop body.
        body:     Vec<Stmt>,
        /// Source position.
        loc:      Location,
    },
    /// A function definition.
    Function {
        /// Function name.
        name:   String,
        /// Parameters in order.
        params: Vec<Param>,
        /// Declared return type, if one was written.
        rtn:    Option<DeclaredType>,
        /// The function body.
        body:   Vec<Stmt>,
        /// Source position.
        loc:    Location,
    },
    /// A `return` statement with optional value.
    Return {
        /// The value to return, if any.
        value: Option<Expr>,
        /// Source position.
        loc:   Location,
    },
    /// An expression evaluated for its effects (a call statement).
    Expression {
        /// The expression to evaluate.
        expr: Expr,
        /// Source position.
        loc:  Location,
    },
}

impl Stmt {
    /// Gets the source location of `self`.
    #[must_use]
    pub const fn loc(&self) -> &Location {
        match self {
            Self::VariableInit { loc, .. }
            | Self::VariableAssign { loc, .. }
            | Self::ElementAssign { loc, .. }
            | Self::If { loc, .. }
            | Self::Loop { loc, .. }
            | Self::Function { loc, .. }
            | Self::Return { loc, .. }
            | Self::Expression { loc, .. } => loc,
        }
    }
}
