use crate::ast::{DeclaredType, Literal};

/// Represents a runtime value in the interpreter.
///
/// Values have full copy semantics: assignment, argument passing, and
/// element access clone the value, so no aliasing is ever observable
/// between two bindings.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A boolean value.
    Bool(bool),
    /// A machine-word integer.
    Int(i64),
    /// A single-precision floating point number.
    Float(f32),
    /// A string of characters.
    Str(String),
    /// An ordered, heterogeneous sequence of values.
    Array(Vec<Value>),
    /// A transient inclusive-exclusive integer pair.
    ///
    /// Legal only as a loop range or as an expanding element of an array
    /// literal; anywhere else the evaluator raises a runtime error.
    Range(i64, i64),
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Self::Float(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<Vec<Self>> for Value {
    fn from(v: Vec<Self>) -> Self {
        Self::Array(v)
    }
}

impl From<&Literal> for Value {
    fn from(lit: &Literal) -> Self {
        match lit {
            Literal::Bool(b) => (*b).into(),
            Literal::Int(n) => (*n).into(),
            Literal::Float(v) => (*v).into(),
            Literal::Str(s) => s.clone().into(),
        }
    }
}

impl Value {
    /// The language-level name of this value's type, as used in
    /// diagnostics.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Str(_) => "str",
            Self::Array(_) => "arr",
            Self::Range(..) => "rng",
        }
    }

    /// Returns `true` if the value is an `int` or a `float`.
    #[must_use]
    pub const fn is_num(&self) -> bool {
        matches!(self, Self::Int(_) | Self::Float(_))
    }

    /// The boolean payload, if this is a `bool`.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The integer payload, if this is an `int`.
    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// The numeric payload widened to `f32`, if this is an `int` or a
    /// `float`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub const fn as_float(&self) -> Option<f32> {
        match self {
            Self::Int(n) => Some(*n as f32),
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// The default value a typed declaration takes when no initializer is
    /// written.
    #[must_use]
    pub const fn default_of(ty: DeclaredType) -> Self {
        match ty {
            DeclaredType::Bool => Self::Bool(false),
            DeclaredType::Int => Self::Int(0),
            DeclaredType::Float => Self::Float(0.0),
            DeclaredType::Str => Self::Str(String::new()),
        }
    }
}

/// The canonical text form, as produced by `print` and `str`.
///
/// Booleans print as `true`/`false`, numbers in their shortest decimal
/// form, strings raw, and arrays as `[ e1, e2 ]` (an empty array prints as
/// `[ ]`).
///
/// ## Example
/// ```
/// use night::interpreter::value::core::Value;
///
/// let xs = Value::Array(vec![Value::Int(1), Value::Str("a".into())]);
/// assert_eq!(xs.to_string(), "[ 1, a ]");
/// assert_eq!(Value::Array(Vec::new()).to_string(), "[ ]");
/// ```
impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Str(s) => write!(f, "{s}"),
            Self::Array(elements) => {
                write!(f, "[ ")?;

                for (index, value) in elements.iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }

                    write!(f, "{value}")?;
                }

                if elements.is_empty() { write!(f, "]") } else { write!(f, " ]") }
            },
            Self::Range(start, end) => write!(f, "{start}..{end}"),
        }
    }
}
