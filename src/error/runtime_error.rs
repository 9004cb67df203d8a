use crate::error::Location;

/// Represents all errors that can be raised while the interpreter runs.
///
/// Every variant carries the source [`Location`] of the failing operation.
/// Messages come in two parts: what happened, and (where it helps) a note
/// describing what was expected instead.
#[derive(Debug)]
pub enum RuntimeError {
    /// A variable was read before any binding for it existed.
    UnknownVariable {
        /// The name of the variable.
        name: String,
        /// Where the read occurred.
        loc:  Location,
    },
    /// A function was called that is not in the function table.
    UnknownFunction {
        /// The name of the function.
        name: String,
        /// Where the call occurred.
        loc:  Location,
    },
    /// An operation was applied to a value of the wrong type.
    ///
    /// The workhorse variant: `what` states the violation, `expected`
    /// states the requirement.
    TypeMismatch {
        /// What went wrong.
        what:     String,
        /// What was expected instead.
        expected: String,
        /// Where the operation occurred.
        loc:      Location,
    },
    /// A call supplied the wrong number of arguments.
    ArgumentCount {
        /// The name of the function or method.
        function: String,
        /// Human readable count requirement, e.g. `"1"` or `"1 or 2"`.
        expected: String,
        /// The number of arguments actually supplied.
        found:    usize,
        /// Where the call occurred.
        loc:      Location,
    },
    /// A subscript index was not an integer.
    IndexType {
        /// The type the index actually had.
        found: String,
        /// Where the subscript occurred.
        loc:   Location,
    },
    /// A subscript index was negative.
    NegativeIndex {
        /// The index value.
        index: i64,
        /// Where the subscript occurred.
        loc:   Location,
    },
    /// A subscript index was past the end of its container.
    IndexOutOfRange {
        /// `"array"` or `"string"`.
        container: &'static str,
        /// The index that was requested.
        index:     i64,
        /// The container's length.
        len:       usize,
        /// Where the subscript occurred.
        loc:       Location,
    },
    /// Integer division or modulo by zero.
    DivisionByZero {
        /// Where the operation occurred.
        loc: Location,
    },
    /// A conversion builtin received text it can not parse.
    InvalidConversion {
        /// The conversion target type name.
        target:   &'static str,
        /// The text that failed to parse.
        argument: String,
        /// Where the call occurred.
        loc:      Location,
    },
    /// A call in expression position returned no value.
    MissingReturn {
        /// The name of the function.
        function: String,
        /// Where the call occurred.
        loc:      Location,
    },
    /// A function recursed past the interpreter's limit.
    RecursionLimit {
        /// The name of the function.
        function: String,
        /// The limit that was exceeded.
        limit:    usize,
        /// Where the call occurred.
        loc:      Location,
    },
    /// A range value escaped into a position where ranges are not legal.
    StrayRange {
        /// Where the range was used.
        loc: Location,
    },
    /// A method was called on a value that does not provide it.
    UnknownMethod {
        /// The method name.
        method: String,
        /// The type of the receiver.
        object: String,
        /// Where the call occurred.
        loc:    Location,
    },
    /// The host shell could not be started for `system()`.
    ShellFailure {
        /// The operating system error text.
        message: String,
        /// Where the call occurred.
        loc:     Location,
    },
}

impl std::fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownVariable { name, loc } => {
                write!(f, "error at {loc}: variable '{name}' does not exist")
            },
            Self::UnknownFunction { name, loc } => {
                write!(f, "error at {loc}: function '{name}' does not exist")
            },
            Self::TypeMismatch { what, expected, loc } => {
                write!(f, "error at {loc}: {what}\n  note: {expected}")
            },
            Self::ArgumentCount { function,
                                  expected,
                                  found,
                                  loc, } => {
                write!(f,
                       "error at {loc}: function call '{function}' was given {found} argument(s)\n  note: '{function}' takes {expected} argument(s)")
            },
            Self::IndexType { found, loc } => {
                write!(f,
                       "error at {loc}: subscript operator's index is currently type '{found}'\n  note: index can only be type 'int'")
            },
            Self::NegativeIndex { index, loc } => {
                write!(f,
                       "error at {loc}: subscript operator contains the negative value '{index}'\n  note: index can only be a non-negative integer")
            },
            Self::IndexOutOfRange { container,
                                    index,
                                    len,
                                    loc, } => {
                write!(f,
                       "error at {loc}: subscript operator is out of range for {container}\n  note: index is value '{index}' but {container} length is value '{len}'")
            },
            Self::DivisionByZero { loc } => {
                write!(f, "error at {loc}: division by zero")
            },
            Self::InvalidConversion { target,
                                      argument,
                                      loc, } => {
                write!(f,
                       "error at {loc}: '{argument}' cannot be converted into type '{target}'\n  note: argument can only be a number in the form of a string")
            },
            Self::MissingReturn { function, loc } => {
                write!(f,
                       "error at {loc}: function call '{function}' does not return a value in expression\n  note: functions must return a value when used in an expression")
            },
            Self::RecursionLimit { function, limit, loc } => {
                write!(f,
                       "error at {loc}: function call '{function}' exceeds the recursion limit of {limit}")
            },
            Self::StrayRange { loc } => {
                write!(f,
                       "error at {loc}: range is used outside of a loop range or an array\n  note: ranges can only appear as a loop range or inside an array")
            },
            Self::UnknownMethod { method, object, loc } => {
                write!(f, "error at {loc}: type '{object}' has no method '{method}'")
            },
            Self::ShellFailure { message, loc } => {
                write!(f, "error at {loc}: the host shell could not be run\n  note: {message}")
            },
        }
    }
}

impl std::error::Error for RuntimeError {}
