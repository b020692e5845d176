//! Runtime call failure domain.
//!
//! Failures raised by user code ([`CallError::Raised`]) pass through the
//! dispatch machinery unmodified; every other variant is produced by the
//! boxing/unboxing discipline itself. Factory constructors are the public
//! construction surface.

use crate::Value;
use std::fmt;

/// Result of a dynamic call.
pub type CallResult = Result<Value, CallError>;

/// Failure of a dynamic call.
#[derive(Clone, Debug, PartialEq)]
pub enum CallError {
    /// A failure value raised by a handler or an underlying method.
    /// Propagates to the original caller unchanged.
    Raised(Value),

    /// Null where an exact primitive was declared.
    NullUnboxed {
        /// Display form of the declared tag.
        expected: String,
    },

    /// A returned value that cannot be narrowed to the declared return tag.
    ReturnMismatch {
        /// Display form of the declared tag.
        expected: String,
        /// Kind of the value actually returned.
        found: String,
    },

    /// An argument that does not match its declared parameter tag.
    ArgMismatch {
        /// Method name.
        method: String,
        /// Zero-based argument position.
        index: usize,
        /// Display form of the declared tag.
        expected: String,
        /// Kind of the value actually passed.
        found: String,
    },

    /// Wrong number of arguments.
    WrongArgCount {
        /// Method name.
        method: String,
        /// Declared parameter count.
        expected: usize,
        /// Arguments actually passed.
        found: usize,
    },

    /// No method with the given name (and admissible arguments) exists.
    NoSuchMethod {
        /// Method name.
        method: String,
        /// Qualified name of the dispatch type.
        type_name: String,
    },

    /// An invocation target that is not an object.
    NotAnObject {
        /// Kind of the value actually targeted.
        found: String,
    },

    /// An invocation target that does not implement the declaring contract.
    DoesNotImplement {
        /// Qualified name of the target's type.
        type_name: String,
        /// Qualified name of the declaring contract.
        contract: String,
    },
}

impl fmt::Display for CallError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallError::Raised(value) => write!(f, "raised: {value:?}"),
            CallError::NullUnboxed { expected } => {
                write!(f, "null cannot be unboxed to `{expected}`")
            }
            CallError::ReturnMismatch { expected, found } => {
                write!(f, "returned value is `{found}`, declared return is `{expected}`")
            }
            CallError::ArgMismatch {
                method,
                index,
                expected,
                found,
            } => write!(
                f,
                "argument {index} of `{method}` is `{found}`, declared as `{expected}`"
            ),
            CallError::WrongArgCount {
                method,
                expected,
                found,
            } => write!(
                f,
                "`{method}` takes {expected} argument(s), {found} provided"
            ),
            CallError::NoSuchMethod { method, type_name } => {
                write!(f, "no method `{method}` on `{type_name}`")
            }
            CallError::NotAnObject { found } => {
                write!(f, "invocation target is `{found}`, not an object")
            }
            CallError::DoesNotImplement { type_name, contract } => {
                write!(f, "`{type_name}` does not implement `{contract}`")
            }
        }
    }
}

impl std::error::Error for CallError {}

// Factory constructors

/// A failure value raised by user code.
pub fn raised(value: Value) -> CallError {
    CallError::Raised(value)
}

/// Null where an exact primitive was declared.
pub fn null_unboxed(expected: impl Into<String>) -> CallError {
    CallError::NullUnboxed {
        expected: expected.into(),
    }
}

/// A returned value that cannot be narrowed to the declared return tag.
pub fn return_mismatch(expected: impl Into<String>, found: impl Into<String>) -> CallError {
    CallError::ReturnMismatch {
        expected: expected.into(),
        found: found.into(),
    }
}

/// An argument that does not match its declared parameter tag.
pub fn arg_mismatch(
    method: impl Into<String>,
    index: usize,
    expected: impl Into<String>,
    found: impl Into<String>,
) -> CallError {
    CallError::ArgMismatch {
        method: method.into(),
        index,
        expected: expected.into(),
        found: found.into(),
    }
}

/// Wrong number of arguments.
pub fn wrong_arg_count(method: impl Into<String>, expected: usize, found: usize) -> CallError {
    CallError::WrongArgCount {
        method: method.into(),
        expected,
        found,
    }
}

/// No method with the given name exists on the type.
pub fn no_such_method(method: impl Into<String>, type_name: impl Into<String>) -> CallError {
    CallError::NoSuchMethod {
        method: method.into(),
        type_name: type_name.into(),
    }
}

/// An invocation target that is not an object.
pub fn not_an_object(found: impl Into<String>) -> CallError {
    CallError::NotAnObject {
        found: found.into(),
    }
}

/// An invocation target that does not implement the declaring contract.
pub fn does_not_implement(
    type_name: impl Into<String>,
    contract: impl Into<String>,
) -> CallError {
    CallError::DoesNotImplement {
        type_name: type_name.into(),
        contract: contract.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raised_round_trips_the_value() {
        let err = raised(Value::string("boom"));
        assert_eq!(err, CallError::Raised(Value::string("boom")));
    }

    #[test]
    fn test_display_messages() {
        let err = wrong_arg_count("bar", 1, 3);
        assert_eq!(err.to_string(), "`bar` takes 1 argument(s), 3 provided");

        let err = null_unboxed("i64");
        assert_eq!(err.to_string(), "null cannot be unboxed to `i64`");
    }
}
