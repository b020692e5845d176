//! Invalid-configuration errors.
//!
//! Raised synchronously while validating a requested contract set, always
//! before any definition side effect. Never retried.

use std::fmt;

/// Invalid contract set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// A requested descriptor is not interface-kind.
    NotAnInterface {
        /// Qualified name of the offender.
        name: String,
    },

    /// The same contract appears twice in one request.
    DuplicateContract {
        /// Qualified name of the offender.
        name: String,
    },

    /// Non-public contracts from more than one namespace.
    MixedVisibility {
        /// First non-public namespace seen.
        first: String,
        /// Conflicting namespace.
        second: String,
    },

    /// Two merged contracts declare the same signature with different
    /// return types.
    ConflictingReturnTypes {
        /// Method name.
        method: String,
        /// Display form of the first declared return tag.
        first: String,
        /// Display form of the conflicting return tag.
        second: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NotAnInterface { name } => {
                write!(f, "`{name}` is not an interface-kind contract")
            }
            ConfigError::DuplicateContract { name } => {
                write!(f, "repeated contract: `{name}`")
            }
            ConfigError::MixedVisibility { first, second } => write!(
                f,
                "non-public contracts from different namespaces: `{first}` and `{second}`"
            ),
            ConfigError::ConflictingReturnTypes {
                method,
                first,
                second,
            } => write!(
                f,
                "merged contracts declare `{method}` with conflicting returns `{first}` and `{second}`"
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

// Factory constructors

/// A requested descriptor is not interface-kind.
pub fn not_an_interface(name: impl Into<String>) -> ConfigError {
    ConfigError::NotAnInterface { name: name.into() }
}

/// The same contract appears twice in one request.
pub fn duplicate_contract(name: impl Into<String>) -> ConfigError {
    ConfigError::DuplicateContract { name: name.into() }
}

/// Non-public contracts from more than one namespace.
pub fn mixed_visibility(first: impl Into<String>, second: impl Into<String>) -> ConfigError {
    ConfigError::MixedVisibility {
        first: first.into(),
        second: second.into(),
    }
}

/// Same signature, different return types, across merged contracts.
pub fn conflicting_return_types(
    method: impl Into<String>,
    first: impl Into<String>,
    second: impl Into<String>,
) -> ConfigError {
    ConfigError::ConflictingReturnTypes {
        method: method.into(),
        first: first.into(),
        second: second.into(),
    }
}
