//! Error kinds raised by the object model.
//!
//! Every variant maps onto a language-level exception class. The core never
//! recovers from these itself; they are handed back to the caller, which
//! turns them into exceptions.

use crate::intern::InternedString;

/// Runtime error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GarnetError {
    /// Wrong kind of value where a class or module was required.
    TypeError { message: String },

    /// Invalid argument, e.g. a cyclic include.
    ArgumentError { message: String },

    /// Mutation of a frozen class, module or object.
    FrozenError { message: String },

    /// A name is bound to something other than what was expected.
    NameError {
        name: InternedString,
        message: String,
    },
}

impl GarnetError {
    /// Build a `TypeError`.
    pub fn type_error(message: impl Into<String>) -> Self {
        GarnetError::TypeError {
            message: message.into(),
        }
    }

    /// Build an `ArgumentError`.
    pub fn argument_error(message: impl Into<String>) -> Self {
        GarnetError::ArgumentError {
            message: message.into(),
        }
    }

    /// Build a `FrozenError`.
    pub fn frozen_error(message: impl Into<String>) -> Self {
        GarnetError::FrozenError {
            message: message.into(),
        }
    }

    /// Build a `NameError` for `name`.
    pub fn name_error(name: InternedString, message: impl Into<String>) -> Self {
        GarnetError::NameError {
            name,
            message: message.into(),
        }
    }

    /// Exception class name as seen by user code.
    pub fn kind_name(&self) -> &'static str {
        match self {
            GarnetError::TypeError { .. } => "TypeError",
            GarnetError::ArgumentError { .. } => "ArgumentError",
            GarnetError::FrozenError { .. } => "FrozenError",
            GarnetError::NameError { .. } => "NameError",
        }
    }

    /// The message without the kind prefix.
    pub fn message(&self) -> &str {
        match self {
            GarnetError::TypeError { message }
            | GarnetError::ArgumentError { message }
            | GarnetError::FrozenError { message }
            | GarnetError::NameError { message, .. } => message,
        }
    }
}

impl std::fmt::Display for GarnetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind_name(), self.message())
    }
}

impl std::error::Error for GarnetError {}

/// Result alias used throughout the runtime.
pub type GarnetResult<T> = Result<T, GarnetError>;
