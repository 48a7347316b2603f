//! Error types for command registration and dispatch.
//!
//! Only configuration mistakes and handler failures are errors. Recoverable
//! user-facing conditions (missing permission, wrong argument count, a token
//! that does not parse) are reported through [`Outcome`](crate::Outcome)
//! instead.

use thiserror::Error;

use crate::types::ParameterType;
use crate::validate::ValidationError;

/// Errors that can occur while registering or dispatching commands.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// A declared parameter type has no resolver in the context registry.
    #[error("no resolver for type {0}")]
    MissingResolver(ParameterType),

    /// A root alias is already owned by a different root command.
    #[error("alias '{alias}' is already registered by root command '{existing}'")]
    DuplicateRootAlias {
        /// The colliding alias.
        alias: String,
        /// Primary alias of the root that already owns it.
        existing: String,
    },

    /// Two different children would share one alias under the same parent.
    #[error("child alias '{alias}' is already registered under '{parent}'")]
    DuplicateChildAlias {
        /// Primary alias of the parent command.
        parent: String,
        /// The colliding child alias.
        alias: String,
    },

    /// The command tree failed structural validation.
    #[error("invalid command: {0}")]
    InvalidCommand(#[from] ValidationError),

    /// The invoked handler reported a failure.
    #[error("handler failed: {0}")]
    Handler(#[from] HandlerError),

    /// File I/O failure while loading or saving configuration.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),
}

/// Failure returned by a command handler.
///
/// # Examples
///
/// ```
/// use command_dispatch_core::HandlerError;
///
/// let err = HandlerError::new("player is offline");
/// assert_eq!(err.to_string(), "player is offline");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct HandlerError {
    message: String,
}

impl HandlerError {
    /// Creates a handler error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Returns the message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Convenience alias for results with [`DispatchError`].
pub type Result<T> = std::result::Result<T, DispatchError>;
