//! Error types.

use thiserror::Error;

/// Error parsing an invalid string representation of UUID.
///
/// Carries the rejected input verbatim so that callers can report it.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Error)]
#[error("invalid input syntax for type uuid: \"{input}\"")]
pub struct ParseError {
    input: String,
}

impl ParseError {
    pub(crate) fn new(input: &str) -> Self {
        Self {
            input: input.to_owned(),
        }
    }

    /// Returns the text that failed to parse.
    pub fn input(&self) -> &str {
        &self.input
    }
}

/// Errors reported by the operations of this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed textual representation.
    #[error(transparent)]
    InvalidSyntax(#[from] ParseError),

    /// Fewer than 16 bytes were available to decode a binary UUID.
    #[error("insufficient data left in message: need 16 bytes, {remaining} remaining")]
    TruncatedInput { remaining: usize },

    /// The strong random source could not supply bytes.
    #[error("could not generate random values")]
    RandomSourceFailure(#[source] rand::Error),
}

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;
