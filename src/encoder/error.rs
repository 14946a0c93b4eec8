use std::fmt;

use crate::wire::WriteError;

/// Errors that can occur while encoding an expression
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EncodeError {
    /// A foreign value has no registered codec and the encoder rejects text fallback
    #[error("no wire encoding for value of type {type_name}")]
    Unrepresentable { type_name: String },

    /// A number outside the range of a 128-bit decimal
    #[error("number {value} is out of range for a decimal")]
    NumberOutOfRange { value: String },

    /// Number text that does not parse as a decimal
    #[error("'{text}' is not a valid decimal number")]
    InvalidNumber { text: String },

    /// The writer rejected a call
    #[error(transparent)]
    Write(#[from] WriteError),
}

impl EncodeError {
    /// Create an Unrepresentable error
    pub fn unrepresentable(type_name: impl Into<String>) -> Self {
        Self::Unrepresentable {
            type_name: type_name.into(),
        }
    }

    /// Create a NumberOutOfRange error
    pub fn number_out_of_range(value: impl fmt::Display) -> Self {
        Self::NumberOutOfRange {
            value: value.to_string(),
        }
    }

    /// Create an InvalidNumber error
    pub fn invalid_number(text: impl Into<String>) -> Self {
        Self::InvalidNumber { text: text.into() }
    }
}
