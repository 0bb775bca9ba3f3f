//! Core type definitions with validation.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation errors for core types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The provided value was empty.
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    /// A minute value fell outside a single day.
    #[error("time of day must be within 00:00..24:00, got {minutes} minutes")]
    MinuteOutOfRange { minutes: i32 },
}

/// Generates a validated string ID newtype with common trait implementations.
macro_rules! define_string_id {
    (
        $(#[$meta:meta])*
        $name:ident, $field_name:literal
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Creates a new ID after validation.
            pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
                let id = id.into();
                if id.is_empty() {
                    return Err(ValidationError::Empty { field: $field_name });
                }
                Ok(Self(id))
            }

            /// Returns the ID as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_string_id!(
    /// A validated logged-nap identifier.
    ///
    /// Nap IDs must be non-empty strings. They are assigned by whoever records
    /// the nap (the store, or a test fixture) and must be unique within a day.
    NapId, "nap ID"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nap_id_rejects_empty() {
        assert!(NapId::new("").is_err());
        assert!(NapId::new("nap-1").is_ok());
    }

    #[test]
    fn nap_id_serializes_as_plain_string() {
        let id = NapId::new("nap-123").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"nap-123\"");
        let parsed: NapId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn nap_id_serde_rejects_empty() {
        let result: Result<NapId, _> = serde_json::from_str("\"\"");
        assert!(result.is_err());
    }

    #[test]
    fn empty_error_names_the_field() {
        let err = NapId::new("").unwrap_err();
        assert_eq!(err.to_string(), "nap ID cannot be empty");
    }
}
