//! Validated name newtypes for map entities
//!
//! These newtypes ensure that names are valid by construction:
//! - Non-empty
//! - Within length limits
//! - Trimmed of leading/trailing whitespace

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DomainError;

/// Maximum length for name fields (MapName, LocationName, RouteName, LayerName)
const MAX_NAME_LENGTH: usize = 200;

/// Maximum length for free-text fields such as annotations
const MAX_TEXT_LENGTH: usize = 5000;

macro_rules! define_name {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Create a new validated name.
            ///
            /// # Errors
            ///
            /// Returns `DomainError::Validation` if the trimmed name is empty
            /// or longer than 200 characters.
            pub fn new(name: impl Into<String>) -> Result<Self, DomainError> {
                let name = name.into();
                let trimmed = name.trim();
                if trimmed.is_empty() {
                    return Err(DomainError::validation(concat!($label, " cannot be empty")));
                }
                if trimmed.chars().count() > MAX_NAME_LENGTH {
                    return Err(DomainError::validation(format!(
                        concat!($label, " cannot exceed {} characters"),
                        MAX_NAME_LENGTH
                    )));
                }
                Ok(Self(trimmed.to_string()))
            }

            /// Returns the name as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = DomainError;

            fn try_from(s: String) -> Result<Self, Self::Error> {
                Self::new(s)
            }
        }

        impl From<$name> for String {
            fn from(name: $name) -> String {
                name.0
            }
        }
    };
}

define_name!(
    /// A validated world map name (non-empty, <=200 chars, trimmed)
    MapName,
    "Map name"
);
define_name!(
    /// A validated map location name
    LocationName,
    "Location name"
);
define_name!(
    /// A validated route name
    RouteName,
    "Route name"
);
define_name!(
    /// A validated layer name
    LayerName,
    "Layer name"
);

// ============================================================================
// NoteText
// ============================================================================

/// Annotation body text (non-empty, <=5000 chars). Inner whitespace and line
/// breaks are kept as written.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NoteText(String);

impl NoteText {
    pub fn new(text: impl Into<String>) -> Result<Self, DomainError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(DomainError::validation("Note text cannot be empty"));
        }
        if text.chars().count() > MAX_TEXT_LENGTH {
            return Err(DomainError::validation(format!(
                "Note text cannot exceed {} characters",
                MAX_TEXT_LENGTH
            )));
        }
        Ok(Self(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for NoteText {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<NoteText> for String {
    fn from(text: NoteText) -> String {
        text.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_trimmed() {
        let name = MapName::new("  The Western Reaches  ").unwrap();
        assert_eq!(name.as_str(), "The Western Reaches");
    }

    #[test]
    fn empty_names_are_rejected() {
        let err = LocationName::new("   ").unwrap_err();
        assert_eq!(err.to_string(), "Validation failed: Location name cannot be empty");
    }

    #[test]
    fn overlong_names_are_rejected() {
        let long = "x".repeat(MAX_NAME_LENGTH + 1);
        assert!(RouteName::new(long).is_err());
        assert!(RouteName::new("x".repeat(MAX_NAME_LENGTH)).is_ok());
    }

    #[test]
    fn deserialization_validates() {
        let result: Result<LayerName, _> = serde_json::from_str("\"\"");
        assert!(result.is_err());

        let name: LayerName = serde_json::from_str("\"Rivers\"").unwrap();
        assert_eq!(name.as_str(), "Rivers");
    }

    #[test]
    fn note_text_keeps_line_breaks() {
        let text = NoteText::new("Beware:\n  trolls under the bridge").unwrap();
        assert!(text.as_str().contains('\n'));
        assert!(NoteText::new("\n\t").is_err());
    }
}
