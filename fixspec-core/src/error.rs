/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 16/10/26
******************************************************************************/

//! Error types for schema construction and resolution.
//!
//! Every variant of [`SchemaError`] is fatal for the version being compiled:
//! construction halts and no artifact is produced for that version.

use thiserror::Error;

/// Fatal errors raised while building or resolving a FIX schema.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// Malformed field declaration (missing or non-numeric tag, missing name, ...).
    #[error("invalid field '{name}': {reason}")]
    InvalidField {
        /// Name of the field, or `<unnamed>` when absent.
        name: String,
        /// Description of what is wrong with the declaration.
        reason: String,
    },

    /// Two fields declare the same tag number.
    #[error("duplicate tag {tag}: field '{name}' collides with '{existing}'")]
    DuplicateTag {
        /// The colliding tag number.
        tag: u32,
        /// Name of the field being registered.
        name: String,
        /// Name of the field that already owns the tag.
        existing: String,
    },

    /// Two definitions of the same kind share a name.
    #[error("duplicate {kind} name '{name}'")]
    DuplicateName {
        /// Kind of definition (field, component, message).
        kind: String,
        /// The duplicated name.
        name: String,
    },

    /// Declared type string is not a recognized FIX field type.
    #[error("unknown field type '{type_name}' for field '{field}'")]
    UnknownFieldType {
        /// Name of the field declaring the type.
        field: String,
        /// The unrecognized type string.
        type_name: String,
    },

    /// A header member names no registered field.
    #[error("header member '{name}' does not resolve to a registered field")]
    UnresolvedHeaderField {
        /// The unresolved member name.
        name: String,
    },

    /// A trailer member names no registered field.
    #[error("trailer member '{name}' does not resolve to a registered field")]
    UnresolvedTrailerField {
        /// The unresolved member name.
        name: String,
    },

    /// A member names neither a registered field nor a registered component.
    #[error("unresolved reference '{name}' in {context}")]
    UnresolvedComponentReference {
        /// The unresolved member name.
        name: String,
        /// Where the reference was found (message or component name).
        context: String,
    },

    /// A component (directly or transitively) references itself.
    #[error("cyclic component reference: {path}")]
    CyclicComponentReference {
        /// Expansion path, e.g. `A -> B -> A`.
        path: String,
    },

    /// Malformed message declaration.
    #[error("invalid message '{name}': {reason}")]
    InvalidMessage {
        /// Name of the message.
        name: String,
        /// Description of what is wrong with the declaration.
        reason: String,
    },
}

impl SchemaError {
    /// Creates an invalid field error.
    pub fn invalid_field(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Creates a duplicate name error.
    pub fn duplicate_name(kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self::DuplicateName {
            kind: kind.into(),
            name: name.into(),
        }
    }

    /// Creates an unresolved reference error.
    pub fn unresolved(name: impl Into<String>, context: impl Into<String>) -> Self {
        Self::UnresolvedComponentReference {
            name: name.into(),
            context: context.into(),
        }
    }

    /// Creates an invalid message error.
    pub fn invalid_message(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidMessage {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_field_type_display() {
        let err = SchemaError::UnknownFieldType {
            field: "Frob".to_string(),
            type_name: "FROBNICATE".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "unknown field type 'FROBNICATE' for field 'Frob'"
        );
    }

    #[test]
    fn test_duplicate_tag_display() {
        let err = SchemaError::DuplicateTag {
            tag: 35,
            name: "MsgKind".to_string(),
            existing: "MsgType".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "duplicate tag 35: field 'MsgKind' collides with 'MsgType'"
        );
    }

    #[test]
    fn test_unresolved_helper() {
        let err = SchemaError::unresolved("Parties", "message 'NewOrderSingle'");
        assert!(matches!(
            err,
            SchemaError::UnresolvedComponentReference { ref name, .. } if name == "Parties"
        ));
        assert_eq!(
            err.to_string(),
            "unresolved reference 'Parties' in message 'NewOrderSingle'"
        );
    }
}
