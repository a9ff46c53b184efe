/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 16/10/26
******************************************************************************/

//! Error types for dictionary loading and compilation.

use fixspec_core::SchemaError;
use thiserror::Error;

/// Error type for document loading.
#[derive(Debug, Error)]
pub enum ParseError {
    /// XML parsing error.
    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Missing required attribute.
    #[error("missing required attribute '{attribute}' on element '{element}'")]
    MissingAttribute {
        /// Element name.
        element: String,
        /// Attribute name.
        attribute: String,
    },

    /// Invalid attribute value.
    #[error("invalid value '{value}' for attribute '{attribute}' on element '{element}'")]
    InvalidAttribute {
        /// Element name.
        element: String,
        /// Attribute name.
        attribute: String,
        /// Invalid value.
        value: String,
    },

    /// A required dictionary section is absent.
    #[error("missing <{section}> section")]
    MissingSection {
        /// Section element name.
        section: String,
    },

    /// Invalid document structure.
    #[error("invalid document structure: {message}")]
    InvalidStructure {
        /// Error message.
        message: String,
    },

    /// UTF-8 decoding error.
    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::str::Utf8Error),
}

impl ParseError {
    /// Creates a missing attribute error.
    pub fn missing_attr(element: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self::MissingAttribute {
            element: element.into(),
            attribute: attribute.into(),
        }
    }

    /// Creates an invalid attribute error.
    pub fn invalid_attr(
        element: impl Into<String>,
        attribute: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self::InvalidAttribute {
            element: element.into(),
            attribute: attribute.into(),
            value: value.into(),
        }
    }

    /// Creates a missing section error.
    pub fn missing_section(section: impl Into<String>) -> Self {
        Self::MissingSection {
            section: section.into(),
        }
    }
}

/// Fatal error for one schema version, labelled with that version.
#[derive(Debug, Error)]
pub enum CompileError {
    /// The dictionary document could not be loaded.
    #[error("{version}: {source}")]
    Parse {
        /// Version label, e.g. `FIX 4.4`, or `unknown version`.
        version: String,
        /// Underlying parse error.
        #[source]
        source: ParseError,
    },

    /// The schema is inconsistent.
    #[error("{version}: {source}")]
    Schema {
        /// Version label, e.g. `FIX 4.4`.
        version: String,
        /// Underlying schema error.
        #[source]
        source: SchemaError,
    },
}

impl CompileError {
    /// Returns the label of the version that failed.
    #[must_use]
    pub fn version(&self) -> &str {
        match self {
            Self::Parse { version, .. } | Self::Schema { version, .. } => version,
        }
    }

    /// Returns the schema error, if this failure is a schema inconsistency.
    #[must_use]
    pub fn schema_error(&self) -> Option<&SchemaError> {
        match self {
            Self::Schema { source, .. } => Some(source),
            Self::Parse { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_error_names_version_and_field() {
        let err = CompileError::Schema {
            version: "FIX 4.4".to_string(),
            source: SchemaError::UnknownFieldType {
                field: "Frob".to_string(),
                type_name: "FROBNICATE".to_string(),
            },
        };
        assert_eq!(
            err.to_string(),
            "FIX 4.4: unknown field type 'FROBNICATE' for field 'Frob'"
        );
        assert_eq!(err.version(), "FIX 4.4");
        assert!(err.schema_error().is_some());
    }

    #[test]
    fn test_parse_error_helpers() {
        let err = ParseError::missing_attr("fix", "major");
        assert_eq!(
            err.to_string(),
            "missing required attribute 'major' on element 'fix'"
        );
        let err = ParseError::missing_section("trailer");
        assert_eq!(err.to_string(), "missing <trailer> section");
    }
}
