//! Error types for Avrolink core operations.
//!
//! This module defines the error types used throughout the `avrolink-core` crate.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in Avrolink core operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Schema text could not be compiled into a codec.
    #[error("Failed to compile schema: {source}")]
    SchemaCompile {
        /// Underlying Avro error.
        #[source]
        source: apache_avro::Error,
    },

    /// A value could not be encoded with the codec's schema.
    #[error("Failed to encode value: {reason}")]
    Encode {
        /// Reason for the encoding failure.
        reason: String,
    },

    /// A payload could not be decoded with the codec's schema.
    #[error("Failed to decode payload: {reason}")]
    Decode {
        /// Reason for the decoding failure.
        reason: String,
    },

    /// The bytes do not form a valid wire envelope.
    #[error("Invalid envelope: {reason}")]
    InvalidEnvelope {
        /// Reason the envelope is invalid.
        reason: String,
    },

    /// A properties file could not be read.
    #[error("Failed to read properties from {path}: {source}")]
    PropertiesIo {
        /// Path to the properties file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A properties line could not be parsed.
    #[error("Invalid property at line {line}: {reason}")]
    InvalidProperty {
        /// One-based line number.
        line: usize,
        /// Reason the line is invalid.
        reason: String,
    },

    /// A required property is missing.
    #[error("Missing required property: {key}")]
    MissingProperty {
        /// Property key.
        key: String,
    },

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_invalid_envelope() {
        let err = Error::InvalidEnvelope {
            reason: "unknown magic byte 0x01".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid envelope: unknown magic byte 0x01");
    }

    #[test]
    fn test_error_display_invalid_property() {
        let err = Error::InvalidProperty {
            line: 3,
            reason: "missing '='".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid property at line 3: missing '='");
    }

    #[test]
    fn test_error_display_missing_property() {
        let err = Error::MissingProperty {
            key: "schema.registry.url".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Missing required property: schema.registry.url"
        );
    }

    #[test]
    fn test_error_from_serde_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Serialization(_)));
    }
}
