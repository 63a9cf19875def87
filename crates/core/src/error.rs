//! Error types for pipebench
//!
//! This module defines all error types used throughout the workspace.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.

use std::io;
use thiserror::Error;

/// Result type alias for pipebench operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for catalog assembly and collection population
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error (config files, output)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Index build failed during population; always fatal to the setup
    #[error("Index build failed on {collection} for {index}: {reason}")]
    IndexBuild {
        /// Collection the index was requested on
        collection: String,
        /// Conventional index name (e.g. `a_1`)
        index: String,
        /// Reason reported by the store
        reason: String,
    },

    /// Unordered bulk insert left fewer documents than requested
    #[error("Bulk write on {collection} inserted {inserted} of {expected} documents")]
    IncompleteBulkWrite {
        /// Collection that was populated
        collection: String,
        /// Documents requested
        expected: u64,
        /// Documents present after the write
        inserted: u64,
    },

    /// The last-error barrier reported a failed write
    #[error("Write failed on {collection}: {reason}")]
    WriteFailed {
        /// Collection the write targeted
        collection: String,
        /// Reason reported by the store
        reason: String,
    },

    /// Malformed index specification
    #[error("Invalid index spec: {0}")]
    InvalidIndexSpec(String),

    /// Two test cases registered under the same name
    #[error("Duplicate test case: {0}")]
    DuplicateTestCase(String),

    /// Lookup of an unknown test case
    #[error("Test case not found: {0}")]
    TestCaseNotFound(String),

    /// Configuration could not be loaded or is invalid
    #[error("Config error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl Error {
    /// Whether this error aborts a populate run rather than describing bad input
    pub fn is_setup_failure(&self) -> bool {
        matches!(
            self,
            Error::IndexBuild { .. } | Error::IncompleteBulkWrite { .. } | Error::WriteFailed { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_index_build() {
        let err = Error::IndexBuild {
            collection: "coll".to_string(),
            index: "geo_2d".to_string(),
            reason: "location object expected".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("Index build failed"));
        assert!(msg.contains("geo_2d"));
        assert!(msg.contains("location object expected"));
    }

    #[test]
    fn test_error_display_incomplete_bulk_write() {
        let err = Error::IncompleteBulkWrite {
            collection: "coll".to_string(),
            expected: 500,
            inserted: 499,
        };
        let msg = err.to_string();
        assert!(msg.contains("499"));
        assert!(msg.contains("500"));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "access denied");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_error_from_serde_json() {
        let result: std::result::Result<u32, _> = serde_json::from_str("not json");
        let err: Error = result.unwrap_err().into();
        assert!(matches!(err, Error::Serialization(_)));
    }

    #[test]
    fn test_setup_failure_classification() {
        assert!(Error::WriteFailed {
            collection: "c".to_string(),
            reason: "r".to_string()
        }
        .is_setup_failure());
        assert!(!Error::DuplicateTestCase("x".to_string()).is_setup_failure());
        assert!(!Error::Config("bad".to_string()).is_setup_failure());
    }
}
