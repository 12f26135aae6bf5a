//! Error types for kdmatch-io.

use std::path::PathBuf;

/// Error type for all fallible operations in the kdmatch-io crate.
///
/// Covers file system failures, malformed tab-delimited input, header
/// disagreements between the two point populations and invalid reader or
/// writer configuration.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// Returned when a required file does not exist on disk.
    #[error("file not found: {}", path.display())]
    FileNotFound {
        /// Path that could not be found.
        path: PathBuf,
    },

    /// Wraps an operating system error while reading or writing a file.
    #[error("i/o error on {}: {source}", path.display())]
    Io {
        /// File being accessed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Returned when a file has no header row.
    #[error("empty file: {}", path.display())]
    EmptyFile {
        /// Path to the empty file.
        path: PathBuf,
    },

    /// Returned when a data row has the wrong number of fields.
    #[error("{}:{line}: expected {expected} fields, got {got}", path.display())]
    FieldCount {
        /// File being parsed.
        path: PathBuf,
        /// 1-based line number.
        line: usize,
        /// Number of header columns.
        expected: usize,
        /// Number of fields on the line.
        got: usize,
    },

    /// Returned when a coordinate value cannot be used.
    #[error("{}:{line}: column '{column}': {reason}", path.display())]
    Parse {
        /// File being parsed.
        path: PathBuf,
        /// 1-based line number.
        line: usize,
        /// Header name of the offending column.
        column: String,
        /// Description of the problem.
        reason: String,
    },

    /// Returned when anchor and candidate files disagree on their columns.
    #[error("header mismatch: anchors have [{anchor}], candidates have [{candidate}]")]
    HeaderMismatch {
        /// Anchor column names, comma-separated.
        anchor: String,
        /// Candidate column names, comma-separated.
        candidate: String,
    },

    /// Returned when one or more validation checks fail.
    #[error("{count} validation error(s): {details}")]
    Validation {
        /// Number of accumulated validation failures.
        count: usize,
        /// Human-readable summary of the failures.
        details: String,
    },
}

impl IoError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        IoError::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_file_not_found() {
        let err = IoError::FileNotFound {
            path: PathBuf::from("/tmp/missing.txt"),
        };
        assert_eq!(err.to_string(), "file not found: /tmp/missing.txt");
    }

    #[test]
    fn display_io() {
        let err = IoError::io(
            "/tmp/out.txt",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(err.to_string(), "i/o error on /tmp/out.txt: denied");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn display_empty_file() {
        let err = IoError::EmptyFile {
            path: PathBuf::from("cases.txt"),
        };
        assert_eq!(err.to_string(), "empty file: cases.txt");
    }

    #[test]
    fn display_field_count() {
        let err = IoError::FieldCount {
            path: PathBuf::from("cases.txt"),
            line: 4,
            expected: 3,
            got: 2,
        };
        assert_eq!(err.to_string(), "cases.txt:4: expected 3 fields, got 2");
    }

    #[test]
    fn display_parse() {
        let err = IoError::Parse {
            path: PathBuf::from("controls.txt"),
            line: 12,
            column: "pc1".to_string(),
            reason: "invalid float literal".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "controls.txt:12: column 'pc1': invalid float literal"
        );
    }

    #[test]
    fn display_header_mismatch() {
        let err = IoError::HeaderMismatch {
            anchor: "id, pc1, pc2".to_string(),
            candidate: "id, pc1".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "header mismatch: anchors have [id, pc1, pc2], candidates have [id, pc1]"
        );
    }

    #[test]
    fn display_validation() {
        let err = IoError::Validation {
            count: 2,
            details: "unknown group column 'sex'; scale for 'pc9' is not finite".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "2 validation error(s): unknown group column 'sex'; scale for 'pc9' is not finite"
        );
    }

    #[test]
    fn error_is_send_sync_and_std_error() {
        fn assert_bounds<T: Send + Sync + std::error::Error>() {}
        assert_bounds::<IoError>();
    }
}
