//! Accumulated validation utilities.
//!
//! Provides [`ValidationCollector`] for gathering multiple validation errors
//! into a single [`IoError::Validation`], plus the header agreement check
//! between anchor and candidate files.

use crate::error::IoError;

/// Accumulates validation errors and converts them into a single
/// [`IoError::Validation`].
///
/// Create a collector, push zero or more error messages, then call
/// [`finish`](Self::finish) to obtain `Ok(())` when everything is valid or a
/// single `Err` that summarises every violation.
pub(crate) struct ValidationCollector {
    errors: Vec<String>,
}

impl ValidationCollector {
    pub(crate) fn new() -> Self {
        Self { errors: Vec::new() }
    }

    pub(crate) fn push(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.errors.len()
    }

    /// Consume the collector. The `details` string joins all messages
    /// with `"; "`.
    pub(crate) fn finish(self) -> Result<(), IoError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(IoError::Validation {
                count: self.errors.len(),
                details: self.errors.join("; "),
            })
        }
    }
}

/// Checks that anchors and candidates share the same columns in the same
/// order.
///
/// Matching compares coordinate vectors position by position, so any
/// difference in naming or order is fatal.
///
/// # Errors
///
/// Returns [`IoError::HeaderMismatch`] listing both headers.
///
/// # Example
///
/// ```
/// use kdmatch_io::check_headers;
///
/// let a = vec!["id".to_string(), "pc1".to_string()];
/// assert!(check_headers(&a, &a).is_ok());
/// assert!(check_headers(&a, &a[..1]).is_err());
/// ```
pub fn check_headers(anchor: &[String], candidate: &[String]) -> Result<(), IoError> {
    if anchor == candidate {
        return Ok(());
    }
    Err(IoError::HeaderMismatch {
        anchor: anchor.join(", "),
        candidate: candidate.join(", "),
    })
}
