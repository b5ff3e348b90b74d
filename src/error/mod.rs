//! Error types for chunkstr.

use thiserror::Error;

/// Errors that can occur while building or reading text.
///
/// Every operation validates its arguments before touching chunk storage, so
/// receiving one of these errors means the builder contents are unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuilderError {
    /// A byte offset lies outside `[0, len]`.
    #[error("index {index} out of range for length {len}")]
    IndexOutOfRange {
        /// The offset that was requested.
        index: usize,
        /// The builder length at the time of the call.
        len: usize,
    },

    /// A byte range does not fit inside the current contents.
    #[error("range of {length} bytes at {start} out of range for length {len}")]
    RangeOutOfRange {
        /// Start of the requested range.
        start: usize,
        /// Length of the requested range.
        length: usize,
        /// The builder length at the time of the call.
        len: usize,
    },

    /// A value was rejected before being appended.
    #[error("invalid argument: {message}")]
    InvalidArgument {
        /// Description of what was invalid.
        message: String,
    },

    /// Invalid configuration parameter.
    #[error("invalid config: {message}")]
    InvalidConfig {
        /// Description of what was invalid.
        message: &'static str,
    },

    /// The contents are not valid UTF-8 and cannot become a `String`.
    #[error("contents are not valid utf-8 (valid up to byte {valid_up_to})")]
    InvalidUtf8 {
        /// Length of the longest valid prefix.
        valid_up_to: usize,
    },
}

impl BuilderError {
    /// Checks that `index` is a valid insertion point for `len` bytes.
    pub(crate) fn check_index(index: usize, len: usize) -> Result<(), Self> {
        if index > len {
            return Err(Self::IndexOutOfRange { index, len });
        }
        Ok(())
    }

    /// Checks that `start..start + length` lies within `len` bytes.
    pub(crate) fn check_range(start: usize, length: usize, len: usize) -> Result<(), Self> {
        if start > len || length > len - start {
            return Err(Self::RangeOutOfRange { start, length, len });
        }
        Ok(())
    }
}

impl From<BuilderError> for std::io::Error {
    fn from(e: BuilderError) -> Self {
        let kind = match e {
            BuilderError::InvalidUtf8 { .. } => std::io::ErrorKind::InvalidData,
            _ => std::io::ErrorKind::InvalidInput,
        };
        std::io::Error::new(kind, e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_index() {
        assert!(BuilderError::check_index(0, 0).is_ok());
        assert!(BuilderError::check_index(5, 5).is_ok());
        assert_eq!(
            BuilderError::check_index(6, 5),
            Err(BuilderError::IndexOutOfRange { index: 6, len: 5 })
        );
    }

    #[test]
    fn test_check_range() {
        assert!(BuilderError::check_range(0, 5, 5).is_ok());
        assert!(BuilderError::check_range(5, 0, 5).is_ok());
        assert!(BuilderError::check_range(2, 4, 5).is_err());
        assert!(BuilderError::check_range(6, 0, 5).is_err());
        // Must not overflow on huge lengths
        assert!(BuilderError::check_range(1, usize::MAX, 5).is_err());
    }

    #[test]
    fn test_display() {
        let err = BuilderError::IndexOutOfRange { index: 9, len: 3 };
        assert!(err.to_string().contains("out of range"));

        let err = BuilderError::InvalidArgument {
            message: "negative".into(),
        };
        assert!(err.to_string().contains("invalid argument"));
    }

    #[test]
    fn test_io_error_conversion() {
        let err: std::io::Error = BuilderError::InvalidUtf8 { valid_up_to: 2 }.into();
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
    }
}
