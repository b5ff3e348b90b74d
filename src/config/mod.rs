//! Configuration for builder behavior.
//!
//! This module provides types to configure how a builder lays out its chunks:
//!
//! - [`BuilderConfig`] - Chunk capacity and line terminator
//! - [`LineTerminator`] - The bytes written by `append_line`
//!
//! # Example
//!
//! ```
//! use chunkstr::{BuilderConfig, LineTerminator};
//!
//! // Custom chunk capacity
//! let config = BuilderConfig::new(1024)?;
//!
//! // Windows line endings
//! let config = BuilderConfig::default()
//!     .with_line_terminator(LineTerminator::CrLf);
//!
//! # Ok::<(), chunkstr::BuilderError>(())
//! ```

use crate::error::BuilderError;

/// Default chunk capacity in bytes.
pub const DEFAULT_CHUNK_CAPACITY: usize = 256;

/// Configuration for a [`Utf8Builder`](crate::Utf8Builder).
///
/// The chunk capacity is the size of every chunk allocated by appends and the
/// size of the single fresh chunk installed by `clear`. It is the only growth
/// knob: chunks are never resized after they are allocated.
///
/// # Example
///
/// ```
/// use chunkstr::BuilderConfig;
///
/// // Use default configuration
/// let config = BuilderConfig::default();
///
/// // Custom configuration
/// let config = BuilderConfig::new(4096)?;
///
/// // Builder pattern
/// let config = BuilderConfig::default().with_chunk_capacity(64);
/// # Ok::<(), chunkstr::BuilderError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BuilderConfig {
    /// Capacity of newly allocated chunks in bytes.
    chunk_capacity: usize,

    /// Terminator emitted after each line.
    line_terminator: LineTerminator,
}

impl BuilderConfig {
    /// Creates a new configuration with the given chunk capacity.
    ///
    /// # Errors
    ///
    /// Returns [`BuilderError::InvalidConfig`] if `chunk_capacity` is zero.
    ///
    /// # Example
    ///
    /// ```
    /// use chunkstr::BuilderConfig;
    ///
    /// let config = BuilderConfig::new(300)?;
    /// assert_eq!(config.chunk_capacity(), 300);
    /// # Ok::<(), chunkstr::BuilderError>(())
    /// ```
    pub fn new(chunk_capacity: usize) -> Result<Self, BuilderError> {
        if chunk_capacity == 0 {
            return Err(BuilderError::InvalidConfig {
                message: "chunk capacity must be non-zero",
            });
        }

        Ok(Self {
            chunk_capacity,
            line_terminator: LineTerminator::default(),
        })
    }

    /// Sets the chunk capacity.
    ///
    /// Note: This does not validate the configuration. Use
    /// [`BuilderConfig::validate`] to check if the configuration is valid.
    pub fn with_chunk_capacity(mut self, capacity: usize) -> Self {
        self.chunk_capacity = capacity;
        self
    }

    /// Sets the line terminator.
    pub fn with_line_terminator(mut self, terminator: LineTerminator) -> Self {
        self.line_terminator = terminator;
        self
    }

    /// Returns the chunk capacity.
    pub fn chunk_capacity(&self) -> usize {
        self.chunk_capacity
    }

    /// Returns the line terminator.
    pub fn line_terminator(&self) -> LineTerminator {
        self.line_terminator
    }

    /// Validates the current configuration.
    ///
    /// # Example
    ///
    /// ```
    /// use chunkstr::BuilderConfig;
    ///
    /// let config = BuilderConfig::default().with_chunk_capacity(0);
    /// assert!(config.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(), BuilderError> {
        Self::new(self.chunk_capacity).map(|_| ())
    }
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            chunk_capacity: DEFAULT_CHUNK_CAPACITY,
            line_terminator: LineTerminator::default(),
        }
    }
}

/// Line terminator written by `append_line` and `append_newline`.
///
/// Defaults to the platform convention: `CrLf` on Windows, `Lf` elsewhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineTerminator {
    /// `"\n"`
    Lf,
    /// `"\r\n"`
    CrLf,
}

impl LineTerminator {
    /// Returns the terminator bytes.
    pub const fn as_bytes(self) -> &'static [u8] {
        match self {
            LineTerminator::Lf => b"\n",
            LineTerminator::CrLf => b"\r\n",
        }
    }

    /// Returns the terminator as text.
    pub const fn as_str(self) -> &'static str {
        match self {
            LineTerminator::Lf => "\n",
            LineTerminator::CrLf => "\r\n",
        }
    }
}

impl Default for LineTerminator {
    fn default() -> Self {
        if cfg!(windows) {
            LineTerminator::CrLf
        } else {
            LineTerminator::Lf
        }
    }
}
