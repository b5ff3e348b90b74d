//! The builder façade: one lock around a chunk chain.
//!
//! This module implements [`Utf8Builder`], the public face of the crate:
//!
//! - `append*` - grow the text at the end
//! - `insert` / `remove` - splice anywhere
//! - `to_bytes` / `to_text` - freeze into one contiguous copy
//!
//! # Example
//!
//! ```
//! use chunkstr::{BuilderConfig, Utf8Builder};
//!
//! let builder = Utf8Builder::new(BuilderConfig::new(8)?);
//! builder.append("Hello");
//! builder.append(", ");
//! builder.append("World!");
//!
//! assert_eq!(builder.to_text()?, "Hello, World!");
//! assert_eq!(builder.chunk_lengths(), vec![8, 5]);
//! # Ok::<(), chunkstr::BuilderError>(())
//! ```

use std::borrow::Cow;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use bytes::Bytes;

use crate::chunk::Chain;
use crate::config::BuilderConfig;
use crate::encode::{encode_utf16, utf16_byte_count};
use crate::error::BuilderError;
use crate::format::{AsFragment, Fragment, SCRATCH_LEN, append_scalar, encode_scalar};

/// A growable UTF-8 text buffer stored as a chain of fixed-capacity chunks.
///
/// Appending never copies bytes already written: when the newest chunk is
/// full a new one is linked after it. Inserting and removing walk the chain
/// backward from the newest chunk to find the chunks involved, so they cost
/// time proportional to the number of chunks.
///
/// # Concurrency
///
/// All methods take `&self`; the builder can be shared between threads (for
/// example behind an `Arc`). Every mutation holds one exclusive lock from
/// reading the chain to installing the new tail, so concurrent mutations are
/// serialized and each one is atomic with respect to the others.
///
/// [`len`](Self::len) does not take the lock. It reads a counter published
/// after each mutation completes, so it may lag a mutation running on another
/// thread. Reads that copy bytes out ([`to_bytes`](Self::to_bytes),
/// [`copy_to`](Self::copy_to) and friends) take the lock for the duration of
/// the copy and always observe a whole mutation.
///
/// Values handed to `append_fmt` and `append_join` are formatted while the
/// lock is held; a `Display` implementation that writes back into the same
/// builder deadlocks.
///
/// # Errors
///
/// Offsets and lengths are validated before any byte moves. An `Err` always
/// leaves the contents exactly as they were.
pub struct Utf8Builder {
    chain: Mutex<Chain>,
    len: AtomicUsize,
    config: BuilderConfig,
}

impl Utf8Builder {
    /// Creates an empty builder with the given configuration.
    ///
    /// A zero chunk capacity is treated as one byte; use
    /// [`BuilderConfig::new`] to reject it up front.
    ///
    /// # Example
    ///
    /// ```
    /// use chunkstr::{BuilderConfig, Utf8Builder};
    ///
    /// let builder = Utf8Builder::new(BuilderConfig::default());
    /// assert!(builder.is_empty());
    /// ```
    pub fn new(config: BuilderConfig) -> Self {
        Self {
            chain: Mutex::new(Chain::new(config.chunk_capacity())),
            len: AtomicUsize::new(0),
            config,
        }
    }

    /// Creates an empty builder whose chunks hold `chunk_capacity` bytes.
    ///
    /// # Errors
    ///
    /// Returns [`BuilderError::InvalidConfig`] if `chunk_capacity` is zero.
    pub fn with_capacity(chunk_capacity: usize) -> Result<Self, BuilderError> {
        Ok(Self::new(BuilderConfig::new(chunk_capacity)?))
    }

    /// Returns the configuration.
    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    /// Returns the capacity of every chunk in the chain.
    pub fn chunk_capacity(&self) -> usize {
        self.config.chunk_capacity().max(1)
    }

    /// Returns the number of bytes, without taking the lock.
    ///
    /// The value is published when a mutation finishes; while another thread
    /// is mutating, it reflects the last completed mutation.
    pub fn len(&self) -> usize {
        self.len.load(Ordering::Acquire)
    }

    /// Returns true if the builder holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the live byte count of every chunk, oldest first.
    ///
    /// Useful for observing the chain layout; the text itself does not
    /// depend on it.
    pub fn chunk_lengths(&self) -> Vec<usize> {
        self.lock().chunk_lengths()
    }

    /// Appends the UTF-8 representation of `value`.
    ///
    /// `None` and empty text are no-ops. Scalars are formatted straight into
    /// the newest chunk when they fit.
    ///
    /// # Example
    ///
    /// ```
    /// use chunkstr::Utf8Builder;
    ///
    /// let builder = Utf8Builder::default();
    /// builder.append("x = ");
    /// builder.append(42);
    /// builder.append(None::<&str>);
    /// builder.append(b'!' as char);
    /// assert_eq!(builder.to_text()?, "x = 42!");
    /// # Ok::<(), chunkstr::BuilderError>(())
    /// ```
    pub fn append<T: AsFragment>(&self, value: T) {
        self.mutate(|chain| push_fragment(chain, value.as_fragment()));
    }

    /// Appends an integer that must not be negative.
    ///
    /// # Errors
    ///
    /// Returns [`BuilderError::InvalidArgument`] if `value` is not
    /// representable as a `u64`; nothing is appended.
    ///
    /// # Example
    ///
    /// ```
    /// use chunkstr::Utf8Builder;
    ///
    /// let builder = Utf8Builder::default();
    /// builder.append_unsigned(7i32)?;
    /// assert!(builder.append_unsigned(-1i8).is_err());
    /// assert_eq!(builder.to_text()?, "7");
    /// # Ok::<(), chunkstr::BuilderError>(())
    /// ```
    pub fn append_unsigned<T>(&self, value: T) -> Result<(), BuilderError>
    where
        T: TryInto<u64> + fmt::Display + Copy,
    {
        let unsigned: u64 = match value.try_into() {
            Ok(unsigned) => unsigned,
            Err(_) => {
                return Err(BuilderError::InvalidArgument {
                    message: format!("{value} is not a valid unsigned value"),
                });
            }
        };
        self.append(unsigned);
        Ok(())
    }

    /// Appends formatted text.
    ///
    /// # Errors
    ///
    /// Returns an error only if a formatting trait implementation does;
    /// whatever was written before the failure stays appended.
    ///
    /// # Example
    ///
    /// ```
    /// use chunkstr::Utf8Builder;
    ///
    /// let builder = Utf8Builder::default();
    /// builder.append_fmt(format_args!("{}-{:03}", "id", 7))?;
    /// assert_eq!(builder.to_string(), "id-007");
    /// # Ok::<(), std::fmt::Error>(())
    /// ```
    pub fn append_fmt(&self, args: fmt::Arguments<'_>) -> fmt::Result {
        self.mutate(|chain| fmt::Write::write_fmt(chain, args))
    }

    /// Appends UTF-16 text, encoding it to UTF-8.
    ///
    /// Unpaired surrogates are written as U+FFFD.
    pub fn append_utf16(&self, units: &[u16]) {
        if units.is_empty() {
            return;
        }
        let count = utf16_byte_count(units);
        self.mutate(|chain| {
            if count <= chain.spare_mut().len() {
                if let Some(n) = encode_utf16(units, chain.spare_mut()) {
                    chain.commit(n);
                    return;
                }
            }
            let mut encoded = vec![0u8; count];
            if let Some(n) = encode_utf16(units, &mut encoded) {
                chain.append(&encoded[..n]);
            }
        });
    }

    /// Appends `value` followed by the configured line terminator.
    ///
    /// An absent value still writes the terminator.
    pub fn append_line<T: AsFragment>(&self, value: T) {
        let terminator = self.config.line_terminator().as_bytes();
        self.mutate(|chain| {
            push_fragment(chain, value.as_fragment());
            chain.append(terminator);
        });
    }

    /// Appends the configured line terminator.
    pub fn append_newline(&self) {
        self.append(self.config.line_terminator().as_bytes());
    }

    /// Appends every present value with `separator` between consecutive ones.
    ///
    /// `None` values are skipped entirely: they produce neither text nor a
    /// separator. Empty strings count as present.
    ///
    /// # Example
    ///
    /// ```
    /// use chunkstr::Utf8Builder;
    ///
    /// let builder = Utf8Builder::default();
    /// builder.append_join(", ", [Some(1), None, Some(3)]);
    /// assert_eq!(builder.to_string(), "1, 3");
    /// ```
    pub fn append_join<S, I>(&self, separator: S, values: I)
    where
        S: AsFragment,
        I: IntoIterator,
        I::Item: AsFragment,
    {
        // Collected before locking so the iterator cannot re-enter the builder.
        let values: Vec<I::Item> = values.into_iter().collect();
        self.mutate(|chain| {
            let mut first = true;
            for value in &values {
                let fragment = value.as_fragment();
                if fragment.is_absent() {
                    continue;
                }
                if !first {
                    push_fragment(chain, separator.as_fragment());
                }
                push_fragment(chain, fragment);
                first = false;
            }
        });
    }

    /// Inserts the UTF-8 representation of `value` at byte offset `index`.
    ///
    /// An absent value inserts nothing, but `index` is still validated.
    ///
    /// # Errors
    ///
    /// Returns [`BuilderError::IndexOutOfRange`] if `index > len`.
    ///
    /// # Example
    ///
    /// ```
    /// use chunkstr::Utf8Builder;
    ///
    /// let builder = Utf8Builder::from("Hello!");
    /// builder.insert(5, ", World")?;
    /// assert_eq!(builder.to_text()?, "Hello, World!");
    /// assert!(builder.insert(99, "x").is_err());
    /// # Ok::<(), chunkstr::BuilderError>(())
    /// ```
    pub fn insert<T: AsFragment>(&self, index: usize, value: T) -> Result<(), BuilderError> {
        let mut scratch = [0u8; SCRATCH_LEN];
        let bytes: Cow<'_, [u8]> = match value.as_fragment() {
            Fragment::Absent => Cow::Borrowed(&[]),
            Fragment::Bytes(bytes) => Cow::Borrowed(bytes),
            Fragment::Scalar(scalar) => encode_scalar(scalar, &mut scratch),
        };

        self.mutate(|chain| {
            BuilderError::check_index(index, chain.len())?;
            chain.insert(index, &bytes);
            Ok(())
        })
    }

    /// Removes `length` bytes starting at byte offset `start`.
    ///
    /// # Errors
    ///
    /// Returns [`BuilderError::RangeOutOfRange`] if the range does not lie
    /// within the contents.
    pub fn remove(&self, start: usize, length: usize) -> Result<(), BuilderError> {
        self.mutate(|chain| {
            BuilderError::check_range(start, length, chain.len())?;
            chain.remove(start, length);
            Ok(())
        })
    }

    /// Discards the contents and starts over with one empty chunk.
    pub fn clear(&self) {
        self.mutate(Chain::clear);
    }

    /// Copies bytes from the start of the contents into `dst`.
    ///
    /// Returns the number of bytes copied: the smaller of `dst.len()` and
    /// [`len`](Self::len).
    pub fn copy_to(&self, dst: &mut [u8]) -> usize {
        let chain = self.lock();
        let n = dst.len().min(chain.len());
        chain.copy_to(0, &mut dst[..n]);
        n
    }

    /// Copies exactly `dst.len()` bytes starting at byte offset `start`.
    ///
    /// # Errors
    ///
    /// Returns [`BuilderError::RangeOutOfRange`] if fewer than `dst.len()`
    /// bytes exist from `start`; `dst` is left untouched.
    pub fn copy_range_to(&self, start: usize, dst: &mut [u8]) -> Result<(), BuilderError> {
        let chain = self.lock();
        BuilderError::check_range(start, dst.len(), chain.len())?;
        chain.copy_to(start, dst);
        Ok(())
    }

    /// Returns an immutable, exact-length copy of the contents.
    pub fn to_bytes(&self) -> Bytes {
        Bytes::from(self.to_vec())
    }

    /// Returns an exact-length copy of the contents.
    pub fn to_vec(&self) -> Vec<u8> {
        self.lock().to_vec()
    }

    /// Returns the contents as a `String`.
    ///
    /// # Errors
    ///
    /// Returns [`BuilderError::InvalidUtf8`] if raw bytes appended through a
    /// byte API do not form valid UTF-8.
    pub fn to_text(&self) -> Result<String, BuilderError> {
        String::from_utf8(self.to_vec()).map_err(|e| BuilderError::InvalidUtf8 {
            valid_up_to: e.utf8_error().valid_up_to(),
        })
    }

    /// Consumes the builder, returning its contents.
    pub fn freeze(self) -> Bytes {
        let chain = self.chain.into_inner().unwrap_or_else(PoisonError::into_inner);
        Bytes::from(chain.to_vec())
    }

    fn lock(&self) -> MutexGuard<'_, Chain> {
        // A panic cannot leave the chain half-updated: every byte move
        // happens after validation and allocation.
        self.chain.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs `f` under the lock and publishes the new length.
    pub(crate) fn mutate<R>(&self, f: impl FnOnce(&mut Chain) -> R) -> R {
        let mut chain = self.lock();
        let result = f(&mut chain);
        self.len.store(chain.len(), Ordering::Release);
        result
    }

    /// Like [`mutate`](Self::mutate), but through exclusive access.
    pub(crate) fn mutate_exclusive<R>(&mut self, f: impl FnOnce(&mut Chain) -> R) -> R {
        let chain = self.chain.get_mut().unwrap_or_else(PoisonError::into_inner);
        let result = f(chain);
        *self.len.get_mut() = chain.len();
        result
    }
}

/// Writes one fragment at the end of the chain.
pub(crate) fn push_fragment(chain: &mut Chain, fragment: Fragment<'_>) {
    match fragment {
        Fragment::Absent => {}
        Fragment::Bytes(bytes) => chain.append(bytes),
        Fragment::Scalar(scalar) => append_scalar(chain, scalar),
    }
}

impl Default for Utf8Builder {
    fn default() -> Self {
        Self::new(BuilderConfig::default())
    }
}

impl Clone for Utf8Builder {
    fn clone(&self) -> Self {
        let clone = Self::new(self.config);
        clone.append(self.to_vec());
        clone
    }
}

impl From<&str> for Utf8Builder {
    fn from(text: &str) -> Self {
        let builder = Self::default();
        builder.append(text);
        builder
    }
}

impl From<String> for Utf8Builder {
    fn from(text: String) -> Self {
        Self::from(text.as_str())
    }
}

impl fmt::Debug for Utf8Builder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Utf8Builder")
            .field("len", &self.len())
            .field("chunks", &self.chunk_lengths().len())
            .field("config", &self.config)
            .finish()
    }
}

impl fmt::Display for Utf8Builder {
    /// Writes the contents, replacing invalid UTF-8 with U+FFFD.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.to_vec()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LineTerminator;

    fn builder(capacity: usize) -> Utf8Builder {
        Utf8Builder::with_capacity(capacity).unwrap()
    }

    #[test]
    fn test_worked_example() {
        let b = builder(8);
        b.append("Hello");
        b.append(", ");
        b.append("World!");
        assert_eq!(b.to_text().unwrap(), "Hello, World!");
        assert_eq!(b.len(), 13);
        assert_eq!(b.chunk_lengths(), vec![8, 5]);
    }

    #[test]
    fn test_append_absent_and_empty() {
        let b = builder(8);
        b.append("");
        b.append(None::<&str>);
        b.append(None::<u32>);
        assert!(b.is_empty());
        assert_eq!(b.chunk_lengths(), vec![0]);
    }

    #[test]
    fn test_append_scalars() {
        let b = builder(4);
        b.append(-12i32);
        b.append(' ');
        b.append(true);
        b.append(Some(2.5f32));
        assert_eq!(b.to_text().unwrap(), "-12 true2.5");
    }

    #[test]
    fn test_append_unsigned_rejects_negative() {
        let b = Utf8Builder::from("abc");
        let err = b.append_unsigned(-1i8).unwrap_err();
        assert!(matches!(err, BuilderError::InvalidArgument { .. }));
        assert_eq!(b.to_text().unwrap(), "abc");

        b.append_unsigned(255u8).unwrap();
        assert_eq!(b.to_text().unwrap(), "abc255");
    }

    #[test]
    fn test_append_line() {
        let config = BuilderConfig::default().with_line_terminator(LineTerminator::CrLf);
        let b = Utf8Builder::new(config);
        b.append_line("a");
        b.append_line(None::<&str>);
        b.append_newline();
        b.append_line(1u8);
        assert_eq!(b.to_text().unwrap(), "a\r\n\r\n\r\n1\r\n");
    }

    #[test]
    fn test_append_join() {
        let b = builder(4);
        b.append_join(", ", ["a", "b", "c"]);
        assert_eq!(b.to_text().unwrap(), "a, b, c");

        let b = builder(4);
        b.append_join('|', [None, Some("x"), None, Some(""), Some("y"), None]);
        assert_eq!(b.to_text().unwrap(), "x||y");

        let b = builder(4);
        b.append_join(", ", Vec::<&str>::new());
        b.append_join(", ", [None::<i32>, None]);
        assert!(b.is_empty());
    }

    #[test]
    fn test_append_utf16() {
        let text = "grüße, 世界 🦀";
        let units: Vec<u16> = text.encode_utf16().collect();
        for capacity in [1, 4, 8, 64] {
            let b = builder(capacity);
            b.append("> ");
            b.append_utf16(&units);
            assert_eq!(b.to_text().unwrap(), format!("> {text}"));
        }
    }

    #[test]
    fn test_insert_absent_validates_index() {
        let b = Utf8Builder::from("abc");
        assert!(b.insert(3, None::<&str>).is_ok());
        assert_eq!(
            b.insert(4, None::<&str>),
            Err(BuilderError::IndexOutOfRange { index: 4, len: 3 })
        );
        assert_eq!(b.to_text().unwrap(), "abc");
    }

    #[test]
    fn test_insert_scalar() {
        let b = builder(4);
        b.append("ab");
        b.append("cd");
        b.insert(2, 1234567u32).unwrap();
        assert_eq!(b.to_text().unwrap(), "ab1234567cd");
    }

    #[test]
    fn test_remove_out_of_range() {
        let b = Utf8Builder::from("hello");
        assert!(b.remove(3, 3).is_err());
        assert!(b.remove(6, 0).is_err());
        assert_eq!(b.to_text().unwrap(), "hello");
        b.remove(5, 0).unwrap();
        b.remove(1, 3).unwrap();
        assert_eq!(b.to_text().unwrap(), "ho");
        assert_eq!(b.len(), 2);
    }

    #[test]
    fn test_copy_to() {
        let b = builder(4);
        b.append("abcdefghij");

        let mut small = [0u8; 3];
        assert_eq!(b.copy_to(&mut small), 3);
        assert_eq!(&small, b"abc");

        let mut large = [0u8; 16];
        assert_eq!(b.copy_to(&mut large), 10);
        assert_eq!(&large[..10], b"abcdefghij");
    }

    #[test]
    fn test_copy_range_to() {
        let b = builder(4);
        b.append("abcdefghij");
        let mut dst = [0u8; 5];
        b.copy_range_to(3, &mut dst).unwrap();
        assert_eq!(&dst, b"defgh");

        let mut dst = [0u8; 5];
        assert!(b.copy_range_to(6, &mut dst).is_err());
        assert_eq!(dst, [0u8; 5]);
    }

    #[test]
    fn test_clear_resets_chain() {
        let b = builder(4);
        b.append("abcdefghij");
        b.clear();
        assert!(b.is_empty());
        assert_eq!(b.chunk_lengths(), vec![0]);
        b.append("xy");
        assert_eq!(b.to_text().unwrap(), "xy");
    }

    #[test]
    fn test_to_text_invalid_utf8() {
        let b = Utf8Builder::default();
        b.append(&b"ok\xff"[..]);
        assert_eq!(
            b.to_text(),
            Err(BuilderError::InvalidUtf8 { valid_up_to: 2 })
        );
        assert_eq!(b.to_string(), "ok\u{FFFD}");
    }

    #[test]
    fn test_freeze_and_clone() {
        let b = builder(4);
        b.append("frozen text");
        let copy = b.clone();
        assert_eq!(copy.chunk_capacity(), 4);
        assert_eq!(&b.freeze()[..], b"frozen text");
        assert_eq!(copy.to_bytes(), Bytes::from_static(b"frozen text"));
    }

    #[test]
    fn test_debug() {
        let b = builder(4);
        b.append("abcdef");
        let s = format!("{b:?}");
        assert!(s.contains("len: 6"));
        assert!(s.contains("chunks: 2"));
    }
}
