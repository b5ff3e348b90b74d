//! Direct-to-buffer scalar formatting.

use std::borrow::Cow;
use std::fmt::{self, Write};

use crate::chunk::Chain;

/// Size of the fixed scratch buffer used when a scalar does not fit the
/// tail chunk's spare capacity.
///
/// Every integer, `bool` and `char` fits; only very large or very small
/// floats fall through to the heap-allocated text path.
pub const SCRATCH_LEN: usize = 64;

/// A value that can format itself straight into a byte span.
///
/// `try_format` must either write the complete UTF-8 representation into the
/// front of `dst` and return the number of bytes written, or return `None`
/// when `dst` is too small. Bytes written before a `None` are ignored.
///
/// # Example
///
/// ```
/// use chunkstr::Scalar;
///
/// let mut buf = [0u8; 8];
/// assert_eq!(42u32.try_format(&mut buf), Some(2));
/// assert_eq!(&buf[..2], b"42");
/// assert_eq!(u64::MAX.try_format(&mut buf), None);
/// ```
pub trait Scalar {
    /// Formats into `dst`, returning the number of bytes written.
    fn try_format(&self, dst: &mut [u8]) -> Option<usize>;

    /// Formats into a freshly allocated string.
    fn to_text(&self) -> String;
}

/// `fmt::Write` over a borrowed byte slice that fails instead of truncating.
struct SliceWriter<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> SliceWriter<'a> {
    fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, pos: 0 }
    }
}

impl Write for SliceWriter<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let bytes = s.as_bytes();
        let end = self.pos + bytes.len();
        if end > self.buf.len() {
            return Err(fmt::Error);
        }
        self.buf[self.pos..end].copy_from_slice(bytes);
        self.pos = end;
        Ok(())
    }
}

/// Formats any `Display` value into `dst` without allocating.
///
/// Returns `None` if the representation does not fit.
pub fn format_into<T: fmt::Display + ?Sized>(value: &T, dst: &mut [u8]) -> Option<usize> {
    let mut writer = SliceWriter::new(dst);
    write!(writer, "{value}").ok()?;
    Some(writer.pos)
}

macro_rules! display_scalar {
    ($($t:ty),* $(,)?) => {
        $(
            impl Scalar for $t {
                #[inline]
                fn try_format(&self, dst: &mut [u8]) -> Option<usize> {
                    format_into(self, dst)
                }

                fn to_text(&self) -> String {
                    self.to_string()
                }
            }
        )*
    };
}

display_scalar!(
    u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, f32, f64, bool, char,
);

/// Appends a scalar to the chain.
///
/// Tries, in order: formatting straight into the tail's spare capacity, then
/// into a [`SCRATCH_LEN`] stack buffer that is appended as bytes, then
/// allocating the text.
pub(crate) fn append_scalar(chain: &mut Chain, value: &dyn Scalar) {
    if let Some(n) = value.try_format(chain.spare_mut()) {
        chain.commit(n);
        return;
    }

    let mut scratch = [0u8; SCRATCH_LEN];
    if let Some(n) = value.try_format(&mut scratch) {
        chain.append(&scratch[..n]);
        return;
    }

    log::trace!("scalar exceeds {SCRATCH_LEN} byte scratch buffer, formatting as text");
    chain.append(value.to_text().as_bytes());
}

/// Encodes a scalar to bytes, borrowing `scratch` when it fits.
pub(crate) fn encode_scalar<'s>(
    value: &dyn Scalar,
    scratch: &'s mut [u8; SCRATCH_LEN],
) -> Cow<'s, [u8]> {
    match value.try_format(scratch) {
        Some(n) => Cow::Borrowed(&scratch[..n]),
        None => Cow::Owned(value.to_text().into_bytes()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_into_exact_fit() {
        let mut buf = [0u8; 3];
        assert_eq!(format_into(&123, &mut buf), Some(3));
        assert_eq!(&buf, b"123");
        assert_eq!(format_into(&1234, &mut buf), None);
    }

    #[test]
    fn test_scalars() {
        let mut buf = [0u8; SCRATCH_LEN];
        let n = (-17i8).try_format(&mut buf).unwrap();
        assert_eq!(&buf[..n], b"-17");
        let n = true.try_format(&mut buf).unwrap();
        assert_eq!(&buf[..n], b"true");
        let n = 'é'.try_format(&mut buf).unwrap();
        assert_eq!(&buf[..n], "é".as_bytes());
        let n = 1.5f64.try_format(&mut buf).unwrap();
        assert_eq!(&buf[..n], b"1.5");
    }

    #[test]
    fn test_integers_fit_scratch() {
        let mut buf = [0u8; SCRATCH_LEN];
        assert!(i128::MIN.try_format(&mut buf).is_some());
        assert!(u128::MAX.try_format(&mut buf).is_some());
    }

    #[test]
    fn test_append_scalar_direct() {
        let mut chain = Chain::new(16);
        chain.append(b"n=");
        append_scalar(&mut chain, &42u32);
        assert_eq!(chain.to_vec(), b"n=42");
        assert_eq!(chain.chunk_lengths(), vec![4]);
    }

    #[test]
    fn test_append_scalar_scratch_spans_chunks() {
        let mut chain = Chain::new(4);
        chain.append(b"abc");
        append_scalar(&mut chain, &123_456u32);
        assert_eq!(chain.to_vec(), b"abc123456");
        assert_eq!(chain.chunk_lengths(), vec![4, 4, 1]);
    }

    #[test]
    fn test_append_scalar_text_fallback() {
        let mut chain = Chain::new(8);
        append_scalar(&mut chain, &f64::MAX);
        let expected = f64::MAX.to_string();
        assert!(expected.len() > SCRATCH_LEN);
        assert_eq!(chain.to_vec(), expected.as_bytes());
    }

    #[test]
    fn test_encode_scalar() {
        let mut scratch = [0u8; SCRATCH_LEN];
        assert!(matches!(encode_scalar(&7u8, &mut scratch), Cow::Borrowed(b"7")));
        let mut scratch = [0u8; SCRATCH_LEN];
        assert!(matches!(encode_scalar(&f64::MAX, &mut scratch), Cow::Owned(_)));
    }
}
