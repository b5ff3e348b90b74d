//! Values accepted by the builder's append and insert operations.

use std::borrow::Cow;
use std::fmt;

use bytes::Bytes;

use super::Scalar;

/// The UTF-8 shape of a value about to be written.
pub enum Fragment<'a> {
    /// Nothing to write: a `None`.
    Absent,
    /// Already-encoded bytes.
    Bytes(&'a [u8]),
    /// A scalar formatted on demand.
    Scalar(&'a dyn Scalar),
}

impl Fragment<'_> {
    /// Returns true for [`Fragment::Absent`].
    pub fn is_absent(&self) -> bool {
        matches!(self, Fragment::Absent)
    }
}

impl fmt::Debug for Fragment<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fragment::Absent => f.write_str("Absent"),
            Fragment::Bytes(b) => f.debug_tuple("Bytes").field(&b.len()).finish(),
            Fragment::Scalar(s) => f.debug_tuple("Scalar").field(&s.to_text()).finish(),
        }
    }
}

/// Conversion into a [`Fragment`].
///
/// Implemented for text (`str`, `String`, `Cow<str>`), raw bytes (`[u8]`,
/// `[u8; N]`, `Vec<u8>`, `Bytes`), every primitive scalar, `chrono` dates and
/// times (feature `chrono`), references to any of those and `Option<T>`
/// (where `None` writes nothing).
pub trait AsFragment {
    /// Borrows `self` as a fragment.
    fn as_fragment(&self) -> Fragment<'_>;
}

impl<T: AsFragment + ?Sized> AsFragment for &T {
    fn as_fragment(&self) -> Fragment<'_> {
        (**self).as_fragment()
    }
}

impl<T: AsFragment> AsFragment for Option<T> {
    fn as_fragment(&self) -> Fragment<'_> {
        match self {
            Some(value) => value.as_fragment(),
            None => Fragment::Absent,
        }
    }
}

impl AsFragment for str {
    fn as_fragment(&self) -> Fragment<'_> {
        Fragment::Bytes(self.as_bytes())
    }
}

impl AsFragment for String {
    fn as_fragment(&self) -> Fragment<'_> {
        Fragment::Bytes(self.as_bytes())
    }
}

impl AsFragment for Cow<'_, str> {
    fn as_fragment(&self) -> Fragment<'_> {
        Fragment::Bytes(self.as_bytes())
    }
}

impl AsFragment for [u8] {
    fn as_fragment(&self) -> Fragment<'_> {
        Fragment::Bytes(self)
    }
}

impl<const N: usize> AsFragment for [u8; N] {
    fn as_fragment(&self) -> Fragment<'_> {
        Fragment::Bytes(self)
    }
}

impl AsFragment for Vec<u8> {
    fn as_fragment(&self) -> Fragment<'_> {
        Fragment::Bytes(self)
    }
}

impl AsFragment for Bytes {
    fn as_fragment(&self) -> Fragment<'_> {
        Fragment::Bytes(self)
    }
}

macro_rules! scalar_fragment {
    ($($t:ty),* $(,)?) => {
        $(
            impl AsFragment for $t {
                fn as_fragment(&self) -> Fragment<'_> {
                    Fragment::Scalar(self)
                }
            }
        )*
    };
}

scalar_fragment!(
    u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, f32, f64, bool, char,
);
