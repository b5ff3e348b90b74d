//! Date and time scalars from `chrono`.
//!
//! Formatted with their `Display` representation, the same way as numbers:
//! straight into the newest chunk when it has room.

use std::fmt::Display;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};

use super::{AsFragment, Fragment, Scalar, format_into};

macro_rules! temporal_scalar {
    ($($t:ty),* $(,)?) => {
        $(
            impl Scalar for $t {
                fn try_format(&self, dst: &mut [u8]) -> Option<usize> {
                    format_into(self, dst)
                }

                fn to_text(&self) -> String {
                    self.to_string()
                }
            }

            impl AsFragment for $t {
                fn as_fragment(&self) -> Fragment<'_> {
                    Fragment::Scalar(self)
                }
            }
        )*
    };
}

temporal_scalar!(NaiveDate, NaiveTime, NaiveDateTime);

impl<Tz: TimeZone> Scalar for DateTime<Tz>
where
    Tz::Offset: Display,
{
    fn try_format(&self, dst: &mut [u8]) -> Option<usize> {
        format_into(self, dst)
    }

    fn to_text(&self) -> String {
        self.to_string()
    }
}

impl<Tz: TimeZone> AsFragment for DateTime<Tz>
where
    Tz::Offset: Display,
{
    fn as_fragment(&self) -> Fragment<'_> {
        Fragment::Scalar(self)
    }
}
