//! `fmt::Write` and `io::Write` for the builder.
//!
//! Writing through `&mut Utf8Builder` skips the lock entirely; writing
//! through `&Utf8Builder` takes it once per call, so each `write` lands as a
//! whole even when several threads write to the same builder.

use std::fmt;
use std::io;

use super::Utf8Builder;

impl fmt::Write for Utf8Builder {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.mutate_exclusive(|chain| chain.append(s.as_bytes()));
        Ok(())
    }
}

impl fmt::Write for &Utf8Builder {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.append(s);
        Ok(())
    }
}

impl io::Write for Utf8Builder {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.mutate_exclusive(|chain| chain.append(buf));
        Ok(buf.len())
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        self.mutate_exclusive(|chain| chain.append(buf));
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl io::Write for &Utf8Builder {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.append(buf);
        Ok(buf.len())
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        self.append(buf);
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
