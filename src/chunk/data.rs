//! The Chunk type - one fixed-capacity block of the chain.

use std::fmt;

/// A fixed-capacity byte block holding a contiguous piece of the text.
///
/// Bytes `[0, len)` are live; the rest of the buffer is spare capacity. The
/// `previous` link points at the chunk holding the logically earlier bytes,
/// so a chain is walked from the newest chunk backward.
///
/// The buffer is allocated once and never resized.
pub(crate) struct Chunk {
    buf: Box<[u8]>,
    used: usize,
    pub(crate) previous: Option<Box<Chunk>>,
}

impl Chunk {
    /// Creates an empty chunk able to hold `capacity` bytes.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: vec![0u8; capacity].into_boxed_slice(),
            used: 0,
            previous: None,
        }
    }

    /// Returns the total number of bytes this chunk can hold.
    pub(crate) fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Returns the number of live bytes.
    pub(crate) fn len(&self) -> usize {
        self.used
    }

    /// Returns true if the chunk holds no bytes.
    pub(crate) fn is_empty(&self) -> bool {
        self.used == 0
    }

    /// Returns the number of bytes that still fit.
    pub(crate) fn spare(&self) -> usize {
        self.buf.len() - self.used
    }

    /// Returns true if no more bytes fit.
    pub(crate) fn is_full(&self) -> bool {
        self.used == self.buf.len()
    }

    /// Returns the live bytes.
    pub(crate) fn bytes(&self) -> &[u8] {
        &self.buf[..self.used]
    }

    /// Returns the chunk holding the logically earlier bytes.
    pub(crate) fn previous(&self) -> Option<&Chunk> {
        self.previous.as_deref()
    }

    /// Returns the number of bytes in this chunk and every earlier one.
    pub(crate) fn cumulative_len(&self) -> usize {
        let mut total = self.used;
        let mut cur = self.previous();
        while let Some(chunk) = cur {
            total += chunk.used;
            cur = chunk.previous();
        }
        total
    }

    /// Copies as much of `data` as fits and returns how many bytes were taken.
    pub(crate) fn push_slice(&mut self, data: &[u8]) -> usize {
        let n = data.len().min(self.spare());
        self.buf[self.used..self.used + n].copy_from_slice(&data[..n]);
        self.used += n;
        n
    }

    /// Returns the spare capacity for direct writes; see [`Chunk::commit`].
    pub(crate) fn spare_mut(&mut self) -> &mut [u8] {
        &mut self.buf[self.used..]
    }

    /// Marks `n` bytes written through [`Chunk::spare_mut`] as live.
    pub(crate) fn commit(&mut self, n: usize) {
        debug_assert!(n <= self.spare());
        self.used += n;
    }

    /// Inserts `data` at chunk-local offset `local`.
    ///
    /// The caller guarantees `local <= len` and `data.len() <= spare`.
    pub(crate) fn insert_local(&mut self, local: usize, data: &[u8]) {
        debug_assert!(local <= self.used && data.len() <= self.spare());
        let k = data.len();
        self.buf.copy_within(local..self.used, local + k);
        self.buf[local..local + k].copy_from_slice(data);
        self.used += k;
    }

    /// Removes `length` bytes starting at chunk-local offset `local`.
    pub(crate) fn remove_local(&mut self, local: usize, length: usize) {
        debug_assert!(local + length <= self.used);
        self.buf.copy_within(local + length..self.used, local);
        self.used -= length;
    }

    /// Keeps only the first `len` bytes.
    pub(crate) fn truncate(&mut self, len: usize) {
        self.used = self.used.min(len);
    }

    /// Drops the first `n` bytes, keeping the rest.
    pub(crate) fn remove_prefix(&mut self, n: usize) {
        self.remove_local(0, n);
    }

    /// Fills the whole buffer with the last `capacity` bytes of
    /// `self[..local] ++ data ++ self[local..]`.
    ///
    /// `moved` is how many leading bytes of that sequence the caller has
    /// already copied elsewhere; it must equal `len + data.len() - capacity`.
    pub(crate) fn keep_spilled_tail(&mut self, local: usize, data: &[u8], moved: usize) {
        let cap = self.capacity();
        let used = self.used;
        let k = data.len();
        debug_assert_eq!(moved, used + k - cap);
        debug_assert!(moved <= k);

        // Surviving prefix slides left, suffix slides to the end, inserted
        // bytes fill the gap between them.
        if moved < local {
            self.buf.copy_within(moved..local, 0);
        }
        self.buf.copy_within(local..used, local + k - moved);
        let from = moved.max(local);
        if from < local + k {
            self.buf[from - moved..local + k - moved].copy_from_slice(&data[from - local..]);
        }
        self.used = cap;
    }

    /// Copies `dst.len()` bytes starting at chunk-local offset `local`.
    pub(crate) fn copy_out(&self, local: usize, dst: &mut [u8]) {
        dst.copy_from_slice(&self.buf[local..local + dst.len()]);
    }
}

impl Drop for Chunk {
    fn drop(&mut self) {
        // Unlink iteratively; a long chain would overflow the stack otherwise.
        let mut next = self.previous.take();
        while let Some(mut chunk) = next {
            next = chunk.previous.take();
        }
    }
}

impl fmt::Debug for Chunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chunk")
            .field("len", &self.used)
            .field("capacity", &self.buf.len())
            .field("has_previous", &self.previous.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk_with(capacity: usize, data: &[u8]) -> Chunk {
        let mut chunk = Chunk::with_capacity(capacity);
        assert_eq!(chunk.push_slice(data), data.len());
        chunk
    }

    #[test]
    fn test_push_slice_partial() {
        let mut chunk = Chunk::with_capacity(4);
        assert_eq!(chunk.push_slice(b"hello"), 4);
        assert!(chunk.is_full());
        assert_eq!(chunk.bytes(), b"hell");
        assert_eq!(chunk.push_slice(b"o"), 0);
    }

    #[test]
    fn test_insert_local() {
        let mut chunk = chunk_with(8, b"held");
        chunk.insert_local(3, b"lo wor");
        assert_eq!(chunk.bytes(), b"hello wor");
    }

    #[test]
    fn test_remove_local() {
        let mut chunk = chunk_with(8, b"abcdefgh");
        chunk.remove_local(2, 3);
        assert_eq!(chunk.bytes(), b"abfgh");
        chunk.remove_prefix(2);
        assert_eq!(chunk.bytes(), b"fgh");
        chunk.truncate(1);
        assert_eq!(chunk.bytes(), b"f");
        assert_eq!(chunk.spare(), 7);
    }

    #[test]
    fn test_commit_spare() {
        let mut chunk = chunk_with(8, b"ab");
        chunk.spare_mut()[..2].copy_from_slice(b"cd");
        chunk.commit(2);
        assert_eq!(chunk.bytes(), b"abcd");
    }

    #[test]
    fn test_cumulative_len() {
        let mut older = Box::new(chunk_with(4, b"abcd"));
        older.previous = Some(Box::new(chunk_with(4, b"xy")));
        let mut newest = chunk_with(4, b"z");
        newest.previous = Some(older);
        assert_eq!(newest.cumulative_len(), 7);
    }

    #[test]
    fn test_keep_spilled_tail_inside_prefix() {
        // "abcdef" + insert "XY" at 4 → "abcdXYef" (8), capacity 6 → 2 moved
        let mut chunk = chunk_with(6, b"abcdef");
        chunk.keep_spilled_tail(4, b"XY", 2);
        assert_eq!(chunk.bytes(), b"cdXYef");
    }

    #[test]
    fn test_keep_spilled_tail_inside_inserted() {
        // "abcd" in cap 6, insert "WXYZ" at 1 → "aWXYZbcd" (8) → 2 moved
        let mut chunk = chunk_with(6, b"abcd");
        chunk.keep_spilled_tail(1, b"WXYZ", 2);
        assert_eq!(chunk.bytes(), b"XYZbcd");
    }

    #[test]
    fn test_keep_spilled_tail_all_inserted_moved() {
        // full chunk, insert at 0: everything inserted goes elsewhere
        let mut chunk = chunk_with(4, b"abcd");
        chunk.keep_spilled_tail(0, b"XY", 2);
        assert_eq!(chunk.bytes(), b"abcd");
    }

    #[test]
    fn test_copy_out() {
        let chunk = chunk_with(8, b"abcdef");
        let mut dst = [0u8; 3];
        chunk.copy_out(2, &mut dst);
        assert_eq!(&dst, b"cde");
    }

    #[test]
    fn test_long_chain_drop() {
        let mut tail = Box::new(Chunk::with_capacity(1));
        for _ in 0..200_000 {
            let mut next = Box::new(Chunk::with_capacity(1));
            next.previous = Some(tail);
            tail = next;
        }
        drop(tail);
    }
}
