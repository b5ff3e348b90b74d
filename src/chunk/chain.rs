//! Chain algorithms over backward-linked chunks.
//!
//! The chain is owned through its newest chunk (the tail). Every lookup walks
//! backward from the tail, so translating a byte offset costs time proportional
//! to the number of chunks, not the number of bytes. Appends never walk.

use std::fmt;

use super::Chunk;

/// Which chunk owns an offset that sits exactly on a chunk boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bias {
    /// Offset names an existing byte: the owner must contain it.
    Byte,
    /// Offset names a gap between bytes: the newest chunk starting at or
    /// before it owns it.
    Gap,
}

/// Position of an offset inside the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Location {
    /// Number of `previous` links between the tail and the owning chunk.
    hops: usize,
    /// Offset inside the owning chunk.
    local: usize,
}

/// The chunk chain behind a builder.
///
/// Callers validate offsets and lengths before calling into the chain; the
/// chain itself never fails.
#[derive(Debug)]
pub(crate) struct Chain {
    tail: Box<Chunk>,
    len: usize,
    chunk_capacity: usize,
}

impl Chain {
    /// Creates a chain holding one empty chunk.
    pub(crate) fn new(chunk_capacity: usize) -> Self {
        let chunk_capacity = chunk_capacity.max(1);
        Self {
            tail: Box::new(Chunk::with_capacity(chunk_capacity)),
            len: 0,
            chunk_capacity,
        }
    }

    /// Returns the total number of bytes.
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Returns the live byte count of every chunk, oldest first.
    pub(crate) fn chunk_lengths(&self) -> Vec<usize> {
        let mut lengths = Vec::new();
        let mut cur = Some(&*self.tail);
        while let Some(chunk) = cur {
            lengths.push(chunk.len());
            cur = chunk.previous();
        }
        lengths.reverse();
        lengths
    }

    /// Discards every chunk and starts over with one empty chunk.
    pub(crate) fn clear(&mut self) {
        log::trace!("clearing chain of {} bytes", self.len);
        self.tail = Box::new(Chunk::with_capacity(self.chunk_capacity));
        self.len = 0;
    }

    /// Appends bytes, allocating new chunks as the tail fills up.
    pub(crate) fn append(&mut self, data: &[u8]) {
        let mut rest = data;
        loop {
            let n = self.tail.push_slice(rest);
            rest = &rest[n..];
            if rest.is_empty() {
                break;
            }
            self.grow();
        }
        self.len += data.len();
    }

    /// Returns the tail's spare capacity for direct writes.
    pub(crate) fn spare_mut(&mut self) -> &mut [u8] {
        self.tail.spare_mut()
    }

    /// Marks `n` bytes written through [`Chain::spare_mut`] as live.
    pub(crate) fn commit(&mut self, n: usize) {
        self.tail.commit(n);
        self.len += n;
    }

    /// Makes sure the tail has spare capacity, linking a new chunk if needed.
    pub(crate) fn reserve(&mut self) {
        if self.tail.is_full() {
            self.grow();
        }
    }

    /// Unlinks an empty tail left behind by [`Chain::reserve`].
    pub(crate) fn trim_tail(&mut self) {
        self.unlink_if_empty(0);
    }

    /// Links a fresh chunk after the full tail.
    fn grow(&mut self) {
        log::trace!(
            "tail full at {} bytes, allocating chunk of {} bytes",
            self.len,
            self.chunk_capacity
        );
        let full = std::mem::replace(
            &mut self.tail,
            Box::new(Chunk::with_capacity(self.chunk_capacity)),
        );
        self.tail.previous = Some(full);
    }

    /// Inserts `data` at byte offset `index` (`index <= len`).
    pub(crate) fn insert(&mut self, index: usize, data: &[u8]) {
        debug_assert!(index <= self.len);
        if data.is_empty() {
            return;
        }
        if index == self.len {
            self.append(data);
            return;
        }

        let Some(at) = self.locate(index, Bias::Gap) else {
            return;
        };
        let chunk_capacity = self.chunk_capacity;
        let Some(target) = self.nth_mut(at.hops) else {
            return;
        };

        if data.len() <= target.spare() {
            target.insert_local(at.local, data);
        } else {
            spill(target, at.local, data, chunk_capacity);
        }
        self.len += data.len();
        debug_assert_eq!(self.tail.cumulative_len(), self.len);
    }

    /// Removes `length` bytes starting at `start` (`start + length <= len`).
    pub(crate) fn remove(&mut self, start: usize, length: usize) {
        debug_assert!(start + length <= self.len);
        if length == 0 {
            return;
        }

        let (Some(first), Some(last)) = (
            self.locate(start, Bias::Byte),
            self.locate(start + length - 1, Bias::Byte),
        ) else {
            return;
        };

        if first.hops == last.hops {
            let Some(chunk) = self.nth_mut(first.hops) else {
                return;
            };
            chunk.remove_local(first.local, length);
        } else {
            let Some(end) = self.nth_mut(last.hops) else {
                return;
            };
            end.remove_prefix(last.local + 1);

            // Skip every chunk strictly between the two owners.
            let skipped = first.hops - last.hops - 1;
            let mut older = end.previous.take();
            for _ in 0..skipped {
                older = older.and_then(|mut chunk| chunk.previous.take());
            }
            if let Some(chunk) = older.as_mut() {
                chunk.truncate(first.local);
            }
            if older.as_ref().is_some_and(|chunk| chunk.is_empty()) {
                older = older.and_then(|mut chunk| chunk.previous.take());
            }
            end.previous = older;

            log::debug!(
                "removed {} bytes across {} chunks, {} unlinked",
                length,
                first.hops - last.hops + 1,
                skipped
            );
        }

        self.len -= length;
        self.unlink_if_empty(last.hops);
        debug_assert_eq!(self.tail.cumulative_len(), self.len);
    }

    /// Copies `dst.len()` bytes starting at `start` into `dst`.
    ///
    /// The chain is walked newest to oldest and `dst` filled from the back, so
    /// the partial end chunk, whole interior chunks and partial start chunk
    /// each land at their logical position.
    pub(crate) fn copy_to(&self, start: usize, dst: &mut [u8]) {
        debug_assert!(start + dst.len() <= self.len);
        if dst.is_empty() {
            return;
        }

        let want_end = start + dst.len();
        let mut end = self.len;
        let mut cur = Some(&*self.tail);
        while let Some(chunk) = cur {
            let chunk_start = end - chunk.len();
            let from = chunk_start.max(start);
            let to = end.min(want_end);
            if from < to {
                chunk.copy_out(from - chunk_start, &mut dst[from - start..to - start]);
            }
            if chunk_start <= start {
                break;
            }
            end = chunk_start;
            cur = chunk.previous();
        }
    }

    /// Copies the whole sequence into one exact-length vector.
    pub(crate) fn to_vec(&self) -> Vec<u8> {
        let mut out = vec![0u8; self.len];
        self.copy_to(0, &mut out);
        out
    }

    /// Translates a byte offset into the chunk owning it.
    fn locate(&self, index: usize, bias: Bias) -> Option<Location> {
        let mut end = self.len;
        let mut hops = 0;
        let mut cur = Some(&*self.tail);
        while let Some(chunk) = cur {
            let start = end - chunk.len();
            let owns = match bias {
                Bias::Byte => start <= index && index < end,
                Bias::Gap => start <= index,
            };
            if owns {
                return Some(Location {
                    hops,
                    local: index - start,
                });
            }
            end = start;
            hops += 1;
            cur = chunk.previous();
        }
        None
    }

    /// Returns the chunk `hops` links behind the tail.
    fn nth_mut(&mut self, hops: usize) -> Option<&mut Box<Chunk>> {
        let mut cur = Some(&mut self.tail);
        for _ in 0..hops {
            cur = cur?.previous.as_mut();
        }
        cur
    }

    /// Drops the chunk `hops` links behind the tail if it emptied out, so the
    /// tail keeps holding the last byte.
    fn unlink_if_empty(&mut self, hops: usize) {
        if hops == 0 {
            if self.tail.is_empty() {
                if let Some(previous) = self.tail.previous.take() {
                    self.tail = previous;
                }
            }
            return;
        }

        let Some(newer) = self.nth_mut(hops - 1) else {
            return;
        };
        if newer.previous.as_ref().is_some_and(|chunk| chunk.is_empty()) {
            if let Some(mut empty) = newer.previous.take() {
                newer.previous = empty.previous.take();
            }
        }
    }
}

/// Inserts `data` at `local` into a chunk too small to take it in place.
///
/// The combined sequence `target[..local] ++ data ++ target[local..]` is
/// split so the target keeps its last `capacity` bytes and new, exactly
/// sized chunks linked between the target and its old `previous` take the
/// rest. Every size is computed before any byte moves.
fn spill(target: &mut Chunk, local: usize, data: &[u8], chunk_capacity: usize) {
    let total = target.len() + data.len();
    let moved = total - target.capacity();
    let count = moved.div_ceil(chunk_capacity);
    let oldest = moved - (count - 1) * chunk_capacity;

    let mut fresh: Vec<Box<Chunk>> = std::iter::once(oldest)
        .chain(std::iter::repeat_n(chunk_capacity, count - 1))
        .map(|capacity| Box::new(Chunk::with_capacity(capacity)))
        .collect();

    let bytes = target.bytes();
    fill_in_order(&mut fresh, [&bytes[..local], data, &bytes[local..]]);
    target.keep_spilled_tail(local, data, moved);

    log::debug!(
        "insert of {} bytes spilled {} bytes into {} new chunks",
        data.len(),
        moved,
        count
    );

    let mut link = target.previous.take();
    for mut chunk in fresh {
        chunk.previous = link;
        link = Some(chunk);
    }
    target.previous = link;
}

/// Fills `chunks` in order from the concatenation of `pieces`, stopping once
/// every chunk is full.
fn fill_in_order(chunks: &mut [Box<Chunk>], pieces: [&[u8]; 3]) {
    let mut slots = chunks.iter_mut();
    let mut current = slots.next();
    for piece in pieces {
        let mut rest = piece;
        while !rest.is_empty() {
            let Some(chunk) = current.as_mut() else {
                return;
            };
            let n = chunk.push_slice(rest);
            rest = &rest[n..];
            if chunk.is_full() {
                current = slots.next();
            }
        }
    }
}

impl fmt::Write for Chain {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.append(s.as_bytes());
        Ok(())
    }
}
