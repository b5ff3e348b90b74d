//! Future that drains an async reader into a builder.
//!
//! # Example
//!
//! ```ignore
//! use chunkstr::Utf8Builder;
//! use futures_io::AsyncRead;
//!
//! async fn slurp<R: AsyncRead>(reader: R) -> std::io::Result<String> {
//!     let builder = Utf8Builder::default();
//!     builder.append_reader(reader).await?;
//!     Ok(builder.to_string())
//! }
//! ```

use std::future::Future;
use std::io;
use std::pin::Pin;
use std::task::{Context, Poll, ready};

use futures_io::AsyncRead;
use pin_project_lite::pin_project;

use crate::builder::Utf8Builder;

pin_project! {
    /// Reads an async reader to the end, appending every byte to a builder.
    ///
    /// Each read lands directly in the newest chunk's spare capacity; no
    /// intermediate buffer is used. Resolves to the number of bytes appended.
    ///
    /// The builder's lock is held during each `poll_read` call (never across
    /// a `Pending`), so a reader must not write to the same builder.
    ///
    /// Created by [`Utf8Builder::append_reader`].
    #[must_use = "futures do nothing unless you `.await` or poll them"]
    #[derive(Debug)]
    pub struct AppendReader<'a, R> {
        #[pin]
        reader: R,
        builder: &'a Utf8Builder,
        total: usize,
    }
}

impl<'a, R> AppendReader<'a, R> {
    pub(crate) fn new(builder: &'a Utf8Builder, reader: R) -> Self {
        Self {
            reader,
            builder,
            total: 0,
        }
    }
}

impl<R: AsyncRead> Future for AppendReader<'_, R> {
    type Output = io::Result<usize>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut this = self.project();
        loop {
            let polled = this.builder.mutate(|chain| {
                chain.reserve();
                let polled = this.reader.as_mut().poll_read(cx, chain.spare_mut());
                if let Poll::Ready(Ok(n)) = polled {
                    chain.commit(n);
                }
                chain.trim_tail();
                polled
            });

            match ready!(polled)? {
                0 => return Poll::Ready(Ok(*this.total)),
                n => *this.total += n,
            }
        }
    }
}

impl Utf8Builder {
    /// Appends everything `reader` produces until end of stream.
    ///
    /// Requires the `async-io` feature.
    pub fn append_reader<R: AsyncRead>(&self, reader: R) -> AppendReader<'_, R> {
        AppendReader::new(self, reader)
    }
}

#[cfg(test)]
mod tests {
    use tokio_util::compat::TokioAsyncReadCompatExt;

    use super::*;

    #[tokio::test]
    async fn test_append_reader_empty() {
        let builder = Utf8Builder::with_capacity(4).unwrap();
        let reader: &[u8] = &[];
        let n = builder.append_reader(reader.compat()).await.unwrap();
        assert_eq!(n, 0);
        assert!(builder.is_empty());
        assert_eq!(builder.chunk_lengths(), vec![0]);
    }

    #[tokio::test]
    async fn test_append_reader_spans_chunks() {
        let data: Vec<u8> = (0..1000).map(|i| b'a' + (i % 26) as u8).collect();
        let builder = Utf8Builder::with_capacity(64).unwrap();
        builder.append("head:");

        let reader: &[u8] = &data;
        let n = builder.append_reader(reader.compat()).await.unwrap();

        assert_eq!(n, data.len());
        let mut expected = b"head:".to_vec();
        expected.extend_from_slice(&data);
        assert_eq!(builder.to_vec(), expected);

        // Every chunk but the tail is full.
        let lengths = builder.chunk_lengths();
        let (tail, full) = lengths.split_last().unwrap();
        assert!(full.iter().all(|&len| len == 64));
        assert!(*tail > 0);
    }
}
