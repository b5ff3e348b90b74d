//! `futures_io::AsyncWrite` for the builder.
//!
//! Appending never blocks on I/O, so every poll completes immediately.

use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures_io::AsyncWrite;

use crate::builder::Utf8Builder;

impl AsyncWrite for Utf8Builder {
    fn poll_write(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        self.get_mut().mutate_exclusive(|chain| chain.append(buf));
        Poll::Ready(Ok(buf.len()))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_close(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}

impl AsyncWrite for &Utf8Builder {
    fn poll_write(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        self.append(buf);
        Poll::Ready(Ok(buf.len()))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_close(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}

#[cfg(test)]
mod tests {
    use tokio::io::AsyncWriteExt;
    use tokio_util::compat::FuturesAsyncWriteCompatExt;

    use super::*;

    #[tokio::test]
    async fn test_async_write_owned() {
        let builder = Utf8Builder::with_capacity(4).unwrap();
        let mut writer = builder.compat_write();
        writer.write_all(b"written ").await.unwrap();
        writer.write_all(b"asynchronously").await.unwrap();
        writer.shutdown().await.unwrap();

        let builder = writer.into_inner();
        assert_eq!(builder.to_text().unwrap(), "written asynchronously");
    }

    #[tokio::test]
    async fn test_async_write_shared() {
        let builder = Utf8Builder::default();
        builder.append("> ");
        let mut writer = (&builder).compat_write();
        writer.write_all(b"shared").await.unwrap();
        writer.flush().await.unwrap();
        assert_eq!(builder.to_text().unwrap(), "> shared");
    }
}
