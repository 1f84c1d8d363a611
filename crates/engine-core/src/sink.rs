use crate::error::SinkError;
use async_trait::async_trait;
use std::io::ErrorKind;
use tokio::io::{AsyncWrite, AsyncWriteExt, Stdout};

/// Line-oriented output for row content.
///
/// Every call to [`LineSink::emit`] must be visible downstream when it
/// returns: implementations flush per line.
#[async_trait]
pub trait LineSink: Send {
    async fn emit(&mut self, line: &str) -> Result<(), SinkError>;
}

/// Writes each line followed by `\n` and flushes immediately.
pub struct WriterSink<W> {
    writer: W,
}

pub type StdoutSink = WriterSink<Stdout>;

impl StdoutSink {
    pub fn stdout() -> Self {
        WriterSink::new(tokio::io::stdout())
    }
}

impl<W> WriterSink<W>
where
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(writer: W) -> Self {
        WriterSink { writer }
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

#[async_trait]
impl<W> LineSink for WriterSink<W>
where
    W: AsyncWrite + Unpin + Send,
{
    async fn emit(&mut self, line: &str) -> Result<(), SinkError> {
        let mut buf = Vec::with_capacity(line.len() + 1);
        buf.extend_from_slice(line.as_bytes());
        buf.push(b'\n');

        self.writer.write_all(&buf).await.map_err(map_io_error)?;
        self.writer.flush().await.map_err(map_io_error)
    }
}

fn map_io_error(err: std::io::Error) -> SinkError {
    match err.kind() {
        ErrorKind::BrokenPipe => SinkError::Closed,
        _ => SinkError::Io(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{
        pin::Pin,
        task::{Context, Poll},
    };

    #[tokio::test]
    async fn test_emits_one_line_per_call() {
        let mut sink = WriterSink::new(Vec::new());
        sink.emit("first").await.unwrap();
        sink.emit(r#"{"text":"second"}"#).await.unwrap();

        let out = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(out, "first\n{\"text\":\"second\"}\n");
    }

    #[tokio::test]
    async fn test_empty_line() {
        let mut sink = WriterSink::new(Vec::new());
        sink.emit("").await.unwrap();
        assert_eq!(sink.into_inner(), b"\n");
    }

    /// Records how many bytes were pending at each flush.
    #[derive(Default)]
    struct FlushCounter {
        pending: usize,
        flushed: Vec<usize>,
    }

    impl AsyncWrite for FlushCounter {
        fn poll_write(
            mut self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            buf: &[u8],
        ) -> Poll<std::io::Result<usize>> {
            self.pending += buf.len();
            Poll::Ready(Ok(buf.len()))
        }

        fn poll_flush(mut self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
            let pending = std::mem::take(&mut self.pending);
            self.flushed.push(pending);
            Poll::Ready(Ok(()))
        }

        fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
            Poll::Ready(Ok(()))
        }
    }

    #[tokio::test]
    async fn test_flushes_after_every_line() {
        let mut sink = WriterSink::new(FlushCounter::default());
        sink.emit("abc").await.unwrap();
        sink.emit("de").await.unwrap();

        let counter = sink.into_inner();
        assert_eq!(counter.flushed, vec![4, 3]);
        assert_eq!(counter.pending, 0);
    }

    struct ClosedPipe;

    impl AsyncWrite for ClosedPipe {
        fn poll_write(
            self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            _buf: &[u8],
        ) -> Poll<std::io::Result<usize>> {
            Poll::Ready(Err(std::io::Error::from(ErrorKind::BrokenPipe)))
        }

        fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
            Poll::Ready(Ok(()))
        }

        fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
            Poll::Ready(Ok(()))
        }
    }

    #[tokio::test]
    async fn test_broken_pipe_is_closed() {
        let mut sink = WriterSink::new(ClosedPipe);
        let err = sink.emit("lost").await.unwrap_err();
        assert!(matches!(err, SinkError::Closed));
    }
}
