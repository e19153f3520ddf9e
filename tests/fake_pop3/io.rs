//! Shared I/O helpers for the fake POP3 server.
//!
//! Thin wrappers around `AsyncWriteExt` that flush after every write.
//! A real server would batch writes, but flushing eagerly keeps the
//! test server simple and deterministic.

use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};

/// Write a string to the stream and flush.
pub async fn write_line<S: AsyncRead + AsyncWrite + Unpin>(
    stream: &mut BufReader<S>,
    line: &str,
) -> std::io::Result<()> {
    stream.get_mut().write_all(line.as_bytes()).await?;
    stream.get_mut().flush().await
}

/// Write a dot-terminated multi-line block.
///
/// Splits `data` into lines, byte-stuffs lines that start with a dot
/// (RFC 1939 Section 3: an extra dot is prepended on the wire),
/// re-joins with CRLF, and ends the block with the lone-dot
/// terminator line.
pub async fn write_dot_block<S: AsyncRead + AsyncWrite + Unpin>(
    stream: &mut BufReader<S>,
    data: &[u8],
) -> std::io::Result<()> {
    let text = String::from_utf8_lossy(data);
    for line in text.lines() {
        let wire = if line.starts_with('.') {
            format!(".{line}\r\n")
        } else {
            format!("{line}\r\n")
        };
        write_line(stream, &wire).await?;
    }
    write_line(stream, ".\r\n").await
}
