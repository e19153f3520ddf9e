//! Line-oriented transport for the POP3 session
//!
//! Wraps the underlying byte stream (plain TCP, TLS, or an in-memory
//! test stream) behind a buffered reader/writer with three primitives:
//! read one delimiter-stripped line, write one line with CRLF appended,
//! and consume one dot-terminated multi-line block. The client owns the
//! transport exclusively; nothing else reads or writes it.

use crate::error::{Error, Result};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufStream};
use tokio::net::TcpStream;
use tokio_rustls::TlsConnector;
use tracing::debug;

/// Anything the session can run over.
pub trait Transport: AsyncRead + AsyncWrite + Unpin + Send {}

impl<T: AsyncRead + AsyncWrite + Unpin + Send> Transport for T {}

/// A buffered line reader/writer over the session's byte stream.
pub(crate) struct LineStream {
    stream: BufStream<Box<dyn Transport>>,
}

impl LineStream {
    pub(crate) fn new(stream: impl Transport + 'static) -> Self {
        Self {
            stream: BufStream::new(Box::new(stream)),
        }
    }

    /// Read one line, stripping the trailing CRLF (or bare LF).
    ///
    /// EOF before the delimiter is an `UnexpectedEof` error, whether
    /// the line is empty or cut off partway: the protocol never ends a
    /// session mid-response, and a truncated line must not classify as
    /// a complete one.
    pub(crate) async fn read_line(&mut self) -> std::io::Result<String> {
        let mut line = String::new();
        self.stream.read_line(&mut line).await?;
        if !line.ends_with('\n') {
            return Err(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "connection closed",
            ));
        }
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
        Ok(line)
    }

    /// Write one line followed by CRLF and flush.
    pub(crate) async fn write_line(&mut self, line: &str) -> std::io::Result<()> {
        self.stream.write_all(line.as_bytes()).await?;
        self.stream.write_all(b"\r\n").await?;
        self.stream.flush().await
    }

    /// Consume one dot-terminated multi-line block.
    ///
    /// Reads lines until the lone `.` terminator, which is consumed
    /// without appearing in the data, and never reads past it: the
    /// stream stays framed for the next command. Data lines beginning
    /// with `.` are byte-unstuffed (one leading dot removed) and line
    /// boundaries are restored as CRLF.
    pub(crate) async fn read_dot_block(&mut self) -> std::io::Result<Vec<u8>> {
        let mut body = Vec::new();
        loop {
            let line = self.read_line().await?;
            if line == "." {
                return Ok(body);
            }
            let data = line.strip_prefix('.').unwrap_or(&line);
            body.extend_from_slice(data.as_bytes());
            body.extend_from_slice(b"\r\n");
        }
    }

    /// Flush and shut the underlying stream down.
    pub(crate) async fn shutdown(&mut self) -> std::io::Result<()> {
        self.stream.shutdown().await
    }
}

/// Open a plain TCP connection to `addr`.
pub(crate) async fn dial(addr: &str) -> Result<LineStream> {
    debug!("connecting to POP3 server at {addr}");
    let stream = TcpStream::connect(addr)
        .await
        .map_err(|e| Error::from(e).context("dial"))?;
    Ok(LineStream::new(stream))
}

/// Open an implicit-TLS (POP3S) connection to `addr`.
///
/// The TLS server name is the host part of `addr`, verified against
/// Mozilla's bundled root certificates.
pub(crate) async fn dial_tls(addr: &str) -> Result<LineStream> {
    debug!("connecting to POP3 server at {addr} over TLS");
    let host = addr.rsplit_once(':').map_or(addr, |(host, _)| host);
    let server_name = rustls::pki_types::ServerName::try_from(host.to_owned())
        .map_err(|e| Error::tls(format!("invalid server name {host:?}: {e}")).context("dial-tls"))?;

    let tcp = TcpStream::connect(addr)
        .await
        .map_err(|e| Error::from(e).context("dial-tls"))?;
    let stream = tls_connector()
        .connect(server_name, tcp)
        .await
        .map_err(|e| Error::from(e).context("dial-tls"))?;
    Ok(LineStream::new(stream))
}

/// Build a TLS connector backed by Mozilla's bundled root
/// certificates.
fn tls_connector() -> TlsConnector {
    let roots = rustls::RootCertStore {
        roots: webpki_roots::TLS_SERVER_ROOTS.to_vec(),
    };
    let config = rustls::ClientConfig::builder()
        .with_root_certificates(roots)
        .with_no_client_auth();
    TlsConnector::from(Arc::new(config))
}
