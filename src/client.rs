//! POP3 protocol engine
//!
//! [`Pop3Client`] owns the line transport and sequences one command at
//! a time: each command is exactly one line written, followed by one
//! classified response line read (plus a dot-terminated block for the
//! multi-line commands). After QUIT, or after the connection is
//! closed, the session is poisoned: every further command returns the
//! terminal error without touching the wire.

use crate::connection::{self, LineStream, Transport};
use crate::error::{Cause, Error, Result};
use crate::message::Message;
use crate::response::{parse_listing, parse_response};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Delete a message from the maildrop.
pub(crate) const CMD_DELETE: &str = "DELE";
/// List messages, or one message when given an index.
pub(crate) const CMD_LIST: &str = "LIST";
/// Ping-like command; the server answers with a pong-style response.
const CMD_NOOP: &str = "NOOP";
/// Supply the account password.
const CMD_PASSWORD: &str = "PASS";
/// End the session.
const CMD_QUIT: &str = "QUIT";
/// Retrieve a message body.
pub(crate) const CMD_RETRIEVE: &str = "RETR";
/// Identify the account user.
const CMD_USER: &str = "USER";

/// Where the session is in its lifecycle. Transitions only move
/// forward: `Active` -> `QuitSent` -> `Closed`, never back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionState {
    Active,
    QuitSent,
    Closed,
}

impl SessionState {
    fn terminal_error(self) -> Option<Error> {
        match self {
            Self::Active => None,
            Self::QuitSent => Some(Cause::AlreadyQuit.into()),
            Self::Closed => Some(Cause::WriteAfterClose.into()),
        }
    }
}

/// Transport plus session state, locked as a unit so only one command
/// can be in flight on the connection.
pub(crate) struct ClientInner {
    stream: LineStream,
    state: SessionState,
}

impl ClientInner {
    /// Issue one command and classify its single-line response.
    ///
    /// This is the sole choke point for every protocol command. In a
    /// terminal state it short-circuits with the stored error before
    /// any I/O; a write failure is returned without attempting a read.
    /// All failures carry the command name as context.
    pub(crate) async fn command(&mut self, name: &str, args: &[&str]) -> Result<String> {
        if let Some(err) = self.state.terminal_error() {
            return Err(err);
        }

        let mut line = name.to_string();
        for arg in args {
            line.push(' ');
            line.push_str(arg);
        }

        debug!("-> {name}");
        self.stream
            .write_line(line.trim_end())
            .await
            .map_err(|e| Error::from(e).context(name))?;

        read_response(&mut self.stream)
            .await
            .map_err(|e| e.context(name))
    }

    /// Read one raw line from inside a multi-line block.
    pub(crate) async fn read_data_line(&mut self) -> std::io::Result<String> {
        self.stream.read_line().await
    }

    /// Consume the pending dot-terminated body.
    pub(crate) async fn read_dot_block(&mut self) -> std::io::Result<Vec<u8>> {
        self.stream.read_dot_block().await
    }
}

async fn read_response(stream: &mut LineStream) -> Result<String> {
    let line = stream
        .read_line()
        .await
        .map_err(|e| Error::from(e).context("read line"))?;
    parse_response(&line)
}

/// An authenticated-capable POP3 session over one connection.
///
/// Message handles returned by [`Pop3Client::list_messages`] refer
/// back to this client without owning it; they stop working once the
/// client is dropped or closed.
pub struct Pop3Client {
    inner: Arc<Mutex<ClientInner>>,
}

impl std::fmt::Debug for Pop3Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pop3Client").finish_non_exhaustive()
    }
}

impl Pop3Client {
    /// Connect to `addr` (`host:port`) over plain TCP and validate the
    /// server greeting.
    ///
    /// # Errors
    ///
    /// Returns an error if dialing fails (context `dial`) or the
    /// greeting is missing or malformed (context `new`).
    pub async fn connect(addr: &str) -> Result<Self> {
        Self::handshake(connection::dial(addr).await?).await
    }

    /// Connect to `addr` over implicit TLS (POP3S) and validate the
    /// server greeting.
    ///
    /// # Errors
    ///
    /// Returns an error if dialing or the TLS handshake fails (context
    /// `dial-tls`) or the greeting is malformed (context `new`).
    pub async fn connect_tls(addr: &str) -> Result<Self> {
        Self::handshake(connection::dial_tls(addr).await?).await
    }

    /// Build a client over an already-open stream, validating the
    /// server greeting.
    ///
    /// # Errors
    ///
    /// Returns an error if the greeting is missing or malformed; no
    /// client is produced in that case.
    pub async fn new(stream: impl Transport + 'static) -> Result<Self> {
        Self::handshake(LineStream::new(stream)).await
    }

    async fn handshake(mut stream: LineStream) -> Result<Self> {
        let greeting = read_response(&mut stream)
            .await
            .map_err(|e| e.context("new"))?;
        info!("connected: {greeting}");

        Ok(Self {
            inner: Arc::new(Mutex::new(ClientInner {
                stream,
                state: SessionState::Active,
            })),
        })
    }

    /// Log in with a plaintext user and password (USER then PASS).
    ///
    /// PASS is only sent if USER succeeded. One round of credentials
    /// per call; a rejected login surfaces as the failed command's
    /// error and the session stays usable for another attempt.
    ///
    /// # Errors
    ///
    /// Returns an error if either command fails.
    pub async fn login(&self, user: &str, pass: &str) -> Result<()> {
        let mut inner = self.inner.lock().await;
        inner.command(CMD_USER, &[user]).await?;
        inner.command(CMD_PASSWORD, &[pass]).await?;
        info!("logged in as {user}");
        Ok(())
    }

    /// List every message in the maildrop, in server order.
    ///
    /// Each returned handle carries its server-reported size, so
    /// [`Message::size`] on these handles performs no further I/O.
    ///
    /// # Errors
    ///
    /// Returns an error if the LIST command fails, or if reading or
    /// parsing the listing block fails (context `messages`).
    pub async fn list_messages(&self) -> Result<Vec<Message>> {
        let mut inner = self.inner.lock().await;
        inner.command(CMD_LIST, &[]).await?;

        let mut messages = Vec::new();
        loop {
            let line = inner
                .read_data_line()
                .await
                .map_err(|e| Error::from(e).context("messages"))?;
            if line == "." {
                break;
            }
            let (index, size) = parse_listing(&line).map_err(|e| e.context("messages"))?;
            messages.push(Message::new(Arc::downgrade(&self.inner), index, size));
        }

        debug!("{} messages in maildrop", messages.len());
        Ok(messages)
    }

    /// Send a ping-like NOOP and return the server's acknowledgment.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails.
    pub async fn noop(&self) -> Result<String> {
        self.inner.lock().await.command(CMD_NOOP, &[]).await
    }

    /// Send QUIT and poison the session.
    ///
    /// The session transitions to quit-sent even when the command
    /// itself fails, so QUIT is never retried and no later command
    /// reaches the wire. Calling `quit` again is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the QUIT command fails.
    pub async fn quit(&self) -> Result<()> {
        let mut inner = self.inner.lock().await;
        quit_session(&mut inner).await
    }

    /// Quit and close the connection.
    ///
    /// The transport is shut down exactly once regardless of how QUIT
    /// went; a QUIT failure takes priority in the returned error.
    /// Calling `close` again is a no-op.
    ///
    /// # Errors
    ///
    /// Returns the QUIT error if quitting failed, otherwise the
    /// shutdown result (context `close`).
    pub async fn close(&self) -> Result<()> {
        let mut inner = self.inner.lock().await;
        if inner.state == SessionState::Closed {
            return Ok(());
        }

        let quit_result = quit_session(&mut inner).await;
        let shutdown_result = inner.stream.shutdown().await;
        inner.state = SessionState::Closed;

        quit_result?;
        shutdown_result.map_err(|e| Error::from(e).context("close"))
    }
}

async fn quit_session(inner: &mut ClientInner) -> Result<()> {
    if inner.state != SessionState::Active {
        return Ok(());
    }

    let result = inner.command(CMD_QUIT, &[]).await;
    // Never retried, even when the command itself failed.
    inner.state = SessionState::QuitSent;
    result.map(|_| ())
}
