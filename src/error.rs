//! Error types for pop3-client
//!
//! Every failure that crosses a component boundary is wrapped with a
//! short context label naming the command or operation that caused it.
//! Wrapping an already-wrapped error prepends the new label to the
//! existing chain instead of nesting error values, so a failure always
//! renders as one flat trace:
//!
//! ```text
//! pop3: retrieve: RETR: connection reset by peer
//! ```

use std::fmt;
use thiserror::Error;

/// The root cause of a client failure.
#[derive(Debug, Error)]
pub enum Cause {
    /// The server answered `-ERR`, or the response line was malformed.
    #[error("{0}")]
    Protocol(String),

    /// A listing line or message body could not be parsed.
    #[error("{0}")]
    Parse(String),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("TLS error: {0}")]
    Tls(String),

    #[error("configuration error: {0}")]
    Config(String),

    /// A command was issued after QUIT was sent.
    #[error("already quit from server")]
    AlreadyQuit,

    /// A command was issued after the connection was closed.
    #[error("write after close")]
    WriteAfterClose,

    /// The handle's owning client has been dropped.
    #[error("client dropped")]
    ClientGone,
}

/// A POP3 client error: a chain of context labels plus one root cause.
///
/// The chain stays flat: wrapping never nests one `Error` inside
/// another, it only grows the label list. The outermost context renders
/// first.
#[derive(Debug)]
pub struct Error {
    contexts: Vec<String>,
    cause: Cause,
}

impl Error {
    pub(crate) fn protocol(message: impl Into<String>) -> Self {
        Cause::Protocol(message.into()).into()
    }

    pub(crate) fn parse(message: impl Into<String>) -> Self {
        Cause::Parse(message.into()).into()
    }

    pub(crate) fn tls(message: impl Into<String>) -> Self {
        Cause::Tls(message.into()).into()
    }

    pub(crate) fn config(message: impl Into<String>) -> Self {
        Cause::Config(message.into()).into()
    }

    /// Prepend a context label to the chain.
    #[must_use]
    pub(crate) fn context(mut self, context: impl Into<String>) -> Self {
        self.contexts.insert(0, context.into());
        self
    }

    /// The root cause, with all context labels stripped.
    #[must_use]
    pub fn cause(&self) -> &Cause {
        &self.cause
    }

    /// The context labels, outermost first.
    #[must_use]
    pub fn contexts(&self) -> &[String] {
        &self.contexts
    }

    /// Whether the server itself rejected the command with `-ERR`.
    ///
    /// These failures are recoverable by the caller (e.g. retry
    /// `login` with different credentials); I/O failures are not.
    #[must_use]
    pub fn is_protocol(&self) -> bool {
        matches!(self.cause, Cause::Protocol(_))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pop3")?;
        for context in &self.contexts {
            write!(f, ": {context}")?;
        }
        write!(f, ": {}", self.cause)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.cause)
    }
}

impl From<Cause> for Error {
    fn from(cause: Cause) -> Self {
        Self {
            contexts: Vec::new(),
            cause,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Cause::Io(err).into()
    }
}

pub type Result<T> = std::result::Result<T, Error>;
