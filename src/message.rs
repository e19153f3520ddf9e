//! Message handles
//!
//! A [`Message`] is a lightweight reference to one server-side message,
//! identified by its session-scoped 1-based index. Handles are created
//! by [`crate::Pop3Client::list_messages`] and hold the owning client
//! weakly: they never keep the session alive, and once the client is
//! dropped every operation fails with [`Cause::ClientGone`].

use crate::client::{CMD_DELETE, CMD_LIST, CMD_RETRIEVE, ClientInner};
use crate::error::{Cause, Error, Result};
use crate::response::parse_listing;
use mail_parser::MessageParser;
use std::sync::{Arc, Weak};
use tokio::sync::Mutex;

/// A handle to one message in the maildrop.
#[derive(Debug)]
pub struct Message {
    client: Weak<Mutex<ClientInner>>,
    index: u32,
    /// Cached byte size. Only ever set to a positive value; a server
    /// that reports zero is treated as "size unknown" and queried
    /// again next time.
    size: Option<u64>,
}

impl Message {
    pub(crate) fn new(client: Weak<Mutex<ClientInner>>, index: u32, size: u64) -> Self {
        Self {
            client,
            index,
            size: (size > 0).then_some(size),
        }
    }

    /// The server-assigned 1-based index of this message.
    #[must_use]
    pub fn index(&self) -> u32 {
        self.index
    }

    fn client(&self) -> Result<Arc<Mutex<ClientInner>>> {
        self.client.upgrade().ok_or_else(|| Cause::ClientGone.into())
    }

    /// The message size in bytes.
    ///
    /// Answered from the cache when already known; otherwise issues
    /// `LIST <index>` (single-line form) and caches the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the command or the listing parse fails
    /// (context `list`), clearing any partial cache.
    pub async fn size(&mut self) -> Result<u64> {
        if let Some(size) = self.size {
            return Ok(size);
        }

        let client = self.client()?;
        let mut inner = client.lock().await;
        let result = inner
            .command(CMD_LIST, &[&self.index.to_string()])
            .await
            .and_then(|line| parse_listing(&line).map(|(_, size)| size));

        match result {
            Ok(size) => {
                self.size = (size > 0).then_some(size);
                Ok(size)
            }
            Err(e) => {
                self.size = None;
                Err(e.context("list"))
            }
        }
    }

    /// Retrieve and parse the full message (headers and body).
    ///
    /// Issues `RETR <index>`, consumes the dot-terminated body, and
    /// hands it to [`mail_parser`]. The block framing guarantees the
    /// stream is positioned for the next command afterwards.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails, or if reading or parsing
    /// the body fails (context `retrieve`).
    pub async fn retrieve(&self) -> Result<mail_parser::Message<'static>> {
        let client = self.client()?;
        let mut inner = client.lock().await;
        inner
            .command(CMD_RETRIEVE, &[&self.index.to_string()])
            .await?;

        let body = inner
            .read_dot_block()
            .await
            .map_err(|e| Error::from(e).context("retrieve"))?;

        MessageParser::default()
            .parse(&body)
            .map(|message| message.into_owned())
            .ok_or_else(|| Error::parse("malformed message").context("retrieve"))
    }

    /// Delete this message from the maildrop.
    ///
    /// Returns the server's acknowledgment text uninterpreted. The
    /// handle keeps its index; POP3 renumbers nothing until QUIT.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails.
    pub async fn delete(&self) -> Result<String> {
        let client = self.client()?;
        let mut inner = client.lock().await;
        inner.command(CMD_DELETE, &[&self.index.to_string()]).await
    }
}
