//! POP3 client library
//!
//! A minimal async client for the POP3 mailbox-retrieval protocol
//! (RFC 1939): connect over plain TCP or implicit TLS, authenticate
//! with USER/PASS, enumerate messages, retrieve bodies, and delete
//! messages. One command is in flight at a time; the protocol is not
//! pipelined.
//!
//! Retrieved messages are parsed with the [`mail_parser`] crate and
//! returned as [`Mail`] values.

mod client;
mod config;
mod connection;
mod error;
mod message;
mod response;

pub use client::Pop3Client;
pub use config::Pop3Config;
pub use connection::Transport;
pub use error::{Cause, Error, Result};
pub use mail_parser::Message as Mail;
pub use message::Message;
