//! LIST command handler.
//!
//! Without an argument, answers with a dot-terminated scan listing
//! (RFC 1939 Section 5):
//!
//! ```text
//! +OK 2 messages
//! 1 500
//! 2 700
//! .
//! ```
//!
//! With an argument, answers with a single status line for that one
//! message: `+OK 1 500`.

use crate::fake_pop3::io::write_line;
use crate::fake_pop3::maildrop::Maildrop;
use tokio::io::{AsyncRead, AsyncWrite, BufReader};

/// Handle the LIST command, with or without a message index.
pub async fn handle_list<S: AsyncRead + AsyncWrite + Unpin>(
    arg: Option<&str>,
    maildrop: &Maildrop,
    stream: &mut BufReader<S>,
) {
    match arg {
        None => {
            let count = maildrop.listing().count();
            if write_line(stream, &format!("+OK {count} messages\r\n"))
                .await
                .is_err()
            {
                return;
            }
            for (index, message) in maildrop.listing() {
                let line = format!("{index} {}\r\n", message.raw.len());
                if write_line(stream, &line).await.is_err() {
                    return;
                }
            }
            let _ = write_line(stream, ".\r\n").await;
        }
        Some(arg) => {
            let found = arg
                .parse::<u32>()
                .ok()
                .and_then(|index| maildrop.get(index).map(|m| (index, m)));
            match found {
                Some((index, message)) => {
                    let line = format!("+OK {index} {}\r\n", message.raw.len());
                    let _ = write_line(stream, &line).await;
                }
                None => {
                    let _ = write_line(stream, "-ERR no such message\r\n").await;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake_pop3::maildrop::MaildropBuilder;
    use tokio::io::BufReader;

    async fn run(arg: Option<&str>, maildrop: &Maildrop) -> String {
        let (client, server) = tokio::io::duplex(4096);
        let mut stream = BufReader::new(server);

        handle_list(arg, maildrop, &mut stream).await;
        drop(stream);

        let mut buf = Vec::new();
        tokio::io::AsyncReadExt::read_to_end(&mut BufReader::new(client), &mut buf)
            .await
            .unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[tokio::test]
    async fn scan_listing_ends_with_terminator() {
        let maildrop = MaildropBuilder::new()
            .message(b"x".repeat(500).as_slice())
            .message(b"y".repeat(700).as_slice())
            .build();

        let output = run(None, &maildrop).await;
        assert_eq!(output, "+OK 2 messages\r\n1 500\r\n2 700\r\n.\r\n");
    }

    #[tokio::test]
    async fn empty_maildrop_lists_nothing() {
        let maildrop = MaildropBuilder::new().build();
        let output = run(None, &maildrop).await;
        assert_eq!(output, "+OK 0 messages\r\n.\r\n");
    }

    #[tokio::test]
    async fn single_message_form() {
        let maildrop = MaildropBuilder::new()
            .message(b"x".repeat(500).as_slice())
            .build();

        let output = run(Some("1"), &maildrop).await;
        assert_eq!(output, "+OK 1 500\r\n");
    }

    #[tokio::test]
    async fn unknown_index_is_an_error() {
        let maildrop = MaildropBuilder::new().build();
        let output = run(Some("9"), &maildrop).await;
        assert_eq!(output, "-ERR no such message\r\n");
    }
}
