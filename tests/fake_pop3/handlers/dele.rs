//! DELE command handler.
//!
//! Marks a message deleted. Real POP3 only removes marked messages at
//! QUIT; the fake server keeps the mark so later LIST/RETR calls skip
//! the message while indices stay stable.

use crate::fake_pop3::io::write_line;
use crate::fake_pop3::maildrop::Maildrop;
use std::sync::Mutex;
use tokio::io::{AsyncRead, AsyncWrite, BufReader};

/// Handle the DELE command, mutating the shared maildrop.
pub async fn handle_dele<S: AsyncRead + AsyncWrite + Unpin>(
    arg: Option<&str>,
    maildrop: &Mutex<Maildrop>,
    stream: &mut BufReader<S>,
) {
    let index = arg.and_then(|a| a.parse::<u32>().ok());

    let marked = index.is_some_and(|index| {
        let mut maildrop = maildrop.lock().unwrap();
        let slot = (index as usize).checked_sub(1);
        match slot.and_then(|s| maildrop.messages.get_mut(s)) {
            Some(message) if !message.deleted => {
                message.deleted = true;
                true
            }
            _ => false,
        }
    });

    if marked {
        let index = index.unwrap();
        let _ = write_line(stream, &format!("+OK message {index} deleted\r\n")).await;
    } else {
        let _ = write_line(stream, "-ERR no such message\r\n").await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake_pop3::maildrop::MaildropBuilder;
    use tokio::io::BufReader;

    async fn run(arg: Option<&str>, maildrop: &Mutex<Maildrop>) -> String {
        let (client, server) = tokio::io::duplex(1024);
        let mut stream = BufReader::new(server);

        handle_dele(arg, maildrop, &mut stream).await;
        drop(stream);

        let mut buf = Vec::new();
        tokio::io::AsyncReadExt::read_to_end(&mut BufReader::new(client), &mut buf)
            .await
            .unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[tokio::test]
    async fn marks_message_deleted() {
        let maildrop = Mutex::new(MaildropBuilder::new().message(b"raw").build());

        let output = run(Some("1"), &maildrop).await;
        assert_eq!(output, "+OK message 1 deleted\r\n");
        assert!(maildrop.lock().unwrap().messages[0].deleted);
    }

    #[tokio::test]
    async fn deleting_twice_fails() {
        let maildrop = Mutex::new(MaildropBuilder::new().message(b"raw").build());

        run(Some("1"), &maildrop).await;
        let output = run(Some("1"), &maildrop).await;
        assert_eq!(output, "-ERR no such message\r\n");
    }

    #[tokio::test]
    async fn unknown_index_is_an_error() {
        let maildrop = Mutex::new(MaildropBuilder::new().build());
        let output = run(Some("5"), &maildrop).await;
        assert_eq!(output, "-ERR no such message\r\n");
    }
}
