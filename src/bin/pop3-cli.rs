#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

//! CLI for inspecting a POP3 mailbox

use clap::{Parser, Subcommand};
use pop3_client::{Mail, Pop3Client, Pop3Config};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pop3-cli")]
#[command(about = "Command-line client for POP3 mailboxes")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List messages (index and size)
    List,

    /// Show a single message by index
    Show {
        /// Message index (1-based, as reported by LIST)
        index: u32,
    },

    /// Mark a message as deleted (the server removes it at QUIT)
    Delete {
        /// Message index (1-based, as reported by LIST)
        index: u32,
    },

    /// Check that the server is alive
    Noop,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let config = Pop3Config::from_env()?;
    let client = connect(&config).await?;

    let result = match args.command {
        Command::List => cmd_list(&client).await,
        Command::Show { index } => cmd_show(&client, index).await,
        Command::Delete { index } => cmd_delete(&client, index).await,
        Command::Noop => cmd_noop(&client).await,
    };

    client.close().await?;
    result
}

async fn connect(config: &Pop3Config) -> anyhow::Result<Pop3Client> {
    let client = if config.tls {
        Pop3Client::connect_tls(&config.addr()).await?
    } else {
        Pop3Client::connect(&config.addr()).await?
    };

    client.login(&config.username, &config.password).await?;
    Ok(client)
}

async fn cmd_list(client: &Pop3Client) -> anyhow::Result<()> {
    let mut messages = client.list_messages().await?;

    if messages.is_empty() {
        println!("No messages.");
        return Ok(());
    }

    println!("{:<8} {}", "Index", "Size");
    for message in &mut messages {
        println!("{:<8} {}", message.index(), message.size().await?);
    }
    println!("\n{} message(s)", messages.len());

    Ok(())
}

async fn cmd_show(client: &Pop3Client, index: u32) -> anyhow::Result<()> {
    let message = find_message(client, index).await?;
    let mail = message.retrieve().await?;
    print_mail(&mail);
    Ok(())
}

async fn cmd_delete(client: &Pop3Client, index: u32) -> anyhow::Result<()> {
    let message = find_message(client, index).await?;
    let ack = message.delete().await?;
    println!("Deleted message {index}: {ack}");
    Ok(())
}

async fn cmd_noop(client: &Pop3Client) -> anyhow::Result<()> {
    let reply = client.noop().await?;
    println!("Server is alive: {reply}");
    Ok(())
}

async fn find_message(
    client: &Pop3Client,
    index: u32,
) -> anyhow::Result<pop3_client::Message> {
    client
        .list_messages()
        .await?
        .into_iter()
        .find(|m| m.index() == index)
        .ok_or_else(|| anyhow::anyhow!("no message with index {index}"))
}

fn print_mail(mail: &Mail<'_>) {
    let from = mail
        .from()
        .and_then(|a| a.first())
        .and_then(|a| a.address())
        .unwrap_or("-");

    println!("From:    {from}");
    println!("Subject: {}", mail.subject().unwrap_or("-"));
    if let Some(date) = mail.date() {
        println!("Date:    {date}");
    }

    println!("\n--- Body ---\n");
    println!("{}", mail.body_text(0).unwrap_or_default());
}
