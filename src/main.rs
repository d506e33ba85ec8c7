//! Line-oriented REPL wiring the chat client to a plain terminal.
//!
//! The binary is the thinnest possible host surface: it reads prompt lines
//! from stdin, forwards them to [`ChatClient`], and lets the
//! [`TerminalDisplay`] sink do the printing. Session key management is the
//! out-of-band concern it is for any host: `/login` and `/logout` mutate the
//! store directly.

use claw::adapters::{FileSessionStore, ReqwestHttpClient, TerminalDisplay};
use claw::client::ChatClient;
use claw::traits::SessionStore;

use color_eyre::Result;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::EnvFilter;

const VERSION: &str = env!("CARGO_PKG_VERSION");

const HELP: &str = "\
commands:
  /login <sessionKey>   store a session key captured from claude.ai
  /logout               delete the stored session key
  /clear                reset the conversation and transcript
  /help                 show this help
  /quit                 exit";

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let store = FileSessionStore::new()?;
    let mut client = ChatClient::new(
        ReqwestHttpClient::new(),
        store.clone(),
        TerminalDisplay::new(),
    );

    eprintln!("claw {VERSION} - chat with Claude.ai ( /help for commands )");
    client.publish_auth_status().await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();

        match line {
            "" => continue,
            "/quit" | "/exit" => break,
            "/help" => eprintln!("{HELP}"),
            "/clear" => client.reset_conversation(),
            "/login" => eprintln!("usage: /login <sessionKey>"),
            "/logout" => {
                if let Err(err) = store.delete().await {
                    eprintln!("error: {err}");
                }
                client.publish_auth_status().await;
            }
            _ => {
                if let Some(token) = line.strip_prefix("/login ") {
                    if let Err(err) = store.set(token).await {
                        eprintln!("error: {err}");
                    }
                    client.publish_auth_status().await;
                } else {
                    client.send_prompt(line).await;
                }
            }
        }
    }

    Ok(())
}
