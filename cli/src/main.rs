use std::io::Write;
use std::time::Duration;

use clap::{Parser, Subcommand};
use client::quick_actions::QUICK_ACTIONS;
use client::{ChatSession, ClientConfig, HttpTransport, SendOutcome, TransportError};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;


#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("could not set up transport: {0}")]
    Transport(#[from] TransportError),
    #[error("server returned HTTP {0}")]
    ServerStatus(u16),
    #[error("chat failed: {0}")]
    Chat(String),
    #[error("request cancelled")]
    Cancelled,
    #[error("terminal i/o failed: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Parser, Debug)]
#[command(name = "nexscholar-chat", about = "Terminal client for the NexScholar chat gateway")]
struct Cli {
    #[arg(long, env = "CHAT_BASE_URL", default_value = client::config::DEFAULT_BASE_URL)]
    base_url: String,

    #[arg(long, env = "CHAT_REQUEST_TIMEOUT_SECS", default_value_t = client::config::DEFAULT_REQUEST_TIMEOUT_SECS)]
    timeout_secs: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check that the gateway is up.
    Ping,
    /// Send one message and print the reply.
    Ask { message: String },
    /// Interactive conversation.
    Chat,
}

/// One line of REPL input.
#[derive(Debug, PartialEq, Eq)]
enum ReplInput<'a> {
    Empty,
    Quit,
    Clear,
    ListQuick,
    Quick(usize),
    Unknown(&'a str),
    Message(&'a str),
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = ClientConfig {
        base_url: cli.base_url.trim_end_matches('/').to_owned(),
        request_timeout: Duration::from_secs(cli.timeout_secs.max(1)),
    };

    match cli.command {
        Command::Ping => run_ping(&config).await,
        Command::Ask { message } => run_ask(&config, &message).await,
        Command::Chat => run_chat(&config).await,
    }
}

async fn run_ping(config: &ClientConfig) -> Result<(), CliError> {
    let url = format!("{}/healthz", config.base_url);
    let response = reqwest::Client::new().get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(CliError::ServerStatus(status.as_u16()));
    }
    println!("ok");
    Ok(())
}

async fn run_ask(config: &ClientConfig, message: &str) -> Result<(), CliError> {
    let session = ChatSession::connect(config)?;
    match send_interruptible(&session, message).await {
        SendOutcome::Replied => {
            print_last_reply(&session);
            Ok(())
        }
        SendOutcome::Failed => Err(CliError::Chat(session.error().unwrap_or_default())),
        SendOutcome::Cancelled => Err(CliError::Cancelled),
        SendOutcome::Ignored => Err(CliError::Chat("message is empty".to_owned())),
    }
}

async fn run_chat(config: &ClientConfig) -> Result<(), CliError> {
    let session = ChatSession::connect(config)?;
    print_last_reply(&session);
    println!("(/quick lists prompts, /N sends prompt N, /clear resets, /quit exits)");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => None,
        };
        let Some(line) = line else {
            break;
        };

        let text = match parse_input(&line) {
            ReplInput::Empty => continue,
            ReplInput::Quit => break,
            ReplInput::Clear => {
                session.clear_chat();
                print_last_reply(&session);
                continue;
            }
            ReplInput::ListQuick => {
                for (i, action) in QUICK_ACTIONS.iter().enumerate() {
                    println!("  /{} {} {}", i + 1, action.icon, action.label);
                }
                continue;
            }
            ReplInput::Quick(index) => {
                let Some(action) = QUICK_ACTIONS.get(index) else {
                    println!("no quick action {}", index + 1);
                    continue;
                };
                println!("> {}", action.message);
                action.message
            }
            ReplInput::Unknown(command) => {
                println!("unknown command {command}");
                continue;
            }
            ReplInput::Message(text) => text,
        };

        match send_interruptible(&session, text).await {
            SendOutcome::Replied | SendOutcome::Failed => print_last_reply(&session),
            SendOutcome::Cancelled => println!("(cancelled)"),
            SendOutcome::Ignored => {}
        }
    }
    Ok(())
}

/// Send, cancelling the request if Ctrl-C arrives first.
async fn send_interruptible(session: &ChatSession<HttpTransport>, text: &str) -> SendOutcome {
    let send = session.send_message(text);
    tokio::pin!(send);
    tokio::select! {
        outcome = &mut send => outcome,
        _ = tokio::signal::ctrl_c() => {
            session.cancel_request();
            send.await
        }
    }
}

fn print_last_reply(session: &ChatSession<HttpTransport>) {
    if let Some(message) = session.messages().last() {
        println!("{}", message.content());
    }
}

fn parse_input(line: &str) -> ReplInput<'_> {
    let line = line.trim();
    if line.is_empty() {
        return ReplInput::Empty;
    }
    let Some(command) = line.strip_prefix('/') else {
        return ReplInput::Message(line);
    };
    match command {
        "quit" | "exit" => ReplInput::Quit,
        "clear" => ReplInput::Clear,
        "quick" => ReplInput::ListQuick,
        _ => match command.parse::<usize>() {
            Ok(n) if n >= 1 => ReplInput::Quick(n - 1),
            _ => ReplInput::Unknown(line),
        },
    }
}
