//! Interactive line console driving the session registry.

mod command;

use command::{ConsoleCommand, HELP, parse};

use anyhow::Result;
use chat_session::{CreateError, SessionError, SessionRegistry};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, warn};

/// What the read loop should do after one command.
#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Open the initial windows, then read commands from stdin until `/quit`,
/// EOF, or Ctrl-C. Every session is closed before returning.
pub async fn run_console(registry: &SessionRegistry, initial: Vec<String>) -> Result<()> {
    for name in initial {
        join(registry, &name).await;
    }
    println!("Type /help for commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                match line? {
                    Some(line) => {
                        if dispatch(registry, &line).await == Flow::Quit {
                            break;
                        }
                    }
                    None => {
                        debug!("stdin closed");
                        break;
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                debug!("Interrupted");
                break;
            }
        }
    }

    registry.close_all().await;
    Ok(())
}

async fn dispatch(registry: &SessionRegistry, line: &str) -> Flow {
    let command = match parse(line) {
        Ok(command) => command,
        Err(e) => {
            println!("{}", e);
            return Flow::Continue;
        }
    };

    match command {
        ConsoleCommand::Empty => {}
        ConsoleCommand::Help => println!("{}", HELP),
        ConsoleCommand::Quit => return Flow::Quit,
        ConsoleCommand::Join(name) => join(registry, &name).await,
        ConsoleCommand::Leave(name) => {
            if !registry.remove(&name).await {
                println!("No window open for {}", name);
            }
        }
        ConsoleCommand::List => {
            let identities = registry.identities().await;
            if identities.is_empty() {
                println!("No windows open");
            }
            for identity in identities {
                let state = registry.get(identity.as_str()).await.map(|h| h.state());
                match state {
                    Some(state) => println!("  {} ({:?})", identity, state),
                    None => println!("  {}", identity),
                }
            }
        }
        ConsoleCommand::Say { identity, text } => {
            let Some(handle) = registry.get(&identity).await else {
                println!("No window open for {} (try /join {})", identity, identity);
                return Flow::Continue;
            };
            match handle.send_chat(text).await {
                Ok(()) => {}
                Err(SessionError::NotOpen) => println!("{} is still connecting", identity),
                Err(e) => {
                    warn!("Send from {} failed: {}", identity, e);
                    println!("{}: {}", identity, e);
                }
            }
        }
    }
    Flow::Continue
}

async fn join(registry: &SessionRegistry, name: &str) {
    match registry.create_session(name).await {
        Ok(handle) => debug!("Joined as {} ({})", handle.identity(), handle.id()),
        Err(e @ CreateError::DuplicateIdentity(_)) => println!("{} (try /leave first)", e),
        Err(e) => println!("{}", e),
    }
}
