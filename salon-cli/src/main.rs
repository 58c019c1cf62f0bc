use anyhow::Context;
use clap::Parser;
use salon_cli::commands::{self, Flow};
use salon_cli::prompt::StdinConfirm;
use salon_cli::build_session;
use salon_session::{HoldEvent, SessionStart};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{mpsc, Mutex};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "salon-book", about = "Book a salon appointment from a chat booking link")]
struct Cli {
    /// Booking page URL, with `?t=<token>` when you have a hold
    link: String,

    /// Directory with default.toml and optional <RUN_MODE>.toml / local.toml
    #[arg(long, default_value = "config")]
    config_dir: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "salon_cli=debug,salon_session=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = salon_store::app_config::Config::load_from(&cli.config_dir).context("Failed to load config")?;
    tracing::info!("Booking against {}", config.backend.base_url);

    // One reader for stdin; commands and confirmation prompts share it
    let (tx, rx) = mpsc::channel::<String>(16);
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if tx.send(line).await.is_err() {
                break;
            }
        }
    });
    let input = Arc::new(Mutex::new(rx));

    let mut session = build_session(&config, &cli.link, Box::new(StdinConfirm::new(input.clone())))?;

    match session.start().await {
        SessionStart::Held { expires_at, .. } => tracing::info!("Hold valid until {}", expires_at),
        SessionStart::Anonymous { .. } => tracing::info!("No hold token; open booking"),
        SessionStart::InvalidLink | SessionStart::Lapsed => tracing::warn!("Continuing without a hold"),
    }
    println!("{}", commands::status_line(&session));
    print!("{}", commands::render_summary(&session));
    println!("Type `help` for commands.");

    let mut ticker = tokio::time::interval(Duration::from_secs(1));
    loop {
        let next = {
            let mut rx = input.lock().await;
            tokio::select! {
                line = rx.recv() => Some(line),
                _ = ticker.tick() => None,
            }
        };

        let line = match next {
            None => {
                if session.tick() == Some(HoldEvent::Expired) {
                    println!("{}", commands::status_line(&session));
                }
                continue;
            }
            Some(None) => break,
            Some(Some(line)) => line,
        };

        match commands::parse(&line) {
            Ok(Some(command)) => {
                if commands::execute(&mut session, command).await == Flow::Quit {
                    break;
                }
            }
            Ok(None) => {}
            Err(e) => println!("{}", e),
        }
    }

    Ok(())
}
