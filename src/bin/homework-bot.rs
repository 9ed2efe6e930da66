//! Homework status bot binary.
//!
//! Polls the homework API forever and reports status changes to Telegram.

use std::fs::File;
use std::process::ExitCode;
use std::sync::Mutex;

use clap::Parser;
use homework_bot::cli::Cli;
use homework_bot::{Bot, Outcome, PollState};

#[tokio::main]
async fn main() -> ExitCode {
    // Values from .env act as environment fallbacks for the CLI flags.
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    if let Err(e) = init_tracing(&cli) {
        eprintln!("Error: cannot open log file: {e}");
        return ExitCode::FAILURE;
    }

    let config = match cli.config() {
        Ok(c) => c,
        Err(e) => {
            tracing::error!(error = %e, "startup aborted");
            eprintln!("Error: {e}");
            eprintln!("Hint: Set PRACTICUM_TOKEN, TELEGRAM_TOKEN and TELEGRAM_CHAT_ID");
            return ExitCode::FAILURE;
        }
    };

    let bot = match Bot::from_config(&config) {
        Ok(b) => b,
        Err(e) => {
            tracing::error!(error = %e, "startup aborted");
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut state = cli
        .from_date
        .map(PollState::new)
        .unwrap_or_else(PollState::starting_now);

    if cli.once {
        return match bot.poll_once(&mut state).await {
            Outcome::Failed { message, .. } => {
                eprintln!("Error: {message}");
                ExitCode::FAILURE
            }
            Outcome::DeliveryFailed(_) => ExitCode::FAILURE,
            _ => ExitCode::SUCCESS,
        };
    }

    bot.run(state).await;
    ExitCode::SUCCESS
}

fn init_tracing(cli: &Cli) -> std::io::Result<()> {
    let builder = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::from(cli.log_level))
        .with_target(false);

    match &cli.log_file {
        Some(path) => {
            let file = File::create(path)?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => builder.init(),
    }
    Ok(())
}
