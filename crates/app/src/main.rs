mod args;
mod commands;
mod console;
mod logging;

use std::process::ExitCode;

use clap::Parser;

use services::{AppServices, AppServicesError, Clock, ContentSource};

use crate::args::{Cli, Command, normalize_sqlite_url, prepare_sqlite_file};
use crate::console::Console;

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let exam_settings = cli.exam_settings()?;
    let db_url = normalize_sqlite_url(&cli.db);

    // The file must exist before sqlx opens it; migrations run inside AppServices.
    prepare_sqlite_file(&db_url)?;
    let source = ContentSource::discover(&cli.data);
    tracing::debug!(db = %db_url, ?source, "starting");

    let app = AppServices::new_sqlite(&db_url, &source, Clock::default(), exam_settings).await?;
    let mut console = Console::default();

    match cli.command {
        Command::Progress { reset } => commands::progress(&app, reset).await,
        Command::Cheatsheets => {
            commands::cheatsheets(&app);
            Ok(())
        }
        Command::Search { query } => {
            commands::search(&app, &console, &query);
            Ok(())
        }
        Command::Flashcards { week } => commands::flashcards(&app, &mut console, week).await,
        Command::Quiz { week } => commands::quiz(&app, &mut console, week).await,
        Command::Exam { seed } => commands::exam(&app, &mut console, seed).await,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_tracing(&cli.log);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            // Content failures end the session with a single notice.
            if let Some(AppServicesError::Content(content)) = err.downcast_ref::<AppServicesError>() {
                eprintln!("Could not load course content: {content}");
            } else {
                eprintln!("{err}");
            }
            ExitCode::from(2)
        }
    }
}
