use anyhow::Context;
use std::io::Write;
use std::path::Path;
use tokio::io::{AsyncBufReadExt, BufReader};

mod actions;
mod api;
mod app;
mod commands;
mod logger;
mod reducer;
mod state;
mod views;

use app::{Flow, NotesApp};
use commands::Command;
use notes_config::AppConfig;
use views::Screen;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load();
    let log_file = logger::init(config.log_level_filter())?;

    log::info!("Starting mini-redux-notes");

    // Thunks spawn local tasks; everything runs on this one thread.
    let local = tokio::task::LocalSet::new();
    let result = local.run_until(run(config, &log_file)).await;

    if let Err(err) = &result {
        log::error!("Exiting with error: {:#}", err);
    }
    log::info!("Exiting mini-redux-notes");
    result
}

async fn run(config: AppConfig, log_file: &Path) -> anyhow::Result<()> {
    println!("mini-redux notes - type `help` for commands (log file: {})", log_file.display());

    let mut app = NotesApp::new(&config, Screen::Stdout)?;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("> ");
        std::io::stdout().flush().context("Failed to flush stdout")?;

        let Some(line) = lines.next_line().await.context("Failed to read stdin")? else {
            break;
        };

        let command = match Command::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(err) => {
                println!("{:#}", err);
                continue;
            }
        };

        match app.execute(command) {
            Ok(Flow::Continue) => {}
            Ok(Flow::Quit) => break,
            Err(err) => println!("Error: {:#}", err),
        }
    }

    if app.pending_count() > 0 {
        println!("Waiting for {} request(s) to finish...", app.pending_count());
    }
    app.settle().await
}
