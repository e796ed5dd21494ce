use std::io::{self, IsTerminal};

use anyhow::Context;
use clap::Parser;
use colored::Colorize;
use tracing::Level;

use hbnb_console::{repl, Console, ConsoleConfig};
use hbnb_store::FileStorage;

mod cli;

fn main() {
    let cli = cli::Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("{} {e:#}", "error:".red().bold());
        std::process::exit(1);
    }
}

fn run(cli: cli::Cli) -> anyhow::Result<()> {
    let mut config = match &cli.config {
        Some(path) => ConsoleConfig::from_file(path)?,
        None => ConsoleConfig::default(),
    };
    if let Some(file) = cli.file {
        config.storage_path = file;
    }

    let level = if cli.verbose { Level::DEBUG } else { config.level()? };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(level)
        .init();

    let (store, report) = FileStorage::open(&config.storage_path).with_context(|| {
        format!(
            "failed to load object store from {}",
            config.storage_path.display()
        )
    })?;
    tracing::info!(
        path = %config.storage_path.display(),
        loaded = report.loaded,
        skipped = report.skipped,
        "object store ready"
    );

    let mut console = Console::new(store);
    let mut stdout = io::stdout().lock();

    if !cli.commands.is_empty() {
        repl::run_script(&mut console, &cli.commands, &mut stdout)?;
        return Ok(());
    }

    let stdin = io::stdin();
    let interactive = stdin.is_terminal();
    repl::run(&mut console, stdin.lock(), &mut stdout, interactive)?;
    Ok(())
}
