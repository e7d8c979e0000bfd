//! Receiving CLI - log stock deliveries, generate labels, keep the receiving schedule
//!
//! Thin command-line front end over `receiving-core`. Staged drafts and the
//! schedule workbook live in a file-backed key-value store.

use clap::{CommandFactory, Parser};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use receiving_core::VocabularyKind;

mod app;
mod cli;
mod commands;
mod config;
mod constants;
mod errors;
mod helpers;
mod output;
mod ui;

use app::AppContext;
use cli::{Cli, Commands};
use errors::Failure;
use ui::{error_message, UiContext};

fn main() {
    let cli = Cli::parse();

    let filter = EnvFilter::try_new(&cli.log_level).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    if let Err(err) = run(&cli) {
        let failure = Failure::of(&err);
        let ui_ctx = UiContext::from_env(false, cli.no_color);
        eprintln!("{}", error_message(&ui_ctx, &format!("{:#}", err), failure.hint));
        std::process::exit(failure.exit_code);
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let ctx = AppContext::new(cli);
    match &cli.command {
        Some(Commands::Init(args)) => commands::handle_init(&ctx, args),
        Some(Commands::Supplier { command }) => {
            commands::handle_vocabulary(&ctx, VocabularyKind::Suppliers, command)
        }
        Some(Commands::StockCode { command }) => {
            commands::handle_vocabulary(&ctx, VocabularyKind::StockCodes, command)
        }
        Some(Commands::Draft { command }) => commands::handle_draft(&ctx, command),
        Some(Commands::Commit(args)) => commands::handle_commit(&ctx, args),
        Some(Commands::Schedule { command }) => commands::handle_schedule(&ctx, command),
        Some(Commands::Completions { shell }) => commands::handle_completions(*shell),
        None => {
            Cli::command().print_help()?;
            println!();
            Ok(())
        }
    }
}
