//! Terminal front end for the knowledge base.
//!
//! # Responsibility
//! - Resolve configuration and start file logging.
//! - Run the interactive loop over stdin/stdout against the HTTP API.

mod args;
mod repl;
mod terminal;
mod view;

use args::Args;
use clap::Parser;
use kbase_core::{
    default_log_level, init_logging, resolve_log_dir, ClientConfig, HttpKnowledgeApi,
    KnowledgeSession, LogSettings,
};
use log::error;
use repl::Repl;
use std::process::ExitCode;
use terminal::Terminal;

fn main() -> ExitCode {
    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("kbase: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), String> {
    let config = ClientConfig::resolve(args.base_url.as_deref())?;
    let settings = LogSettings::new(
        args.log_level.as_deref().unwrap_or(default_log_level()),
        resolve_log_dir(args.log_dir.as_deref()),
    );
    init_logging(&settings, config.base_url())?;

    let api = HttpKnowledgeApi::new(&config).map_err(|err| {
        error!("event=app_start module=cli status=error error={err}");
        err.to_string()
    })?;

    println!("kbase {} @ {}", kbase_core::core_version(), config.base_url());
    let stdin = std::io::stdin();
    let terminal = Terminal::new(stdin.lock(), std::io::stdout());
    Repl::new(KnowledgeSession::new(api), terminal).run();
    Ok(())
}
