//! imsctl - Main entry point

use clap::Parser;
use log::debug;

use imsctl::{run_call_command, run_context_command, Cli, CallMethod, Command, ContextStore};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&cli.log_level))
        .init();

    debug!("imsctl v{} starting", env!("CARGO_PKG_VERSION"));

    let store = ContextStore::new();
    let result = match &cli.command {
        Command::Get(args) => {
            run_call_command(&store, CallMethod::Get, args, cli.context.as_deref()).await
        }
        Command::Post(args) => {
            run_call_command(&store, CallMethod::Post, args, cli.context.as_deref()).await
        }
        Command::Context { action } => run_context_command(&store, action),
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
