use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod clipboard;
mod config;
mod engine;
mod oneshot;
mod rules;
mod session;
mod store;

#[derive(Parser)]
#[command(name = "trocar", about = "Rule-based find & replace for text")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive rule editor
    Edit,
    /// Apply rules from a JSON file to a text file or stdin
    Apply {
        /// JSON rules file (array of {"antigo", "novo"} objects)
        #[arg(long)]
        rules: PathBuf,
        /// Input text file; stdin when omitted
        #[arg(long)]
        input: Option<PathBuf>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Edit => session::run_edit().await,
        Commands::Apply { rules, input } => oneshot::run_apply(rules, input).await,
    }
}
