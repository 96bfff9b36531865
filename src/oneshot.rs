use std::io::Read;
use std::path::{Path, PathBuf};

use log::debug;

use crate::engine;
use crate::store::RuleStore;

/// Non-interactive mode: load rules from a JSON file, read text from a
/// file or stdin, print the substituted text to stdout.
pub async fn run_apply(rules_path: PathBuf, input: Option<PathBuf>) {
    let contents = match tokio::fs::read_to_string(&rules_path).await {
        Ok(contents) => contents,
        Err(e) => {
            eprintln!("Failed to read {}: {e}", rules_path.display());
            std::process::exit(1);
        }
    };

    // Same import path as the editor, so file validation behaves the same.
    let mut store = RuleStore::new();
    if let Err(e) = store.import_document(&contents) {
        eprintln!("Failed to load rules from {}: {e}", rules_path.display());
        std::process::exit(1);
    }
    let rules = store.collect();
    debug!("loaded {} rules from {}", rules.len(), rules_path.display());

    let text = match read_input(input.as_deref()).await {
        Ok(text) => text,
        Err(e) => {
            eprintln!("Failed to read input: {e}");
            std::process::exit(1);
        }
    };

    let (result, failures) = engine::apply(&text, &rules);
    for failure in &failures {
        eprintln!("rule {:?} skipped: {}", failure.antigo, failure.error);
    }
    print!("{result}");
}

async fn read_input(path: Option<&Path>) -> std::io::Result<String> {
    match path {
        Some(path) => tokio::fs::read_to_string(path).await,
        None => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            Ok(text)
        }
    }
}
