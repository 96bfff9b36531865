use std::path::{Path, PathBuf};

use log::debug;

use crate::clipboard;
use crate::config::{Config, load_config};
use crate::engine;
use crate::rules::{self, DEFAULT_RULES_FILENAME};
use crate::store::{ImportOutcome, RuleStore, escape_display};

/// One user action, parsed from an input line. `Text` and `Quit` are
/// handled by the input loop; everything else goes through `execute`.
#[derive(Debug, PartialEq)]
pub enum Command {
    Add,
    Remove(usize),
    SetOld(usize, String),
    SetNew(usize, String),
    List,
    Text,
    Run,
    Show,
    Copy,
    Export(Option<PathBuf>),
    Import(PathBuf),
    Help,
    Quit,
    Unknown(String),
}

pub fn parse_command(line: &str) -> Command {
    let line = line.trim();
    let mut parts = line.splitn(2, ' ');
    let word = parts.next().unwrap_or("");
    let rest = parts.next().unwrap_or("").trim_start();

    match word {
        "add" => Command::Add,
        "rm" => match parse_index(rest) {
            Some(index) => Command::Remove(index),
            None => Command::Unknown(line.to_string()),
        },
        "old" | "new" => {
            // The value starts right after the row number; only the
            // separating space is eaten, so replacements may keep leading
            // whitespace.
            let mut sub = rest.splitn(2, ' ');
            let index = parse_index(sub.next().unwrap_or(""));
            let value = sub.next().unwrap_or("").to_string();
            match index {
                Some(index) if word == "old" => Command::SetOld(index, value),
                Some(index) => Command::SetNew(index, value),
                None => Command::Unknown(line.to_string()),
            }
        }
        "list" => Command::List,
        "text" => Command::Text,
        "run" => Command::Run,
        "show" => Command::Show,
        "copy" => Command::Copy,
        "export" => Command::Export((!rest.is_empty()).then(|| PathBuf::from(rest))),
        "import" => {
            if rest.is_empty() {
                Command::Unknown(line.to_string())
            } else {
                Command::Import(PathBuf::from(rest))
            }
        }
        "help" => Command::Help,
        "quit" | "exit" => Command::Quit,
        _ => Command::Unknown(line.to_string()),
    }
}

/// Row numbers are 1-based on the surface, 0-based inside.
fn parse_index(token: &str) -> Option<usize> {
    token.parse::<usize>().ok().filter(|n| *n >= 1).map(|n| n - 1)
}

/// Owns the rule rows and the text buffers; every user action is a method
/// call here, so the whole session can be driven without a terminal.
pub struct Session {
    store: RuleStore,
    source: String,
    result: String,
    config: Config,
}

impl Session {
    pub fn new(config: Config) -> Self {
        Session {
            store: RuleStore::new(),
            source: String::new(),
            result: String::new(),
            config,
        }
    }

    pub fn set_source(&mut self, text: String) {
        self.source = text;
    }

    pub fn source_len(&self) -> usize {
        self.source.len()
    }

    /// The editor always shows at least one row to type into.
    pub fn ensure_editable_row(&mut self) {
        if self.store.is_empty() {
            self.store.add_empty();
        }
    }

    pub async fn execute(&mut self, command: Command) -> String {
        match command {
            Command::Add => {
                self.store.add_empty();
                format!("rule {} added", self.store.len())
            }
            Command::Remove(index) => {
                if self.store.remove(index) {
                    format!("rule {} removed", index + 1)
                } else {
                    format!("no rule {}", index + 1)
                }
            }
            Command::SetOld(index, value) => {
                if self.store.set_antigo(index, &value) {
                    format!("rule {} pattern set", index + 1)
                } else {
                    format!("no rule {}", index + 1)
                }
            }
            Command::SetNew(index, value) => {
                if self.store.set_novo(index, &value) {
                    format!("rule {} replacement set", index + 1)
                } else {
                    format!("no rule {}", index + 1)
                }
            }
            Command::List => self.render_rows(),
            Command::Run => self.run_rules(),
            Command::Show => {
                if self.result.is_empty() {
                    "no result yet (use run)".to_string()
                } else {
                    self.result.clone()
                }
            }
            Command::Copy => self.copy_result().await,
            Command::Export(path) => self.export(path).await,
            Command::Import(path) => self.import(&path).await,
            Command::Help => HELP.to_string(),
            Command::Unknown(input) => format!("unknown command {input:?} (try help)"),
            // Handled by the input loop.
            Command::Text | Command::Quit => String::new(),
        }
    }

    fn render_rows(&self) -> String {
        if self.store.is_empty() {
            return "no rules".to_string();
        }
        let mut out = String::new();
        for (i, row) in self.store.rows().iter().enumerate() {
            out.push_str(&format!(
                "{:>3}. \"{}\" -> \"{}\"\n",
                i + 1,
                escape_display(&row.antigo),
                escape_display(&row.novo)
            ));
        }
        out.pop();
        out
    }

    fn run_rules(&mut self) -> String {
        let rules = self.store.collect();
        debug!("applying {} rules to {} bytes", rules.len(), self.source.len());
        let (result, failures) = engine::apply(&self.source, &rules);
        self.result = result;

        let mut out = String::new();
        for failure in &failures {
            out.push_str(&format!(
                "rule \"{}\" skipped: {}\n",
                failure.antigo, failure.error
            ));
        }
        out.push_str(&self.result);
        out
    }

    async fn copy_result(&self) -> String {
        if self.result.is_empty() {
            return "nothing to copy (use run first)".to_string();
        }
        match clipboard::copy(&self.result, &self.config.copy_command).await {
            Ok(()) => "result copied to the clipboard".to_string(),
            Err(e) => format!("copy failed: {e}"),
        }
    }

    async fn export(&self, path: Option<PathBuf>) -> String {
        let rules = self.store.collect();
        let json = match rules::export_rules(&rules) {
            Ok(json) => json,
            Err(e) => return e.to_string(),
        };
        let path = path.unwrap_or_else(|| PathBuf::from(DEFAULT_RULES_FILENAME));
        match tokio::fs::write(&path, json).await {
            Ok(()) => format!("{} rules saved to {}", rules.len(), path.display()),
            Err(e) => format!("failed to write {}: {e}", path.display()),
        }
    }

    async fn import(&mut self, path: &Path) -> String {
        // Rows are only touched once the whole file has been read.
        let contents = match tokio::fs::read_to_string(path).await {
            Ok(contents) => contents,
            Err(e) => return format!("failed to read {}: {e}", path.display()),
        };
        self.import_contents(&contents)
    }

    pub fn import_contents(&mut self, contents: &str) -> String {
        match self.store.import_document(contents) {
            Ok(ImportOutcome::Imported(n)) => format!("{n} rules imported"),
            Ok(ImportOutcome::EmptyFile) => "the file had no rules; starting fresh".to_string(),
            Err(e) => format!("import failed: {e}"),
        }
    }
}

const HELP: &str = "\
commands:
  add              add an empty rule
  rm N             remove rule N
  old N TEXT       set the pattern of rule N
  new N TEXT       set the replacement of rule N
  list             show the rules
  text             enter the source text (finish with a lone \".\")
  run              apply the rules to the source text
  show             print the result
  copy             copy the result to the clipboard
  export [PATH]    save the rules as JSON (default regras_substituicao.json)
  import PATH      load rules from a JSON file
  quit             leave";

pub async fn run_edit() {
    let config = load_config();
    let rules_file = config.rules_file.clone();
    let mut session = Session::new(config);

    if !rules_file.is_empty() {
        let response = session.execute(Command::Import(PathBuf::from(&rules_file))).await;
        println!("{response}");
    }
    session.ensure_editable_row();

    println!("trocar — find & replace rule editor (help for commands)");

    let stdin = std::io::stdin();
    let mut line = String::new();
    loop {
        line.clear();
        match stdin.read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                eprintln!("Failed to read input: {e}");
                break;
            }
        }
        if line.trim().is_empty() {
            continue;
        }
        match parse_command(&line) {
            Command::Quit => break,
            Command::Text => {
                let text = read_text_block(&stdin);
                session.set_source(text);
                println!("source text set ({} bytes)", session.source_len());
            }
            command => {
                let response = session.execute(command).await;
                if !response.is_empty() {
                    println!("{response}");
                }
            }
        }
    }
}

fn read_text_block(stdin: &std::io::Stdin) -> String {
    println!("enter text, finish with a single \".\" on its own line:");
    let mut lines: Vec<String> = Vec::new();
    let mut line = String::new();
    loop {
        line.clear();
        match stdin.read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {
                let stripped = line.trim_end_matches(['\r', '\n']);
                if stripped == "." {
                    break;
                }
                lines.push(stripped.to_string());
            }
            Err(_) => break,
        }
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_commands() {
        assert_eq!(parse_command("add"), Command::Add);
        assert_eq!(parse_command("  list  "), Command::List);
        assert_eq!(parse_command("quit"), Command::Quit);
        assert_eq!(parse_command("exit"), Command::Quit);
    }

    #[test]
    fn parses_row_commands_one_based() {
        assert_eq!(parse_command("rm 2"), Command::Remove(1));
        assert_eq!(
            parse_command("old 1 foo bar"),
            Command::SetOld(0, "foo bar".to_string())
        );
        assert_eq!(
            parse_command("new 3  padded"),
            Command::SetNew(2, " padded".to_string())
        );
    }

    #[test]
    fn rejects_zero_and_garbage_indices() {
        assert!(matches!(parse_command("rm 0"), Command::Unknown(_)));
        assert!(matches!(parse_command("rm x"), Command::Unknown(_)));
        assert!(matches!(parse_command("old nope y"), Command::Unknown(_)));
    }

    #[test]
    fn parses_export_and_import_paths() {
        assert_eq!(parse_command("export"), Command::Export(None));
        assert_eq!(
            parse_command("export regras.json"),
            Command::Export(Some(PathBuf::from("regras.json")))
        );
        assert_eq!(
            parse_command("import regras.json"),
            Command::Import(PathBuf::from("regras.json"))
        );
        assert!(matches!(parse_command("import"), Command::Unknown(_)));
    }

    #[tokio::test]
    async fn hello_world_end_to_end() {
        let mut session = Session::new(Config::default());
        session.execute(Command::Add).await;
        session.execute(Command::SetOld(0, "world".to_string())).await;
        session.execute(Command::SetNew(0, "Earth".to_string())).await;
        session.set_source("Hello World".to_string());
        let response = session.execute(Command::Run).await;
        assert_eq!(response, "Hello Earth");
        assert_eq!(session.execute(Command::Show).await, "Hello Earth");
    }

    #[tokio::test]
    async fn run_reports_failed_rules_and_applies_the_rest() {
        let mut session = Session::new(Config::default());
        session.execute(Command::Add).await;
        session.execute(Command::Add).await;
        session.execute(Command::SetOld(0, "(".to_string())).await;
        session.execute(Command::SetOld(1, "b".to_string())).await;
        session.execute(Command::SetNew(1, "c".to_string())).await;
        session.set_source("ab".to_string());
        let response = session.execute(Command::Run).await;
        assert!(response.starts_with("rule \"(\" skipped:"));
        assert!(response.ends_with("ac"));
    }

    #[tokio::test]
    async fn missing_import_file_keeps_the_rows() {
        let mut session = Session::new(Config::default());
        session.execute(Command::Add).await;
        session.execute(Command::SetOld(0, "kept".to_string())).await;
        let response = session
            .execute(Command::Import(PathBuf::from("/no/such/file.json")))
            .await;
        assert!(response.starts_with("failed to read"));
        assert_eq!(session.execute(Command::List).await, "  1. \"kept\" -> \"\"");
    }

    #[tokio::test]
    async fn export_with_only_blank_rows_reports_nothing_to_export() {
        let mut session = Session::new(Config::default());
        session.execute(Command::Add).await;
        let response = session.execute(Command::Export(None)).await;
        assert_eq!(response, "no rules to export");
    }

    #[test]
    fn ensure_editable_row_only_fills_an_empty_store() {
        let mut session = Session::new(Config::default());
        session.ensure_editable_row();
        session.ensure_editable_row();
        assert_eq!(session.store.len(), 1);
    }
}
