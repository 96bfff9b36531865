use log::debug;
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Rules file imported automatically when the edit session starts.
    #[serde(default)]
    pub rules_file: String,
    /// Clipboard program for the copy command. Empty means wl-copy.
    #[serde(default)]
    pub copy_command: String,
}

fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("~/.config"))
        .join("trocar.toml")
}

pub fn load_config() -> Config {
    let path = config_path();
    let mut config = if let Ok(content) = std::fs::read_to_string(&path) {
        match toml::from_str(&content) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Failed to parse {path:?}: {e}");
                Config::default()
            }
        }
    } else {
        Config::default()
    };

    // Allow env var to override the clipboard program
    if let Ok(cmd) = std::env::var("TROCAR_COPY_CMD")
        && !cmd.is_empty()
    {
        config.copy_command = cmd;
    }

    debug!(
        "rules_file={:?} copy_command={:?}",
        config.rules_file, config.copy_command
    );
    config
}
