use log::debug;
use tokio::process::Command;

/// Hands the text to the clipboard program as a single argument after `--`,
/// the way wl-copy takes it.
pub async fn copy(text: &str, configured: &str) -> Result<(), String> {
    let program = if configured.is_empty() {
        "wl-copy"
    } else {
        configured
    };
    debug!("copy program={program} text_len={}", text.len());

    let status = Command::new(program)
        .arg("--")
        .arg(text)
        .status()
        .await
        .map_err(|e| format!("{program} failed to start: {e}"))?;

    if status.success() {
        Ok(())
    } else {
        Err(format!("{program} exited with {status}"))
    }
}
