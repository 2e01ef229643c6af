//! System clipboard integration. spec.md §6 "Clipboard", §4.L (`y` key).
//!
//! Shells out to a platform clipboard utility, writes the cell text to its
//! stdin, and surfaces the outcome as a status string rather than an
//! error — a missing clipboard tool is recoverable, not fatal (spec.md §7).

use std::io::Write;
use std::process::{Command, Stdio};

const STATUS_PREVIEW_LEN: usize = 47;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyOutcome {
    Copied(String),
    Unavailable(String),
    Failed(String),
}

impl CopyOutcome {
    pub fn status_message(&self) -> &str {
        match self {
            CopyOutcome::Copied(s) | CopyOutcome::Unavailable(s) | CopyOutcome::Failed(s) => s,
        }
    }
}

/// Which external command to pipe text into, resolved once per call so a
/// clipboard tool installed after the process starts is still picked up.
fn resolve_command() -> Option<(&'static str, &'static [&'static str])> {
    if cfg!(target_os = "macos") {
        return Some(("pbcopy", &[]));
    }
    if cfg!(target_os = "linux") {
        if command_exists("xclip") {
            return Some(("xclip", &["-selection", "clipboard"]));
        }
        if command_exists("xsel") {
            return Some(("xsel", &["--clipboard", "--input"]));
        }
    }
    None
}

fn command_exists(name: &str) -> bool {
    Command::new("which")
        .arg(name)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

/// Copy `text` to the system clipboard, returning a status fit for display
/// on the viewer's status line (truncated past 50 characters of preview).
pub fn copy_to_clipboard(text: &str) -> CopyOutcome {
    let Some((program, args)) = resolve_command() else {
        tracing::warn!(target: "clipboard", "no_clipboard_command_found");
        return CopyOutcome::Unavailable("Clipboard not available on this system".to_string());
    };
    tracing::debug!(target: "clipboard", program, len = text.len(), "copy_attempt");

    let mut child = match Command::new(program).args(args).stdin(Stdio::piped()).spawn() {
        Ok(child) => child,
        Err(e) => {
            tracing::warn!(target: "clipboard", program, ?e, "spawn_failed");
            return CopyOutcome::Failed("Failed to access clipboard".to_string());
        }
    };

    if let Some(mut stdin) = child.stdin.take() {
        if stdin.write_all(text.as_bytes()).is_err() {
            tracing::warn!(target: "clipboard", program, "write_failed");
            return CopyOutcome::Failed("Failed to access clipboard".to_string());
        }
    }

    match child.wait() {
        Ok(status) if status.success() => CopyOutcome::Copied(preview_message(text)),
        Ok(status) => {
            tracing::warn!(target: "clipboard", program, code = status.code(), "nonzero_exit");
            CopyOutcome::Failed("Failed to access clipboard".to_string())
        }
        Err(e) => {
            tracing::warn!(target: "clipboard", program, ?e, "wait_failed");
            CopyOutcome::Failed("Failed to access clipboard".to_string())
        }
    }
}

fn preview_message(text: &str) -> String {
    if text.chars().count() > 50 {
        let preview: String = text.chars().take(STATUS_PREVIEW_LEN).collect();
        format!("Copied: {preview}...")
    } else {
        format!("Copied: {text}")
    }
}
