use crate::model::ScheduleRequest;
use anyhow::Result;
use std::sync::mpsc as std_mpsc;
use std::sync::OnceLock;
use std::time::Duration;

use super::state::UiState;

// Global clipboard manager channel - initialized once on first use
static CLIPBOARD_SENDER: OnceLock<std_mpsc::Sender<String>> = OnceLock::new();

/// Export format offered from the requests list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    Json,
    Csv,
}

impl ExportKind {
    fn label(self) -> &'static str {
        match self {
            ExportKind::Json => "JSON",
            ExportKind::Csv => "CSV",
        }
    }
}

/// Export the current list into the working directory and report the path in `state.info`.
pub fn export_and_show_path(kind: ExportKind, records: &[ScheduleRequest], state: &mut UiState) {
    let res = match kind {
        ExportKind::Json => crate::export::default_export_path("json")
            .and_then(|p| crate::export::export_json(&p, records).map(|_| p)),
        ExportKind::Csv => crate::export::default_export_path("csv")
            .and_then(|p| crate::export::export_csv(&p, records).map(|_| p)),
    };
    match res {
        Ok(p) => {
            state.last_exported_path = Some(p.to_string_lossy().to_string());
            state.info = format!(
                "Exported {}: {} (press 'y' to copy path)",
                kind.label(),
                p.display()
            );
        }
        Err(e) => {
            state.info = format!("{} export failed: {e:#}", kind.label());
        }
    }
}

/// Copy the last exported path, reporting the result in `state.info`.
pub fn copy_exported_path(state: &mut UiState) {
    let Some(path) = state.last_exported_path.clone() else {
        state.info = "No exported file path to copy. Export a file first (x/c)".into();
        return;
    };
    match copy_to_clipboard(&path) {
        Ok(()) => {
            let display_path = if path.chars().count() > 60 {
                let head: String = path.chars().take(57).collect();
                format!("{head}...")
            } else {
                path
            };
            state.info = format!("Copied to clipboard: {}", display_path);
        }
        Err(e) => {
            state.info = format!("Clipboard copy failed: {e:#}");
        }
    }
}

/// Initialize the clipboard manager thread if not already initialized.
/// Each clipboard instance is kept alive long enough for clipboard managers to read it.
fn init_clipboard_manager() -> Result<&'static std_mpsc::Sender<String>> {
    CLIPBOARD_SENDER.get_or_init(|| {
        let (tx, rx) = std_mpsc::channel::<String>();

        std::thread::spawn(move || {
            use arboard::Clipboard;

            for text in rx {
                if let Ok(mut clipboard) = Clipboard::new() {
                    if clipboard.set_text(&text).is_ok() {
                        std::thread::sleep(Duration::from_secs(2));
                    }
                }
            }
        });

        tx
    });

    CLIPBOARD_SENDER
        .get()
        .ok_or_else(|| anyhow::anyhow!("Failed to initialize clipboard manager"))
}

/// Queue text for the clipboard without blocking the UI loop.
pub fn copy_to_clipboard(text: &str) -> Result<()> {
    let sender = init_clipboard_manager()?;
    sender
        .send(text.to_string())
        .map_err(|_| anyhow::anyhow!("Clipboard manager channel closed"))?;
    tracing::debug!("queued clipboard copy");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copy_without_export_explains() {
        let mut state = UiState::default();
        copy_exported_path(&mut state);
        assert!(state.info.starts_with("No exported file path"));
    }
}
