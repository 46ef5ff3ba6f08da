use crate::config::{load_config, AppConfig};
use crate::session::Session;
use anyhow::{Context, Result};
use clap::Parser;
use std::io::Write;

#[derive(Debug, Parser, Clone)]
#[command(
    name = "schedule-requests",
    version,
    about = "Create, edit and review schedule requests in a terminal UI"
)]
pub struct Cli {
    /// Print the session's requests as JSON and exit (no TUI)
    #[arg(long, conflicts_with = "text")]
    pub json: bool,

    /// Print a text summary of the session's requests and exit (no TUI)
    #[arg(long)]
    pub text: bool,

    /// Start with an empty list instead of the two sample requests
    #[arg(long)]
    pub no_demo: bool,

    /// Path to a TOML config file (option lists, demo data)
    #[arg(long)]
    pub config: Option<std::path::PathBuf>,

    /// Export requests as JSON
    #[arg(long)]
    pub export_json: Option<std::path::PathBuf>,

    /// Export requests as CSV
    #[arg(long)]
    pub export_csv: Option<std::path::PathBuf>,

    /// Write logs to this file (TUI mode discards logs otherwise)
    #[arg(long)]
    pub log_file: Option<std::path::PathBuf>,
}

impl Cli {
    pub fn is_non_tui(&self) -> bool {
        self.json || self.text || cfg!(not(feature = "tui"))
    }
}

/// Merge the config file with CLI overrides.
pub fn build_config(args: &Cli) -> Result<AppConfig> {
    let mut cfg = load_config(args.config.as_deref())?;
    if args.no_demo {
        cfg.seed_demo = false;
    }
    Ok(cfg)
}

pub fn run(args: Cli) -> Result<()> {
    let cfg = build_config(&args)?;
    let session = Session::from_config(&cfg);
    if session.store().is_empty() {
        tracing::info!("starting with an empty request list");
    } else {
        tracing::debug!(records = session.store().len(), "session ready");
    }

    if !args.json && !args.text {
        #[cfg(feature = "tui")]
        {
            return crate::tui::run(session);
        }
        #[cfg(not(feature = "tui"))]
        {
            // Fallback when built without TUI support.
            return run_text(&args, &session);
        }
    }

    if args.json {
        return run_json(&args, &session);
    }

    run_text(&args, &session)
}

fn run_json(args: &Cli, session: &Session) -> Result<()> {
    handle_exports(args, session)?;
    let out = serde_json::to_string_pretty(session.records())?;
    let stdout = std::io::stdout();
    let mut w = std::io::LineWriter::new(stdout.lock());
    writeln!(w, "{}", out).context("write JSON to stdout")?;
    Ok(())
}

fn run_text(args: &Cli, session: &Session) -> Result<()> {
    handle_exports(args, session)?;
    let summary = crate::text_summary::build_text_summary(session.records());
    let stdout = std::io::stdout();
    let mut w = std::io::LineWriter::new(stdout.lock());
    for line in summary.lines {
        writeln!(w, "{}", line).context("write summary to stdout")?;
    }
    Ok(())
}

/// Handle export operations (JSON and CSV) for both text and JSON modes.
fn handle_exports(args: &Cli, session: &Session) -> Result<()> {
    if let Some(p) = args.export_json.as_deref() {
        crate::export::export_json(p, session.records())?;
        eprintln!("Exported: {}", p.display());
    }
    if let Some(p) = args.export_csv.as_deref() {
        crate::export::export_csv(p, session.records())?;
        eprintln!("Exported: {}", p.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flags() {
        let cli = Cli::parse_from(["schedule-requests", "--json", "--no-demo"]);
        assert!(cli.json);
        assert!(cli.no_demo);
        assert!(cli.is_non_tui());
    }

    #[test]
    fn json_and_text_conflict() {
        assert!(Cli::try_parse_from(["schedule-requests", "--json", "--text"]).is_err());
    }

    #[test]
    fn no_demo_overrides_config() {
        let dir = std::env::temp_dir();
        let path = dir.join(format!("schedule-requests-cli-{}.toml", std::process::id()));
        std::fs::write(&path, "seed_demo = true\n").unwrap();
        let cli = Cli::parse_from([
            "schedule-requests",
            "--no-demo",
            "--config",
            path.to_str().unwrap(),
        ]);
        let cfg = build_config(&cli).unwrap();
        assert!(!cfg.seed_demo);
        let _ = std::fs::remove_file(&path);
    }
}
