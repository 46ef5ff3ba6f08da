//! One-off snapshot exports of the session's requests.

use crate::datetime;
use crate::model::ScheduleRequest;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use time::OffsetDateTime;

const CSV_HEADER: &str = "id,serial_number,planner,sales_order,requested_at,unit,quantity,language,location,project,lpo_reference,is_combo,attachment";

pub fn export_json(path: &Path, records: &[ScheduleRequest]) -> Result<()> {
    let out = serde_json::to_string_pretty(records)?;
    std::fs::write(path, out).with_context(|| format!("write {}", path.display()))?;
    tracing::info!(path = %path.display(), count = records.len(), "exported JSON");
    Ok(())
}

pub fn export_csv(path: &Path, records: &[ScheduleRequest]) -> Result<()> {
    std::fs::write(path, render_csv(records))
        .with_context(|| format!("write {}", path.display()))?;
    tracing::info!(path = %path.display(), count = records.len(), "exported CSV");
    Ok(())
}

pub fn render_csv(records: &[ScheduleRequest]) -> String {
    let mut out = String::from(CSV_HEADER);
    out.push('\n');
    for r in records {
        let row = [
            r.id.to_string(),
            r.serial_number.to_string(),
            r.planner.clone(),
            r.sales_order.clone(),
            r.requested_at.map(datetime::to_input).unwrap_or_default(),
            r.unit.to_string(),
            r.quantity.to_string(),
            r.language.clone(),
            r.location.clone(),
            r.project.clone(),
            r.lpo_reference.clone(),
            r.is_combo.to_string(),
            r.attachment
                .as_ref()
                .map(|a| a.path.display().to_string())
                .unwrap_or_default(),
        ];
        let cells: Vec<String> = row.iter().map(|c| csv_escape(c)).collect();
        out.push_str(&cells.join(","));
        out.push('\n');
    }
    out
}

fn csv_escape(cell: &str) -> String {
    if cell.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell.to_string()
    }
}

/// `schedule-requests-<timestamp>.<ext>` in the current directory.
pub fn default_export_path(ext: &str) -> Result<PathBuf> {
    let now = OffsetDateTime::now_utc();
    let stamp = format!(
        "{:04}{:02}{:02}-{:02}{:02}{:02}",
        now.year(),
        now.month() as u8,
        now.day(),
        now.hour(),
        now.minute(),
        now.second()
    );
    let current_dir = std::env::current_dir().context("get current directory")?;
    Ok(current_dir.join(format!("schedule-requests-{stamp}.{ext}")))
}
