//! Text summary builder for CLI output.
//!
//! Mirrors the card layout of the TUI as plain lines.

use crate::datetime;
use crate::model::ScheduleRequest;

/// Pre-formatted lines for text output.
pub(crate) struct TextSummary {
    pub lines: Vec<String>,
}

pub(crate) fn build_text_summary(records: &[ScheduleRequest]) -> TextSummary {
    let mut lines = Vec::new();

    if records.is_empty() {
        lines.push("No Schedule Requests".to_string());
        return TextSummary { lines };
    }

    for (i, r) in records.iter().enumerate() {
        if i > 0 {
            lines.push(String::new());
        }
        let combo = if r.is_combo { "  [COMBO]" } else { "" };
        lines.push(format!("#{} {} ({}){combo}", r.serial_number, r.planner, r.sales_order));
        lines.push(format!(
            "  Date & Time: {}",
            datetime::format_display(r.requested_at)
        ));
        lines.push(format!("  Unit: {}  Quantity: {}", r.unit, r.quantity));
        lines.push(format!(
            "  Language: {}  LPO Ref: {}",
            r.language, r.lpo_reference
        ));
        lines.push(format!("  Location: {}", r.location));
        lines.push(format!("  Project: {}", r.project));
        if let Some(a) = r.attachment.as_ref() {
            lines.push(format!("  Attachment: {}", a.name));
        }
    }

    TextSummary { lines }
}
