//! Date/time handling for the requested-at field.
//!
//! Input follows the `datetime-local` shape (`2024-11-10T10:00`, seconds optional).
//! Display follows the card layout: `Nov 10, 2024 at 10:00 AM`.

use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::PrimitiveDateTime;

const INPUT_MINUTES: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]");
const INPUT_SECONDS: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");
const DISPLAY_DATE: &[BorrowedFormatItem<'static>] =
    format_description!("[month repr:short] [day padding:none], [year]");
const DISPLAY_TIME: &[BorrowedFormatItem<'static>] =
    format_description!("[hour repr:12 padding:none]:[minute] [period]");

/// Shown on cards when no date was entered.
pub const NOT_SCHEDULED: &str = "Not scheduled";

/// Parse form input. Blank input means "no date".
pub fn parse_local(text: &str) -> Result<Option<PrimitiveDateTime>, time::error::Parse> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    match PrimitiveDateTime::parse(text, INPUT_MINUTES) {
        Ok(dt) => Ok(Some(dt)),
        Err(_) => PrimitiveDateTime::parse(text, INPUT_SECONDS).map(Some),
    }
}

/// Render a stored value back into form input text.
pub fn to_input(dt: PrimitiveDateTime) -> String {
    let fmt = if dt.second() == 0 {
        INPUT_MINUTES
    } else {
        INPUT_SECONDS
    };
    dt.format(fmt).unwrap_or_default()
}

pub fn format_display(dt: Option<PrimitiveDateTime>) -> String {
    let Some(dt) = dt else {
        return NOT_SCHEDULED.to_string();
    };
    match (dt.format(DISPLAY_DATE), dt.format(DISPLAY_TIME)) {
        (Ok(date), Ok(time)) => format!("{date} at {time}"),
        _ => to_input(dt),
    }
}
