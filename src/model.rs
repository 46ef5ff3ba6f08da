use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use time::PrimitiveDateTime;

time::serde::format_description!(
    requested_at_format,
    PrimitiveDateTime,
    "[year]-[month]-[day]T[hour]:[minute]:[second]"
);

/// Internal identifier of a stored request. Never shown as the sequence number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(pub u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Handle to a user-selected file. The file itself is never opened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub path: PathBuf,
    pub name: String,
}

impl Attachment {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = display_name(&path);
        Self { path, name }
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleRequest {
    pub id: RequestId,
    pub serial_number: u32,
    pub planner: String,
    pub sales_order: String,
    #[serde(default, with = "requested_at_format::option")]
    pub requested_at: Option<PrimitiveDateTime>,
    pub unit: u32,
    pub quantity: u32,
    pub language: String,
    pub location: String,
    pub project: String,
    pub lpo_reference: String,
    pub is_combo: bool,
    #[serde(default)]
    pub attachment: Option<Attachment>,
}

/// A numeric form value: either a committed number or whatever the user has typed so far.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NumericInput {
    Number(u32),
    Text(String),
}

impl NumericInput {
    pub fn blank() -> Self {
        NumericInput::Text(String::new())
    }

    /// Text shown in an input box for this value.
    pub fn as_text(&self) -> String {
        match self {
            NumericInput::Number(n) => n.to_string(),
            NumericInput::Text(s) => s.clone(),
        }
    }
}

impl Default for NumericInput {
    fn default() -> Self {
        Self::blank()
    }
}

/// Editable fields of the request form. The serial number is display-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Planner,
    SalesOrder,
    RequestedAt,
    Unit,
    Quantity,
    Language,
    Location,
    Project,
    LpoReference,
    IsCombo,
    Attachment,
}

impl Field {
    /// Form order, top to bottom.
    pub const ALL: [Field; 11] = [
        Field::Planner,
        Field::SalesOrder,
        Field::RequestedAt,
        Field::Unit,
        Field::Quantity,
        Field::Language,
        Field::Location,
        Field::Project,
        Field::LpoReference,
        Field::IsCombo,
        Field::Attachment,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Field::Planner => "Schedule Request Planner",
            Field::SalesOrder => "Sales Order",
            Field::RequestedAt => "Requested Time and Date",
            Field::Unit => "Unit",
            Field::Quantity => "Quantity",
            Field::Language => "Language",
            Field::Location => "Location",
            Field::Project => "Project",
            Field::LpoReference => "LPO Reference No",
            Field::IsCombo => "Is Combo",
            Field::Attachment => "Attachment",
        }
    }

    pub fn kind(self) -> FieldKind {
        match self {
            Field::Planner | Field::SalesOrder | Field::RequestedAt => FieldKind::Text,
            Field::Unit | Field::Quantity => FieldKind::Number,
            Field::Language | Field::Location | Field::Project | Field::LpoReference => {
                FieldKind::Choice
            }
            Field::IsCombo => FieldKind::Checkbox,
            Field::Attachment => FieldKind::File,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How a field is edited by the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Number,
    Choice,
    Checkbox,
    File,
}

/// Value carried by a field-change action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldInput {
    Text(String),
    Checked(bool),
    File(Option<PathBuf>),
}

/// In-progress copy of a request while the form is open.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormBuffer {
    pub serial_number: NumericInput,
    pub planner: String,
    pub sales_order: String,
    pub requested_at: String,
    pub unit: NumericInput,
    pub quantity: NumericInput,
    pub language: String,
    pub location: String,
    pub project: String,
    pub lpo_reference: String,
    pub is_combo: bool,
    pub attachment: Option<Attachment>,
}

impl FormBuffer {
    /// Copy a stored request into an editable buffer.
    pub fn from_request(r: &ScheduleRequest) -> Self {
        Self {
            serial_number: NumericInput::Number(r.serial_number),
            planner: r.planner.clone(),
            sales_order: r.sales_order.clone(),
            requested_at: r
                .requested_at
                .map(crate::datetime::to_input)
                .unwrap_or_default(),
            unit: NumericInput::Number(r.unit),
            quantity: NumericInput::Number(r.quantity),
            language: r.language.clone(),
            location: r.location.clone(),
            project: r.project.clone(),
            lpo_reference: r.lpo_reference.clone(),
            is_combo: r.is_combo,
            attachment: r.attachment.clone(),
        }
    }

    /// Current value of a field rendered as input text.
    pub fn text_of(&self, field: Field) -> String {
        match field {
            Field::Planner => self.planner.clone(),
            Field::SalesOrder => self.sales_order.clone(),
            Field::RequestedAt => self.requested_at.clone(),
            Field::Unit => self.unit.as_text(),
            Field::Quantity => self.quantity.as_text(),
            Field::Language => self.language.clone(),
            Field::Location => self.location.clone(),
            Field::Project => self.project.clone(),
            Field::LpoReference => self.lpo_reference.clone(),
            Field::IsCombo => {
                if self.is_combo {
                    "yes".into()
                } else {
                    "no".into()
                }
            }
            Field::Attachment => self
                .attachment
                .as_ref()
                .map(|a| a.path.display().to_string())
                .unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn sample() -> ScheduleRequest {
        ScheduleRequest {
            id: RequestId(7),
            serial_number: 3,
            planner: "John Doe".into(),
            sales_order: "SO-2024-001".into(),
            requested_at: Some(datetime!(2024-11-10 10:00)),
            unit: 5,
            quantity: 100,
            language: "English".into(),
            location: "Warehouse A".into(),
            project: "Project Alpha".into(),
            lpo_reference: "LPO-001".into(),
            is_combo: true,
            attachment: Some(Attachment::from_path("/tmp/drawings/plan.pdf")),
        }
    }

    #[test]
    fn attachment_name_is_file_name() {
        let a = Attachment::from_path("/tmp/drawings/plan.pdf");
        assert_eq!(a.name, "plan.pdf");
    }

    #[test]
    fn buffer_copies_request_verbatim() {
        let r = sample();
        let b = FormBuffer::from_request(&r);
        assert_eq!(b.serial_number, NumericInput::Number(3));
        assert_eq!(b.unit, NumericInput::Number(5));
        assert_eq!(b.quantity, NumericInput::Number(100));
        assert_eq!(b.requested_at, "2024-11-10T10:00");
        assert_eq!(b.text_of(Field::IsCombo), "yes");
        assert_eq!(b.text_of(Field::Attachment), "/tmp/drawings/plan.pdf");
    }

    #[test]
    fn request_json_uses_local_datetime_text() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["requested_at"], "2024-11-10T10:00:00");
        assert_eq!(json["id"], 7);
        let back: ScheduleRequest = serde_json::from_value(json).unwrap();
        assert_eq!(back, sample());
    }

    #[test]
    fn blank_numeric_input_renders_empty() {
        assert_eq!(NumericInput::blank().as_text(), "");
        assert_eq!(NumericInput::Text("1".into()).as_text(), "1");
    }
}
