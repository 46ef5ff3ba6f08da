//! In-memory record store for the session.
//!
//! Records keep insertion order; edits replace a record in place.

use crate::datetime;
use crate::error::{RequestError, RequestResult};
use crate::model::{Field, FormBuffer, NumericInput, RequestId, ScheduleRequest};
use time::macros::datetime;
use time::OffsetDateTime;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordStore {
    records: Vec<ScheduleRequest>,
    // Highest id ever issued or loaded; ids are never reused after a delete.
    last_id: u64,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<ScheduleRequest>) -> Self {
        let last_id = records.iter().map(|r| r.id.0).max().unwrap_or(0);
        Self { records, last_id }
    }

    /// The two requests the tool starts with when demo data is enabled.
    pub fn demo() -> Self {
        Self::with_records(vec![
            ScheduleRequest {
                id: RequestId(1),
                serial_number: 1,
                planner: "John Doe".into(),
                sales_order: "SO-2024-001".into(),
                requested_at: Some(datetime!(2024-11-10 10:00)),
                unit: 5,
                quantity: 100,
                language: "English".into(),
                location: "Warehouse A".into(),
                project: "Project Alpha".into(),
                lpo_reference: "LPO-001".into(),
                is_combo: false,
                attachment: None,
            },
            ScheduleRequest {
                id: RequestId(2),
                serial_number: 2,
                planner: "Jane Smith".into(),
                sales_order: "SO-2024-002".into(),
                requested_at: Some(datetime!(2024-11-12 14:30)),
                unit: 3,
                quantity: 75,
                language: "Arabic".into(),
                location: "Warehouse B".into(),
                project: "Project Beta".into(),
                lpo_reference: "LPO-002".into(),
                is_combo: true,
                attachment: None,
            },
        ])
    }

    pub fn list(&self) -> &[ScheduleRequest] {
        &self.records
    }

    pub fn get(&self, id: RequestId) -> Option<&ScheduleRequest> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Serial number the next created request will get.
    pub fn next_serial(&self) -> u32 {
        self.records
            .iter()
            .map(|r| r.serial_number)
            .max()
            .map_or(1, |max| max.saturating_add(1))
    }

    /// Insert a new request or replace an existing one from a form buffer.
    ///
    /// Numeric fields are coerced first; a rejected buffer leaves the store untouched.
    pub fn upsert(
        &mut self,
        buffer: &FormBuffer,
        existing_id: Option<RequestId>,
    ) -> RequestResult<ScheduleRequest> {
        match existing_id {
            Some(id) => {
                let idx = self
                    .records
                    .iter()
                    .position(|r| r.id == id)
                    .ok_or(RequestError::NotFound(id))?;
                // The serial is display-only in the form; fall back to the stored one.
                let serial = match &buffer.serial_number {
                    NumericInput::Number(n) => *n,
                    NumericInput::Text(s) => s
                        .trim()
                        .parse()
                        .unwrap_or(self.records[idx].serial_number),
                };
                let updated = build_request(id, serial, buffer)?;
                self.records[idx] = updated.clone();
                tracing::debug!(id = %id, serial, "replaced schedule request");
                Ok(updated)
            }
            None => {
                let serial = self.next_serial();
                let id = self.peek_next_id();
                let created = build_request(id, serial, buffer)?;
                self.last_id = id.0;
                self.records.push(created.clone());
                tracing::info!(id = %id, serial, "created schedule request");
                Ok(created)
            }
        }
    }

    /// Delete by id. Missing ids are ignored.
    pub fn remove(&mut self, id: RequestId) -> Option<ScheduleRequest> {
        let idx = self.records.iter().position(|r| r.id == id)?;
        let removed = self.records.remove(idx);
        tracing::info!(id = %id, serial = removed.serial_number, "removed schedule request");
        Some(removed)
    }

    // Ids come from the creation time in milliseconds, bumped past the last one issued.
    fn peek_next_id(&self) -> RequestId {
        let now_ms = u64::try_from(OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000)
            .unwrap_or(0);
        RequestId(now_ms.max(self.last_id.saturating_add(1)))
    }
}

fn build_request(
    id: RequestId,
    serial_number: u32,
    buffer: &FormBuffer,
) -> RequestResult<ScheduleRequest> {
    let requested_at = datetime::parse_local(&buffer.requested_at).map_err(|_| {
        RequestError::validation(
            Field::RequestedAt,
            format!("'{}' is not a date and time", buffer.requested_at.trim()),
        )
    })?;
    Ok(ScheduleRequest {
        id,
        serial_number,
        planner: buffer.planner.clone(),
        sales_order: buffer.sales_order.clone(),
        requested_at,
        unit: coerce_number(Field::Unit, &buffer.unit)?,
        quantity: coerce_number(Field::Quantity, &buffer.quantity)?,
        language: buffer.language.clone(),
        location: buffer.location.clone(),
        project: buffer.project.clone(),
        lpo_reference: buffer.lpo_reference.clone(),
        is_combo: buffer.is_combo,
        attachment: buffer.attachment.clone(),
    })
}

/// Blank text counts as zero; anything else must be a non-negative integer.
pub fn coerce_number(field: Field, input: &NumericInput) -> RequestResult<u32> {
    match input {
        NumericInput::Number(n) => Ok(*n),
        NumericInput::Text(s) => {
            let s = s.trim();
            if s.is_empty() {
                return Ok(0);
            }
            s.parse::<u32>().map_err(|_| {
                RequestError::validation(field, format!("'{s}' is not a whole number"))
            })
        }
    }
}
