//! Create/edit form state machine.
//!
//! `Idle` shows only the list. `Creating` and `Editing` own a single buffer that
//! field edits mutate; only `save` touches the store.

use crate::config::FieldOptions;
use crate::error::{RequestError, RequestResult};
use crate::model::{
    Attachment, Field, FieldInput, FieldKind, FormBuffer, NumericInput, RequestId,
    ScheduleRequest,
};
use crate::store::RecordStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormMode {
    #[default]
    Idle,
    Creating,
    Editing(RequestId),
}

impl FormMode {
    pub fn is_form(self) -> bool {
        self != FormMode::Idle
    }
}

#[derive(Debug, Clone, Default)]
pub struct FormController {
    mode: FormMode,
    buffer: Option<FormBuffer>,
}

impl FormController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn is_open(&self) -> bool {
        self.mode.is_form()
    }

    pub fn buffer(&self) -> Option<&FormBuffer> {
        self.buffer.as_ref()
    }

    /// Open a blank form. The serial is pre-computed from the store.
    ///
    /// Only valid from `Idle`; an open form keeps its buffer untouched.
    pub fn new_request(
        &mut self,
        store: &RecordStore,
        options: &FieldOptions,
    ) -> RequestResult<()> {
        fn first(list: &[String]) -> String {
            list.first().cloned().unwrap_or_default()
        }
        if self.is_open() {
            return Err(RequestError::FormAlreadyOpen);
        }
        self.buffer = Some(FormBuffer {
            serial_number: NumericInput::Number(store.next_serial()),
            planner: String::new(),
            sales_order: String::new(),
            requested_at: String::new(),
            unit: NumericInput::blank(),
            quantity: NumericInput::blank(),
            language: first(&options.languages),
            location: first(&options.locations),
            project: first(&options.projects),
            lpo_reference: first(&options.lpo_references),
            is_combo: false,
            attachment: None,
        });
        self.mode = FormMode::Creating;
        tracing::debug!("form opened for new request");
        Ok(())
    }

    /// Open the form on an existing request, copying its fields.
    pub fn edit_request(&mut self, store: &RecordStore, id: RequestId) -> RequestResult<()> {
        if self.is_open() {
            return Err(RequestError::FormAlreadyOpen);
        }
        let record = store.get(id).ok_or(RequestError::NotFound(id))?;
        self.buffer = Some(FormBuffer::from_request(record));
        self.mode = FormMode::Editing(id);
        tracing::debug!(id = %id, "form opened for edit");
        Ok(())
    }

    pub fn cancel(&mut self) {
        if self.is_open() {
            tracing::debug!(mode = ?self.mode, "form cancelled");
        }
        self.mode = FormMode::Idle;
        self.buffer = None;
    }

    pub fn field_changed(&mut self, field: Field, input: FieldInput) -> RequestResult<()> {
        let buffer = self.buffer.as_mut().ok_or(RequestError::NoActiveForm)?;
        match (field.kind(), input) {
            (FieldKind::Text | FieldKind::Choice, FieldInput::Text(value)) => {
                let slot = match field {
                    Field::Planner => &mut buffer.planner,
                    Field::SalesOrder => &mut buffer.sales_order,
                    Field::RequestedAt => &mut buffer.requested_at,
                    Field::Language => &mut buffer.language,
                    Field::Location => &mut buffer.location,
                    Field::Project => &mut buffer.project,
                    _ => &mut buffer.lpo_reference,
                };
                *slot = value;
            }
            (FieldKind::Number, FieldInput::Text(value)) => {
                let slot = if field == Field::Unit {
                    &mut buffer.unit
                } else {
                    &mut buffer.quantity
                };
                *slot = NumericInput::Text(value);
            }
            (FieldKind::Checkbox, FieldInput::Checked(checked)) => buffer.is_combo = checked,
            (FieldKind::File, FieldInput::File(path)) => {
                buffer.attachment = path.map(Attachment::from_path);
            }
            (kind, input) => {
                return Err(RequestError::validation(
                    field,
                    format!("{} does not accept {kind:?} input", describe(&input)),
                ));
            }
        }
        Ok(())
    }

    /// Commit the buffer. On rejection the form stays open with its contents.
    pub fn save(&mut self, store: &mut RecordStore) -> RequestResult<ScheduleRequest> {
        let existing_id = match self.mode {
            FormMode::Idle => return Err(RequestError::NoActiveForm),
            FormMode::Creating => None,
            FormMode::Editing(id) => Some(id),
        };
        let buffer = self.buffer.as_ref().ok_or(RequestError::NoActiveForm)?;
        let saved = store.upsert(buffer, existing_id)?;
        self.mode = FormMode::Idle;
        self.buffer = None;
        Ok(saved)
    }
}

fn describe(input: &FieldInput) -> &'static str {
    match input {
        FieldInput::Text(_) => "text",
        FieldInput::Checked(_) => "a checkbox value",
        FieldInput::File(_) => "a file",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> FieldInput {
        FieldInput::Text(s.into())
    }

    #[test]
    fn new_request_prefills_defaults() {
        let store = RecordStore::demo();
        let mut form = FormController::new();
        form.new_request(&store, &FieldOptions::default()).unwrap();
        assert_eq!(form.mode(), FormMode::Creating);
        let b = form.buffer().unwrap();
        assert_eq!(b.serial_number, NumericInput::Number(3));
        assert_eq!(b.language, "English");
        assert_eq!(b.location, "Warehouse A");
        assert_eq!(b.project, "Project Alpha");
        assert_eq!(b.lpo_reference, "LPO-001");
        assert!(!b.is_combo);
        assert!(b.attachment.is_none());
        assert_eq!(b.unit, NumericInput::blank());
    }

    #[test]
    fn new_request_on_empty_store_starts_at_one() {
        let mut form = FormController::new();
        form.new_request(&RecordStore::new(), &FieldOptions::default()).unwrap();
        assert_eq!(
            form.buffer().unwrap().serial_number,
            NumericInput::Number(1)
        );
    }

    #[test]
    fn edit_missing_record_keeps_idle() {
        let mut form = FormController::new();
        let err = form
            .edit_request(&RecordStore::demo(), RequestId(42))
            .unwrap_err();
        assert_eq!(err, RequestError::NotFound(RequestId(42)));
        assert_eq!(form.mode(), FormMode::Idle);
        assert!(form.buffer().is_none());
    }

    #[test]
    fn field_edits_touch_only_the_buffer() {
        let store = RecordStore::demo();
        let mut form = FormController::new();
        form.edit_request(&store, RequestId(1)).unwrap();
        form.field_changed(Field::Planner, text("Ann")).unwrap();
        form.field_changed(Field::Unit, text("1")).unwrap();
        form.field_changed(Field::IsCombo, FieldInput::Checked(true))
            .unwrap();
        form.field_changed(Field::Attachment, FieldInput::File(Some("a/b.png".into())))
            .unwrap();
        let b = form.buffer().unwrap();
        assert_eq!(b.planner, "Ann");
        assert_eq!(b.unit, NumericInput::Text("1".into()));
        assert!(b.is_combo);
        assert_eq!(b.attachment.as_ref().unwrap().name, "b.png");
        assert_eq!(store, RecordStore::demo());
    }

    #[test]
    fn mismatched_input_kind_is_rejected() {
        let mut form = FormController::new();
        form.new_request(&RecordStore::new(), &FieldOptions::default()).unwrap();
        assert!(matches!(
            form.field_changed(Field::Planner, FieldInput::Checked(true)),
            Err(RequestError::Validation { field: Field::Planner, .. })
        ));
        assert!(form
            .field_changed(Field::IsCombo, text("yes"))
            .is_err());
    }

    #[test]
    fn idle_rejects_edits_and_save() {
        let mut store = RecordStore::demo();
        let mut form = FormController::new();
        assert_eq!(
            form.field_changed(Field::Planner, text("x")),
            Err(RequestError::NoActiveForm)
        );
        assert_eq!(form.save(&mut store), Err(RequestError::NoActiveForm));
    }

    #[test]
    fn cancel_never_mutates_store() {
        let mut store = RecordStore::demo();
        let before = store.clone();
        let mut form = FormController::new();

        form.new_request(&store, &FieldOptions::default()).unwrap();
        form.field_changed(Field::Planner, text("Ghost")).unwrap();
        form.cancel();
        assert_eq!(store, before);

        form.edit_request(&store, RequestId(2)).unwrap();
        form.field_changed(Field::Quantity, text("999")).unwrap();
        form.cancel();
        assert_eq!(store, before);
        assert_eq!(form.mode(), FormMode::Idle);
        assert!(form.save(&mut store).is_err());
    }

    #[test]
    fn round_trip_edit_without_changes() {
        let mut store = RecordStore::new();
        let mut form = FormController::new();
        form.new_request(&store, &FieldOptions::default()).unwrap();
        form.field_changed(Field::Planner, text("A")).unwrap();
        form.field_changed(Field::SalesOrder, text("SO-1")).unwrap();
        form.field_changed(Field::Unit, text("5")).unwrap();
        form.field_changed(Field::Quantity, text("10")).unwrap();
        form.field_changed(Field::IsCombo, FieldInput::Checked(true))
            .unwrap();
        let created = form.save(&mut store).unwrap();
        assert_eq!(created.unit, 5);
        assert_eq!(created.quantity, 10);

        form.edit_request(&store, created.id).unwrap();
        let saved = form.save(&mut store).unwrap();
        assert_eq!(saved, created);
        assert_eq!(store.list(), &[created]);
    }

    #[test]
    fn failed_save_keeps_form_open() {
        let mut store = RecordStore::demo();
        let mut form = FormController::new();
        form.new_request(&store, &FieldOptions::default()).unwrap();
        form.field_changed(Field::Quantity, text("ten")).unwrap();
        assert!(matches!(
            form.save(&mut store),
            Err(RequestError::Validation { field: Field::Quantity, .. })
        ));
        assert_eq!(form.mode(), FormMode::Creating);
        assert_eq!(
            form.buffer().unwrap().quantity,
            NumericInput::Text("ten".into())
        );
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn open_form_rejects_new_and_edit() {
        let store = RecordStore::demo();
        let mut form = FormController::new();
        form.edit_request(&store, RequestId(1)).unwrap();
        form.field_changed(Field::Planner, text("Unsaved")).unwrap();

        assert_eq!(
            form.new_request(&store, &FieldOptions::default()),
            Err(RequestError::FormAlreadyOpen)
        );
        assert_eq!(
            form.edit_request(&store, RequestId(2)),
            Err(RequestError::FormAlreadyOpen)
        );
        assert_eq!(form.mode(), FormMode::Editing(RequestId(1)));
        assert_eq!(form.buffer().unwrap().planner, "Unsaved");
    }

    #[test]
    fn saving_edit_of_deleted_record_is_not_found() {
        let mut store = RecordStore::demo();
        let mut form = FormController::new();
        form.edit_request(&store, RequestId(1)).unwrap();
        store.remove(RequestId(1));
        assert_eq!(
            form.save(&mut store),
            Err(RequestError::NotFound(RequestId(1)))
        );
        assert_eq!(store.len(), 1);
    }
}
