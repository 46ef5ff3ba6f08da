//! Session state and the action surface the presentation layer drives.
//!
//! One `Session` owns the record store, the form controller and the option
//! lists. Every user action goes through [`Session::apply`] and runs to
//! completion before the next one.

use crate::config::{AppConfig, FieldOptions};
use crate::error::RequestError;
use crate::form::{FormController, FormMode};
use crate::model::{Field, FieldInput, FormBuffer, RequestId, ScheduleRequest};
use crate::store::RecordStore;

/// User actions emitted by a presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    NewRequest,
    EditRequest(RequestId),
    DeleteRequest(RequestId),
    FieldChanged(Field, FieldInput),
    Save,
    Cancel,
}

/// Result of applying an action, for status display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    FormOpened(FormMode),
    FieldUpdated(Field),
    Saved {
        request: ScheduleRequest,
        created: bool,
    },
    Cancelled,
    Deleted(Option<ScheduleRequest>),
    Rejected(RequestError),
}

impl Outcome {
    pub fn is_rejected(&self) -> bool {
        matches!(self, Outcome::Rejected(_))
    }

    /// Short human-readable status line.
    pub fn message(&self) -> String {
        match self {
            Outcome::FormOpened(FormMode::Creating) => "Creating new request".into(),
            Outcome::FormOpened(_) => "Editing request".into(),
            Outcome::FieldUpdated(field) => format!("{field} updated"),
            Outcome::Saved {
                request,
                created: true,
            } => format!("Created request #{}", request.serial_number),
            Outcome::Saved { request, .. } => format!("Saved request #{}", request.serial_number),
            Outcome::Cancelled => "Cancelled".into(),
            Outcome::Deleted(Some(r)) => format!("Deleted request #{}", r.serial_number),
            Outcome::Deleted(None) => "Nothing to delete".into(),
            Outcome::Rejected(e) => format!("Error: {e}"),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    store: RecordStore,
    form: FormController,
    options: FieldOptions,
}

impl Session {
    pub fn new(store: RecordStore, options: FieldOptions) -> Self {
        Self {
            store,
            form: FormController::new(),
            options,
        }
    }

    pub fn from_config(cfg: &AppConfig) -> Self {
        let store = if cfg.seed_demo {
            RecordStore::demo()
        } else {
            RecordStore::new()
        };
        Self::new(store, cfg.options.clone())
    }

    pub fn records(&self) -> &[ScheduleRequest] {
        self.store.list()
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn mode(&self) -> FormMode {
        self.form.mode()
    }

    pub fn buffer(&self) -> Option<&FormBuffer> {
        self.form.buffer()
    }

    pub fn options(&self) -> &FieldOptions {
        &self.options
    }

    pub fn apply(&mut self, action: Action) -> Outcome {
        let outcome = match self.dispatch(action) {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!(error = %e, "action rejected");
                Outcome::Rejected(e)
            }
        };
        tracing::trace!(?outcome, mode = ?self.form.mode(), "applied action");
        outcome
    }

    fn dispatch(&mut self, action: Action) -> Result<Outcome, RequestError> {
        match action {
            Action::NewRequest => {
                self.form.new_request(&self.store, &self.options)?;
                Ok(Outcome::FormOpened(self.form.mode()))
            }
            Action::EditRequest(id) => {
                self.form.edit_request(&self.store, id)?;
                Ok(Outcome::FormOpened(self.form.mode()))
            }
            Action::DeleteRequest(id) => {
                let removed = self.store.remove(id);
                // An open edit of the removed record can no longer be saved.
                if removed.is_some() && self.form.mode() == FormMode::Editing(id) {
                    self.form.cancel();
                }
                Ok(Outcome::Deleted(removed))
            }
            Action::FieldChanged(field, input) => {
                self.form.field_changed(field, input)?;
                Ok(Outcome::FieldUpdated(field))
            }
            Action::Save => {
                let created = self.form.mode() == FormMode::Creating;
                let request = self.form.save(&mut self.store)?;
                Ok(Outcome::Saved { request, created })
            }
            Action::Cancel => {
                self.form.cancel();
                Ok(Outcome::Cancelled)
            }
        }
    }
}
