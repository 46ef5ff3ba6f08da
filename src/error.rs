use crate::model::{Field, RequestId};
use thiserror::Error;

/// Rejections raised by the store and form controller.
///
/// None of these end the session; the UI shows them as status text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("{field}: {message}")]
    Validation { field: Field, message: String },
    #[error("schedule request {0} not found")]
    NotFound(RequestId),
    #[error("no request form is open")]
    NoActiveForm,
    #[error("a request form is already open; save or cancel it first")]
    FormAlreadyOpen,
}

impl RequestError {
    pub fn validation(field: Field, message: impl Into<String>) -> Self {
        RequestError::Validation {
            field,
            message: message.into(),
        }
    }
}

pub type RequestResult<T> = Result<T, RequestError>;
