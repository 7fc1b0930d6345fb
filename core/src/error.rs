use std::fmt;

use thiserror::Error;

use crate::analysis::SignalFormatError;
use crate::model::LeadName;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn join_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("lead {lead}: {source}")]
    InvalidSignalFormat {
        lead: LeadName,
        source: SignalFormatError,
    },

    #[error("\"{0}\" is not a valid choice.")]
    InvalidLeadName(String),

    #[error("{}", join_field_errors(.0))]
    Validation(Vec<FieldError>),

    #[error("Must include both username and password")]
    MissingCredentials,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid token.")]
    NotAuthenticated,

    #[error("Permission Denied")]
    PermissionDenied,

    #[error("No ECG record matches the given id: {0}")]
    RecordNotFound(String),
}

impl CoreError {
    /// HTTP status class the transport layer should answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            CoreError::InvalidSignalFormat { .. }
            | CoreError::InvalidLeadName(_)
            | CoreError::Validation(_)
            | CoreError::MissingCredentials
            | CoreError::InvalidCredentials => 400,
            CoreError::NotAuthenticated => 401,
            CoreError::PermissionDenied => 403,
            CoreError::RecordNotFound(_) => 404,
        }
    }
}

pub type CoreResult<T> = std::result::Result<T, CoreError>;
