use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// 單一欄位驗證失敗的種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    InvalidFormat,
    InvalidRange,
    InvalidEnum,
    Duplicate,
    Empty,
    Null,
}

impl ViolationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViolationKind::InvalidFormat => "invalid_format",
            ViolationKind::InvalidRange => "invalid_range",
            ViolationKind::InvalidEnum => "invalid_enum",
            ViolationKind::Duplicate => "duplicate",
            ViolationKind::Empty => "empty",
            ViolationKind::Null => "null",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: String,
    pub kind: ViolationKind,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: &str, kind: ViolationKind, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[derive(Error, Debug)]
pub enum PetError {
    #[error("Validation error: {}", join_violations(.violations))]
    ValidationError { violations: Vec<FieldViolation> },

    #[error("Pet with id {id} was not found")]
    NotFound { id: i64 },

    #[error("Store error: {message}")]
    StoreError { message: String },

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid configuration value for '{field}' ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

impl PetError {
    pub fn validation(violations: Vec<FieldViolation>) -> Self {
        PetError::ValidationError { violations }
    }
}

impl From<FieldViolation> for PetError {
    fn from(violation: FieldViolation) -> Self {
        PetError::ValidationError {
            violations: vec![violation],
        }
    }
}

fn join_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

pub type Result<T> = std::result::Result<T, PetError>;
