use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum ValidationError {
    #[error("{0}")]
    Fields(#[from] validator::ValidationErrors),

    #[error("contact id must be >= 1, got {0}")]
    ContactId(i64),

    #[error("days must be between 1 and {max}, got {got}")]
    WindowDays { got: u32, max: u32 },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BirthdayError {
    #[error("'{0}' does not match DD-MM-YYYY")]
    Format(String),
}
