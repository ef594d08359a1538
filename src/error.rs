use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Company name is required")]
    MissingCompany,

    #[error("Job title is required")]
    MissingTitle,
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed applications payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Persisted payload is not an array")]
    NotAnArray,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown status '{0}' (expected applied, interview, offer or rejected)")]
pub struct ParseStatusError(pub String);

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("No application matches id '{0}'")]
    NotFound(String),

    #[error("Id prefix '{prefix}' matches {count} applications, use more characters")]
    Ambiguous { prefix: String, count: usize },
}
