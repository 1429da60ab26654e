use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    #[error("Region label must not be empty")]
    EmptyLabel,

    #[error("Failed to build marker pattern for label '{label}': {reason}")]
    Pattern { label: String, reason: String },
}
