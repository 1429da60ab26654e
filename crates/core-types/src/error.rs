use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// An unrecognised value for a named field, e.g. a region marker.
    #[error("Unrecognised {0}: '{1}'")]
    InvalidInput(String, String),
}
