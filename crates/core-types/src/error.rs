use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Invalid date '{input}': expected YYYY-MM-DD ({reason})")]
    InvalidDateFormat { input: String, reason: String },
}
