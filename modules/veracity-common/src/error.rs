use thiserror::Error;

#[derive(Error, Debug)]
pub enum VeracityError {
    /// Rejected before entering the pipeline (empty or missing text).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Dictionary error: {0}")]
    Dictionary(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl VeracityError {
    pub fn is_input_error(&self) -> bool {
        matches!(self, VeracityError::InvalidInput(_))
    }
}
