use thiserror::Error;

/// Infrastructure failures while assembling or persisting the service layer.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("storage error: {0}")]
    Storage(String),
    #[error("configuration error: {0}")]
    Config(String),
}
