use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("FLV error: {0}")]
    Flv(#[from] flv::FlvError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Initialization failed: {0}")]
    Initialization(String),

    #[error("{failed} of {total} files could not be inspected")]
    Failed { failed: usize, total: usize },
}
