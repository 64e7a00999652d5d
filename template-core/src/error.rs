use graft_core::GraftError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error(transparent)]
    Graft(#[from] GraftError),

    #[error("fenestration #{index}: {source}")]
    Fenestration { index: usize, source: GraftError },

    #[error("session file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("png encoding: {0}")]
    Png(#[from] png::EncodingError),
}

pub type Result<T> = std::result::Result<T, TemplateError>;
