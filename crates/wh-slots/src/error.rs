use thiserror::Error;

use wh_core::SlotId;

#[derive(Debug, Error)]
pub enum SlotError {
    #[error("slot {0} not found")]
    NotFound(SlotId),

    #[error("slot parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SlotResult<T> = Result<T, SlotError>;
