//! Error types for argus

use std::io;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Write queue full — apply backpressure")]
    QueueFull,

    #[error("Key already present in ordered map")]
    DuplicateKey,

    #[error("Field {0} already has an index")]
    FieldExists(u32),
}

pub type Result<T> = std::result::Result<T, Error>;
