use std::io;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("failed to parse annotation file: {0}")]
    Annotations(#[from] serde_json::Error),

    #[error("failed to decode image: {0}")]
    Image(#[from] image::ImageError),

    #[error("failed to read cached array: {0}")]
    ReadArray(#[from] ndarray_npy::ReadNpyError),

    #[error("failed to write cached array: {0}")]
    WriteArray(#[from] ndarray_npy::WriteNpyError),

    #[error("array shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),
}
