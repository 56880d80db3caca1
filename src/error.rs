//! Error handling for pdfcanvas

use std::io;
use thiserror::Error;

/// The error type shared by surfaces, image loading and configuration.
///
/// The canvas layer never produces errors of its own; it returns whatever
/// its collaborators report.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Unknown font: {0} (font names are case-sensitive)")]
    UnknownFont(String),
    #[error("Invalid argument: {0}")]
    Argument(String),
    #[error("Graphics state underflow: restore without a matching save")]
    StateUnderflow,
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("System error: {0}")]
    Io(#[from] io::Error),
    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),
}

impl Error {
    pub fn argument<S: Into<String>>(msg: S) -> Self {
        Error::Argument(msg.into())
    }
    pub fn unknown_font<S: Into<String>>(name: S) -> Self {
        Error::UnknownFont(name.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
