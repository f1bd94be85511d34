// One error type for the whole program.
// Every variant states *where* things went wrong.
use std::fmt::{self, Display};
use std::path::PathBuf;

#[derive(Debug)]
pub enum Error {
    WindowInit(String),   // Creating the window failed
    WindowUpdate(String), // Updating the window buffer failed
    FontLoad { path: PathBuf, reason: String },   // Font file missing/unreadable
    FontDecode { path: PathBuf, reason: String }, // Bytes were read but are not a font
}

impl Display for Error {
    // This decides how the error is printed to your console.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::WindowInit(s) => write!(f, "Window init error: {s}"),
            Error::WindowUpdate(s) => write!(f, "Window update error: {s}"),
            Error::FontLoad { path, reason } => {
                write!(f, "Font load error ({}): {reason}", path.display())
            }
            Error::FontDecode { path, reason } => {
                write!(f, "Font decode error ({}): {reason}", path.display())
            }
        }
    }
}

impl std::error::Error for Error {}
