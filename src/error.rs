// A tiny error type so we don't rely on anyhow/thiserror.
// Every variant states *where* things went wrong.
// The particle core never fails; only the host (window, font file, settings) can.
use std::fmt::{self, Display};

#[derive(Debug)]
pub enum Error {
    WindowInit(String),   // Creating the window failed
    WindowUpdate(String), // Updating the window buffer failed
    FontLoad(String),     // Reading/parsing a font file failed
    Config(String),       // Reading/parsing the settings file failed
}

impl Display for Error {
    // This decides how the error is printed to your console.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::WindowInit(s) => write!(f, "Window init error: {s}"),
            Error::WindowUpdate(s) => write!(f, "Window update error: {s}"),
            Error::FontLoad(s) => write!(f, "Font load error: {s}"),
            Error::Config(s) => write!(f, "Settings error: {s}"),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_failing_stage() {
        let e = Error::FontLoad("missing.ttf: not found".into());
        assert_eq!(e.to_string(), "Font load error: missing.ttf: not found");
        let e = Error::Config("gap: invalid type".into());
        assert!(e.to_string().starts_with("Settings error"));
    }
}
