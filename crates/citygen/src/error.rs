// ---------------------------------------------------------------------------
// CityError: typed errors for input parsing and parameter loading
// ---------------------------------------------------------------------------

use std::fmt;

/// Errors raised while reading the inputs a city is generated from.
///
/// Layout generation itself never fails; these only surface from the
/// parsing helpers, and the assembler entry points turn them into an empty
/// city plus a warning.
#[derive(Debug)]
pub enum CityError {
    /// I/O error while reading an input file.
    Io(std::io::Error),
    /// The repository or branding document could not be parsed.
    MalformedInput(String),
    /// A branding color is not a `#rgb` / `#rrggbb` hex string.
    InvalidColor(String),
    /// A tunable parameter is out of range.
    InvalidParams(String),
}

impl fmt::Display for CityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CityError::Io(e) => write!(f, "I/O error: {e}"),
            CityError::MalformedInput(msg) => write!(f, "Malformed input: {msg}"),
            CityError::InvalidColor(value) => write!(f, "Invalid color: {value:?}"),
            CityError::InvalidParams(msg) => write!(f, "Invalid parameters: {msg}"),
        }
    }
}

impl std::error::Error for CityError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CityError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CityError {
    fn from(e: std::io::Error) -> Self {
        CityError::Io(e)
    }
}

impl From<serde_json::Error> for CityError {
    fn from(e: serde_json::Error) -> Self {
        CityError::MalformedInput(e.to_string())
    }
}
