use std::io;
use thiserror::Error;

/// Everything that can keep a forecast from reaching the screen.
#[derive(Error, Debug)]
pub enum Error {
    /// Transport failure, or a body that did not decode into the expected shape
    #[error("HTTP request error: {0}")]
    Request(reqwest::Error),

    /// The provider answered with a non-success status
    #[error("weatherapi.com returned {status}: {message}")]
    Provider { status: u16, message: String },

    /// Fewer forecast days came back than the screen shows
    #[error("forecast day {0} missing from response")]
    MissingForecastDay(usize),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

// the request URL carries the API key, keep it out of messages
impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Request(e.without_url())
    }
}
