use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("transport error for {url}: {message}")]
    Transport { url: String, message: String },
    #[error("unexpected page structure: {0}")]
    Structure(String),
    #[error("unable to parse datetime {text:?} (tried {tried})")]
    DateParse { text: String, tried: String },
    #[error("config error: {0}")]
    Config(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn structure(message: impl Into<String>) -> Self {
        Error::Structure(message.into())
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
