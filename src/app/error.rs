use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShinkanError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Document error: {0}")]
    Document(#[from] serde_json::Error),

    #[error("Unsupported source host: {0}")]
    UnsupportedSource(String),

    #[error("Malformed page for {work}: {reason}")]
    MalformedContent { work: String, reason: String },

    #[error("Render error: {0}")]
    Render(String),

    #[error("Stored chapter {id} has no read flag")]
    MissingReadFlag { id: i64 },

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, ShinkanError>;
