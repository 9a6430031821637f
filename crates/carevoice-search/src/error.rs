use thiserror::Error;

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("search backend request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("search backend returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed search response: {0}")]
    Decode(String),

    #[error("invalid search query: {0}")]
    InvalidQuery(String),

    #[error("invalid search configuration: {0}")]
    Config(String),
}
