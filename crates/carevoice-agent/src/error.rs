use thiserror::Error;

#[derive(Error, Debug)]
pub enum AgentError {
    #[error("invalid agent settings: {0}")]
    Settings(String),

    #[error("invalid word replacement pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("no pipeline hooks registered with the session driver")]
    HooksNotRegistered,
}
