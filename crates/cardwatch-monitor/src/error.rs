use cardwatch_transport::TransportError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MonitorError {
    /// The transport could not be opened; the session never became active.
    #[error("Connection failed: {0}")]
    Connect(#[source] TransportError),

    #[error(transparent)]
    State(#[from] cardwatch_core::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, MonitorError>;
