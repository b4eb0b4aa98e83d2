use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("Unknown scenario: {0:?}")]
    UnknownScenario(String),

    #[error("Invalid registry settings: {0}")]
    InvalidSettings(String),
}
