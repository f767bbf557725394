use thiserror::Error;

pub type Result<T> = std::result::Result<T, DiceError>;

#[derive(Error, Debug)]
pub enum DiceError {
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("Invalid range: {0} (range must be at least 1)")]
    InvalidRange(i64),

    #[error("Invalid counter value: {value} is outside 0..{range}")]
    InvalidCounterValue { value: i64, range: i64 },

    #[error("Protocol state error: {0}")]
    ProtocolState(String),

    #[error("Invalid input: {0}")]
    InputValidation(String),

    #[error("Game aborted by user")]
    Aborted,

    #[error("Cryptographic error: {0}")]
    Crypto(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Dialog error: {0}")]
    Dialog(String),
}

impl DiceError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn protocol_state(msg: impl Into<String>) -> Self {
        Self::ProtocolState(msg.into())
    }

    pub fn input(msg: impl Into<String>) -> Self {
        Self::InputValidation(msg.into())
    }

    pub fn crypto(msg: impl Into<String>) -> Self {
        Self::Crypto(msg.into())
    }

    pub fn dialog(msg: impl Into<String>) -> Self {
        Self::Dialog(msg.into())
    }

    /// Errors the interactive loop recovers from by prompting again.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::InputValidation(_))
    }
}
