//! Error types for YantraIO

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// YantraIO error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration parse error
    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    /// Remote pairing exhausted its retry budget
    #[error("Remote not connected after {attempts} attempts")]
    RemoteNotConnected {
        /// Number of connection attempts made
        attempts: u32,
    },

    /// Device access failed
    #[error("Device error: {0}")]
    Device(String),

    /// Invalid parameter
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}
