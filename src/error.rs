use thiserror::Error;

#[derive(Error, Debug)]
pub enum DoorlockError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("Failed to bind server to {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Server error: {details}")]
    Server { details: String },

    #[error("System error: {message}")]
    System { message: String },
}

impl DoorlockError {
    pub fn system<S: Into<String>>(message: S) -> Self {
        Self::System {
            message: message.into(),
        }
    }

    pub fn server<S: Into<String>>(details: S) -> Self {
        Self::Server {
            details: details.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DoorlockError>;
