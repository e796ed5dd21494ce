use std::path::PathBuf;

use hbnb_store::StoreError;

/// Errors reported to the user by a verb handler.
///
/// The `Display` text is the exact line printed for the error.
#[derive(Debug, thiserror::Error)]
pub enum ConsoleError {
    #[error("** class name missing **")]
    ClassNameMissing,

    #[error("** class doesn't exist **")]
    ClassNameUnknown,

    #[error("** instance id missing **")]
    InstanceIdMissing,

    #[error("** no instance found **")]
    InstanceNotFound,

    #[error("** attribute name missing **")]
    AttributeNameMissing,

    #[error("** value missing **")]
    AttributeValueMissing,

    #[error("** attribute can't be updated **")]
    ReservedAttribute(String),

    #[error("** storage error: {0} **")]
    Storage(#[from] StoreError),
}

/// Errors loading the console configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid log level {0:?}")]
    InvalidLogLevel(String),
}
