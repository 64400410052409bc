use thiserror::Error;

#[derive(Debug, Error)]
pub enum TreeError {
    #[error("Invalid JSON input: {0}")]
    Json(#[source] serde_json::Error),
    #[error("Invalid YAML input: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Value cannot be converted to a tree: {0}")]
    Record(String),
    #[error("Unknown style token '{0}'")]
    UnknownStyle(String),
    #[error("Unknown palette '{0}' (expected one of: default, vivid, plain)")]
    UnknownPalette(String),
    #[error("Unknown input format '{0}' (expected json or yaml)")]
    UnknownFormat(String),
    #[error("Invalid color mode '{0}' (expected auto, always or never)")]
    InvalidColorMode(String),
}

pub type Result<T> = std::result::Result<T, TreeError>;

impl serde::ser::Error for TreeError {
    fn custom<T: std::fmt::Display>(msg: T) -> Self {
        TreeError::Record(msg.to_string())
    }
}
