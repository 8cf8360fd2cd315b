use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("unknown type tag: {0}")]
    UnknownTypeTag(String),
    #[error("cannot read format config: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid format config: {0}")]
    Toml(#[from] toml::de::Error),
}
