use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReconError {
    /// TOML parse / deserialization error.
    #[error("field profile parse error: {0}")]
    ConfigParse(String),
    /// Profile validation error (empty synonym list, missing alias, etc.).
    #[error("field profile validation error: {0}")]
    ConfigValidation(String),
}
