use std::path::PathBuf;

use thiserror::Error;

pub(crate) type GeneratorResult<T> = Result<T, GeneratorError>;

#[derive(Debug, Error)]
pub enum GeneratorError {
  #[error("unsupported enum value {value} at '{address}'")]
  UnsupportedEnumValue { address: String, value: String },

  #[error("unsupported primitive (type: {schema_type}, format: {format}) at '{address}'")]
  UnsupportedPrimitive {
    address: String,
    schema_type: String,
    format: String,
  },

  #[error("no parameter, request body, response or property shape matches '{address}'")]
  UnhandledSchemaShape { address: String },

  #[error("unsupported default value {value} at '{address}'")]
  UnsupportedDefault { address: String, value: String },

  #[error("cannot resolve reference '{reference}' from '{address}'")]
  UnresolvableRef { address: String, reference: String },

  #[error("failed to load endpoint mapping from {}: {reason}", path.display())]
  MappingLoadError { path: PathBuf, reason: String },

  #[error("failed to persist endpoint mapping to {}: {reason}", path.display())]
  MappingPersistError { path: PathBuf, reason: String },

  #[error("interactive prompt failed: {reason}")]
  PromptFailed { reason: String },
}
