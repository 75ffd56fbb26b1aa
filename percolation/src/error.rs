use thiserror::Error;

#[derive(Debug, Error)]
pub enum PercolationError {
  /// The run configuration was rejected before any work was done.
  #[error("invalid configuration: {0}")]
  Config(String),
  #[error(transparent)]
  Io(#[from] std::io::Error),
  #[error(transparent)]
  Json(#[from] serde_json::Error),
  /// A stored run could not be read back.
  #[error("corrupt output: {0}")]
  Corrupt(String),
}

#[macro_export]
macro_rules! make_config_error {
  ($($args:expr),+) => {
    $crate::error::PercolationError::Config(format!($($args),+))
  };
}

#[macro_export]
macro_rules! make_corrupt_error {
  ($($args:expr),+) => {
    $crate::error::PercolationError::Corrupt(format!($($args),+))
  };
}

pub type PercolationResult<T = ()> = Result<T, PercolationError>;
