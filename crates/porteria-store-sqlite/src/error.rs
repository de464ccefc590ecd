//! Error type for `porteria-store-sqlite`.
//!
//! Infrastructure failures stay in this crate; crossing back into the
//! [`porteria_core::store::DeskStore`] boundary they fold into
//! [`porteria_core::Error::StoreUnavailable`].

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("unknown enum value in column: {0}")]
  UnknownValue(String),
}

impl From<Error> for porteria_core::Error {
  fn from(e: Error) -> Self {
    porteria_core::Error::StoreUnavailable(Box::new(e))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
