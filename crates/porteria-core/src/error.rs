//! Error types for `porteria-core`.
//!
//! One taxonomy for the whole logbook: validation failures are recovered by
//! the operator, lifecycle guards protect repeat transitions, and allocation
//! races surface the losing side instead of letting two visitors share a
//! parking spot.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid argument: {0}")]
  InvalidArgument(&'static str),

  #[error("missing required field: {0}")]
  MissingField(&'static str),

  #[error("national id failed validation: {0:?}")]
  InvalidNationalId(String),

  #[error("a visitor with national id {0} is already in the building")]
  AlreadyInBuilding(String),

  #[error("visitor not found: {0}")]
  VisitorNotFound(Uuid),

  #[error("visitor {0} has already exited")]
  AlreadyExited(Uuid),

  #[error("delivery not found: {0}")]
  DeliveryNotFound(Uuid),

  #[error("delivery {0} was already picked up")]
  AlreadyPickedUp(Uuid),

  #[error("the name of the person retrieving the delivery is required")]
  MissingRetrieverName,

  #[error("parking spot not found: {0:?}")]
  SpotNotFound(String),

  #[error("parking spot {0:?} is already taken")]
  SpotAlreadyTaken(String),

  /// Backing-store I/O failure. Retryable by the caller; never fatal here.
  #[error("store unavailable: {0}")]
  StoreUnavailable(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// `true` for errors the operator can fix by correcting the form input.
  pub fn is_validation(&self) -> bool {
    matches!(
      self,
      Self::InvalidArgument(_)
        | Self::MissingField(_)
        | Self::InvalidNationalId(_)
        | Self::MissingRetrieverName
    )
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
