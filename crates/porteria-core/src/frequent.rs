//! Frequent-visitor recall records.
//!
//! A recall record lets the desk prefill the form for a returning visitor.
//! Records are keyed by normalized national id, upserted on each opt-in
//! registration, and never deleted.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::rut::Rut;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrequentVisitor {
  pub frequent_id:        Uuid,
  pub name:               String,
  /// Unique key across the collection.
  pub rut:                Rut,
  pub apartment:          String,
  pub last_license_plate: Option<String>,
}

/// Upsert input: the latest details seen for this national id.
#[derive(Debug, Clone)]
pub struct FrequentProfile {
  pub name:               String,
  pub rut:                Rut,
  pub apartment:          String,
  pub last_license_plate: Option<String>,
}
