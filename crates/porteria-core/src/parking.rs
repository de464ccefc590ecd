//! Parking spots — the one shared mutable resource with a real invariant.
//!
//! Spot state is owned by the backing store, never cached authoritatively:
//! two front-desk terminals may race to assign the same spot, so every
//! mutation goes through the store's compare-and-set
//! ([`crate::store::DeskStore::assign_spot`]).

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Whether a spot belongs to the visitor pool or a resident.
/// Only `Visitor` spots are offered to the registration flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpotKind {
  Visitor,
  Resident,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpotStatus {
  Available,
  Occupied,
}

/// A single parking space.
///
/// Identity is the human-assigned id painted on the floor (e.g. `"V-01"`).
/// Invariant: `assigned_to` is `Some` iff `status` is `Occupied` for spots
/// flowing through visitor registration. Spots are created once at
/// provisioning time and never deleted in normal operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParkingSpot {
  pub spot_id:     String,
  pub status:      SpotStatus,
  pub kind:        SpotKind,
  pub floor:       i32,
  /// The visit currently holding this spot, if any.
  pub assigned_to: Option<Uuid>,
  pub notes:       Option<String>,
}

impl ParkingSpot {
  /// An available visitor spot, as provisioned.
  pub fn visitor(spot_id: impl Into<String>, floor: i32) -> Self {
    Self {
      spot_id:     spot_id.into(),
      status:      SpotStatus::Available,
      kind:        SpotKind::Visitor,
      floor,
      assigned_to: None,
      notes:       None,
    }
  }

  /// A resident spot with an explicit initial status.
  pub fn resident(spot_id: impl Into<String>, floor: i32, status: SpotStatus) -> Self {
    Self {
      spot_id: spot_id.into(),
      status,
      kind: SpotKind::Resident,
      floor,
      assigned_to: None,
      notes: None,
    }
  }

  pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
    self.notes = Some(notes.into());
    self
  }

  pub fn is_available(&self) -> bool { self.status == SpotStatus::Available }
}
