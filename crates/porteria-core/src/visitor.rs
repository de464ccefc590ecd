//! Visitor sessions.
//!
//! A record represents one physical visit: it is created `InBuilding` and
//! mutated exactly once, on exit. A returning visitor gets a new record; the
//! store enforces at most one `InBuilding` session per national id.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::rut::Rut;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisitorStatus {
  InBuilding,
  Exited,
}

/// One visit session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Visitor {
  pub visitor_id:      Uuid,
  pub name:            String,
  pub rut:             Rut,
  /// The apartment being visited, free text (e.g. `"301"`).
  pub apartment:       String,
  pub entry_time:      DateTime<Utc>,
  pub exit_time:       Option<DateTime<Utc>>,
  pub status:          VisitorStatus,
  pub license_plate:   Option<String>,
  /// Set iff a parking spot was assigned to this visit at entry.
  pub parking_spot_id: Option<String>,
}

impl Visitor {
  pub fn is_in_building(&self) -> bool {
    self.status == VisitorStatus::InBuilding
  }
}

/// Validated input to visitor registration. The desk assigns `visitor_id`
/// before any write so the parking compare-and-set can reference it.
#[derive(Debug, Clone)]
pub struct NewVisitor {
  pub visitor_id:      Uuid,
  pub name:            String,
  pub rut:             Rut,
  pub apartment:       String,
  pub license_plate:   Option<String>,
  pub parking_spot_id: Option<String>,
}

impl NewVisitor {
  /// Build the persisted record with a fresh entry timestamp.
  pub fn into_visitor(self, entry_time: DateTime<Utc>) -> Visitor {
    Visitor {
      visitor_id:      self.visitor_id,
      name:            self.name,
      rut:             self.rut,
      apartment:       self.apartment,
      entry_time,
      exit_time:       None,
      status:          VisitorStatus::InBuilding,
      license_plate:   self.license_plate,
      parking_spot_id: self.parking_spot_id,
    }
  }
}
