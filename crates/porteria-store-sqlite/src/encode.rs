//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings. UUIDs are stored as
//! hyphenated lowercase strings. Status enums are stored as the same
//! snake_case tags serde uses.

use chrono::{DateTime, Utc};
use porteria_core::{
  delivery::{Delivery, DeliveryStatus},
  frequent::FrequentVisitor,
  parking::{ParkingSpot, SpotKind, SpotStatus},
  rut::Rut,
  visitor::{Visitor, VisitorStatus},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Status enums ────────────────────────────────────────────────────────────

pub fn encode_visitor_status(s: VisitorStatus) -> &'static str {
  match s {
    VisitorStatus::InBuilding => "in_building",
    VisitorStatus::Exited => "exited",
  }
}

pub fn decode_visitor_status(s: &str) -> Result<VisitorStatus> {
  match s {
    "in_building" => Ok(VisitorStatus::InBuilding),
    "exited" => Ok(VisitorStatus::Exited),
    other => Err(Error::UnknownValue(format!("visitor status: {other:?}"))),
  }
}

pub fn encode_delivery_status(s: DeliveryStatus) -> &'static str {
  match s {
    DeliveryStatus::Pending => "pending",
    DeliveryStatus::PickedUp => "picked_up",
  }
}

pub fn decode_delivery_status(s: &str) -> Result<DeliveryStatus> {
  match s {
    "pending" => Ok(DeliveryStatus::Pending),
    "picked_up" => Ok(DeliveryStatus::PickedUp),
    other => Err(Error::UnknownValue(format!("delivery status: {other:?}"))),
  }
}

pub fn encode_spot_status(s: SpotStatus) -> &'static str {
  match s {
    SpotStatus::Available => "available",
    SpotStatus::Occupied => "occupied",
  }
}

pub fn decode_spot_status(s: &str) -> Result<SpotStatus> {
  match s {
    "available" => Ok(SpotStatus::Available),
    "occupied" => Ok(SpotStatus::Occupied),
    other => Err(Error::UnknownValue(format!("spot status: {other:?}"))),
  }
}

pub fn encode_spot_kind(k: SpotKind) -> &'static str {
  match k {
    SpotKind::Visitor => "visitor",
    SpotKind::Resident => "resident",
  }
}

pub fn decode_spot_kind(s: &str) -> Result<SpotKind> {
  match s {
    "visitor" => Ok(SpotKind::Visitor),
    "resident" => Ok(SpotKind::Resident),
    other => Err(Error::UnknownValue(format!("spot kind: {other:?}"))),
  }
}

// ─── Rut ─────────────────────────────────────────────────────────────────────

/// Columns hold the already-normalized form, so decoding must not
/// re-normalize (see [`Rut::from_normalized`]).
pub fn decode_rut(s: &str) -> Result<Rut> {
  Rut::from_normalized(s).map_err(|_| Error::UnknownValue(format!("rut: {s:?}")))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `visitors` row.
pub struct RawVisitor {
  pub visitor_id:      String,
  pub name:            String,
  pub rut:             String,
  pub apartment:       String,
  pub entry_time:      String,
  pub exit_time:       Option<String>,
  pub status:          String,
  pub license_plate:   Option<String>,
  pub parking_spot_id: Option<String>,
}

impl RawVisitor {
  pub fn into_visitor(self) -> Result<Visitor> {
    Ok(Visitor {
      visitor_id:      decode_uuid(&self.visitor_id)?,
      name:            self.name,
      rut:             decode_rut(&self.rut)?,
      apartment:       self.apartment,
      entry_time:      decode_dt(&self.entry_time)?,
      exit_time:       self.exit_time.as_deref().map(decode_dt).transpose()?,
      status:          decode_visitor_status(&self.status)?,
      license_plate:   self.license_plate,
      parking_spot_id: self.parking_spot_id,
    })
  }
}

/// Raw strings read directly from a `deliveries` row.
pub struct RawDelivery {
  pub delivery_id:    String,
  pub apartment:      String,
  pub recipient_name: String,
  pub courier:        String,
  pub status:         String,
  pub arrival_time:   String,
  pub pickup_time:    Option<String>,
  pub retrieved_by:   Option<String>,
}

impl RawDelivery {
  pub fn into_delivery(self) -> Result<Delivery> {
    Ok(Delivery {
      delivery_id:    decode_uuid(&self.delivery_id)?,
      apartment:      self.apartment,
      recipient_name: self.recipient_name,
      courier:        self.courier,
      status:         decode_delivery_status(&self.status)?,
      arrival_time:   decode_dt(&self.arrival_time)?,
      pickup_time:    self.pickup_time.as_deref().map(decode_dt).transpose()?,
      retrieved_by:   self.retrieved_by,
    })
  }
}

/// Raw strings read directly from a `parking_spots` row.
pub struct RawSpot {
  pub spot_id:     String,
  pub status:      String,
  pub kind:        String,
  pub floor:       i32,
  pub assigned_to: Option<String>,
  pub notes:       Option<String>,
}

impl RawSpot {
  pub fn into_spot(self) -> Result<ParkingSpot> {
    Ok(ParkingSpot {
      spot_id:     self.spot_id,
      status:      decode_spot_status(&self.status)?,
      kind:        decode_spot_kind(&self.kind)?,
      floor:       self.floor,
      assigned_to: self.assigned_to.as_deref().map(decode_uuid).transpose()?,
      notes:       self.notes,
    })
  }
}

/// Raw strings read directly from a `frequent_visitors` row.
pub struct RawFrequent {
  pub frequent_id:        String,
  pub name:               String,
  pub rut:                String,
  pub apartment:          String,
  pub last_license_plate: Option<String>,
}

impl RawFrequent {
  pub fn into_frequent(self) -> Result<FrequentVisitor> {
    Ok(FrequentVisitor {
      frequent_id:        decode_uuid(&self.frequent_id)?,
      name:               self.name,
      rut:                decode_rut(&self.rut)?,
      apartment:          self.apartment,
      last_license_plate: self.last_license_plate,
    })
  }
}
