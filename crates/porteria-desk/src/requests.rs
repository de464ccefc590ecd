//! Operator-facing request and receipt types.

use serde::{Deserialize, Serialize};

use porteria_core::visitor::Visitor;

/// Form input for visitor registration. `national_id` arrives raw from a
/// free-form field; the desk normalizes and validates it.
#[derive(Debug, Clone, Deserialize)]
pub struct EntryRequest {
  pub name:          String,
  pub national_id:   String,
  pub apartment:     String,
  #[serde(default)]
  pub license_plate: Option<String>,
  /// A spot the operator explicitly picked from the available list, if any.
  #[serde(default)]
  pub parking_spot:  Option<String>,
  /// Opt-in: refresh the frequent-visitor recall record on success.
  #[serde(default)]
  pub mark_frequent: bool,
}

/// Form input for delivery registration.
#[derive(Debug, Clone, Deserialize)]
pub struct ArrivalRequest {
  pub apartment:      String,
  pub recipient_name: String,
  pub courier:        String,
}

/// The result of a visitor exit.
///
/// The exit itself committed; `stranded_spot` is set when the follow-up
/// parking release failed and left the spot occupied. That anomaly is
/// reported, not rolled back — a visitor stuck `in_building` after they
/// physically left would be the worse failure.
#[derive(Debug, Clone, Serialize)]
pub struct ExitReceipt {
  pub visitor:       Visitor,
  pub stranded_spot: Option<String>,
}
