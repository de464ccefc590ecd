//! Parcel deliveries.
//!
//! A delivery is created `Pending` on arrival and mutated exactly once, when
//! someone picks it up. There is deliberately no duplicate guard here: the
//! same apartment can receive any number of concurrent pending parcels.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryStatus {
  Pending,
  PickedUp,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Delivery {
  pub delivery_id:    Uuid,
  pub apartment:      String,
  pub recipient_name: String,
  /// Courier name; free text when the operator chose the "other" option.
  pub courier:        String,
  pub status:         DeliveryStatus,
  pub arrival_time:   DateTime<Utc>,
  pub pickup_time:    Option<DateTime<Utc>>,
  pub retrieved_by:   Option<String>,
}

impl Delivery {
  pub fn is_pending(&self) -> bool { self.status == DeliveryStatus::Pending }
}

/// Validated input to delivery registration.
#[derive(Debug, Clone)]
pub struct NewDelivery {
  pub apartment:      String,
  pub recipient_name: String,
  pub courier:        String,
}
