//! One-time parking provisioning.
//!
//! Loading the inventory is configuration, not runtime logic: it runs once
//! before first use (`porteria --seed-parking`) and inserts by spot id,
//! leaving existing rows alone, so re-running it is harmless.

use porteria_core::parking::{ParkingSpot, SpotStatus};

/// The reference deployment's inventory: six visitor spots and six resident
/// spots across two basement levels. Resident occupancy reflects the spots'
/// state at provisioning time; resident spots never carry a visit id.
pub fn reference_layout() -> Vec<ParkingSpot> {
  vec![
    // Visitor spots, level -1.
    ParkingSpot::visitor("V-01", -1),
    ParkingSpot::visitor("V-02", -1),
    ParkingSpot::visitor("V-03", -1),
    ParkingSpot::visitor("V-04", -1),
    ParkingSpot::visitor("V-05", -1),
    ParkingSpot::visitor("V-06", -1)
      .with_notes("Accessible spot, next to the elevator"),
    // Resident spots, level -1.
    ParkingSpot::resident("R-101", -1, SpotStatus::Occupied),
    ParkingSpot::resident("R-102", -1, SpotStatus::Occupied),
    ParkingSpot::resident("R-103", -1, SpotStatus::Occupied),
    // Resident spots, level -2.
    ParkingSpot::resident("R-201", -2, SpotStatus::Occupied),
    ParkingSpot::resident("R-202", -2, SpotStatus::Occupied),
    ParkingSpot::resident("R-203", -2, SpotStatus::Available),
  ]
}
