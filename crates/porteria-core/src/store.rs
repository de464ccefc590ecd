//! The `DeskStore` trait — the narrow seam over the shared document store.
//!
//! The trait is implemented by storage backends (e.g.
//! `porteria-store-sqlite`). Higher layers (`porteria-desk`, `porteria-api`)
//! depend on this abstraction, not on any concrete backend.
//!
//! Methods return [`crate::Error`] directly rather than an associated error
//! type: the desk workflows branch on domain outcomes (`SpotAlreadyTaken`,
//! `AlreadyExited`, ...) that must survive the abstraction, and backends fold
//! their infrastructure failures into [`crate::Error::StoreUnavailable`].
//!
//! All methods return `Send` futures so the trait can be used in
//! multi-threaded async runtimes (e.g. tokio with `axum`).

use std::future::Future;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
  Result,
  delivery::{Delivery, DeliveryStatus, NewDelivery},
  frequent::{FrequentProfile, FrequentVisitor},
  parking::{ParkingSpot, SpotKind},
  rut::Rut,
  visitor::{Visitor, VisitorStatus},
};

pub trait DeskStore: Send + Sync {
  // ── Visitors ──────────────────────────────────────────────────────────

  /// Persist a new visitor session, and — in the same transactional batch —
  /// upsert the frequent-visitor record when `frequent` is given.
  ///
  /// The caller supplies the full record (id and entry time included) so a
  /// preceding [`assign_spot`](Self::assign_spot) can reference the same
  /// visit id.
  fn create_visitor(
    &self,
    visitor: Visitor,
    frequent: Option<FrequentProfile>,
  ) -> impl Future<Output = Result<()>> + Send + '_;

  /// Retrieve a visitor session by id. Returns `None` if not found.
  fn get_visitor(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Visitor>>> + Send + '_;

  /// List sessions, optionally filtered by status, newest entry first.
  fn list_visitors(
    &self,
    status: Option<VisitorStatus>,
  ) -> impl Future<Output = Result<Vec<Visitor>>> + Send + '_;

  /// Equality lookup for the duplicate-entry guard: the `InBuilding` session
  /// with this national id, if one exists.
  fn find_in_building<'a>(
    &'a self,
    rut: &'a Rut,
  ) -> impl Future<Output = Result<Option<Visitor>>> + Send + 'a;

  /// Transition a session to `Exited` at `exit_time` and return the updated
  /// record.
  ///
  /// Fails with [`crate::Error::VisitorNotFound`] for unknown ids and
  /// [`crate::Error::AlreadyExited`] when the session is not `InBuilding`
  /// (exit is not repeatable). The guard is enforced at the store layer so a
  /// concurrent exit from another terminal loses cleanly.
  fn mark_exited(
    &self,
    id: Uuid,
    exit_time: DateTime<Utc>,
  ) -> impl Future<Output = Result<Visitor>> + Send + '_;

  // ── Parking ───────────────────────────────────────────────────────────

  /// The full inventory, optionally filtered by kind.
  fn list_spots(
    &self,
    kind: Option<SpotKind>,
  ) -> impl Future<Output = Result<Vec<ParkingSpot>>> + Send + '_;

  /// The currently-available inventory for one kind.
  fn list_available_spots(
    &self,
    kind: SpotKind,
  ) -> impl Future<Output = Result<Vec<ParkingSpot>>> + Send + '_;

  fn get_spot<'a>(
    &'a self,
    spot_id: &'a str,
  ) -> impl Future<Output = Result<Option<ParkingSpot>>> + Send + 'a;

  /// Assign a spot to a visit — a compare-and-set on `status = available`.
  ///
  /// Fails with [`crate::Error::SpotAlreadyTaken`] when a concurrent
  /// assignment won the race and [`crate::Error::SpotNotFound`] for unknown
  /// ids. On failure nothing is written.
  fn assign_spot<'a>(
    &'a self,
    spot_id: &'a str,
    visit_id: Uuid,
  ) -> impl Future<Output = Result<()>> + Send + 'a;

  /// Unconditionally return a spot to the available pool.
  ///
  /// Idempotent: releasing an already-available spot is a no-op success, so
  /// a retry after a partial failure is safe. Unknown ids still fail with
  /// [`crate::Error::SpotNotFound`].
  fn release_spot<'a>(
    &'a self,
    spot_id: &'a str,
  ) -> impl Future<Output = Result<()>> + Send + 'a;

  /// One-time provisioning: insert the seed inventory by spot id, leaving
  /// spots that already exist untouched.
  fn provision_spots(
    &self,
    spots: Vec<ParkingSpot>,
  ) -> impl Future<Output = Result<()>> + Send + '_;

  // ── Frequent visitors ─────────────────────────────────────────────────

  /// Create or update the recall record for `profile.rut`.
  ///
  /// The lookup-then-write pair is atomic at the store layer, so concurrent
  /// upserts for the same national id cannot create duplicates.
  fn upsert_frequent(
    &self,
    profile: FrequentProfile,
  ) -> impl Future<Output = Result<FrequentVisitor>> + Send + '_;

  /// Case-insensitive substring match over national id and name, for
  /// autocomplete. Result order is unspecified; the consumer sorts.
  fn search_frequent<'a>(
    &'a self,
    needle: &'a str,
  ) -> impl Future<Output = Result<Vec<FrequentVisitor>>> + Send + 'a;

  // ── Deliveries ────────────────────────────────────────────────────────

  /// Persist a parcel as `Pending` and return the stored record.
  /// The arrival timestamp is set by the store.
  fn create_delivery(
    &self,
    input: NewDelivery,
  ) -> impl Future<Output = Result<Delivery>> + Send + '_;

  fn get_delivery(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Delivery>>> + Send + '_;

  /// List parcels, optionally filtered by status, newest arrival first.
  fn list_deliveries(
    &self,
    status: Option<DeliveryStatus>,
  ) -> impl Future<Output = Result<Vec<Delivery>>> + Send + '_;

  /// Transition a parcel to `PickedUp` and return the updated record.
  ///
  /// Fails with [`crate::Error::DeliveryNotFound`] /
  /// [`crate::Error::AlreadyPickedUp`] analogous to
  /// [`mark_exited`](Self::mark_exited).
  fn mark_picked_up(
    &self,
    id: Uuid,
    retrieved_by: String,
    pickup_time: DateTime<Utc>,
  ) -> impl Future<Output = Result<Delivery>> + Send + '_;
}
