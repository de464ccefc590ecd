//! Front-desk workflows for the Porteria logbook.
//!
//! [`FrontDesk`] is the operator-facing surface: it validates form input,
//! runs the duplicate-entry and lifecycle guards, and orchestrates parking
//! assignment around visitor registration. It owns no state beyond a handle
//! to a [`DeskStore`] backend — every snapshot it reads is ground truth,
//! because another terminal may be mutating the same collections.

mod requests;
mod visitors;

pub use requests::{ArrivalRequest, EntryRequest, ExitReceipt};

use chrono::Utc;
use porteria_core::{
  Error, Result,
  delivery::{Delivery, DeliveryStatus, NewDelivery},
  frequent::FrequentVisitor,
  parking::{ParkingSpot, SpotKind},
  store::DeskStore,
  visitor::{Visitor, VisitorStatus},
};
use uuid::Uuid;


/// The front-desk service: one per operator terminal.
///
/// Cloning is cheap when the store handle is cheap to clone (the SQLite
/// backend is reference-counted).
#[derive(Clone)]
pub struct FrontDesk<S> {
  store: S,
}

impl<S: DeskStore> FrontDesk<S> {
  pub fn new(store: S) -> Self { Self { store } }

  pub fn store(&self) -> &S { &self.store }

  // ── Visitors ──────────────────────────────────────────────────────────

  /// Register a visitor entry. See [`visitors`] for the workflow.
  pub async fn register_entry(&self, request: EntryRequest) -> Result<Visitor> {
    visitors::register_entry(&self.store, request).await
  }

  /// Register a visitor exit, releasing any held parking spot best-effort.
  pub async fn register_exit(&self, visitor_id: Uuid) -> Result<ExitReceipt> {
    visitors::register_exit(&self.store, visitor_id).await
  }

  pub async fn visitor(&self, id: Uuid) -> Result<Option<Visitor>> {
    self.store.get_visitor(id).await
  }

  pub async fn visitors(
    &self,
    status: Option<VisitorStatus>,
  ) -> Result<Vec<Visitor>> {
    self.store.list_visitors(status).await
  }

  // ── Parking ───────────────────────────────────────────────────────────

  /// The live available-spot inventory for one kind.
  pub async fn available_spots(&self, kind: SpotKind) -> Result<Vec<ParkingSpot>> {
    self.store.list_available_spots(kind).await
  }

  pub async fn spots(&self, kind: Option<SpotKind>) -> Result<Vec<ParkingSpot>> {
    self.store.list_spots(kind).await
  }

  // ── Frequent visitors ─────────────────────────────────────────────────

  /// Autocomplete over recall records: case-insensitive substring match on
  /// national id or name.
  pub async fn suggest_frequent(
    &self,
    needle: &str,
  ) -> Result<Vec<FrequentVisitor>> {
    self.store.search_frequent(needle).await
  }

  // ── Deliveries ────────────────────────────────────────────────────────

  /// Register a parcel arrival.
  pub async fn register_arrival(
    &self,
    request: ArrivalRequest,
  ) -> Result<Delivery> {
    if request.apartment.trim().is_empty() {
      return Err(Error::MissingField("apartment"));
    }
    if request.recipient_name.trim().is_empty() {
      return Err(Error::MissingField("recipient_name"));
    }
    // Free text is fine (the operator may have chosen "other"), but the
    // field itself is required.
    if request.courier.trim().is_empty() {
      return Err(Error::MissingField("courier"));
    }

    self
      .store
      .create_delivery(NewDelivery {
        apartment:      request.apartment,
        recipient_name: request.recipient_name,
        courier:        request.courier,
      })
      .await
  }

  /// Confirm a parcel pickup. The transition is guarded at the store, so a
  /// repeat confirmation fails with [`Error::AlreadyPickedUp`].
  pub async fn register_pickup(
    &self,
    delivery_id: Uuid,
    retrieved_by: &str,
  ) -> Result<Delivery> {
    let retrieved_by = retrieved_by.trim();
    if retrieved_by.is_empty() {
      return Err(Error::MissingRetrieverName);
    }

    self
      .store
      .mark_picked_up(delivery_id, retrieved_by.to_owned(), Utc::now())
      .await
  }

  pub async fn delivery(&self, id: Uuid) -> Result<Option<Delivery>> {
    self.store.get_delivery(id).await
  }

  pub async fn deliveries(
    &self,
    status: Option<DeliveryStatus>,
  ) -> Result<Vec<Delivery>> {
    self.store.list_deliveries(status).await
  }
}
