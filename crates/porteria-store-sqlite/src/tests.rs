//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::Utc;
use porteria_core::{
  Error,
  delivery::{DeliveryStatus, NewDelivery},
  frequent::FrequentProfile,
  parking::{ParkingSpot, SpotKind, SpotStatus},
  rut::Rut,
  store::DeskStore,
  visitor::{NewVisitor, Visitor, VisitorStatus},
};
use uuid::Uuid;

use crate::{SqliteStore, seed::reference_layout};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

async fn seeded_store() -> SqliteStore {
  let s = store().await;
  s.provision_spots(reference_layout()).await.unwrap();
  s
}

fn visitor(name: &str, rut: &str, apartment: &str) -> Visitor {
  NewVisitor {
    visitor_id:      Uuid::new_v4(),
    name:            name.into(),
    rut:             Rut::parse(rut).unwrap(),
    apartment:       apartment.into(),
    license_plate:   None,
    parking_spot_id: None,
  }
  .into_visitor(Utc::now())
}

fn delivery(apartment: &str, recipient: &str, courier: &str) -> NewDelivery {
  NewDelivery {
    apartment:      apartment.into(),
    recipient_name: recipient.into(),
    courier:        courier.into(),
  }
}

// ─── Visitors ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_get_visitor() {
  let s = store().await;
  let v = visitor("Jane Doe", "12345678-5", "301");

  s.create_visitor(v.clone(), None).await.unwrap();

  let fetched = s.get_visitor(v.visitor_id).await.unwrap().unwrap();
  assert_eq!(fetched.visitor_id, v.visitor_id);
  assert_eq!(fetched.name, "Jane Doe");
  assert_eq!(fetched.rut.as_str(), "123456785");
  assert_eq!(fetched.status, VisitorStatus::InBuilding);
  assert!(fetched.exit_time.is_none());
}

#[tokio::test]
async fn get_visitor_missing_returns_none() {
  let s = store().await;
  assert!(s.get_visitor(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn list_visitors_filtered_by_status() {
  let s = store().await;
  let a = visitor("A", "12345678-5", "101");
  let b = visitor("B", "12345698-K", "102");
  s.create_visitor(a.clone(), None).await.unwrap();
  s.create_visitor(b.clone(), None).await.unwrap();
  s.mark_exited(a.visitor_id, Utc::now()).await.unwrap();

  let active = s
    .list_visitors(Some(VisitorStatus::InBuilding))
    .await
    .unwrap();
  assert_eq!(active.len(), 1);
  assert_eq!(active[0].visitor_id, b.visitor_id);

  let all = s.list_visitors(None).await.unwrap();
  assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn find_in_building_matches_only_active_sessions() {
  let s = store().await;
  let rut = Rut::parse("12345678-5").unwrap();
  let v = visitor("Jane", "12345678-5", "301");
  s.create_visitor(v.clone(), None).await.unwrap();

  let found = s.find_in_building(&rut).await.unwrap().unwrap();
  assert_eq!(found.visitor_id, v.visitor_id);

  s.mark_exited(v.visitor_id, Utc::now()).await.unwrap();
  assert!(s.find_in_building(&rut).await.unwrap().is_none());
}

#[tokio::test]
async fn mark_exited_sets_exit_time_once() {
  let s = store().await;
  let v = visitor("Jane", "12345678-5", "301");
  s.create_visitor(v.clone(), None).await.unwrap();

  let exited = s.mark_exited(v.visitor_id, Utc::now()).await.unwrap();
  assert_eq!(exited.status, VisitorStatus::Exited);
  let first_exit = exited.exit_time.unwrap();

  // Exit is not repeatable, and the timestamp never changes.
  let err = s.mark_exited(v.visitor_id, Utc::now()).await.unwrap_err();
  assert!(matches!(err, Error::AlreadyExited(id) if id == v.visitor_id));

  let fetched = s.get_visitor(v.visitor_id).await.unwrap().unwrap();
  assert_eq!(fetched.exit_time.unwrap(), first_exit);
}

#[tokio::test]
async fn mark_exited_unknown_visitor_errors() {
  let s = store().await;
  let err = s.mark_exited(Uuid::new_v4(), Utc::now()).await.unwrap_err();
  assert!(matches!(err, Error::VisitorNotFound(_)));
}

// ─── Parking ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn provisioning_is_idempotent() {
  let s = seeded_store().await;
  s.provision_spots(reference_layout()).await.unwrap();

  let all = s.list_spots(None).await.unwrap();
  assert_eq!(all.len(), 12);

  let visitors = s.list_spots(Some(SpotKind::Visitor)).await.unwrap();
  assert_eq!(visitors.len(), 6);
}

#[tokio::test]
async fn available_spots_excludes_occupied() {
  let s = seeded_store().await;

  let available = s.list_available_spots(SpotKind::Visitor).await.unwrap();
  assert_eq!(available.len(), 6);

  // Only one resident spot was provisioned available.
  let resident = s.list_available_spots(SpotKind::Resident).await.unwrap();
  assert_eq!(resident.len(), 1);
  assert_eq!(resident[0].spot_id, "R-203");
  // Basement floors are negative and must survive the column round-trip.
  assert_eq!(resident[0].floor, -2);
}

#[tokio::test]
async fn assign_occupies_and_links_the_visit() {
  let s = seeded_store().await;
  let visit_id = Uuid::new_v4();

  s.assign_spot("V-01", visit_id).await.unwrap();

  let spot = s.get_spot("V-01").await.unwrap().unwrap();
  assert_eq!(spot.status, SpotStatus::Occupied);
  assert_eq!(spot.assigned_to, Some(visit_id));

  let available = s.list_available_spots(SpotKind::Visitor).await.unwrap();
  assert!(available.iter().all(|sp| sp.spot_id != "V-01"));
}

#[tokio::test]
async fn assign_loses_the_race_on_an_occupied_spot() {
  let s = seeded_store().await;
  let first = Uuid::new_v4();
  let second = Uuid::new_v4();

  s.assign_spot("V-02", first).await.unwrap();
  let err = s.assign_spot("V-02", second).await.unwrap_err();
  assert!(matches!(err, Error::SpotAlreadyTaken(id) if id == "V-02"));

  // The loser wrote nothing: the first assignment is intact.
  let spot = s.get_spot("V-02").await.unwrap().unwrap();
  assert_eq!(spot.assigned_to, Some(first));
}

#[tokio::test]
async fn assign_unknown_spot_errors() {
  let s = seeded_store().await;
  let err = s.assign_spot("V-99", Uuid::new_v4()).await.unwrap_err();
  assert!(matches!(err, Error::SpotNotFound(id) if id == "V-99"));
}

#[tokio::test]
async fn release_returns_the_spot_to_the_pool() {
  let s = seeded_store().await;
  s.assign_spot("V-03", Uuid::new_v4()).await.unwrap();

  s.release_spot("V-03").await.unwrap();

  let spot = s.get_spot("V-03").await.unwrap().unwrap();
  assert_eq!(spot.status, SpotStatus::Available);
  assert!(spot.assigned_to.is_none());
}

#[tokio::test]
async fn release_is_idempotent() {
  let s = seeded_store().await;
  s.assign_spot("V-04", Uuid::new_v4()).await.unwrap();

  s.release_spot("V-04").await.unwrap();
  // Releasing an already-available spot is a no-op success.
  s.release_spot("V-04").await.unwrap();

  let err = s.release_spot("V-99").await.unwrap_err();
  assert!(matches!(err, Error::SpotNotFound(_)));
}

#[tokio::test]
async fn no_two_spots_share_an_assignee() {
  let s = seeded_store().await;
  let visit_a = Uuid::new_v4();
  let visit_b = Uuid::new_v4();

  s.assign_spot("V-01", visit_a).await.unwrap();
  s.assign_spot("V-02", visit_b).await.unwrap();
  s.release_spot("V-01").await.unwrap();
  s.assign_spot("V-01", visit_a).await.unwrap();
  s.release_spot("V-02").await.unwrap();

  let spots = s.list_spots(None).await.unwrap();
  let occupied: Vec<_> = spots
    .iter()
    .filter(|sp| sp.kind == SpotKind::Visitor && sp.status == SpotStatus::Occupied)
    .collect();

  // Every occupied visitor spot has an assignee, and no assignee appears
  // on two spots.
  assert!(occupied.iter().all(|sp| sp.assigned_to.is_some()));
  let mut assignees: Vec<_> =
    occupied.iter().filter_map(|sp| sp.assigned_to).collect();
  assignees.sort();
  assignees.dedup();
  assert_eq!(assignees.len(), occupied.len());
}

// ─── Frequent visitors ───────────────────────────────────────────────────────

#[tokio::test]
async fn upsert_frequent_creates_then_updates_in_place() {
  let s = store().await;
  let rut = Rut::parse("12345678-5").unwrap();

  let created = s
    .upsert_frequent(FrequentProfile {
      name:               "Jane Doe".into(),
      rut:                rut.clone(),
      apartment:          "301".into(),
      last_license_plate: None,
    })
    .await
    .unwrap();

  let updated = s
    .upsert_frequent(FrequentProfile {
      name:               "Jane D. Doe".into(),
      rut:                rut.clone(),
      apartment:          "302".into(),
      last_license_plate: Some("ABCD-12".into()),
    })
    .await
    .unwrap();

  // Same record, refreshed fields — no duplicate row.
  assert_eq!(updated.frequent_id, created.frequent_id);
  assert_eq!(updated.name, "Jane D. Doe");
  assert_eq!(updated.apartment, "302");
  assert_eq!(updated.last_license_plate.as_deref(), Some("ABCD-12"));

  let all = s.search_frequent("").await.unwrap();
  assert_eq!(all.len(), 1);
}

#[tokio::test]
async fn search_frequent_is_case_insensitive_substring() {
  let s = store().await;
  for (name, rut) in [("Jane Doe", "12345678-5"), ("Juan Perez", "12345698-K")] {
    s.upsert_frequent(FrequentProfile {
      name:               name.into(),
      rut:                Rut::parse(rut).unwrap(),
      apartment:          "301".into(),
      last_license_plate: None,
    })
    .await
    .unwrap();
  }

  let by_name = s.search_frequent("jane").await.unwrap();
  assert_eq!(by_name.len(), 1);
  assert_eq!(by_name[0].name, "Jane Doe");

  let by_rut = s.search_frequent("123456785").await.unwrap();
  assert_eq!(by_rut.len(), 1);
  assert_eq!(by_rut[0].name, "Jane Doe");

  assert!(s.search_frequent("nobody").await.unwrap().is_empty());
}

#[tokio::test]
async fn create_visitor_with_frequent_is_one_batch() {
  let s = store().await;
  let v = visitor("Jane Doe", "12345678-5", "301");
  let profile = FrequentProfile {
    name:               v.name.clone(),
    rut:                v.rut.clone(),
    apartment:          v.apartment.clone(),
    last_license_plate: None,
  };

  s.create_visitor(v.clone(), Some(profile)).await.unwrap();

  assert!(s.get_visitor(v.visitor_id).await.unwrap().is_some());
  let frequent = s.search_frequent("Jane").await.unwrap();
  assert_eq!(frequent.len(), 1);
  assert_eq!(frequent[0].rut, v.rut);
}

// ─── Deliveries ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_delivery_starts_pending() {
  let s = store().await;
  let d = s
    .create_delivery(delivery("402", "Maria Silva", "Chilexpress"))
    .await
    .unwrap();

  assert_eq!(d.status, DeliveryStatus::Pending);
  assert!(d.pickup_time.is_none());
  assert!(d.retrieved_by.is_none());

  let fetched = s.get_delivery(d.delivery_id).await.unwrap().unwrap();
  assert_eq!(fetched.courier, "Chilexpress");
}

#[tokio::test]
async fn list_deliveries_filtered_by_status() {
  let s = store().await;
  let a = s
    .create_delivery(delivery("101", "A", "Correos de Chile"))
    .await
    .unwrap();
  s.create_delivery(delivery("102", "B", "Blue Express"))
    .await
    .unwrap();
  s.mark_picked_up(a.delivery_id, "A".into(), Utc::now())
    .await
    .unwrap();

  let pending = s
    .list_deliveries(Some(DeliveryStatus::Pending))
    .await
    .unwrap();
  assert_eq!(pending.len(), 1);
  assert_eq!(pending[0].apartment, "102");

  let picked = s
    .list_deliveries(Some(DeliveryStatus::PickedUp))
    .await
    .unwrap();
  assert_eq!(picked.len(), 1);
}

#[tokio::test]
async fn pickup_is_not_repeatable() {
  let s = store().await;
  let d = s
    .create_delivery(delivery("402", "Maria", "Chilexpress"))
    .await
    .unwrap();

  let picked = s
    .mark_picked_up(d.delivery_id, "Juan".into(), Utc::now())
    .await
    .unwrap();
  assert_eq!(picked.status, DeliveryStatus::PickedUp);
  assert_eq!(picked.retrieved_by.as_deref(), Some("Juan"));
  assert!(picked.pickup_time.is_some());

  let err = s
    .mark_picked_up(d.delivery_id, "Pedro".into(), Utc::now())
    .await
    .unwrap_err();
  assert!(matches!(err, Error::AlreadyPickedUp(id) if id == d.delivery_id));

  // The original retriever survives the rejected second call.
  let fetched = s.get_delivery(d.delivery_id).await.unwrap().unwrap();
  assert_eq!(fetched.retrieved_by.as_deref(), Some("Juan"));
}

#[tokio::test]
async fn pickup_unknown_delivery_errors() {
  let s = store().await;
  let err = s
    .mark_picked_up(Uuid::new_v4(), "Juan".into(), Utc::now())
    .await
    .unwrap_err();
  assert!(matches!(err, Error::DeliveryNotFound(_)));
}
