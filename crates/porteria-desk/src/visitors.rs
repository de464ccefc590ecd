//! The visitor entry/exit workflows.
//!
//! Entry is all-or-nothing: a failed parking assignment aborts the whole
//! registration, because the operator explicitly confirmed that spot and
//! must be told it is gone. Exit is deliberately asymmetric: the exit
//! commits first and a failed spot release is only reported (a stranded
//! occupied spot is operationally recoverable; a ghost `in_building`
//! session is not).

use chrono::Utc;
use porteria_core::{
  Error, Result,
  frequent::FrequentProfile,
  parking::SpotKind,
  rut::Rut,
  store::DeskStore,
  visitor::{NewVisitor, Visitor},
};
use uuid::Uuid;

use crate::requests::{EntryRequest, ExitReceipt};

/// Register an entry: validate, guard against a duplicate session, assign
/// the requested spot, persist, and optionally refresh the recall record.
pub(crate) async fn register_entry<S: DeskStore>(
  store: &S,
  request: EntryRequest,
) -> Result<Visitor> {
  if request.name.trim().is_empty() {
    return Err(Error::MissingField("name"));
  }
  if request.national_id.trim().is_empty() {
    return Err(Error::MissingField("national_id"));
  }
  if request.apartment.trim().is_empty() {
    return Err(Error::MissingField("apartment"));
  }

  let rut = Rut::parse(&request.national_id)?;

  // Duplicate-entry guard: at most one in-building session per national id.
  // The latest store snapshot is ground truth, not any local cache.
  if let Some(existing) = store.find_in_building(&rut).await? {
    tracing::debug!(
      visitor_id = %existing.visitor_id,
      "rejected duplicate entry"
    );
    return Err(Error::AlreadyInBuilding(rut.to_string()));
  }

  // The visit id is chosen up front so the parking compare-and-set can
  // reference it before the visitor record exists.
  let visit_id = Uuid::new_v4();

  if let Some(spot_id) = request.parking_spot.as_deref() {
    // Only the visitor pool is offered to this flow; a resident spot id is
    // operator error, not an allocation race. Kind never changes after
    // provisioning, so the read-then-assign pair cannot race on it.
    match store.get_spot(spot_id).await? {
      None => return Err(Error::SpotNotFound(spot_id.to_owned())),
      Some(spot) if spot.kind != SpotKind::Visitor => {
        return Err(Error::InvalidArgument(
          "parking spot is not in the visitor pool",
        ));
      }
      // A failure here aborts the registration; no visitor record is written.
      Some(_) => store.assign_spot(spot_id, visit_id).await?,
    }
  }

  let visitor = NewVisitor {
    visitor_id:      visit_id,
    name:            request.name,
    rut:             rut.clone(),
    apartment:       request.apartment,
    license_plate:   request.license_plate,
    parking_spot_id: request.parking_spot.clone(),
  }
  .into_visitor(Utc::now());

  let frequent = request.mark_frequent.then(|| FrequentProfile {
    name:               visitor.name.clone(),
    rut,
    apartment:          visitor.apartment.clone(),
    last_license_plate: visitor.license_plate.clone(),
  });

  if let Err(e) = store.create_visitor(visitor.clone(), frequent).await {
    // The spot was taken in our name but the visit never materialised.
    // Try to hand it back; the release is idempotent, so a retry elsewhere
    // stays safe.
    if let Some(spot_id) = request.parking_spot.as_deref() {
      if let Err(release_err) = store.release_spot(spot_id).await {
        tracing::warn!(
          spot_id,
          error = %release_err,
          "could not release spot after failed registration"
        );
      }
    }
    return Err(e);
  }

  tracing::info!(
    visitor_id = %visitor.visitor_id,
    apartment = %visitor.apartment,
    spot = ?visitor.parking_spot_id,
    "registered visitor entry"
  );

  Ok(visitor)
}

/// Register an exit: guard the transition at the store, then release any
/// held spot best-effort.
pub(crate) async fn register_exit<S: DeskStore>(
  store: &S,
  visitor_id: Uuid,
) -> Result<ExitReceipt> {
  let visitor = store.mark_exited(visitor_id, Utc::now()).await?;

  let mut stranded_spot = None;
  if let Some(spot_id) = visitor.parking_spot_id.as_deref() {
    if let Err(e) = store.release_spot(spot_id).await {
      // The exit already committed; report the stranded spot instead of
      // rolling back.
      tracing::warn!(
        %visitor_id,
        spot_id,
        error = %e,
        "exit committed but spot release failed"
      );
      stranded_spot = Some(spot_id.to_owned());
    }
  }

  tracing::info!(%visitor_id, "registered visitor exit");

  Ok(ExitReceipt {
    visitor,
    stranded_spot,
  })
}
