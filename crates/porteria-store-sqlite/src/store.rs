//! [`SqliteStore`] — the SQLite implementation of
//! [`DeskStore`](porteria_core::store::DeskStore).
//!
//! Lifecycle guards (`AlreadyExited`, `AlreadyPickedUp`) and the parking
//! compare-and-set run inside single connection calls, so concurrent desks
//! race at the store and the loser gets a clean domain error.

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use porteria_core::{
  delivery::{Delivery, DeliveryStatus, NewDelivery},
  frequent::{FrequentProfile, FrequentVisitor},
  parking::{ParkingSpot, SpotKind},
  rut::Rut,
  store::DeskStore,
  visitor::{Visitor, VisitorStatus},
};

use crate::{
  Error,
  encode::{
    RawDelivery, RawFrequent, RawSpot, RawVisitor, encode_delivery_status,
    encode_dt, encode_spot_kind, encode_spot_status, encode_uuid,
    encode_visitor_status,
  },
  schema::SCHEMA,
};

type CoreResult<T> = porteria_core::Result<T>;

// ─── Store ───────────────────────────────────────────────────────────────────

/// A front-desk logbook store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

/// Outcome probe for the conditional parking update.
enum AssignOutcome {
  Assigned,
  Taken,
  Missing,
}

/// Outcome probe for the read-then-write lifecycle transitions.
enum TransitionOutcome<T> {
  Done(T),
  Repeated,
  Missing,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self, Error> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<(), Error> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run `f` on the connection thread, folding transport errors into the
  /// crate error type.
  async fn call<R, F>(&self, f: F) -> Result<R, Error>
  where
    R: Send + 'static,
    F: FnOnce(&mut rusqlite::Connection) -> Result<R, tokio_rusqlite::Error>
      + Send
      + 'static,
  {
    Ok(self.conn.call(f).await?)
  }
}

// ─── Row mappers ─────────────────────────────────────────────────────────────

const VISITOR_COLS: &str = "visitor_id, name, rut, apartment, entry_time, \
                            exit_time, status, license_plate, parking_spot_id";

fn visitor_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawVisitor> {
  Ok(RawVisitor {
    visitor_id:      row.get(0)?,
    name:            row.get(1)?,
    rut:             row.get(2)?,
    apartment:       row.get(3)?,
    entry_time:      row.get(4)?,
    exit_time:       row.get(5)?,
    status:          row.get(6)?,
    license_plate:   row.get(7)?,
    parking_spot_id: row.get(8)?,
  })
}

const DELIVERY_COLS: &str = "delivery_id, apartment, recipient_name, courier, \
                             status, arrival_time, pickup_time, retrieved_by";

fn delivery_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawDelivery> {
  Ok(RawDelivery {
    delivery_id:    row.get(0)?,
    apartment:      row.get(1)?,
    recipient_name: row.get(2)?,
    courier:        row.get(3)?,
    status:         row.get(4)?,
    arrival_time:   row.get(5)?,
    pickup_time:    row.get(6)?,
    retrieved_by:   row.get(7)?,
  })
}

const SPOT_COLS: &str = "spot_id, status, kind, floor, assigned_to, notes";

fn spot_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawSpot> {
  Ok(RawSpot {
    spot_id:     row.get(0)?,
    status:      row.get(1)?,
    kind:        row.get(2)?,
    floor:       row.get(3)?,
    assigned_to: row.get(4)?,
    notes:       row.get(5)?,
  })
}

const FREQUENT_COLS: &str =
  "frequent_id, name, rut, apartment, last_license_plate";

fn frequent_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawFrequent> {
  Ok(RawFrequent {
    frequent_id:        row.get(0)?,
    name:               row.get(1)?,
    rut:                row.get(2)?,
    apartment:          row.get(3)?,
    last_license_plate: row.get(4)?,
  })
}

// ─── DeskStore impl ──────────────────────────────────────────────────────────

impl DeskStore for SqliteStore {
  // ── Visitors ──────────────────────────────────────────────────────────────

  async fn create_visitor(
    &self,
    visitor: Visitor,
    frequent: Option<FrequentProfile>,
  ) -> CoreResult<()> {
    let id_str = encode_uuid(visitor.visitor_id);
    let rut_str = visitor.rut.as_str().to_owned();
    let entry_str = encode_dt(visitor.entry_time);
    let status_str = encode_visitor_status(visitor.status).to_owned();
    let name = visitor.name;
    let apartment = visitor.apartment;
    let plate = visitor.license_plate;
    let spot = visitor.parking_spot_id;

    // Pre-encode the frequent upsert so the closure stays 'static.
    let frequent_params = frequent.map(|f| {
      (
        encode_uuid(Uuid::new_v4()),
        f.name,
        f.rut.as_str().to_owned(),
        f.apartment,
        f.last_license_plate,
      )
    });

    self
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
          "INSERT INTO visitors (
             visitor_id, name, rut, apartment, entry_time,
             exit_time, status, license_plate, parking_spot_id
           ) VALUES (?1, ?2, ?3, ?4, ?5, NULL, ?6, ?7, ?8)",
          rusqlite::params![
            id_str, name, rut_str, apartment, entry_str, status_str, plate,
            spot,
          ],
        )?;

        if let Some((fid, fname, frut, fapt, fplate)) = frequent_params {
          tx.execute(
            "INSERT INTO frequent_visitors (
               frequent_id, name, rut, apartment, last_license_plate
             ) VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(rut) DO UPDATE SET
               name               = excluded.name,
               apartment          = excluded.apartment,
               last_license_plate = excluded.last_license_plate",
            rusqlite::params![fid, fname, frut, fapt, fplate],
          )?;
        }

        tx.commit()?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn get_visitor(&self, id: Uuid) -> CoreResult<Option<Visitor>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawVisitor> = self
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {VISITOR_COLS} FROM visitors WHERE visitor_id = ?1"),
              rusqlite::params![id_str],
              visitor_row,
            )
            .optional()?,
        )
      })
      .await?;

    Ok(raw.map(RawVisitor::into_visitor).transpose()?)
  }

  async fn list_visitors(
    &self,
    status: Option<VisitorStatus>,
  ) -> CoreResult<Vec<Visitor>> {
    let status_str = status.map(encode_visitor_status).map(str::to_owned);

    let raws: Vec<RawVisitor> = self
      .call(move |conn| {
        let rows = if let Some(s) = status_str {
          let mut stmt = conn.prepare(&format!(
            "SELECT {VISITOR_COLS} FROM visitors
             WHERE status = ?1 ORDER BY entry_time DESC"
          ))?;
          stmt
            .query_map(rusqlite::params![s], visitor_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        } else {
          let mut stmt = conn.prepare(&format!(
            "SELECT {VISITOR_COLS} FROM visitors ORDER BY entry_time DESC"
          ))?;
          stmt
            .query_map([], visitor_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        };
        Ok(rows)
      })
      .await?;

    Ok(
      raws
        .into_iter()
        .map(RawVisitor::into_visitor)
        .collect::<Result<_, _>>()?,
    )
  }

  async fn find_in_building(&self, rut: &Rut) -> CoreResult<Option<Visitor>> {
    let rut_str = rut.as_str().to_owned();

    let raw: Option<RawVisitor> = self
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {VISITOR_COLS} FROM visitors
                 WHERE rut = ?1 AND status = 'in_building' LIMIT 1"
              ),
              rusqlite::params![rut_str],
              visitor_row,
            )
            .optional()?,
        )
      })
      .await?;

    Ok(raw.map(RawVisitor::into_visitor).transpose()?)
  }

  async fn mark_exited(
    &self,
    id: Uuid,
    exit_time: DateTime<Utc>,
  ) -> CoreResult<Visitor> {
    let id_str = encode_uuid(id);
    let exit_str = encode_dt(exit_time);

    let outcome = self
      .call(move |conn| {
        let status: Option<String> = conn
          .query_row(
            "SELECT status FROM visitors WHERE visitor_id = ?1",
            rusqlite::params![id_str],
            |r| r.get(0),
          )
          .optional()?;

        match status.as_deref() {
          None => Ok(TransitionOutcome::Missing),
          Some(s) if s != "in_building" => Ok(TransitionOutcome::Repeated),
          Some(_) => {
            conn.execute(
              "UPDATE visitors SET exit_time = ?2, status = 'exited'
               WHERE visitor_id = ?1 AND status = 'in_building'",
              rusqlite::params![id_str, exit_str],
            )?;
            let raw = conn.query_row(
              &format!("SELECT {VISITOR_COLS} FROM visitors WHERE visitor_id = ?1"),
              rusqlite::params![id_str],
              visitor_row,
            )?;
            Ok(TransitionOutcome::Done(raw))
          }
        }
      })
      .await?;

    match outcome {
      TransitionOutcome::Done(raw) => Ok(raw.into_visitor()?),
      TransitionOutcome::Repeated => Err(porteria_core::Error::AlreadyExited(id)),
      TransitionOutcome::Missing => Err(porteria_core::Error::VisitorNotFound(id)),
    }
  }

  // ── Parking ───────────────────────────────────────────────────────────────

  async fn list_spots(
    &self,
    kind: Option<SpotKind>,
  ) -> CoreResult<Vec<ParkingSpot>> {
    let kind_str = kind.map(encode_spot_kind).map(str::to_owned);

    let raws: Vec<RawSpot> = self
      .call(move |conn| {
        let rows = if let Some(k) = kind_str {
          let mut stmt = conn.prepare(&format!(
            "SELECT {SPOT_COLS} FROM parking_spots
             WHERE kind = ?1 ORDER BY spot_id"
          ))?;
          stmt
            .query_map(rusqlite::params![k], spot_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        } else {
          let mut stmt = conn.prepare(&format!(
            "SELECT {SPOT_COLS} FROM parking_spots ORDER BY spot_id"
          ))?;
          stmt
            .query_map([], spot_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        };
        Ok(rows)
      })
      .await?;

    Ok(
      raws
        .into_iter()
        .map(RawSpot::into_spot)
        .collect::<Result<_, _>>()?,
    )
  }

  async fn list_available_spots(
    &self,
    kind: SpotKind,
  ) -> CoreResult<Vec<ParkingSpot>> {
    let kind_str = encode_spot_kind(kind).to_owned();

    let raws: Vec<RawSpot> = self
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {SPOT_COLS} FROM parking_spots
           WHERE kind = ?1 AND status = 'available' ORDER BY spot_id"
        ))?;
        Ok(
          stmt
            .query_map(rusqlite::params![kind_str], spot_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?,
        )
      })
      .await?;

    Ok(
      raws
        .into_iter()
        .map(RawSpot::into_spot)
        .collect::<Result<_, _>>()?,
    )
  }

  async fn get_spot(&self, spot_id: &str) -> CoreResult<Option<ParkingSpot>> {
    let id = spot_id.to_owned();

    let raw: Option<RawSpot> = self
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {SPOT_COLS} FROM parking_spots WHERE spot_id = ?1"),
              rusqlite::params![id],
              spot_row,
            )
            .optional()?,
        )
      })
      .await?;

    Ok(raw.map(RawSpot::into_spot).transpose()?)
  }

  async fn assign_spot(&self, spot_id: &str, visit_id: Uuid) -> CoreResult<()> {
    let id = spot_id.to_owned();
    let visit_str = encode_uuid(visit_id);

    let outcome = self
      .call(move |conn| {
        // Compare-and-set: only an available spot can be taken. A concurrent
        // winner leaves zero rows for us to update.
        let updated = conn.execute(
          "UPDATE parking_spots SET status = 'occupied', assigned_to = ?2
           WHERE spot_id = ?1 AND status = 'available'",
          rusqlite::params![id, visit_str],
        )?;

        if updated == 1 {
          return Ok(AssignOutcome::Assigned);
        }

        let exists: bool = conn
          .query_row(
            "SELECT 1 FROM parking_spots WHERE spot_id = ?1",
            rusqlite::params![id],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false);

        Ok(if exists {
          AssignOutcome::Taken
        } else {
          AssignOutcome::Missing
        })
      })
      .await?;

    match outcome {
      AssignOutcome::Assigned => Ok(()),
      AssignOutcome::Taken => {
        Err(porteria_core::Error::SpotAlreadyTaken(spot_id.to_owned()))
      }
      AssignOutcome::Missing => {
        Err(porteria_core::Error::SpotNotFound(spot_id.to_owned()))
      }
    }
  }

  async fn release_spot(&self, spot_id: &str) -> CoreResult<()> {
    let id = spot_id.to_owned();

    let updated = self
      .call(move |conn| {
        // Unconditional: releasing an already-available spot matches the row
        // and is a no-op success, which keeps retries safe.
        Ok(conn.execute(
          "UPDATE parking_spots SET status = 'available', assigned_to = NULL
           WHERE spot_id = ?1",
          rusqlite::params![id],
        )?)
      })
      .await?;

    if updated == 0 {
      return Err(porteria_core::Error::SpotNotFound(spot_id.to_owned()));
    }
    Ok(())
  }

  async fn provision_spots(&self, spots: Vec<ParkingSpot>) -> CoreResult<()> {
    let rows: Vec<_> = spots
      .into_iter()
      .map(|s| {
        (
          s.spot_id,
          encode_spot_status(s.status).to_owned(),
          encode_spot_kind(s.kind).to_owned(),
          s.floor,
          s.assigned_to.map(encode_uuid),
          s.notes,
        )
      })
      .collect();

    self
      .call(move |conn| {
        let tx = conn.transaction()?;
        for (id, status, kind, floor, assigned, notes) in rows {
          // Re-running the seed must not clobber a live assignment, so
          // existing spots are left untouched.
          tx.execute(
            "INSERT INTO parking_spots (
               spot_id, status, kind, floor, assigned_to, notes
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(spot_id) DO NOTHING",
            rusqlite::params![id, status, kind, floor, assigned, notes],
          )?;
        }
        tx.commit()?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Frequent visitors ─────────────────────────────────────────────────────

  async fn upsert_frequent(
    &self,
    profile: FrequentProfile,
  ) -> CoreResult<FrequentVisitor> {
    let new_id = encode_uuid(Uuid::new_v4());
    let rut_str = profile.rut.as_str().to_owned();
    let name = profile.name;
    let apartment = profile.apartment;
    let plate = profile.last_license_plate;

    let raw: RawFrequent = self
      .call(move |conn| {
        // The UNIQUE(rut) constraint makes the lookup-then-write pair a
        // single statement: concurrent upserts for one national id cannot
        // create duplicate rows.
        conn.execute(
          "INSERT INTO frequent_visitors (
             frequent_id, name, rut, apartment, last_license_plate
           ) VALUES (?1, ?2, ?3, ?4, ?5)
           ON CONFLICT(rut) DO UPDATE SET
             name               = excluded.name,
             apartment          = excluded.apartment,
             last_license_plate = excluded.last_license_plate",
          rusqlite::params![new_id, name, rut_str, apartment, plate],
        )?;

        Ok(conn.query_row(
          &format!("SELECT {FREQUENT_COLS} FROM frequent_visitors WHERE rut = ?1"),
          rusqlite::params![rut_str],
          frequent_row,
        )?)
      })
      .await?;

    Ok(raw.into_frequent()?)
  }

  async fn search_frequent(
    &self,
    needle: &str,
  ) -> CoreResult<Vec<FrequentVisitor>> {
    let pattern = format!("%{needle}%");

    let raws: Vec<RawFrequent> = self
      .call(move |conn| {
        // SQLite LIKE is already case-insensitive for ASCII.
        let mut stmt = conn.prepare(&format!(
          "SELECT {FREQUENT_COLS} FROM frequent_visitors
           WHERE rut LIKE ?1 OR name LIKE ?1"
        ))?;
        Ok(
          stmt
            .query_map(rusqlite::params![pattern], frequent_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?,
        )
      })
      .await?;

    Ok(
      raws
        .into_iter()
        .map(RawFrequent::into_frequent)
        .collect::<Result<_, _>>()?,
    )
  }

  // ── Deliveries ────────────────────────────────────────────────────────────

  async fn create_delivery(&self, input: NewDelivery) -> CoreResult<Delivery> {
    let delivery = Delivery {
      delivery_id:    Uuid::new_v4(),
      apartment:      input.apartment,
      recipient_name: input.recipient_name,
      courier:        input.courier,
      status:         DeliveryStatus::Pending,
      arrival_time:   Utc::now(),
      pickup_time:    None,
      retrieved_by:   None,
    };

    let id_str = encode_uuid(delivery.delivery_id);
    let apartment = delivery.apartment.clone();
    let recipient = delivery.recipient_name.clone();
    let courier = delivery.courier.clone();
    let status_str = encode_delivery_status(delivery.status).to_owned();
    let arrival_str = encode_dt(delivery.arrival_time);

    self
      .call(move |conn| {
        conn.execute(
          "INSERT INTO deliveries (
             delivery_id, apartment, recipient_name, courier,
             status, arrival_time, pickup_time, retrieved_by
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, NULL, NULL)",
          rusqlite::params![
            id_str, apartment, recipient, courier, status_str, arrival_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(delivery)
  }

  async fn get_delivery(&self, id: Uuid) -> CoreResult<Option<Delivery>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawDelivery> = self
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {DELIVERY_COLS} FROM deliveries WHERE delivery_id = ?1"),
              rusqlite::params![id_str],
              delivery_row,
            )
            .optional()?,
        )
      })
      .await?;

    Ok(raw.map(RawDelivery::into_delivery).transpose()?)
  }

  async fn list_deliveries(
    &self,
    status: Option<DeliveryStatus>,
  ) -> CoreResult<Vec<Delivery>> {
    let status_str = status.map(encode_delivery_status).map(str::to_owned);

    let raws: Vec<RawDelivery> = self
      .call(move |conn| {
        let rows = if let Some(s) = status_str {
          let mut stmt = conn.prepare(&format!(
            "SELECT {DELIVERY_COLS} FROM deliveries
             WHERE status = ?1 ORDER BY arrival_time DESC"
          ))?;
          stmt
            .query_map(rusqlite::params![s], delivery_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        } else {
          let mut stmt = conn.prepare(&format!(
            "SELECT {DELIVERY_COLS} FROM deliveries ORDER BY arrival_time DESC"
          ))?;
          stmt
            .query_map([], delivery_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        };
        Ok(rows)
      })
      .await?;

    Ok(
      raws
        .into_iter()
        .map(RawDelivery::into_delivery)
        .collect::<Result<_, _>>()?,
    )
  }

  async fn mark_picked_up(
    &self,
    id: Uuid,
    retrieved_by: String,
    pickup_time: DateTime<Utc>,
  ) -> CoreResult<Delivery> {
    let id_str = encode_uuid(id);
    let pickup_str = encode_dt(pickup_time);

    let outcome = self
      .call(move |conn| {
        let status: Option<String> = conn
          .query_row(
            "SELECT status FROM deliveries WHERE delivery_id = ?1",
            rusqlite::params![id_str],
            |r| r.get(0),
          )
          .optional()?;

        match status.as_deref() {
          None => Ok(TransitionOutcome::Missing),
          Some(s) if s != "pending" => Ok(TransitionOutcome::Repeated),
          Some(_) => {
            conn.execute(
              "UPDATE deliveries
               SET status = 'picked_up', pickup_time = ?2, retrieved_by = ?3
               WHERE delivery_id = ?1 AND status = 'pending'",
              rusqlite::params![id_str, pickup_str, retrieved_by],
            )?;
            let raw = conn.query_row(
              &format!("SELECT {DELIVERY_COLS} FROM deliveries WHERE delivery_id = ?1"),
              rusqlite::params![id_str],
              delivery_row,
            )?;
            Ok(TransitionOutcome::Done(raw))
          }
        }
      })
      .await?;

    match outcome {
      TransitionOutcome::Done(raw) => Ok(raw.into_delivery()?),
      TransitionOutcome::Repeated => {
        Err(porteria_core::Error::AlreadyPickedUp(id))
      }
      TransitionOutcome::Missing => {
        Err(porteria_core::Error::DeliveryNotFound(id))
      }
    }
  }
}
