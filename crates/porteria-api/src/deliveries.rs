//! Handlers for `/deliveries` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/deliveries` | Optional `?status=pending\|picked_up` |
//! | `POST` | `/deliveries` | Body: an arrival form, 201 on success |
//! | `POST` | `/deliveries/{id}/pickup` | Body: `{"retrieved_by":"…"}` |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use porteria_core::{
  delivery::{Delivery, DeliveryStatus},
  store::DeskStore,
};
use porteria_desk::ArrivalRequest;
use serde::Deserialize;
use uuid::Uuid;

use crate::{AppState, auth::Authenticated, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub status: Option<DeliveryStatus>,
}

/// `GET /deliveries[?status=<status>]`
pub async fn list<S>(
  _: Authenticated,
  State(state): State<AppState<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Delivery>>, ApiError>
where
  S: DeskStore + Clone + 'static,
{
  let deliveries = state.desk.deliveries(params.status).await?;
  Ok(Json(deliveries))
}

/// `POST /deliveries` — register a parcel arrival.
pub async fn create<S>(
  _: Authenticated,
  State(state): State<AppState<S>>,
  Json(body): Json<ArrivalRequest>,
) -> Result<impl IntoResponse, ApiError>
where
  S: DeskStore + Clone + 'static,
{
  let delivery = state.desk.register_arrival(body).await?;
  Ok((StatusCode::CREATED, Json(delivery)))
}

#[derive(Debug, Deserialize)]
pub struct PickupBody {
  pub retrieved_by: String,
}

/// `POST /deliveries/{id}/pickup`
pub async fn pickup<S>(
  _: Authenticated,
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<PickupBody>,
) -> Result<Json<Delivery>, ApiError>
where
  S: DeskStore + Clone + 'static,
{
  let delivery = state.desk.register_pickup(id, &body.retrieved_by).await?;
  Ok(Json(delivery))
}
