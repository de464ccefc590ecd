//! Handlers for `/parking` endpoints.

use axum::{
  Json,
  extract::{Query, State},
};
use porteria_core::{
  parking::{ParkingSpot, SpotKind},
  store::DeskStore,
};
use serde::Deserialize;

use crate::{AppState, auth::Authenticated, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub kind: Option<SpotKind>,
}

/// `GET /parking[?kind=visitor|resident]` — the full board, any status.
pub async fn list<S>(
  _: Authenticated,
  State(state): State<AppState<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<ParkingSpot>>, ApiError>
where
  S: DeskStore + Clone + 'static,
{
  let spots = state.desk.spots(params.kind).await?;
  Ok(Json(spots))
}

#[derive(Debug, Deserialize)]
pub struct AvailableParams {
  pub kind: SpotKind,
}

/// `GET /parking/available?kind=<kind>` — the live pick list for entry forms.
pub async fn available<S>(
  _: Authenticated,
  State(state): State<AppState<S>>,
  Query(params): Query<AvailableParams>,
) -> Result<Json<Vec<ParkingSpot>>, ApiError>
where
  S: DeskStore + Clone + 'static,
{
  let spots = state.desk.available_spots(params.kind).await?;
  Ok(Json(spots))
}
