//! Handlers for `/visitors` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/visitors` | Optional `?status=in_building\|exited` |
//! | `POST` | `/visitors` | Body: an entry form, 201 on success |
//! | `GET`  | `/visitors/{id}` | 404 if not found |
//! | `POST` | `/visitors/{id}/exit` | 409 if already exited |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use porteria_core::{
  store::DeskStore,
  visitor::{Visitor, VisitorStatus},
};
use porteria_desk::{EntryRequest, ExitReceipt};
use serde::Deserialize;
use uuid::Uuid;

use crate::{AppState, auth::Authenticated, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub status: Option<VisitorStatus>,
}

/// `GET /visitors[?status=<status>]`
pub async fn list<S>(
  _: Authenticated,
  State(state): State<AppState<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Visitor>>, ApiError>
where
  S: DeskStore + Clone + 'static,
{
  let visitors = state.desk.visitors(params.status).await?;
  Ok(Json(visitors))
}

/// `POST /visitors` — register an entry.
pub async fn create<S>(
  _: Authenticated,
  State(state): State<AppState<S>>,
  Json(body): Json<EntryRequest>,
) -> Result<impl IntoResponse, ApiError>
where
  S: DeskStore + Clone + 'static,
{
  let visitor = state.desk.register_entry(body).await?;
  Ok((StatusCode::CREATED, Json(visitor)))
}

/// `GET /visitors/{id}`
pub async fn get_one<S>(
  _: Authenticated,
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Visitor>, ApiError>
where
  S: DeskStore + Clone + 'static,
{
  let visitor = state
    .desk
    .visitor(id)
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("visitor {id} not found")))?;
  Ok(Json(visitor))
}

/// `POST /visitors/{id}/exit` — register the exit and release any held spot.
pub async fn exit<S>(
  _: Authenticated,
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<ExitReceipt>, ApiError>
where
  S: DeskStore + Clone + 'static,
{
  let receipt = state.desk.register_exit(id).await?;
  Ok(Json(receipt))
}
