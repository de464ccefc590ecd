//! Handler for `/frequent-visitors` autocomplete.

use axum::{
  Json,
  extract::{Query, State},
};
use porteria_core::{frequent::FrequentVisitor, store::DeskStore};
use serde::Deserialize;

use crate::{AppState, auth::Authenticated, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct SearchParams {
  /// Partial national id or name, matched case-insensitively.
  pub q: String,
}

/// `GET /frequent-visitors?q=<needle>`
pub async fn search<S>(
  _: Authenticated,
  State(state): State<AppState<S>>,
  Query(params): Query<SearchParams>,
) -> Result<Json<Vec<FrequentVisitor>>, ApiError>
where
  S: DeskStore + Clone + 'static,
{
  let matches = state.desk.suggest_frequent(&params.q).await?;
  Ok(Json(matches))
}
