//! JSON REST API for the Porteria front-desk logbook.
//!
//! Exposes an axum [`Router`] over a [`FrontDesk`] backed by any
//! [`DeskStore`]. Every route sits behind HTTP Basic auth; TLS and
//! reverse-proxy concerns are the deployment's responsibility.

pub mod auth;
pub mod deliveries;
pub mod error;
pub mod frequent;
pub mod parking;
pub mod visitors;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::{get, post},
};
use porteria_core::store::DeskStore;
use porteria_desk::FrontDesk;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use auth::AuthConfig;
pub use error::ApiError;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` with
/// `PORTERIA_*` environment overrides.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:               String,
  pub port:               u16,
  pub store_path:         PathBuf,
  pub auth_username:      String,
  pub auth_password_hash: String,
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S> {
  pub desk: FrontDesk<S>,
  pub auth: Arc<AuthConfig>,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build a fully-materialised router for `state`.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: DeskStore + Clone + 'static,
{
  Router::new()
    // Visitors
    .route(
      "/visitors",
      get(visitors::list::<S>).post(visitors::create::<S>),
    )
    .route("/visitors/{id}", get(visitors::get_one::<S>))
    .route("/visitors/{id}/exit", post(visitors::exit::<S>))
    // Deliveries
    .route(
      "/deliveries",
      get(deliveries::list::<S>).post(deliveries::create::<S>),
    )
    .route("/deliveries/{id}/pickup", post(deliveries::pickup::<S>))
    // Parking
    .route("/parking", get(parking::list::<S>))
    .route("/parking/available", get(parking::available::<S>))
    // Frequent visitors
    .route("/frequent-visitors", get(frequent::search::<S>))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

#[cfg(test)]
mod tests;
