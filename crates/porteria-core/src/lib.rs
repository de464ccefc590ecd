//! Core types and trait definitions for the Porteria front-desk logbook.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

pub mod delivery;
pub mod error;
pub mod frequent;
pub mod parking;
pub mod rut;
pub mod store;
pub mod visitor;

pub use error::{Error, Result};
