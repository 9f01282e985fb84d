//! # cbam-api
//!
//! HTTP front end for the CBAM estimator.
//!
//! - `GET /`: input form built from the country and commodity catalogs
//! - `POST /compute`: HTML emissions dashboard
//! - `POST /api/estimate`: the same estimate as JSON
//! - `GET /health`: liveness and reference-data counts

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod error;
pub mod html;
pub mod routes;
pub mod server;

pub use error::{ApiError, Error, Result};
pub use server::{AppState, Server, ServerConfig, router};
