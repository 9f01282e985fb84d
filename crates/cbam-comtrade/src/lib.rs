#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! # cbam-comtrade
//!
//! Trade Data Fetcher for the CBAM estimator.
//!
//! Issues a single authenticated GET against the UN Comtrade annual HS
//! endpoint and returns the raw `data` records:
//! - non-200 answers surface as [`cbam_core::Error::Upstream`] with the body verbatim
//! - a 200 answer with an empty `data` array surfaces as [`cbam_core::Error::NoData`]
//! - no retries, no timeout beyond the HTTP client default

pub mod client;
pub mod config;

pub use client::{ComtradeClient, SUBSCRIPTION_KEY_HEADER};
pub use config::{ComtradeConfig, DEFAULT_BASE_URL};
