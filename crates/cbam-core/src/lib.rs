#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! CBAM Estimator Core
//!
//! Reference data, factor lookup and the emissions resolution engine for
//! estimating the embedded CO₂ of traded goods.
//!
//! # Modules
//!
//! - [`reference`]: loading the factor, commodity and country sheets
//! - [`index`]: country and weighted-average factor lookups
//! - [`tables`]: partner-name aliases and EU membership
//! - [`trade`]: raw and projected trade records
//! - [`engine`]: filtering, weight normalization, attribution, factor resolution
//! - [`request`]: inbound request validation
//! - [`source`]: the [`TradeSource`] seam
//! - [`estimator`]: the fetch-then-resolve pipeline

pub mod context;
pub mod engine;
pub mod error;
pub mod estimator;
pub mod index;
pub mod reference;
pub mod request;
pub mod source;
pub mod tables;
pub mod trade;

mod proptests;

// Re-exports for convenience
pub use context::ReferenceContext;
pub use engine::{
    EmissionsEstimate, EstimateRow, FactorSource, PartnerAttribution, Resolution,
    ResolutionEngine,
};
pub use error::{Error, Result};
pub use estimator::{EstimateReport, Estimator};
pub use index::{FactorIndex, Factors};
pub use reference::{
    CommodityCatalogEntry, CountryCatalogEntry, EmissionsFactorRow, ReferenceConfig,
    ReferenceData,
};
pub use request::{CommoditySelection, EstimateRequest, FlowCode, RawEstimateRequest, Reporter};
pub use source::{StaticTradeSource, TradeQuery, TradeSource};
pub use tables::{ResolutionConfig, ResolutionTables};
pub use trade::{RawTradeRecord, TradeRecord};
