//! Trade data sources.
//!
//! [`TradeSource`] is the seam between the estimator and the trade-statistics
//! API. The production implementation lives in `cbam-comtrade`;
//! [`StaticTradeSource`] serves canned records for tests and offline runs.

use crate::request::{EstimateRequest, FlowCode};
use crate::trade::RawTradeRecord;
use crate::{Error, Result};
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Mutex;

/// One trade-statistics query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TradeQuery {
    /// Numeric reporter identifier.
    pub reporter_code: String,
    /// Four-digit period.
    pub period: String,
    /// Trade direction.
    pub flow: FlowCode,
    /// HS commodity code.
    pub commodity_code: String,
}

impl TradeQuery {
    /// Second partner is always "World".
    pub const PARTNER2_CODE: &'static str = "0";

    /// Descriptions are always requested.
    pub const INCLUDE_DESC: &'static str = "true";

    /// Query for a validated request.
    pub fn from_request(request: &EstimateRequest) -> Self {
        Self {
            reporter_code: request.reporter.id.clone(),
            period: request.year.clone(),
            flow: request.flow,
            commodity_code: request.commodity.code.clone(),
        }
    }

    /// Query-string parameters, in the order the API documents them.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("reporterCode", self.reporter_code.clone()),
            ("period", self.period.clone()),
            ("flowCode", self.flow.code().to_string()),
            ("includeDesc", Self::INCLUDE_DESC.to_string()),
            ("cmdCode", self.commodity_code.clone()),
            ("partner2Code", Self::PARTNER2_CODE.to_string()),
        ]
    }
}

/// Source of raw trade records.
///
/// Implementations issue one request per call and never retry. A successful
/// call with nothing in it must return [`Error::NoData`]; a non-200 answer
/// must return [`Error::Upstream`].
#[async_trait]
pub trait TradeSource: Send + Sync {
    /// Fetch the raw records matching `query`.
    async fn fetch(&self, query: &TradeQuery) -> Result<Vec<RawTradeRecord>>;
}

/// A source that answers every query with the same records.
#[derive(Debug, Default)]
pub struct StaticTradeSource {
    records: Vec<RawTradeRecord>,
    queries: Mutex<Vec<TradeQuery>>,
}

impl StaticTradeSource {
    /// Serve `records` for every query.
    pub fn new(records: Vec<RawTradeRecord>) -> Self {
        Self {
            records,
            queries: Mutex::new(Vec::new()),
        }
    }

    /// Queries received so far.
    pub fn queries(&self) -> Vec<TradeQuery> {
        self.queries
            .lock()
            .map(|queries| queries.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl TradeSource for StaticTradeSource {
    async fn fetch(&self, query: &TradeQuery) -> Result<Vec<RawTradeRecord>> {
        if let Ok(mut queries) = self.queries.lock() {
            queries.push(query.clone());
        }
        if self.records.is_empty() {
            return Err(Error::NoData);
        }
        Ok(self.records.clone())
    }
}
