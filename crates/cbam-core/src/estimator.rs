//! End-to-end estimate pipeline: fetch, then resolve.

use crate::context::ReferenceContext;
use crate::engine::{EstimateRow, PartnerAttribution, ResolutionEngine};
use crate::request::{CommoditySelection, EstimateRequest, FlowCode, Reporter};
use crate::source::{TradeQuery, TradeSource};
use crate::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Everything produced for one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimateReport {
    /// Requested year.
    pub year: String,
    /// Trade direction.
    pub flow: FlowCode,
    /// Reporter country.
    pub reporter: Reporter,
    /// Commodity the factors were resolved for.
    pub commodity: CommoditySelection,
    /// Partner field used for the batch.
    pub attribution: PartnerAttribution,
    /// One row per surviving trade record, in upstream order.
    pub rows: Vec<EstimateRow>,
}

impl EstimateReport {
    /// Sum of total emissions over all rows (t CO₂).
    pub fn total_co2(&self) -> f64 {
        self.rows.iter().map(|row| row.estimate.co2_total).sum()
    }
}

/// Runs estimate requests against a trade source and a reference context.
///
/// Cheap to clone; both halves are shared.
#[derive(Clone)]
pub struct Estimator {
    context: Arc<ReferenceContext>,
    source: Arc<dyn TradeSource>,
}

impl Estimator {
    /// Creates a new estimator.
    pub fn new(context: Arc<ReferenceContext>, source: Arc<dyn TradeSource>) -> Self {
        Self { context, source }
    }

    /// The shared reference context.
    pub fn context(&self) -> &ReferenceContext {
        &self.context
    }

    /// Fetch trade records for `request` and estimate their emissions.
    pub async fn estimate(&self, request: &EstimateRequest) -> Result<EstimateReport> {
        tracing::info!(
            year = %request.year,
            reporter = %request.reporter.name,
            flow = %request.flow,
            code = %request.commodity.code,
            "Starting estimate"
        );

        let query = TradeQuery::from_request(request);
        let records = self.source.fetch(&query).await?;
        let resolution = ResolutionEngine::new(&self.context).resolve(
            &records,
            &request.year,
            &request.commodity,
        )?;

        let report = EstimateReport {
            year: request.year.clone(),
            flow: request.flow,
            reporter: request.reporter.clone(),
            commodity: request.commodity.clone(),
            attribution: resolution.attribution,
            rows: resolution.rows,
        };

        tracing::info!(
            rows = report.rows.len(),
            attribution = ?report.attribution,
            co2_total = report.total_co2(),
            "Estimate completed"
        );
        Ok(report)
    }
}
