//! Emissions resolution engine.
//!
//! Turns the raw records of one query into per-record emissions estimates:
//!
//! 1. keep `TOTAL MOT` / `TOTAL CPC` aggregate rows and drop exact duplicates;
//! 2. derive the shipment weight in tonnes, falling back to the alternate
//!    quantity when net weight is zero;
//! 3. pick the partner field once for the whole batch;
//! 4. canonicalize the partner name through the alias table;
//! 5. resolve factors: country, then EU bloc, then weighted average, then zero;
//! 6. multiply factors by weight.
//!
//! Every surviving record yields exactly one estimate, in input order.

use crate::context::ReferenceContext;
use crate::index::Factors;
use crate::reference::EU_BLOC;
use crate::request::CommoditySelection;
use crate::trade::{RawTradeRecord, TradeRecord, fields, round2};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

const TOTAL_MOT: &str = "TOTAL MOT";
const TOTAL_CPC: &str = "TOTAL CPC";
const WORLD: &str = "World";

// ============================================================================
// Filtering
// ============================================================================

/// Returns `true` for aggregate rows (all transport modes, all customs procedures).
///
/// A missing field never matches.
pub fn is_total_aggregate(record: &RawTradeRecord) -> bool {
    let matches = |field: &str, expected: &str| {
        record
            .text(field)
            .is_some_and(|value| value.trim() == expected)
    };
    matches(fields::MOT_DESC, TOTAL_MOT) && matches(fields::CUSTOMS_DESC, TOTAL_CPC)
}

/// Keep aggregate rows, dropping later exact duplicates.
pub fn filter_records(records: &[RawTradeRecord]) -> Vec<RawTradeRecord> {
    let mut seen = HashSet::new();
    records
        .iter()
        .filter(|record| is_total_aggregate(record))
        .filter(|record| seen.insert(record.identity()))
        .cloned()
        .collect()
}

// ============================================================================
// Weight normalization
// ============================================================================

/// Net weight in tonnes, rounded to 2 decimal places.
pub fn net_weight_ton(net_weight_kg: f64) -> f64 {
    round2(net_weight_kg / 1000.0)
}

/// Weight used for emissions.
///
/// When net weight is zero but an alternate quantity exists, the alternate
/// quantity is taken to be in kg-compatible units.
pub fn final_weight_ton(net_weight_kg: f64, alternate_qty: f64) -> f64 {
    if net_weight_kg == 0.0 && alternate_qty != 0.0 {
        round2(alternate_qty / 1000.0)
    } else {
        net_weight_ton(net_weight_kg)
    }
}

// ============================================================================
// Partner attribution
// ============================================================================

/// Which partner field a batch attributes emissions to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartnerAttribution {
    /// `partnerDesc`
    Primary,
    /// `partner2Desc`
    Secondary,
}

impl PartnerAttribution {
    /// Decide for a whole batch.
    ///
    /// Primary only when the batch is non-empty and every second partner is
    /// literally `"World"`.
    pub fn for_batch(records: &[TradeRecord]) -> Self {
        let all_world = !records.is_empty()
            && records
                .iter()
                .all(|record| record.second_partner_desc == WORLD);
        if all_world {
            Self::Primary
        } else {
            Self::Secondary
        }
    }

    /// The attributed partner name of `record`, trimmed.
    pub fn partner<'a>(&self, record: &'a TradeRecord) -> &'a str {
        match self {
            Self::Primary => record.partner_desc.trim(),
            Self::Secondary => record.second_partner_desc.trim(),
        }
    }
}

// ============================================================================
// Factor resolution
// ============================================================================

/// The rule that produced a record's factors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactorSource {
    /// Country-specific row.
    Country,
    /// EU-bloc row, for an EU member without its own row.
    EuBloc,
    /// Global weighted-average row.
    WeightedAverage,
    /// Nothing matched; factors are zero.
    Unresolved,
}

/// Resolve factors for an already-canonicalized country name.
pub fn resolve_factors(
    country: &str,
    commodity: &CommoditySelection,
    context: &ReferenceContext,
) -> (Factors, FactorSource) {
    let index = context.index();
    let (code, description) = (commodity.code.as_str(), commodity.description.as_str());

    if let Some(factors) = index.by_country(country, code, description) {
        return (factors, FactorSource::Country);
    }
    if context.tables().is_eu_member(country) {
        if let Some(factors) = index.by_country(EU_BLOC, code, description) {
            return (factors, FactorSource::EuBloc);
        }
    }
    match index.weighted(code, description) {
        Some(factors) => (factors, FactorSource::WeightedAverage),
        None => (Factors::ZERO, FactorSource::Unresolved),
    }
}

// ============================================================================
// Estimates
// ============================================================================

/// Emissions derived from one trade record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmissionsEstimate {
    /// Direct factor applied.
    pub direct_factor: f64,
    /// Indirect factor applied.
    pub indirect_factor: f64,
    /// Total factor applied.
    pub total_factor: f64,
    /// Direct emissions (t CO₂).
    pub co2_direct: f64,
    /// Indirect emissions (t CO₂).
    pub co2_indirect: f64,
    /// Total emissions (t CO₂).
    pub co2_total: f64,
    /// Shipment weight the factors were applied to (t).
    pub final_weight_ton: f64,
}

impl EmissionsEstimate {
    /// Apply `factors` to a weight in tonnes.
    pub fn compute(factors: Factors, final_weight_ton: f64) -> Self {
        Self {
            direct_factor: factors.direct,
            indirect_factor: factors.indirect,
            total_factor: factors.total,
            co2_direct: factors.direct * final_weight_ton,
            co2_indirect: factors.indirect * final_weight_ton,
            co2_total: factors.total * final_weight_ton,
            final_weight_ton,
        }
    }
}

/// One output row: the trade record joined with its estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimateRow {
    /// Requested year.
    pub year: String,
    /// The filtered, projected trade record.
    #[serde(flatten)]
    pub trade: TradeRecord,
    /// Net weight in tonnes.
    pub net_weight_ton: f64,
    /// Partner the factors were resolved for, after aliasing.
    pub attributed_country: String,
    /// Rule that produced the factors.
    pub factor_source: FactorSource,
    /// Derived emissions.
    #[serde(flatten)]
    pub estimate: EmissionsEstimate,
}

/// Result of resolving one batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    /// Partner field used for the batch.
    pub attribution: PartnerAttribution,
    /// One row per surviving record, in input order.
    pub rows: Vec<EstimateRow>,
}

/// Resolves batches of raw trade records against a reference context.
#[derive(Debug, Clone, Copy)]
pub struct ResolutionEngine<'a> {
    context: &'a ReferenceContext,
}

impl<'a> ResolutionEngine<'a> {
    /// Engine over an immutable reference context.
    pub fn new(context: &'a ReferenceContext) -> Self {
        Self { context }
    }

    /// Filter, normalize and join one batch.
    ///
    /// Returns [`Error::NoDataAfterFilter`] when no record is a
    /// `TOTAL MOT` / `TOTAL CPC` aggregate.
    pub fn resolve(
        &self,
        records: &[RawTradeRecord],
        year: &str,
        commodity: &CommoditySelection,
    ) -> Result<Resolution> {
        let filtered = filter_records(records);
        tracing::debug!(
            received = records.len(),
            kept = filtered.len(),
            "Filtered trade records"
        );
        if filtered.is_empty() {
            return Err(Error::NoDataAfterFilter);
        }

        let trades: Vec<TradeRecord> = filtered.iter().map(TradeRecord::from).collect();
        let attribution = PartnerAttribution::for_batch(&trades);

        let rows = trades
            .into_iter()
            .map(|trade| self.estimate_row(trade, attribution, year, commodity))
            .collect();

        Ok(Resolution { attribution, rows })
    }

    fn estimate_row(
        &self,
        trade: TradeRecord,
        attribution: PartnerAttribution,
        year: &str,
        commodity: &CommoditySelection,
    ) -> EstimateRow {
        let country = self
            .context
            .tables()
            .canonical_country(attribution.partner(&trade))
            .to_string();
        let (factors, factor_source) = resolve_factors(&country, commodity, self.context);
        let weight = final_weight_ton(trade.net_weight_kg, trade.alternate_qty);

        tracing::trace!(
            country = %country,
            source = ?factor_source,
            weight,
            "Resolved factors"
        );

        EstimateRow {
            year: year.to_string(),
            net_weight_ton: net_weight_ton(trade.net_weight_kg),
            estimate: EmissionsEstimate::compute(factors, weight),
            attributed_country: country,
            factor_source,
            trade,
        }
    }
}
