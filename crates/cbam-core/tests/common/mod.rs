//! Common fixtures for estimator integration tests.

use cbam_core::{
    EmissionsFactorRow, Estimator, RawTradeRecord, ReferenceContext, ReferenceData,
    ResolutionTables, StaticTradeSource,
};
use serde_json::{Value, json};
use std::sync::Arc;

/// Test harness wiring a canned trade source to a reference context.
pub struct TestHarness {
    /// Source serving the canned records
    pub source: Arc<StaticTradeSource>,
    /// Estimator under test
    pub estimator: Estimator,
}

impl TestHarness {
    /// Harness over `factors` answering every query with `records`.
    pub fn new(factors: Vec<EmissionsFactorRow>, records: Vec<RawTradeRecord>) -> Self {
        let context = Arc::new(ReferenceContext::new(
            ReferenceData {
                factors,
                ..Default::default()
            },
            ResolutionTables::default(),
        ));
        let source = Arc::new(StaticTradeSource::new(records));
        let estimator = Estimator::new(context, source.clone());
        Self { source, estimator }
    }
}

/// A factor row for HS 7208 flat-rolled iron.
pub fn steel_factor(country: &str, direct: f64, indirect: f64, total: f64) -> EmissionsFactorRow {
    EmissionsFactorRow {
        country_or_bloc: country.to_string(),
        commodity_code: "7208".to_string(),
        commodity_description: "Flat-rolled iron".to_string(),
        direct_factor: direct,
        indirect_factor: indirect,
        total_factor: total,
    }
}

/// An upstream record as the trade API returns it.
pub fn comtrade_record(partner: &str, partner2: &str, net_kg: Value, alt_qty: Value) -> RawTradeRecord {
    let value = json!({
        "typeCode": "C",
        "freqCode": "A",
        "period": "2021",
        "reporterCode": 276,
        "reporterDesc": "Germany",
        "flowCode": "M",
        "flowDesc": "Import",
        "partnerDesc": partner,
        "partner2Desc": partner2,
        "cmdCode": "7208",
        "cmdDesc": "Flat-rolled products of iron or non-alloy steel",
        "customsDesc": "TOTAL CPC",
        "motDesc": "TOTAL MOT",
        "cifvalue": 8_250_000.456,
        "netWgt": net_kg,
        "altQty": alt_qty,
    });
    match RawTradeRecord::from_value(value) {
        Some(record) => record,
        None => unreachable!("fixture is a JSON object"),
    }
}

/// Same record with a different transport mode.
pub fn by_mode(record: &RawTradeRecord, mode: &str) -> RawTradeRecord {
    let mut fields = record.fields().clone();
    fields.insert("motDesc".to_string(), Value::String(mode.to_string()));
    RawTradeRecord::new(fields)
}
