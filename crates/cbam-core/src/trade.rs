//! Trade records as returned by the trade-statistics API.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Upstream field names.
pub mod fields {
    /// Mode-of-transport description.
    pub const MOT_DESC: &str = "motDesc";
    /// Customs-procedure description.
    pub const CUSTOMS_DESC: &str = "customsDesc";
    /// Reporting period.
    pub const PERIOD: &str = "period";
    /// Trade flow description.
    pub const FLOW_DESC: &str = "flowDesc";
    /// Reporter description.
    pub const REPORTER_DESC: &str = "reporterDesc";
    /// Primary partner description.
    pub const PARTNER_DESC: &str = "partnerDesc";
    /// Second partner description.
    pub const PARTNER2_DESC: &str = "partner2Desc";
    /// Commodity code.
    pub const CMD_CODE: &str = "cmdCode";
    /// Commodity description.
    pub const CMD_DESC: &str = "cmdDesc";
    /// CIF trade value in US$.
    pub const CIF_VALUE: &str = "cifvalue";
    /// Net weight in kg.
    pub const NET_WGT: &str = "netWgt";
    /// Alternate quantity.
    pub const ALT_QTY: &str = "altQty";
}

/// One untyped object from the upstream `data` array.
///
/// Kept untyped until filtering so that de-duplication compares every field
/// the API returned, not only the ones the estimator uses.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawTradeRecord(Map<String, Value>);

impl RawTradeRecord {
    /// Wraps a JSON object.
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Wraps a JSON value if it is an object.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) => Some(Self(fields)),
            _ => None,
        }
    }

    /// The underlying JSON object.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    /// A field rendered as text; `None` when absent or null.
    ///
    /// Non-string scalars are stringified (`2021` → `"2021"`).
    pub fn text(&self, field: &str) -> Option<String> {
        match self.0.get(field)? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// A field coerced to a number; absent, null or non-numeric values give `0.0`.
    pub fn number(&self, field: &str) -> f64 {
        match self.0.get(field) {
            Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
            Some(Value::String(s)) => s.trim().parse::<f64>().unwrap_or(0.0),
            _ => 0.0,
        }
    }

    /// Canonical form used to detect duplicates.
    ///
    /// The transport and customs descriptions are trimmed and every number is
    /// compared by value, so `100` and `100.0` are the same.
    pub(crate) fn identity(&self) -> String {
        let normalized: Map<String, Value> = self
            .0
            .iter()
            .map(|(key, value)| {
                let value = match value {
                    Value::String(s) if key == fields::MOT_DESC || key == fields::CUSTOMS_DESC => {
                        Value::String(s.trim().to_string())
                    }
                    Value::Number(n) => n.as_f64().map_or_else(|| value.clone(), Value::from),
                    other => other.clone(),
                };
                (key.clone(), value)
            })
            .collect();
        serde_json::to_string(&normalized).unwrap_or_default()
    }
}

/// A trade record projected onto the fields the estimator reports.
///
/// Numeric fields are coerced and rounded to 2 decimal places; missing text
/// fields are empty.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TradeRecord {
    /// Reporting period.
    pub period: String,
    /// Trade flow description (e.g. "Import").
    pub trade_flow_desc: String,
    /// Reporter country description.
    pub reporter_desc: String,
    /// Primary partner description.
    pub partner_desc: String,
    /// Second partner description.
    pub second_partner_desc: String,
    /// Commodity code as reported upstream.
    pub commodity_code: String,
    /// Commodity description as reported upstream.
    pub commodity_desc: String,
    /// CIF trade value in US$.
    pub trade_value_usd: f64,
    /// Net weight in kg.
    pub net_weight_kg: f64,
    /// Alternate quantity, used when net weight is missing.
    pub alternate_qty: f64,
}

impl From<&RawTradeRecord> for TradeRecord {
    fn from(raw: &RawTradeRecord) -> Self {
        let text = |field: &str| raw.text(field).unwrap_or_default();
        Self {
            period: text(fields::PERIOD),
            trade_flow_desc: text(fields::FLOW_DESC),
            reporter_desc: text(fields::REPORTER_DESC),
            partner_desc: text(fields::PARTNER_DESC),
            second_partner_desc: text(fields::PARTNER2_DESC),
            commodity_code: text(fields::CMD_CODE),
            commodity_desc: text(fields::CMD_DESC),
            trade_value_usd: round2(raw.number(fields::CIF_VALUE)),
            net_weight_kg: round2(raw.number(fields::NET_WGT)),
            alternate_qty: round2(raw.number(fields::ALT_QTY)),
        }
    }
}

/// Round to 2 decimal places, ties to even (`0.125` → `0.12`).
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}
