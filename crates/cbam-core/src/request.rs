//! Inbound estimate requests.
//!
//! The input form submits combined `Name|ID` and `Code|Description` values.
//! They are split and validated here, before anything reaches the trade API
//! or the resolution engine.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const DEFAULT_YEAR: &str = "2021";

/// Trade direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FlowCode {
    /// Imports (`M`).
    #[default]
    #[serde(rename = "M")]
    Import,
    /// Exports (`X`).
    #[serde(rename = "X")]
    Export,
}

impl FlowCode {
    /// The trade-API flow code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Import => "M",
            Self::Export => "X",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Import => "Import",
            Self::Export => "Export",
        }
    }
}

impl fmt::Display for FlowCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for FlowCode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "M" => Ok(Self::Import),
            "X" => Ok(Self::Export),
            other => Err(Error::invalid_field(
                "flowCode",
                format!("expected 'M' or 'X', got '{other}'"),
            )),
        }
    }
}

/// Reporter country chosen by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reporter {
    /// Country name.
    pub name: String,
    /// Numeric reporter identifier.
    pub id: String,
}

/// Commodity chosen by the caller; both halves are join keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommoditySelection {
    /// HS commodity code.
    pub code: String,
    /// Canonical commodity description.
    pub description: String,
}

impl CommoditySelection {
    /// Creates a selection from its parts.
    pub fn new(code: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            description: description.into(),
        }
    }
}

/// Request fields exactly as submitted by the form or JSON client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEstimateRequest {
    /// Four-digit year.
    #[serde(default = "default_year")]
    pub year: String,
    /// `CountryName|NumericID`.
    #[serde(default)]
    pub reporter: String,
    /// `M` or `X`.
    #[serde(rename = "flowCode", default = "default_flow_code")]
    pub flow_code: String,
    /// `Code|Description`.
    #[serde(rename = "HSCodeDesc", default)]
    pub hs_code_desc: String,
}

impl Default for RawEstimateRequest {
    fn default() -> Self {
        Self {
            year: default_year(),
            reporter: String::new(),
            flow_code: default_flow_code(),
            hs_code_desc: String::new(),
        }
    }
}

fn default_year() -> String {
    DEFAULT_YEAR.to_string()
}

fn default_flow_code() -> String {
    FlowCode::Import.code().to_string()
}

/// A validated estimate request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstimateRequest {
    /// Four-digit reporting year.
    pub year: String,
    /// Reporter country.
    pub reporter: Reporter,
    /// Trade direction.
    pub flow: FlowCode,
    /// Commodity to estimate.
    pub commodity: CommoditySelection,
}

impl EstimateRequest {
    /// Validate raw request fields.
    ///
    /// Both combined fields must contain `|`; they are split on the first one
    /// and each half is trimmed.
    pub fn parse(raw: &RawEstimateRequest) -> Result<Self> {
        let (name, id) = split_combined("reporter", &raw.reporter)?;
        let (code, description) = split_combined("HSCodeDesc", &raw.hs_code_desc)?;
        let flow = raw.flow_code.parse::<FlowCode>()?;
        let year = parse_year(&raw.year)?;

        Ok(Self {
            year,
            reporter: Reporter { name, id },
            flow,
            commodity: CommoditySelection { code, description },
        })
    }
}

fn split_combined(field: &str, value: &str) -> Result<(String, String)> {
    value
        .split_once('|')
        .map(|(left, right)| (left.trim().to_string(), right.trim().to_string()))
        .ok_or_else(|| Error::invalid_field(field, format!("expected 'A|B', got '{value}'")))
}

fn parse_year(value: &str) -> Result<String> {
    let year = value.trim();
    if year.len() == 4 && year.bytes().all(|b| b.is_ascii_digit()) {
        Ok(year.to_string())
    } else {
        Err(Error::invalid_field(
            "year",
            format!("expected a 4-digit year, got '{value}'"),
        ))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn raw(year: &str, reporter: &str, flow: &str, hs: &str) -> RawEstimateRequest {
        RawEstimateRequest {
            year: year.to_string(),
            reporter: reporter.to_string(),
            flow_code: flow.to_string(),
            hs_code_desc: hs.to_string(),
        }
    }

    #[test]
    fn test_parse_valid_request() {
        let request =
            EstimateRequest::parse(&raw("2021", "Germany|276", "M", "7208|Flat-rolled iron"))
                .unwrap();
        assert_eq!(request.year, "2021");
        assert_eq!(request.reporter.name, "Germany");
        assert_eq!(request.reporter.id, "276");
        assert_eq!(request.flow, FlowCode::Import);
        assert_eq!(
            request.commodity,
            CommoditySelection::new("7208", "Flat-rolled iron")
        );
    }

    #[test]
    fn test_combined_fields_are_trimmed_and_split_once() {
        let request = EstimateRequest::parse(&raw(
            "2022",
            " United States | 842 ",
            "X",
            " 2523 | Cement | clinker ",
        ))
        .unwrap();
        assert_eq!(request.reporter.name, "United States");
        assert_eq!(request.reporter.id, "842");
        assert_eq!(request.flow, FlowCode::Export);
        assert_eq!(request.commodity.code, "2523");
        assert_eq!(request.commodity.description, "Cement | clinker");
    }

    #[test]
    fn test_missing_separator_is_rejected() {
        let err = EstimateRequest::parse(&raw("2021", "Germany 276", "M", "7208|Iron")).unwrap_err();
        let Error::InvalidInput { field, .. } = err else {
            unreachable!("Expected InvalidInput error variant");
        };
        assert_eq!(field.as_deref(), Some("reporter"));

        let err = EstimateRequest::parse(&raw("2021", "Germany|276", "M", "7208")).unwrap_err();
        let Error::InvalidInput { field, .. } = err else {
            unreachable!("Expected InvalidInput error variant");
        };
        assert_eq!(field.as_deref(), Some("HSCodeDesc"));
    }

    #[test]
    fn test_bad_flow_code_is_rejected() {
        let err = EstimateRequest::parse(&raw("2021", "Germany|276", "R", "7208|Iron")).unwrap_err();
        assert!(matches!(err, Error::InvalidInput { .. }));
    }

    #[test]
    fn test_bad_year_is_rejected() {
        for year in ["21", "20x1", "", "20211"] {
            let err =
                EstimateRequest::parse(&raw(year, "Germany|276", "M", "7208|Iron")).unwrap_err();
            assert!(matches!(err, Error::InvalidInput { .. }), "year {year:?}");
        }
    }

    #[test]
    fn test_raw_defaults_from_json() {
        let raw: RawEstimateRequest =
            serde_json::from_str(r#"{"reporter": "Germany|276", "HSCodeDesc": "7208|Iron"}"#)
                .unwrap();
        assert_eq!(raw.year, "2021");
        assert_eq!(raw.flow_code, "M");

        let raw: RawEstimateRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(raw, RawEstimateRequest::default());
        assert!(EstimateRequest::parse(&raw).is_err());
    }

    #[test]
    fn test_flow_code_serialization() {
        assert_eq!(serde_json::to_string(&FlowCode::Export).unwrap(), "\"X\"");
        assert_eq!(FlowCode::Import.to_string(), "M");
        assert_eq!(FlowCode::Export.label(), "Export");
    }
}
