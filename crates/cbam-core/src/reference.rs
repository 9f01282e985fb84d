//! Reference data loading.
//!
//! The reference source is a directory holding one CSV file per sheet:
//!
//! | Sheet        | Required columns                                   |
//! |--------------|----------------------------------------------------|
//! | `Sheet1.csv` | `Country, Code, Description, Direct, Indirect, Total` |
//! | `Sheet2.csv` | `HS Code, Description`                             |
//! | `Sheet3.csv` | `Country, ID`                                      |
//!
//! Every join-key cell is trimmed on load. Factor columns are parsed as `f64`.
//! Any missing sheet, missing column or unparsable factor fails the whole load.

use crate::index::Factors;
use crate::{Error, Result};
use csv::{ReaderBuilder, StringRecord};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Country token marking a global weighted-average factor row.
pub const WEIGHTED_AVERAGE: &str = "Weighted average";

/// Country token marking an EU-bloc factor row.
pub const EU_BLOC: &str = "EU";

const FACTOR_COLUMNS: [&str; 6] = ["Country", "Code", "Description", "Direct", "Indirect", "Total"];
const COMMODITY_COLUMNS: [&str; 2] = ["HS Code", "Description"];
const COUNTRY_COLUMNS: [&str; 2] = ["Country", "ID"];

/// One row of the emissions-factor sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmissionsFactorRow {
    /// A country name, [`EU_BLOC`] or [`WEIGHTED_AVERAGE`].
    pub country_or_bloc: String,
    /// HS commodity code.
    pub commodity_code: String,
    /// Commodity description, part of the join key.
    pub commodity_description: String,
    /// Direct emissions factor (t CO₂ per t).
    pub direct_factor: f64,
    /// Indirect emissions factor (t CO₂ per t).
    pub indirect_factor: f64,
    /// Total emissions factor (t CO₂ per t).
    pub total_factor: f64,
}

impl EmissionsFactorRow {
    /// Returns `true` for rows carrying the global weighted-average factors.
    pub fn is_weighted_average(&self) -> bool {
        self.country_or_bloc == WEIGHTED_AVERAGE
    }

    /// The factor triple of this row.
    pub fn factors(&self) -> Factors {
        Factors::new(self.direct_factor, self.indirect_factor, self.total_factor)
    }
}

/// One selectable commodity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommodityCatalogEntry {
    /// HS commodity code.
    pub hs_code: String,
    /// Canonical description, used as a join key.
    pub description: String,
}

impl CommodityCatalogEntry {
    /// Combined `Code|Description` value submitted by the input form.
    pub fn combined(&self) -> String {
        format!("{}|{}", self.hs_code, self.description)
    }
}

/// One selectable reporter country.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryCatalogEntry {
    /// Human-readable country name.
    pub country_name: String,
    /// Numeric reporter identifier understood by the trade API.
    pub numeric_id: String,
}

impl CountryCatalogEntry {
    /// Combined `Name|ID` value submitted by the input form.
    pub fn combined(&self) -> String {
        format!("{}|{}", self.country_name, self.numeric_id)
    }
}

/// Location and sheet names of the reference data.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceConfig {
    /// Directory holding the sheet files.
    pub path: PathBuf,
    /// File name of the emissions-factor sheet.
    pub factors_sheet: String,
    /// File name of the HS commodity catalog sheet.
    pub commodities_sheet: String,
    /// File name of the reporter country catalog sheet.
    pub countries_sheet: String,
}

impl Default for ReferenceConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/emissions"),
            factors_sheet: "Sheet1.csv".to_string(),
            commodities_sheet: "Sheet2.csv".to_string(),
            countries_sheet: "Sheet3.csv".to_string(),
        }
    }
}

impl ReferenceConfig {
    /// Reference config rooted at `path` with the default sheet names.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }
}

/// The three reference tables, loaded once at startup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReferenceData {
    /// Emissions factors, in sheet order.
    pub factors: Vec<EmissionsFactorRow>,
    /// Commodity catalog, in sheet order.
    pub commodities: Vec<CommodityCatalogEntry>,
    /// Country catalog, in sheet order.
    pub countries: Vec<CountryCatalogEntry>,
}

impl ReferenceData {
    /// Load all three sheets from the configured directory.
    pub fn load(config: &ReferenceConfig) -> Result<Self> {
        let data = Self::from_readers(
            open_sheet(&config.path, &config.factors_sheet)?,
            open_sheet(&config.path, &config.commodities_sheet)?,
            open_sheet(&config.path, &config.countries_sheet)?,
        )?;

        tracing::info!(
            path = %config.path.display(),
            factors = data.factors.len(),
            commodities = data.commodities.len(),
            countries = data.countries.len(),
            "Reference data loaded"
        );
        Ok(data)
    }

    /// Load the three sheets from arbitrary CSV readers.
    pub fn from_readers<F, C, K>(factors: F, commodities: C, countries: K) -> Result<Self>
    where
        F: Read,
        C: Read,
        K: Read,
    {
        Ok(Self {
            factors: read_factors(factors)?,
            commodities: read_commodities(commodities)?,
            countries: read_countries(countries)?,
        })
    }
}

fn open_sheet(dir: &Path, file_name: &str) -> Result<File> {
    let path = dir.join(file_name);
    File::open(&path).map_err(|e| {
        Error::data_load_with_source(
            format!("sheet '{file_name}' could not be opened at {}", path.display()),
            e,
        )
    })
}

/// A sheet whose header row has been checked against the required columns.
struct Sheet {
    name: &'static str,
    /// Position of each required column, in the order they were requested.
    positions: Vec<usize>,
    records: Vec<StringRecord>,
}

impl Sheet {
    fn read<R: Read>(name: &'static str, reader: R, required: &[&str]) -> Result<Self> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers: Vec<String> = rdr
            .headers()
            .map_err(|e| Error::data_load_with_source(format!("{name}: unreadable header row"), e))?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let positions = required
            .iter()
            .map(|column| {
                headers.iter().position(|h| h == column).ok_or_else(|| {
                    Error::data_load(format!("{name}: missing required column '{column}'"))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let records = rdr
            .records()
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| Error::data_load_with_source(format!("{name}: malformed row"), e))?;

        Ok(Self {
            name,
            positions,
            records,
        })
    }

    /// Trimmed text of the `column`-th required column; empty when the row is short.
    fn text(&self, record: &StringRecord, column: usize) -> String {
        record
            .get(self.positions[column])
            .map(str::trim)
            .unwrap_or_default()
            .to_string()
    }

    fn number(&self, record: &StringRecord, column: usize, label: &str) -> Result<f64> {
        let raw = self.text(record, column);
        raw.parse::<f64>().map_err(|_| {
            let line = record.position().map(|p| p.line()).unwrap_or_default();
            Error::data_load(format!(
                "{}: line {line}: column '{label}' is not a number: '{raw}'",
                self.name
            ))
        })
    }
}

fn read_factors<R: Read>(reader: R) -> Result<Vec<EmissionsFactorRow>> {
    let sheet = Sheet::read("Sheet1", reader, &FACTOR_COLUMNS)?;
    sheet
        .records
        .iter()
        .map(|record| {
            Ok(EmissionsFactorRow {
                country_or_bloc: sheet.text(record, 0),
                commodity_code: sheet.text(record, 1),
                commodity_description: sheet.text(record, 2),
                direct_factor: sheet.number(record, 3, FACTOR_COLUMNS[3])?,
                indirect_factor: sheet.number(record, 4, FACTOR_COLUMNS[4])?,
                total_factor: sheet.number(record, 5, FACTOR_COLUMNS[5])?,
            })
        })
        .collect()
}

fn read_commodities<R: Read>(reader: R) -> Result<Vec<CommodityCatalogEntry>> {
    let sheet = Sheet::read("Sheet2", reader, &COMMODITY_COLUMNS)?;
    Ok(sheet
        .records
        .iter()
        .map(|record| CommodityCatalogEntry {
            hs_code: sheet.text(record, 0),
            description: sheet.text(record, 1),
        })
        .collect())
}

fn read_countries<R: Read>(reader: R) -> Result<Vec<CountryCatalogEntry>> {
    let sheet = Sheet::read("Sheet3", reader, &COUNTRY_COLUMNS)?;
    Ok(sheet
        .records
        .iter()
        .map(|record| CountryCatalogEntry {
            country_name: sheet.text(record, 0),
            numeric_id: sheet.text(record, 1),
        })
        .collect())
}
