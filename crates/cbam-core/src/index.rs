//! Lookup indices over the emissions-factor table.

use crate::reference::EmissionsFactorRow;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Direct, indirect and total emissions factors (t CO₂ per t of product).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Factors {
    /// Direct emissions factor.
    pub direct: f64,
    /// Indirect emissions factor.
    pub indirect: f64,
    /// Total emissions factor.
    pub total: f64,
}

impl Factors {
    /// Factors used when nothing resolves.
    pub const ZERO: Factors = Factors {
        direct: 0.0,
        indirect: 0.0,
        total: 0.0,
    };

    /// Creates a factor triple.
    pub fn new(direct: f64, indirect: f64, total: f64) -> Self {
        Self {
            direct,
            indirect,
            total,
        }
    }
}

type CountryKey = (String, String, String);
type CommodityKey = (String, String);

/// The two lookup mappings built from the factor table.
///
/// - `(country_or_bloc, code, description)` for every row that is not a
///   weighted average, including `"EU"` rows;
/// - `(code, description)` for the weighted-average rows only.
///
/// A key seen twice keeps the later row's factors.
#[derive(Debug, Clone, Default)]
pub struct FactorIndex {
    by_country: HashMap<CountryKey, Factors>,
    weighted: HashMap<CommodityKey, Factors>,
}

impl FactorIndex {
    /// Build both mappings from factor rows, in order.
    pub fn build(rows: &[EmissionsFactorRow]) -> Self {
        let mut index = Self::default();
        for row in rows {
            index.insert(row);
        }
        tracing::debug!(
            by_country = index.by_country.len(),
            weighted = index.weighted.len(),
            "Factor index built"
        );
        index
    }

    /// Insert one row, replacing any earlier row with the same key.
    pub fn insert(&mut self, row: &EmissionsFactorRow) {
        let factors = row.factors();
        let replaced = if row.is_weighted_average() {
            self.weighted.insert(
                (row.commodity_code.clone(), row.commodity_description.clone()),
                factors,
            )
        } else {
            self.by_country.insert(
                (
                    row.country_or_bloc.clone(),
                    row.commodity_code.clone(),
                    row.commodity_description.clone(),
                ),
                factors,
            )
        };

        if let Some(previous) = replaced {
            tracing::debug!(
                country = %row.country_or_bloc,
                code = %row.commodity_code,
                description = %row.commodity_description,
                ?previous,
                current = ?factors,
                "Duplicate factor key, later row wins"
            );
        }
    }

    /// Factors for a country (or the `"EU"` bloc) and commodity.
    pub fn by_country(&self, country: &str, code: &str, description: &str) -> Option<Factors> {
        self.by_country
            .get(&(country.to_string(), code.to_string(), description.to_string()))
            .copied()
    }

    /// Weighted-average factors for a commodity.
    pub fn weighted(&self, code: &str, description: &str) -> Option<Factors> {
        self.weighted
            .get(&(code.to_string(), description.to_string()))
            .copied()
    }

    /// Number of country/bloc keys.
    pub fn country_len(&self) -> usize {
        self.by_country.len()
    }

    /// Number of weighted-average keys.
    pub fn weighted_len(&self) -> usize {
        self.weighted.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::WEIGHTED_AVERAGE;

    fn row(country: &str, code: &str, desc: &str, d: f64, i: f64, t: f64) -> EmissionsFactorRow {
        EmissionsFactorRow {
            country_or_bloc: country.to_string(),
            commodity_code: code.to_string(),
            commodity_description: desc.to_string(),
            direct_factor: d,
            indirect_factor: i,
            total_factor: t,
        }
    }

    #[test]
    fn test_rows_split_between_mappings() {
        let index = FactorIndex::build(&[
            row("Germany", "7208", "Flat-rolled iron", 1.0, 0.5, 1.5),
            row("EU", "7208", "Flat-rolled iron", 1.1, 0.4, 1.5),
            row(WEIGHTED_AVERAGE, "7208", "Flat-rolled iron", 2.0, 0.2, 2.2),
        ]);

        assert_eq!(index.country_len(), 2);
        assert_eq!(index.weighted_len(), 1);
        assert_eq!(
            index.by_country("EU", "7208", "Flat-rolled iron"),
            Some(Factors::new(1.1, 0.4, 1.5))
        );
        assert_eq!(
            index.weighted("7208", "Flat-rolled iron"),
            Some(Factors::new(2.0, 0.2, 2.2))
        );
        assert_eq!(index.by_country(WEIGHTED_AVERAGE, "7208", "Flat-rolled iron"), None);
    }

    #[test]
    fn test_duplicate_country_key_last_write_wins() {
        let index = FactorIndex::build(&[
            row("China", "2523", "Cement", 0.8, 0.1, 0.9),
            row("China", "2523", "Cement", 0.6, 0.2, 0.8),
        ]);
        assert_eq!(index.country_len(), 1);
        assert_eq!(
            index.by_country("China", "2523", "Cement"),
            Some(Factors::new(0.6, 0.2, 0.8))
        );
    }

    #[test]
    fn test_duplicate_weighted_key_last_write_wins() {
        let index = FactorIndex::build(&[
            row(WEIGHTED_AVERAGE, "2523", "Cement", 0.8, 0.1, 0.9),
            row(WEIGHTED_AVERAGE, "2523", "Cement", 0.7, 0.1, 0.8),
        ]);
        assert_eq!(index.weighted("2523", "Cement"), Some(Factors::new(0.7, 0.1, 0.8)));
    }

    #[test]
    fn test_description_is_part_of_the_key() {
        let index = FactorIndex::build(&[row("China", "2523", "Cement", 0.8, 0.1, 0.9)]);
        assert_eq!(index.by_country("China", "2523", "Cement clinker"), None);
        assert_eq!(index.by_country("china", "2523", "Cement"), None);
    }
}
