//! Static country tables used during factor resolution.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Trade-API partner names mapped to the names used in the factor table.
const DEFAULT_ALIASES: [(&str, &str); 8] = [
    ("USA", "United States"),
    ("USA and Puerto Rico (...1980)", "United States"),
    ("United States Minor Outlying Islands", "United States"),
    ("Dem. Rep. of Vietnam (...1974)", "Viet Nam"),
    ("Norway, excluding Svalbard and Jan Mayen", "Norway"),
    ("Peninsula Malaysia (...1963)", "Malaysia"),
    ("Serbia and Montenegro (...2005)", "Serbia"),
    ("Sikkim, Protectorate of India (...1974)", "India"),
];

const DEFAULT_EU_MEMBERS: [&str; 27] = [
    "Austria",
    "Belgium",
    "Bulgaria",
    "Croatia",
    "Cyprus",
    "Czechia",
    "Denmark",
    "Estonia",
    "Finland",
    "France",
    "Germany",
    "Greece",
    "Hungary",
    "Ireland",
    "Italy",
    "Latvia",
    "Lithuania",
    "Luxembourg",
    "Malta",
    "Netherlands",
    "Poland",
    "Portugal",
    "Romania",
    "Slovakia",
    "Slovenia",
    "Spain",
    "Sweden",
];

/// Optional overrides for the resolution tables.
///
/// A table that is set replaces the built-in one entirely.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolutionConfig {
    /// Partner-name aliases.
    pub aliases: Option<BTreeMap<String, String>>,
    /// EU member-state names.
    pub eu_members: Option<Vec<String>>,
}

/// Country-name aliases and EU membership.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolutionTables {
    aliases: HashMap<String, String>,
    eu_members: HashSet<String>,
}

impl Default for ResolutionTables {
    fn default() -> Self {
        Self {
            aliases: DEFAULT_ALIASES
                .iter()
                .map(|(from, to)| (from.to_string(), to.to_string()))
                .collect(),
            eu_members: DEFAULT_EU_MEMBERS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ResolutionTables {
    /// Tables from explicit aliases and member names.
    pub fn new<A, M>(aliases: A, eu_members: M) -> Self
    where
        A: IntoIterator<Item = (String, String)>,
        M: IntoIterator<Item = String>,
    {
        Self {
            aliases: aliases.into_iter().collect(),
            eu_members: eu_members.into_iter().collect(),
        }
    }

    /// Built-in tables with any configured overrides applied.
    pub fn from_config(config: &ResolutionConfig) -> Self {
        let mut tables = Self::default();
        if let Some(aliases) = &config.aliases {
            tables.aliases = aliases.clone().into_iter().collect();
        }
        if let Some(members) = &config.eu_members {
            tables.eu_members = members.iter().cloned().collect();
        }
        tables
    }

    /// Canonical name for a partner; unlisted names pass through unchanged.
    pub fn canonical_country<'a>(&'a self, name: &'a str) -> &'a str {
        self.aliases.get(name).map(String::as_str).unwrap_or(name)
    }

    /// Returns `true` if `country` is an EU member state.
    pub fn is_eu_member(&self, country: &str) -> bool {
        self.eu_members.contains(country)
    }
}
