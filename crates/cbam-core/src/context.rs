//! The immutable reference context shared by every request.

use crate::index::FactorIndex;
use crate::reference::ReferenceData;
use crate::tables::ResolutionTables;

/// Reference tables, their factor index and the resolution tables.
///
/// Built once at startup and never mutated; wrap it in an `Arc` to share it
/// between concurrent requests.
#[derive(Debug, Clone)]
pub struct ReferenceContext {
    reference: ReferenceData,
    index: FactorIndex,
    tables: ResolutionTables,
}

impl ReferenceContext {
    /// Build the factor index over `reference`.
    pub fn new(reference: ReferenceData, tables: ResolutionTables) -> Self {
        let index = FactorIndex::build(&reference.factors);
        Self {
            reference,
            index,
            tables,
        }
    }

    /// The loaded reference tables.
    pub fn reference(&self) -> &ReferenceData {
        &self.reference
    }

    /// The factor lookup index.
    pub fn index(&self) -> &FactorIndex {
        &self.index
    }

    /// Alias table and EU membership.
    pub fn tables(&self) -> &ResolutionTables {
        &self.tables
    }
}
