//! Merge registry
//!
//! The per-worksheet authoritative set of merged regions. Regions are kept
//! sorted ascending by top-left address (row, then column) so enumeration is
//! deterministic. The registry owns rectangle bookkeeping only; content and
//! style side effects of merging live in the worksheet, which drives this
//! registry together with the ownership resolver and the metadata stores.

use crate::address::CellRange;
use crate::transform::{RangeEdit, StructuralEdit};

/// The set of merged regions in one worksheet
///
/// Invariants: regions never overlap, and every region spans at least two
/// cells. Both are enforced at registration.
#[derive(Debug, Default)]
pub struct MergeRegistry {
    /// Regions, sorted ascending by (start.row, start.col)
    regions: Vec<CellRange>,
}

impl MergeRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// The registered regions, ascending by top-left address
    pub fn regions(&self) -> &[CellRange] {
        &self.regions
    }

    /// Number of registered regions
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Find the first registered region overlapping `range`, if any
    pub fn find_overlap(&self, range: &CellRange) -> Option<&CellRange> {
        self.regions.iter().find(|r| r.overlaps(range))
    }

    /// Register a region
    ///
    /// Single-cell ranges are rejected as no-ops (`Ok(false)`). A range
    /// overlapping an existing region is a caller error and is returned as
    /// `Err` with the conflicting region.
    pub fn register(&mut self, range: CellRange) -> Result<bool, CellRange> {
        if range.is_single_cell() {
            return Ok(false);
        }
        if let Some(existing) = self.find_overlap(&range) {
            return Err(*existing);
        }
        let pos = self
            .regions
            .partition_point(|r| (r.start.row, r.start.col) < (range.start.row, range.start.col));
        self.regions.insert(pos, range);
        Ok(true)
    }

    /// Remove a region by exact bounds
    pub fn remove(&mut self, range: &CellRange) -> bool {
        match self.regions.iter().position(|r| r == range) {
            Some(pos) => {
                self.regions.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Check if a cell belongs to any registered region
    pub fn is_merged(&self, row: u32, col: u16) -> bool {
        self.region_containing(row, col).is_some()
    }

    /// The region containing a cell, if any
    pub fn region_containing(&self, row: u32, col: u16) -> Option<&CellRange> {
        let addr = crate::address::CellAddress::new(row, col);
        self.regions.iter().find(|r| r.contains(&addr))
    }

    /// Push every region through a structural edit
    ///
    /// The full set of surviving regions is staged before the registry is
    /// touched, so a region list is never left half-shifted. Returns the
    /// regions that dissolved, in their pre-edit bounds.
    pub fn apply_edit(&mut self, edit: &StructuralEdit) -> Vec<CellRange> {
        let mut surviving = Vec::with_capacity(self.regions.len());
        let mut dissolved = Vec::new();

        for region in &self.regions {
            match edit.apply_to_range(region) {
                RangeEdit::Unchanged => surviving.push(*region),
                // a region squeezed down to a single valid cell stays
                // registered; only an invalid rectangle dissolves
                RangeEdit::Moved(moved) => surviving.push(moved),
                RangeEdit::Dissolved => {
                    log::debug!("merged region {} dissolved by structural edit", region);
                    dissolved.push(*region);
                }
            }
        }

        surviving.sort_by_key(|r| (r.start.row, r.start.col));
        self.regions = surviving;
        dissolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::{Axis, StructuralEdit};
    use pretty_assertions::assert_eq;

    fn range(s: &str) -> CellRange {
        CellRange::parse(s).unwrap()
    }

    #[test]
    fn single_cell_register_is_a_no_op() {
        let mut registry = MergeRegistry::new();
        assert_eq!(registry.register(range("A1")), Ok(false));
        assert!(registry.is_empty());
    }

    #[test]
    fn overlap_is_rejected_with_conflicting_region() {
        let mut registry = MergeRegistry::new();
        registry.register(range("A1:C3")).unwrap();

        assert_eq!(registry.register(range("B2:D4")), Err(range("A1:C3")));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn regions_enumerate_in_ascending_order() {
        let mut registry = MergeRegistry::new();
        registry.register(range("B4:C5")).unwrap();
        registry.register(range("H1:I2")).unwrap();
        registry.register(range("B2:C3")).unwrap();

        let listed: Vec<String> = registry.regions().iter().map(|r| r.to_string()).collect();
        assert_eq!(listed, vec!["H1:I2", "B2:C3", "B4:C5"]);
    }

    #[test]
    fn region_containing_finds_members() {
        let mut registry = MergeRegistry::new();
        registry.register(range("B2:D4")).unwrap();

        assert_eq!(registry.region_containing(2, 2), Some(&range("B2:D4")));
        assert!(registry.region_containing(0, 0).is_none());
        assert!(registry.is_merged(1, 1));
    }

    #[test]
    fn remove_requires_exact_bounds() {
        let mut registry = MergeRegistry::new();
        registry.register(range("B2:D4")).unwrap();

        assert!(!registry.remove(&range("B2:C3")));
        assert!(registry.remove(&range("B2:D4")));
        assert!(registry.is_empty());
    }

    #[test]
    fn edit_stages_all_regions_and_reports_dissolutions() {
        let mut registry = MergeRegistry::new();
        registry.register(range("A3:C3")).unwrap();
        registry.register(range("B4:B6")).unwrap();
        registry.register(range("C7:D7")).unwrap();

        // delete column B
        let dissolved = registry.apply_edit(&StructuralEdit::delete(Axis::Columns, 1, 1));

        assert_eq!(dissolved, vec![range("B4:B6")]);
        let listed: Vec<String> = registry.regions().iter().map(|r| r.to_string()).collect();
        assert_eq!(listed, vec!["A3:B3", "B7:C7"]);
    }

    #[test]
    fn region_shrunk_to_single_cell_stays_registered() {
        let mut registry = MergeRegistry::new();
        registry.register(range("A2:B2")).unwrap();

        // delete column B: A2:B2 shrinks to the still-valid rectangle A2:A2
        let dissolved = registry.apply_edit(&StructuralEdit::delete(Axis::Columns, 1, 1));

        assert!(dissolved.is_empty());
        assert_eq!(registry.regions(), &[range("A2:A2")]);
    }
}
