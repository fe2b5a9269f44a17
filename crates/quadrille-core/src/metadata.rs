//! Range-anchored metadata maintenance
//!
//! Conditional-format rules and data validations are both "range-anchored":
//! a payload plus one or more cell ranges. Merges and structural edits rewrite
//! those ranges through the one generic mechanism here, so the geometry logic
//! is written once for every record kind.

use crate::address::CellRange;
use crate::transform::{RangeEdit, StructuralEdit};

/// A metadata record whose applicability is defined by a set of cell ranges
pub trait RangeAnchored {
    /// The ranges this record applies to
    fn ranges(&self) -> &[CellRange];

    /// Mutable access to the record's range set
    fn ranges_mut(&mut self) -> &mut Vec<CellRange>;
}

/// Rewrite one record's ranges for a newly created merge
///
/// - a range lying entirely inside the merge without its anchor is dropped;
/// - a range overlapping the merge and containing the anchor collapses to the
///   single anchor cell;
/// - a range not touching the merge stays as it is.
///
/// Returns `false` when the record has no ranges left and should be deleted.
pub fn prune_record_for_merge<T: RangeAnchored>(record: &mut T, merged: &CellRange) -> bool {
    let anchor = merged.anchor();
    let ranges = record.ranges_mut();

    let mut rewritten = Vec::with_capacity(ranges.len());
    for range in ranges.drain(..) {
        if !range.overlaps(merged) {
            rewritten.push(range);
        } else if range.contains(&anchor) {
            let cropped = CellRange::single(anchor);
            if !rewritten.contains(&cropped) {
                rewritten.push(cropped);
            }
        } else if !merged.contains_range(&range) {
            // partially covered without the anchor: the out-of-merge part is
            // still addressable, keep the range
            rewritten.push(range);
        }
        // else: swallowed by the non-anchor portion of the merge, dropped
    }

    *ranges = rewritten;
    !ranges.is_empty()
}

/// Prune a whole record collection for a newly created merge
///
/// Records left with an empty range set are removed.
pub fn prune_records_for_merge<T: RangeAnchored>(records: &mut Vec<T>, merged: &CellRange) {
    records.retain_mut(|record| prune_record_for_merge(record, merged));
}

/// Push every record's ranges through a structural edit
///
/// Ranges consumed by a deletion or straddling a scoped edit's band are
/// dropped, exactly like merged regions; records with no surviving range are
/// removed.
pub fn apply_edit_to_records<T: RangeAnchored>(records: &mut Vec<T>, edit: &StructuralEdit) {
    records.retain_mut(|record| {
        let ranges = record.ranges_mut();
        let mut rewritten = Vec::with_capacity(ranges.len());
        for range in ranges.drain(..) {
            match edit.apply_to_range(&range) {
                RangeEdit::Unchanged => rewritten.push(range),
                RangeEdit::Moved(moved) => rewritten.push(moved),
                RangeEdit::Dissolved => {
                    log::trace!("metadata range {} dropped by structural edit", range);
                }
            }
        }
        *ranges = rewritten;
        !ranges.is_empty()
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::{Axis, StructuralEdit};
    use pretty_assertions::assert_eq;

    struct Record {
        ranges: Vec<CellRange>,
    }

    impl Record {
        fn over(specs: &[&str]) -> Self {
            Self {
                ranges: specs.iter().map(|s| CellRange::parse(s).unwrap()).collect(),
            }
        }

        fn spans(&self) -> Vec<String> {
            self.ranges.iter().map(|r| r.to_string()).collect()
        }
    }

    impl RangeAnchored for Record {
        fn ranges(&self) -> &[CellRange] {
            &self.ranges
        }

        fn ranges_mut(&mut self) -> &mut Vec<CellRange> {
            &mut self.ranges
        }
    }

    fn range(s: &str) -> CellRange {
        CellRange::parse(s).unwrap()
    }

    #[test]
    fn non_anchor_range_is_dropped() {
        let mut record = Record::over(&["A2"]);
        assert!(!prune_record_for_merge(&mut record, &range("A1:A2")));
        assert!(record.ranges().is_empty());
    }

    #[test]
    fn anchor_range_is_cropped_to_anchor() {
        let mut record = Record::over(&["A1:A5"]);
        assert!(prune_record_for_merge(&mut record, &range("A1:A2")));
        assert_eq!(record.spans(), vec!["A1"]);
    }

    #[test]
    fn untouched_range_survives() {
        let mut record = Record::over(&["C1:C5"]);
        assert!(prune_record_for_merge(&mut record, &range("A1:A2")));
        assert_eq!(record.spans(), vec!["C1:C5"]);
    }

    #[test]
    fn partial_overlap_without_anchor_is_kept() {
        // B2:B5 pokes out below the merge B1:C3 and misses its anchor B1
        let mut record = Record::over(&["B2:B5"]);
        assert!(prune_record_for_merge(&mut record, &range("B1:C3")));
        assert_eq!(record.spans(), vec!["B2:B5"]);
    }

    #[test]
    fn empty_records_are_deleted_from_collections() {
        let mut records = vec![Record::over(&["A2"]), Record::over(&["D1:D4"])];
        prune_records_for_merge(&mut records, &range("A1:A2"));

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].spans(), vec!["D1:D4"]);
    }

    #[test]
    fn edits_rewrite_ranges_like_regions() {
        let mut records = vec![Record::over(&["A3:C3", "B4:B6", "C7:D7"])];

        // delete column B: B4:B6 is consumed, the others shrink or shift
        apply_edit_to_records(&mut records, &StructuralEdit::delete(Axis::Columns, 1, 1));

        assert_eq!(records[0].spans(), vec!["A3:B3", "B7:C7"]);
    }

    #[test]
    fn record_consumed_by_delete_is_removed() {
        let mut records = vec![Record::over(&["B1:B4"])];

        apply_edit_to_records(&mut records, &StructuralEdit::delete(Axis::Columns, 1, 1));

        assert!(records.is_empty());
    }
}
