//! Coordinate transforms for structural edits
//!
//! This module is the single source of truth for how a row or column index
//! moves when lines are inserted or deleted. An edit is described by `at`
//! (first affected 0-based index) and `count` (number of inserted or deleted
//! lines); the same pure functions are applied to merged-region bounds,
//! conditional-format ranges, validation ranges, and individual cells.

use crate::address::CellRange;
use crate::{MAX_COLS, MAX_ROWS};

/// The axis whose indices an edit moves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Row indices move (insert/delete rows)
    Rows,
    /// Column indices move (insert/delete columns)
    Columns,
}

/// Whether an edit adds or removes lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKind {
    Insert,
    Delete,
}

/// The edit's span on the axis perpendicular to [`Axis`]
///
/// A whole-row or whole-column edit affects the full perpendicular axis;
/// a range-scoped edit affects only the edited range's own span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Band {
    /// The entire perpendicular axis (whole-row/whole-column edit)
    All,
    /// An inclusive sub-span of the perpendicular axis (range-scoped edit)
    Span(u32, u32),
}

impl Band {
    /// Classify an inclusive interval against this band
    pub fn classify(&self, low: u32, high: u32) -> BandClass {
        match *self {
            Band::All => BandClass::Inside,
            Band::Span(start, end) => {
                if high < start || low > end {
                    BandClass::Outside
                } else if low >= start && high <= end {
                    BandClass::Inside
                } else {
                    BandClass::Straddling
                }
            }
        }
    }

    /// Check whether a single index lies inside the band
    pub fn covers(&self, index: u32) -> bool {
        match *self {
            Band::All => true,
            Band::Span(start, end) => index >= start && index <= end,
        }
    }
}

/// How an interval relates to a band
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BandClass {
    /// Fully outside the band: unaffected by the edit
    Outside,
    /// Fully inside the band: the edited-axis transform applies
    Inside,
    /// Partially inside: the edit cannot keep the rectangle consistent
    Straddling,
}

/// Map one index through an insertion of `count` lines at `at`
///
/// Indices before the insertion point stay put; everything else moves down.
/// Applied to both bounds of an interval this shifts an interval wholly at or
/// after `at`, and widens one that straddles it. Saturates at `u32::MAX`;
/// callers compare the result against the axis limit.
pub fn inserted_index(index: u32, at: u32, count: u32) -> u32 {
    if index < at {
        index
    } else {
        index.saturating_add(count)
    }
}

/// Map an inclusive interval through an insertion
pub fn inserted_bounds(low: u32, high: u32, at: u32, count: u32) -> (u32, u32) {
    (
        inserted_index(low, at, count),
        inserted_index(high, at, count),
    )
}

/// Map one index through a deletion of `count` lines starting at `at`
///
/// Returns `None` for indices inside the deleted band `[at, at + count)`.
pub fn deleted_index(index: u32, at: u32, count: u32) -> Option<u32> {
    if index < at {
        Some(index)
    } else if index >= at.saturating_add(count) {
        Some(index - count)
    } else {
        None
    }
}

/// Map an inclusive interval through a deletion
///
/// The bounds clamp asymmetrically into the deleted gap: a low bound inside
/// the gap collapses up to `at`, a high bound inside it collapses down to
/// `at - 1`. An interval wholly inside the gap therefore inverts and yields
/// `None`; one that straddles the gap shrinks by exactly the overlap.
pub fn deleted_bounds(low: u32, high: u32, at: u32, count: u32) -> Option<(u32, u32)> {
    let end = at.saturating_add(count);

    let new_low = if low < at {
        low
    } else if low >= end {
        low - count
    } else {
        at
    };

    let new_high = if high < at {
        high
    } else if high >= end {
        high - count
    } else if at == 0 {
        // high collapses below index 0: nothing of the interval survives
        return None;
    } else {
        at - 1
    };

    (new_low <= new_high).then_some((new_low, new_high))
}

/// The outcome of pushing a rectangle through a structural edit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeEdit {
    /// The range is untouched by the edit
    Unchanged,
    /// The range survives with new bounds
    Moved(CellRange),
    /// The edit cannot map the range to a valid rectangle
    Dissolved,
}

/// A structural edit: insert or delete `count` lines on `axis` starting at
/// `at`, affecting only the perpendicular `band`
///
/// This is the §4.2/§4.3 description shared by the merge registry, the
/// metadata stores, and the cell store. `at` is an index on the edited axis
/// (a row index for [`Axis::Rows`], a column index for [`Axis::Columns`]);
/// `band` spans the other axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StructuralEdit {
    pub axis: Axis,
    pub at: u32,
    pub count: u32,
    pub kind: EditKind,
    pub band: Band,
}

impl StructuralEdit {
    /// A whole-axis insertion
    pub fn insert(axis: Axis, at: u32, count: u32) -> Self {
        Self {
            axis,
            at,
            count,
            kind: EditKind::Insert,
            band: Band::All,
        }
    }

    /// A whole-axis deletion
    pub fn delete(axis: Axis, at: u32, count: u32) -> Self {
        Self {
            axis,
            at,
            count,
            kind: EditKind::Delete,
            band: Band::All,
        }
    }

    /// Restrict the edit to a perpendicular band
    pub fn scoped(mut self, band: Band) -> Self {
        self.band = band;
        self
    }

    /// Exclusive upper bound for indices on the edited axis
    fn axis_limit(&self) -> u32 {
        match self.axis {
            Axis::Rows => MAX_ROWS,
            Axis::Columns => MAX_COLS as u32,
        }
    }

    /// Push one rectangle through this edit
    ///
    /// The range's span on the perpendicular axis is classified against the
    /// band first: fully outside means untouched, straddling dissolves the
    /// rectangle outright, and fully inside applies the edited-axis bound
    /// transform (which may itself consume the range on a delete).
    pub fn apply_to_range(&self, range: &CellRange) -> RangeEdit {
        let (perp_low, perp_high) = match self.axis {
            Axis::Rows => range.col_span(),
            Axis::Columns => range.row_span(),
        };

        match self.band.classify(perp_low, perp_high) {
            BandClass::Outside => RangeEdit::Unchanged,
            BandClass::Straddling => RangeEdit::Dissolved,
            BandClass::Inside => {
                let (low, high) = match self.axis {
                    Axis::Rows => range.row_span(),
                    Axis::Columns => range.col_span(),
                };

                let mapped = match self.kind {
                    EditKind::Insert => Some(inserted_bounds(low, high, self.at, self.count)),
                    EditKind::Delete => deleted_bounds(low, high, self.at, self.count),
                };

                match mapped {
                    None => RangeEdit::Dissolved,
                    Some((new_low, new_high)) if (new_low, new_high) == (low, high) => {
                        RangeEdit::Unchanged
                    }
                    // pushed past the edge of the grid: no valid rectangle
                    Some((_, new_high)) if new_high >= self.axis_limit() => RangeEdit::Dissolved,
                    Some((new_low, new_high)) => {
                        let moved = match self.axis {
                            Axis::Rows => CellRange::from_indices(
                                new_low,
                                range.start.col,
                                new_high,
                                range.end.col,
                            ),
                            Axis::Columns => CellRange::from_indices(
                                range.start.row,
                                new_low as u16,
                                range.end.row,
                                new_high as u16,
                            ),
                        };
                        RangeEdit::Moved(moved)
                    }
                }
            }
        }
    }

    /// Push one cell through this edit
    ///
    /// Cells outside the band are untouched; cells in a deleted band vanish.
    pub fn apply_to_cell(&self, row: u32, col: u16) -> Option<(u32, u16)> {
        let (edited, perp) = match self.axis {
            Axis::Rows => (row, col as u32),
            Axis::Columns => (col as u32, row),
        };

        if !self.band.covers(perp) {
            return Some((row, col));
        }

        let mapped = match self.kind {
            EditKind::Insert => Some(inserted_index(edited, self.at, self.count)),
            EditKind::Delete => deleted_index(edited, self.at, self.count),
        }?;

        // cells shifted past the grid edge have nowhere to go
        if mapped >= self.axis_limit() {
            return None;
        }

        Some(match self.axis {
            Axis::Rows => (mapped, col),
            Axis::Columns => (row, mapped as u16),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn range(s: &str) -> CellRange {
        CellRange::parse(s).unwrap()
    }

    #[test]
    fn insert_before_inside_after() {
        // insert 2 lines at index 2
        assert_eq!(inserted_bounds(0, 1, 2, 2), (0, 1)); // wholly before: unchanged
        assert_eq!(inserted_bounds(0, 2, 2, 2), (0, 4)); // straddles: widens
        assert_eq!(inserted_bounds(2, 3, 2, 2), (4, 5)); // at/after: shifts
    }

    #[test]
    fn delete_clamps_asymmetrically() {
        // delete 1 line at index 1
        assert_eq!(deleted_bounds(0, 0, 1, 1), Some((0, 0))); // before: unchanged
        assert_eq!(deleted_bounds(0, 1, 1, 1), Some((0, 0))); // high collapses down
        assert_eq!(deleted_bounds(0, 2, 1, 1), Some((0, 1))); // straddles: shrinks by 1
        assert_eq!(deleted_bounds(1, 1, 1, 1), None); // wholly consumed
        assert_eq!(deleted_bounds(2, 3, 1, 1), Some((1, 2))); // after: shifts
    }

    #[test]
    fn delete_at_zero_consumes_leading_interval() {
        assert_eq!(deleted_bounds(0, 1, 0, 2), None);
        assert_eq!(deleted_bounds(0, 3, 0, 2), Some((0, 1)));
    }

    #[test]
    fn band_classification() {
        let band = Band::Span(2, 3);
        assert_eq!(band.classify(0, 1), BandClass::Outside);
        assert_eq!(band.classify(4, 6), BandClass::Outside);
        assert_eq!(band.classify(2, 3), BandClass::Inside);
        assert_eq!(band.classify(3, 3), BandClass::Inside);
        assert_eq!(band.classify(1, 2), BandClass::Straddling);
        assert_eq!(band.classify(3, 4), BandClass::Straddling);
        assert_eq!(band.classify(0, 6), BandClass::Straddling);

        assert_eq!(Band::All.classify(0, u32::MAX), BandClass::Inside);
    }

    #[test]
    fn whole_axis_column_insert_matches_observed_table() {
        // insert 2 columns at column index 2 (after column B)
        let edit = StructuralEdit::insert(Axis::Columns, 2, 2);

        assert_eq!(edit.apply_to_range(&range("A1:A2")), RangeEdit::Unchanged);
        assert_eq!(edit.apply_to_range(&range("A2:B2")), RangeEdit::Unchanged);
        assert_eq!(
            edit.apply_to_range(&range("A3:C3")),
            RangeEdit::Moved(range("A3:E3"))
        );
        assert_eq!(edit.apply_to_range(&range("B4:B6")), RangeEdit::Unchanged);
        assert_eq!(
            edit.apply_to_range(&range("C7:D7")),
            RangeEdit::Moved(range("E7:F7"))
        );
    }

    #[test]
    fn whole_axis_column_delete_matches_observed_table() {
        // delete column B (index 1)
        let edit = StructuralEdit::delete(Axis::Columns, 1, 1);

        assert_eq!(edit.apply_to_range(&range("A1:A2")), RangeEdit::Unchanged);
        assert_eq!(
            edit.apply_to_range(&range("A2:B2")),
            RangeEdit::Moved(range("A2:A2"))
        );
        assert_eq!(
            edit.apply_to_range(&range("A3:C3")),
            RangeEdit::Moved(range("A3:B3"))
        );
        assert_eq!(edit.apply_to_range(&range("B4:B6")), RangeEdit::Dissolved);
        assert_eq!(
            edit.apply_to_range(&range("C7:D7")),
            RangeEdit::Moved(range("B7:C7"))
        );
    }

    #[test]
    fn whole_axis_row_insert_matches_observed_table() {
        // insert 2 rows at row index 2 (below row 2)
        let edit = StructuralEdit::insert(Axis::Rows, 2, 2);

        assert_eq!(edit.apply_to_range(&range("A1:B1")), RangeEdit::Unchanged);
        assert_eq!(edit.apply_to_range(&range("B1:B2")), RangeEdit::Unchanged);
        assert_eq!(
            edit.apply_to_range(&range("C1:C3")),
            RangeEdit::Moved(range("C1:C5"))
        );
        assert_eq!(edit.apply_to_range(&range("D2:F2")), RangeEdit::Unchanged);
        assert_eq!(
            edit.apply_to_range(&range("G4:G5")),
            RangeEdit::Moved(range("G6:G7"))
        );
    }

    #[test]
    fn whole_axis_row_delete_matches_observed_table() {
        // delete row 2 (index 1)
        let edit = StructuralEdit::delete(Axis::Rows, 1, 1);

        assert_eq!(edit.apply_to_range(&range("A1:B1")), RangeEdit::Unchanged);
        assert_eq!(
            edit.apply_to_range(&range("B1:B2")),
            RangeEdit::Moved(range("B1:B1"))
        );
        assert_eq!(
            edit.apply_to_range(&range("C1:C3")),
            RangeEdit::Moved(range("C1:C2"))
        );
        assert_eq!(edit.apply_to_range(&range("D2:F2")), RangeEdit::Dissolved);
        assert_eq!(
            edit.apply_to_range(&range("G4:G5")),
            RangeEdit::Moved(range("G3:G4"))
        );
    }

    #[test]
    fn scoped_edit_straddle_dissolves_regardless_of_parallel_axis() {
        // insert 2 columns at index 5, scoped to rows 3-4 (indices 2-3)
        let edit = StructuralEdit::insert(Axis::Columns, 5, 2).scoped(Band::Span(2, 3));

        // perpendicular span fully outside the band: untouched even though the
        // column span is past the insertion point
        assert_eq!(edit.apply_to_range(&range("H1:I2")), RangeEdit::Unchanged);
        assert_eq!(edit.apply_to_range(&range("H5:I6")), RangeEdit::Unchanged);

        // straddles the band: dissolved, including where the parallel-axis
        // transform would have been the identity
        assert_eq!(edit.apply_to_range(&range("F2:G3")), RangeEdit::Dissolved);
        assert_eq!(edit.apply_to_range(&range("B2:C3")), RangeEdit::Dissolved);

        // fully inside the band: ordinary transform
        assert_eq!(
            edit.apply_to_range(&range("F3:G4")),
            RangeEdit::Moved(range("H3:I4"))
        );
        assert_eq!(edit.apply_to_range(&range("B3:C4")), RangeEdit::Unchanged);
    }

    #[test]
    fn insert_past_grid_edge_dissolves_and_drops() {
        // pushing the last two columns off the grid
        let edit = StructuralEdit::insert(Axis::Columns, 0, 2);

        assert_eq!(
            edit.apply_to_range(&range("XFC1:XFD1")),
            RangeEdit::Dissolved
        );
        assert_eq!(edit.apply_to_cell(0, 16383), None);
        assert_eq!(edit.apply_to_cell(0, 16381), Some((0, 16383)));

        let edit = StructuralEdit::insert(Axis::Rows, 0, 1);
        assert_eq!(edit.apply_to_cell(1_048_575, 0), None);
    }

    #[test]
    fn cell_transform_respects_band() {
        let edit = StructuralEdit::delete(Axis::Rows, 2, 2).scoped(Band::Span(1, 2));

        assert_eq!(edit.apply_to_cell(5, 0), Some((5, 0))); // outside band
        assert_eq!(edit.apply_to_cell(5, 1), Some((3, 1))); // shifts up
        assert_eq!(edit.apply_to_cell(2, 2), None); // deleted
        assert_eq!(edit.apply_to_cell(1, 1), Some((1, 1))); // above the gap
    }

    proptest! {
        #[test]
        fn insert_preserves_interval_width_or_widens(
            low in 0u32..1000, len in 0u32..1000, at in 0u32..1200, count in 1u32..50
        ) {
            let high = low + len;
            let (new_low, new_high) = inserted_bounds(low, high, at, count);
            prop_assert!(new_low <= new_high);
            let new_len = new_high - new_low;
            if at <= low || at > high {
                prop_assert_eq!(new_len, len);
            } else {
                prop_assert_eq!(new_len, len + count);
            }
        }

        #[test]
        fn delete_shrinks_interval_by_exactly_the_overlap(
            low in 0u32..1000, len in 0u32..1000, at in 0u32..1200, count in 1u32..50
        ) {
            let high = low + len;
            let overlap = (high.min(at + count - 1) as i64 - low.max(at) as i64 + 1).max(0) as u32;
            match deleted_bounds(low, high, at, count) {
                None => prop_assert_eq!(overlap, len + 1),
                Some((new_low, new_high)) => {
                    prop_assert!(new_low <= new_high);
                    prop_assert_eq!(new_high - new_low, len - overlap);
                }
            }
        }

        #[test]
        fn delete_never_maps_into_the_gap(
            index in 0u32..2000, at in 0u32..1000, count in 1u32..50
        ) {
            match deleted_index(index, at, count) {
                None => prop_assert!(index >= at && index < at + count),
                Some(mapped) => prop_assert!(mapped <= index),
            }
        }
    }
}
