//! Worksheet type
//!
//! A worksheet owns the sparse cell store, the merge registry, the ownership
//! resolver, and the range-anchored metadata records, and sequences them for
//! every merge, unmerge, and structural edit. All content writes funnel
//! through the ownership gate: a write to a locked merge member silently does
//! nothing.

use crate::address::{CellAddress, CellRange};
use crate::cell::{CellData, CellStorage, CellValue};
use crate::conditional_format::ConditionalFormatRule;
use crate::error::{Error, Result};
use crate::merge::MergeRegistry;
use crate::metadata::{self, prune_record_for_merge, prune_records_for_merge};
use crate::ownership::OwnershipResolver;
use crate::style::Style;
use crate::transform::{Axis, Band, StructuralEdit};
use crate::validation::DataValidation;
use crate::{MAX_COLS, MAX_ROWS};

/// Which way existing cells move when a range is inserted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertShift {
    /// Rows are inserted; cells in the range's column band shift down
    Down,
    /// Columns are inserted; cells in the range's row band shift right
    Right,
}

/// Which neighbors absorb the space freed by a range deletion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteShift {
    /// Rows are deleted; cells below in the range's column band shift up
    Up,
    /// Columns are deleted; cells to the right in the range's row band shift left
    Left,
}

/// A worksheet (single sheet in a document)
#[derive(Debug)]
pub struct Worksheet {
    /// Sheet name
    name: String,
    /// Cell storage
    cells: CellStorage,
    /// Merged regions
    merges: MergeRegistry,
    /// Write-lock state for merged member cells
    ownership: OwnershipResolver,
    /// Conditional formatting rules
    conditional_formats: Vec<ConditionalFormatRule>,
    /// Data validations
    data_validations: Vec<DataValidation>,
}

impl Worksheet {
    /// Create a new worksheet with the given name
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            cells: CellStorage::new(),
            merges: MergeRegistry::new(),
            ownership: OwnershipResolver::new(),
            conditional_formats: Vec::new(),
            data_validations: Vec::new(),
        }
    }

    /// Get the sheet name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set the sheet name
    pub fn set_name<S: Into<String>>(&mut self, name: S) {
        self.name = name.into();
    }

    // === Cell Access ===

    /// Get a cell by address string (e.g., "A1")
    pub fn cell(&self, address: &str) -> Result<Option<&CellData>> {
        let addr = CellAddress::parse(address)?;
        Ok(self.cells.get(addr.row, addr.col))
    }

    /// Get a cell by row and column indices
    pub fn cell_at(&self, row: u32, col: u16) -> Option<&CellData> {
        self.cells.get(row, col)
    }

    /// Get a cell value (convenience method)
    pub fn get_value(&self, address: &str) -> Result<CellValue> {
        let addr = CellAddress::parse(address)?;
        Ok(self.get_value_at(addr.row, addr.col))
    }

    /// Get a cell value by indices
    pub fn get_value_at(&self, row: u32, col: u16) -> CellValue {
        self.cells
            .get(row, col)
            .map(|c| c.value.clone())
            .unwrap_or(CellValue::Empty)
    }

    /// Get the non-default style applied to a cell, if any
    pub fn cell_style_at(&self, row: u32, col: u16) -> Option<&Style> {
        let idx = self.cells.get(row, col).map(|c| c.style_index).unwrap_or(0);
        if idx == 0 {
            None
        } else {
            self.cells.style_pool().get(idx)
        }
    }

    /// Get the non-default style applied to a cell by address, if any
    pub fn cell_style(&self, address: &str) -> Result<Option<&Style>> {
        let addr = CellAddress::parse(address)?;
        Ok(self.cell_style_at(addr.row, addr.col))
    }

    /// Get the used range (bounds of all non-empty cells)
    pub fn used_range(&self) -> Option<CellRange> {
        self.cells
            .used_bounds()
            .map(|(min_row, min_col, max_row, max_col)| {
                CellRange::from_indices(min_row, min_col, max_row, max_col)
            })
    }

    /// Get the number of non-empty cells
    pub fn cell_count(&self) -> usize {
        self.cells.cell_count()
    }

    /// Check if the worksheet is empty
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Iterate over all non-empty cells
    pub fn iter_cells(&self) -> impl Iterator<Item = (u32, u16, &CellData)> {
        self.cells.iter()
    }

    // === Cell Modification ===

    /// Set a cell value by address string
    ///
    /// A write to a locked merge member is silently ignored.
    pub fn set_cell_value<V: Into<CellValue>>(&mut self, address: &str, value: V) -> Result<()> {
        let addr = CellAddress::parse(address)?;
        self.set_cell_value_at(addr.row, addr.col, value)
    }

    /// Set a cell value by row and column indices
    pub fn set_cell_value_at<V: Into<CellValue>>(
        &mut self,
        row: u32,
        col: u16,
        value: V,
    ) -> Result<()> {
        self.validate_cell_position(row, col)?;
        if !self.ownership.can_write(row, col) {
            log::trace!("value write to locked cell ({}, {}) ignored", row, col);
            return Ok(());
        }
        self.cells.set_value(row, col, value.into());
        Ok(())
    }

    /// Set a cell formula by address string
    pub fn set_cell_formula(&mut self, address: &str, formula: &str) -> Result<()> {
        let addr = CellAddress::parse(address)?;
        self.set_cell_formula_at(addr.row, addr.col, formula)
    }

    /// Set a cell formula by row and column indices
    ///
    /// A write to a locked merge member is silently ignored.
    pub fn set_cell_formula_at(&mut self, row: u32, col: u16, formula: &str) -> Result<()> {
        self.validate_cell_position(row, col)?;
        if !self.ownership.can_write(row, col) {
            log::trace!("formula write to locked cell ({}, {}) ignored", row, col);
            return Ok(());
        }

        // Ensure formula starts with '='
        let formula = if formula.starts_with('=') {
            formula.to_string()
        } else {
            format!("={}", formula)
        };

        self.cells.set_value(row, col, CellValue::formula(formula));
        Ok(())
    }

    /// Set a cell style by address string
    pub fn set_cell_style(&mut self, address: &str, style: &Style) -> Result<()> {
        let addr = CellAddress::parse(address)?;
        self.set_cell_style_at(addr.row, addr.col, style)
    }

    /// Set a cell style by row and column indices
    pub fn set_cell_style_at(&mut self, row: u32, col: u16, style: &Style) -> Result<()> {
        self.validate_cell_position(row, col)?;
        let style_index = self.cells.style_pool_mut().get_or_insert(style.clone());
        self.cells.set_style(row, col, style_index);
        Ok(())
    }

    /// Clear a cell by indices (no-op on locked merge members)
    pub fn clear_cell_at(&mut self, row: u32, col: u16) {
        if self.ownership.can_write(row, col) {
            self.cells.remove(row, col);
        }
    }

    // === Merged Regions ===

    /// Get merged regions, ascending by top-left address
    pub fn merged_regions(&self) -> &[CellRange] {
        self.merges.regions()
    }

    /// Check if a cell belongs to a merged region
    pub fn is_merged(&self, row: u32, col: u16) -> bool {
        self.merges.is_merged(row, col)
    }

    /// The merged region containing a cell, if any
    pub fn merged_region_containing(&self, row: u32, col: u16) -> Option<CellRange> {
        self.merges.region_containing(row, col).copied()
    }

    /// Check whether a direct content write to the cell would take effect
    pub fn can_write(&self, row: u32, col: u16) -> bool {
        self.ownership.can_write(row, col)
    }

    /// Merge a range of cells
    ///
    /// A single-cell range is a no-op and returns `Ok(None)`. A range
    /// overlapping an existing merged region fails with
    /// [`Error::MergeOverlap`] and changes nothing. Otherwise the region is
    /// registered and its side effects applied: the anchor's fill, font, and
    /// alignment are propagated to every member cell (borders stay per-cell),
    /// every non-anchor member's content is cleared and write-locked, and
    /// metadata ranges falling inside the merge are pruned.
    pub fn merge_cells(&mut self, range: &CellRange) -> Result<Option<CellRange>> {
        self.validate_cell_position(range.end.row, range.end.col)?;

        match self.merges.register(*range) {
            Ok(true) => {}
            Ok(false) => {
                log::debug!("single-cell merge {} ignored", range);
                return Ok(None);
            }
            Err(existing) => {
                return Err(Error::MergeOverlap(range.to_string(), existing.to_string()));
            }
        }

        let anchor = range.anchor();

        // Propagate the anchor's non-border style facets and clear content.
        let anchor_style = self
            .cell_style_at(anchor.row, anchor.col)
            .cloned()
            .unwrap_or_default();
        for addr in range.cells() {
            if addr == anchor {
                continue;
            }
            let member_border = self
                .cell_style_at(addr.row, addr.col)
                .map(|s| s.border)
                .unwrap_or_default();
            let propagated = anchor_style.propagated_onto(member_border);
            let style_index = self.cells.style_pool_mut().get_or_insert(propagated);
            self.cells.set_style(addr.row, addr.col, style_index);
            self.cells.set_value(addr.row, addr.col, CellValue::Empty);
        }

        prune_records_for_merge(&mut self.conditional_formats, range);
        prune_records_for_merge(&mut self.data_validations, range);

        self.ownership.lock_region(range);
        log::debug!("merged {}", range);
        Ok(Some(*range))
    }

    /// Unmerge a previously merged range (exact bounds)
    ///
    /// Content and style side effects of the merge are not reverted; only the
    /// merge relation and its write locks are removed. Returns whether a
    /// region was found.
    pub fn unmerge_cells(&mut self, range: &CellRange) -> bool {
        if self.merges.remove(range) {
            self.ownership.unlock_region(range);
            log::debug!("unmerged {}", range);
            true
        } else {
            false
        }
    }

    // === Structural Edits ===

    /// Insert `count` whole rows at row index `at`
    ///
    /// Fails with [`Error::InvalidRange`] before touching any state when the
    /// edit's span does not fit the row axis.
    pub fn insert_rows(&mut self, at: u32, count: u32) -> Result<()> {
        if count == 0 {
            return Ok(());
        }
        Self::validate_edit_span(at, count, MAX_ROWS)?;
        self.apply_structural_edit(StructuralEdit::insert(Axis::Rows, at, count));
        Ok(())
    }

    /// Insert `count` whole columns at column index `at`
    pub fn insert_columns(&mut self, at: u16, count: u16) -> Result<()> {
        if count == 0 {
            return Ok(());
        }
        Self::validate_edit_span(at as u32, count as u32, MAX_COLS as u32)?;
        self.apply_structural_edit(StructuralEdit::insert(
            Axis::Columns,
            at as u32,
            count as u32,
        ));
        Ok(())
    }

    /// Delete `count` whole rows starting at row index `at`
    pub fn delete_rows(&mut self, at: u32, count: u32) -> Result<()> {
        if count == 0 {
            return Ok(());
        }
        Self::validate_edit_span(at, count, MAX_ROWS)?;
        self.apply_structural_edit(StructuralEdit::delete(Axis::Rows, at, count));
        Ok(())
    }

    /// Delete `count` whole columns starting at column index `at`
    pub fn delete_columns(&mut self, at: u16, count: u16) -> Result<()> {
        if count == 0 {
            return Ok(());
        }
        Self::validate_edit_span(at as u32, count as u32, MAX_COLS as u32)?;
        self.apply_structural_edit(StructuralEdit::delete(
            Axis::Columns,
            at as u32,
            count as u32,
        ));
        Ok(())
    }

    /// Insert blank cells shaped like `range`, shifting existing cells
    ///
    /// The edit is scoped to the range's perpendicular band: `Down` inserts
    /// the range's rows within its column band only, `Right` the mirror. A
    /// merged region straddling the band boundary is dissolved.
    pub fn insert_range(&mut self, range: &CellRange, shift: InsertShift) -> Result<()> {
        self.validate_cell_position(range.end.row, range.end.col)?;
        let edit = match shift {
            InsertShift::Down => {
                let (low, high) = range.col_span();
                StructuralEdit::insert(Axis::Rows, range.start.row, range.row_count())
                    .scoped(Band::Span(low, high))
            }
            InsertShift::Right => {
                let (low, high) = range.row_span();
                StructuralEdit::insert(
                    Axis::Columns,
                    range.start.col as u32,
                    range.col_count() as u32,
                )
                .scoped(Band::Span(low, high))
            }
        };
        self.apply_structural_edit(edit);
        Ok(())
    }

    /// Delete the cells of `range`, shifting neighbors into the freed space
    ///
    /// `Up` deletes the range's rows within its column band, `Left` the
    /// mirror. The shift direction selects the edited axis; it never changes
    /// the transform math on that axis.
    pub fn delete_range(&mut self, range: &CellRange, shift: DeleteShift) -> Result<()> {
        self.validate_cell_position(range.end.row, range.end.col)?;
        let edit = match shift {
            DeleteShift::Up => {
                let (low, high) = range.col_span();
                StructuralEdit::delete(Axis::Rows, range.start.row, range.row_count())
                    .scoped(Band::Span(low, high))
            }
            DeleteShift::Left => {
                let (low, high) = range.row_span();
                StructuralEdit::delete(
                    Axis::Columns,
                    range.start.col as u32,
                    range.col_count() as u32,
                )
                .scoped(Band::Span(low, high))
            }
        };
        self.apply_structural_edit(edit);
        Ok(())
    }

    /// Run one structural edit over every store, then commit
    ///
    /// Each store stages its full result before replacing its state, and the
    /// write locks are rebuilt from the committed registry, so an edit never
    /// leaves the worksheet half-shifted.
    fn apply_structural_edit(&mut self, edit: StructuralEdit) {
        let dissolved = self.merges.apply_edit(&edit);
        metadata::apply_edit_to_records(&mut self.conditional_formats, &edit);
        metadata::apply_edit_to_records(&mut self.data_validations, &edit);
        self.cells.apply_edit(&edit);
        self.ownership.rebuild(self.merges.regions().iter());

        if !dissolved.is_empty() {
            log::debug!("structural edit dissolved {} merged region(s)", dissolved.len());
        }
    }

    // === Conditional Formatting ===

    /// Add a conditional formatting rule
    ///
    /// The rule's ranges are pruned against every registered merged region
    /// first; a rule left with no ranges (anchored solely on locked member
    /// cells) is silently discarded.
    pub fn add_conditional_format(&mut self, mut rule: ConditionalFormatRule) {
        for region in self.merges.regions() {
            if !prune_record_for_merge(&mut rule, region) {
                log::trace!("conditional format on locked cells discarded");
                return;
            }
        }
        self.conditional_formats.push(rule);
    }

    /// Get all conditional formatting rules
    pub fn conditional_formats(&self) -> &[ConditionalFormatRule] {
        &self.conditional_formats
    }

    /// Get conditional formatting rules for a specific cell
    pub fn conditional_formats_at(&self, row: u32, col: u16) -> Vec<&ConditionalFormatRule> {
        self.conditional_formats
            .iter()
            .filter(|r| r.applies_to(row, col))
            .collect()
    }

    /// Get the number of conditional formatting rules
    pub fn conditional_format_count(&self) -> usize {
        self.conditional_formats.len()
    }

    // === Data Validation ===

    /// Add a data validation rule
    ///
    /// As with conditional formats, ranges anchored solely on locked merge
    /// members are pruned away; an empty rule is discarded.
    pub fn add_data_validation(&mut self, mut validation: DataValidation) {
        for region in self.merges.regions() {
            if !prune_record_for_merge(&mut validation, region) {
                log::trace!("data validation on locked cells discarded");
                return;
            }
        }
        self.data_validations.push(validation);
    }

    /// Get all data validations
    pub fn data_validations(&self) -> &[DataValidation] {
        &self.data_validations
    }

    /// Get the data validation applying to a specific cell
    pub fn data_validation_at(&self, row: u32, col: u16) -> Option<&DataValidation> {
        self.data_validations.iter().find(|v| v.applies_to(row, col))
    }

    /// Get the number of data validations
    pub fn data_validation_count(&self) -> usize {
        self.data_validations.len()
    }

    // === Internal ===

    /// Reject edit parameters whose span does not fit inside the axis
    fn validate_edit_span(at: u32, count: u32, limit: u32) -> Result<()> {
        if at >= limit || count > limit - at {
            return Err(Error::InvalidRange(format!(
                "edit at index {} spanning {} lines exceeds axis limit {}",
                at, count, limit
            )));
        }
        Ok(())
    }

    /// Validate cell position
    fn validate_cell_position(&self, row: u32, col: u16) -> Result<()> {
        if row >= MAX_ROWS {
            return Err(Error::RowOutOfBounds(row, MAX_ROWS - 1));
        }
        if col >= MAX_COLS {
            return Err(Error::ColumnOutOfBounds(col, MAX_COLS - 1));
        }
        Ok(())
    }
}
