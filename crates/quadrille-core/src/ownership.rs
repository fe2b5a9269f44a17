//! Cell ownership resolver
//!
//! Tracks which cells are write-locked members of an active merged region.
//! The resolver owns the authoritative lock state; the worksheet routes every
//! value/formula/style/metadata write through [`OwnershipResolver::can_write`]
//! and silently drops writes to locked cells. The cell store itself never
//! consults the merge registry.

use ahash::AHashSet;

use crate::address::CellRange;

/// Write-lock state for merged member cells
///
/// Every cell of a merged region except its anchor is locked while the merge
/// exists. An external formula engine reading a locked cell always observes
/// blank, never a stale value.
#[derive(Debug, Default)]
pub struct OwnershipResolver {
    locked: AHashSet<(u32, u16)>,
}

impl OwnershipResolver {
    /// Create a resolver with no locks
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether a direct write to the cell is permitted
    pub fn can_write(&self, row: u32, col: u16) -> bool {
        !self.locked.contains(&(row, col))
    }

    /// Check whether the cell is a locked merge member
    pub fn is_locked(&self, row: u32, col: u16) -> bool {
        self.locked.contains(&(row, col))
    }

    /// Lock every non-anchor member of a merged region
    pub fn lock_region(&mut self, region: &CellRange) {
        let anchor = region.anchor();
        for addr in region.cells() {
            if addr != anchor {
                self.locked.insert((addr.row, addr.col));
            }
        }
    }

    /// Lift the locks of a dissolved or unmerged region
    pub fn unlock_region(&mut self, region: &CellRange) {
        for addr in region.cells() {
            self.locked.remove(&(addr.row, addr.col));
        }
    }

    /// Recompute the lock set from scratch for the given regions
    ///
    /// Structural edits move regions wholesale; rebuilding afterwards keeps
    /// the lock set consistent with the committed registry in one step.
    pub fn rebuild<'a, I>(&mut self, regions: I)
    where
        I: IntoIterator<Item = &'a CellRange>,
    {
        self.locked.clear();
        for region in regions {
            self.lock_region(region);
        }
    }

    /// Number of locked cells
    pub fn locked_count(&self) -> usize {
        self.locked.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn range(s: &str) -> CellRange {
        CellRange::parse(s).unwrap()
    }

    #[test]
    fn anchor_stays_writable() {
        let mut resolver = OwnershipResolver::new();
        resolver.lock_region(&range("B2:C3"));

        assert!(resolver.can_write(1, 1)); // B2 anchor
        assert!(!resolver.can_write(1, 2)); // C2
        assert!(!resolver.can_write(2, 1)); // B3
        assert!(!resolver.can_write(2, 2)); // C3
        assert!(resolver.can_write(0, 0)); // outside the region
        assert_eq!(resolver.locked_count(), 3);
    }

    #[test]
    fn unlock_lifts_all_member_locks() {
        let mut resolver = OwnershipResolver::new();
        resolver.lock_region(&range("A1:A3"));
        resolver.unlock_region(&range("A1:A3"));

        assert_eq!(resolver.locked_count(), 0);
        assert!(resolver.can_write(1, 0));
    }

    #[test]
    fn rebuild_reflects_moved_regions() {
        let mut resolver = OwnershipResolver::new();
        resolver.lock_region(&range("A1:A2"));

        let moved = [range("A3:A4")];
        resolver.rebuild(moved.iter());

        assert!(resolver.can_write(1, 0)); // old member freed
        assert!(!resolver.can_write(3, 0)); // new member locked
    }
}
