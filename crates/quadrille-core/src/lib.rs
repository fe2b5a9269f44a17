//! # quadrille-core
//!
//! Worksheet model with a structural-integrity engine for merged regions and
//! range-anchored metadata.
//!
//! The central type is [`Worksheet`]: a sparse grid of cells plus merged
//! regions, conditional-format rules, and data validations. Structural edits
//! (inserting or deleting rows, columns, or cell ranges) rewrite all of those
//! together, so the sheet never ends up with a merged region or metadata range
//! pointing at cells that moved out from under it:
//! - [`CellAddress`] and [`CellRange`] - A1-style addressing and rectangles
//! - [`CellValue`] - cell contents (numbers, strings, booleans, formulas)
//! - [`Style`] - formatting (font, fill, border, alignment)
//! - [`ConditionalFormatRule`], [`DataValidation`] - range-anchored metadata
//!
//! ## Example
//!
//! ```rust
//! use quadrille_core::{CellRange, Worksheet};
//!
//! let mut sheet = Worksheet::new("Sheet1");
//! sheet.set_cell_value("A1", "Title").unwrap();
//! sheet.merge_cells(&CellRange::parse("A1:C1").unwrap()).unwrap();
//!
//! // Inserting a column inside the merge widens it
//! sheet.insert_columns(1, 1).unwrap();
//! assert_eq!(sheet.merged_regions()[0].to_string(), "A1:D1");
//!
//! // Writes to locked member cells are ignored
//! sheet.set_cell_value("B1", "ignored").unwrap();
//! assert!(sheet.get_value("B1").unwrap().is_empty());
//! ```

pub mod address;
pub mod cell;
pub mod conditional_format;
pub mod error;
pub mod merge;
pub mod metadata;
pub mod ownership;
pub mod style;
pub mod transform;
pub mod validation;
pub mod worksheet;

// Re-exports for convenience
pub use address::{CellAddress, CellRange};
pub use cell::{CellData, CellValue};
pub use conditional_format::{CfOperator, CfRuleType, ConditionalFormatRule};
pub use error::{Error, Result};
pub use merge::MergeRegistry;
pub use metadata::RangeAnchored;
pub use ownership::OwnershipResolver;
pub use transform::{Axis, Band, BandClass, EditKind, RangeEdit, StructuralEdit};
pub use validation::{DataValidation, ValidationOperator, ValidationType};
pub use worksheet::{DeleteShift, InsertShift, Worksheet};

// Re-export all style types for convenience
pub use style::{
    Alignment, BorderEdge, BorderLineStyle, BorderStyle, Color, FillStyle, FontStyle,
    HorizontalAlignment, Style, StylePool, VerticalAlignment,
};

/// Maximum number of rows in a worksheet (Excel limit)
pub const MAX_ROWS: u32 = 1_048_576;

/// Maximum number of columns in a worksheet (Excel limit)
pub const MAX_COLS: u16 = 16_384;
