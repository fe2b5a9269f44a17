//! Data validation
//!
//! Validation rules restrict what users can enter into cells. Like
//! conditional formats they are range-anchored: the engine maintains the
//! ranges across merges and structural edits but never evaluates the rule.
//!
//! ## Example
//!
//! ```rust
//! use quadrille_core::{CellRange, DataValidation, Worksheet};
//!
//! let mut ws = Worksheet::new("Sheet1");
//! let validation = DataValidation::list("Yes,No,Maybe")
//!     .with_range(CellRange::parse("A1:A10").unwrap());
//! ws.add_data_validation(validation);
//! ```

use crate::address::CellRange;
use crate::metadata::RangeAnchored;

/// Data validation rule for cells
#[derive(Debug, Clone, PartialEq)]
pub struct DataValidation {
    /// Type of validation
    pub validation_type: ValidationType,
    /// Cell ranges this validation applies to
    pub ranges: Vec<CellRange>,
    /// Allow blank/empty cells
    pub allow_blank: bool,
    /// Error alert title
    pub error_title: Option<String>,
    /// Error alert message
    pub error_message: Option<String>,
}

impl Default for DataValidation {
    fn default() -> Self {
        Self {
            validation_type: ValidationType::None,
            ranges: Vec::new(),
            allow_blank: true,
            error_title: None,
            error_message: None,
        }
    }
}

impl DataValidation {
    /// Create a new data validation with no restrictions
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a list validation (dropdown)
    ///
    /// `source` is either a comma-separated list of values ("Yes,No,Maybe")
    /// or a range reference ("=$A$1:$A$5").
    pub fn list(source: impl Into<String>) -> Self {
        Self {
            validation_type: ValidationType::List {
                source: source.into(),
            },
            ..Self::default()
        }
    }

    /// Create a whole number validation
    pub fn whole_number(operator: ValidationOperator, value1: impl Into<String>) -> Self {
        Self {
            validation_type: ValidationType::Whole {
                operator,
                value1: value1.into(),
                value2: None,
            },
            ..Self::default()
        }
    }

    /// Create a whole number validation with a between/not-between operator
    pub fn whole_number_between(value1: impl Into<String>, value2: impl Into<String>) -> Self {
        Self {
            validation_type: ValidationType::Whole {
                operator: ValidationOperator::Between,
                value1: value1.into(),
                value2: Some(value2.into()),
            },
            ..Self::default()
        }
    }

    /// Create a decimal number validation
    pub fn decimal(operator: ValidationOperator, value1: impl Into<String>) -> Self {
        Self {
            validation_type: ValidationType::Decimal {
                operator,
                value1: value1.into(),
                value2: None,
            },
            ..Self::default()
        }
    }

    /// Create a text length validation
    pub fn text_length(operator: ValidationOperator, value1: impl Into<String>) -> Self {
        Self {
            validation_type: ValidationType::TextLength {
                operator,
                value1: value1.into(),
                value2: None,
            },
            ..Self::default()
        }
    }

    /// Create a custom formula validation
    pub fn custom(formula: impl Into<String>) -> Self {
        Self {
            validation_type: ValidationType::Custom {
                formula: formula.into(),
            },
            ..Self::default()
        }
    }

    /// Add a cell range to this validation
    pub fn with_range(mut self, range: CellRange) -> Self {
        self.ranges.push(range);
        self
    }

    /// Set whether blank cells are allowed
    pub fn with_allow_blank(mut self, allow: bool) -> Self {
        self.allow_blank = allow;
        self
    }

    /// Set an error message (shown when invalid data is entered)
    pub fn with_error_message(
        mut self,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        self.error_title = Some(title.into());
        self.error_message = Some(message.into());
        self
    }

    /// Check if this validation applies to a specific cell
    pub fn applies_to(&self, row: u32, col: u16) -> bool {
        let addr = crate::address::CellAddress::new(row, col);
        self.ranges.iter().any(|r| r.contains(&addr))
    }
}

impl RangeAnchored for DataValidation {
    fn ranges(&self) -> &[CellRange] {
        &self.ranges
    }

    fn ranges_mut(&mut self) -> &mut Vec<CellRange> {
        &mut self.ranges
    }
}

/// Types of data validation
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationType {
    /// No validation (any value allowed)
    None,

    /// Must be a whole number
    Whole {
        operator: ValidationOperator,
        value1: String,
        value2: Option<String>,
    },

    /// Must be a decimal number
    Decimal {
        operator: ValidationOperator,
        value1: String,
        value2: Option<String>,
    },

    /// Must be from a list
    List {
        /// Either comma-separated values or a range reference
        source: String,
    },

    /// Text length constraint
    TextLength {
        operator: ValidationOperator,
        value1: String,
        value2: Option<String>,
    },

    /// Custom formula validation
    Custom {
        /// Formula that returns TRUE/FALSE
        formula: String,
    },
}

/// Comparison operators for validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationOperator {
    /// Value must be between value1 and value2
    #[default]
    Between,
    NotBetween,
    Equal,
    NotEqual,
    GreaterThan,
    LessThan,
    GreaterThanOrEqual,
    LessThanOrEqual,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn list_validation_keeps_source() {
        let v = DataValidation::list("Yes,No,Maybe");
        assert_eq!(
            v.validation_type,
            ValidationType::List {
                source: "Yes,No,Maybe".into()
            }
        );
    }

    #[test]
    fn between_validation_carries_both_values() {
        let v = DataValidation::whole_number_between("1", "100");
        if let ValidationType::Whole {
            operator,
            value1,
            value2,
        } = &v.validation_type
        {
            assert_eq!(*operator, ValidationOperator::Between);
            assert_eq!(value1, "1");
            assert_eq!(value2.as_deref(), Some("100"));
        } else {
            panic!("expected Whole validation type");
        }
    }

    #[test]
    fn applies_to_respects_ranges() {
        let v = DataValidation::list("A,B").with_range(CellRange::parse("A1:C10").unwrap());

        assert!(v.applies_to(0, 0)); // A1
        assert!(v.applies_to(9, 2)); // C10
        assert!(!v.applies_to(10, 0)); // A11
        assert!(!v.applies_to(0, 3)); // D1
    }
}
