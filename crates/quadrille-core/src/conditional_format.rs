//! Conditional formatting
//!
//! A rule carries a condition, the ranges it applies to, and the format to
//! apply when the condition holds. The engine never evaluates conditions; it
//! only keeps the ranges consistent through merges and structural edits.
//!
//! ## Example
//!
//! ```rust
//! use quadrille_core::{CellRange, ConditionalFormatRule, Worksheet};
//! use quadrille_core::style::{Color, Style};
//!
//! let mut ws = Worksheet::new("Sheet1");
//! let rule = ConditionalFormatRule::cell_is_greater_than("100")
//!     .with_range(CellRange::parse("A1:A10").unwrap())
//!     .with_format(Style::new().fill_color(Color::rgb(255, 199, 206)));
//! ws.add_conditional_format(rule);
//! ```

use crate::address::CellRange;
use crate::metadata::RangeAnchored;
use crate::style::Style;

/// A conditional formatting rule
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionalFormatRule {
    /// Rule type
    pub rule_type: CfRuleType,
    /// Cell ranges this rule applies to
    pub ranges: Vec<CellRange>,
    /// Priority (lower = higher priority)
    pub priority: u32,
    /// Format to apply when the rule matches
    pub format: Option<Style>,
}

impl Default for ConditionalFormatRule {
    fn default() -> Self {
        Self {
            rule_type: CfRuleType::Expression {
                formula: String::new(),
            },
            ranges: Vec::new(),
            priority: 1,
            format: None,
        }
    }
}

impl ConditionalFormatRule {
    /// Create a new conditional format rule
    pub fn new(rule_type: CfRuleType) -> Self {
        Self {
            rule_type,
            ..Self::default()
        }
    }

    /// Highlight cells greater than a value
    pub fn cell_is_greater_than(value: impl Into<String>) -> Self {
        Self::new(CfRuleType::CellIs {
            operator: CfOperator::GreaterThan,
            formula1: value.into(),
            formula2: None,
        })
    }

    /// Highlight cells less than a value
    pub fn cell_is_less_than(value: impl Into<String>) -> Self {
        Self::new(CfRuleType::CellIs {
            operator: CfOperator::LessThan,
            formula1: value.into(),
            formula2: None,
        })
    }

    /// Highlight cells between two values
    pub fn cell_is_between(value1: impl Into<String>, value2: impl Into<String>) -> Self {
        Self::new(CfRuleType::CellIs {
            operator: CfOperator::Between,
            formula1: value1.into(),
            formula2: Some(value2.into()),
        })
    }

    /// Highlight cells containing the given text
    pub fn contains_text(text: impl Into<String>) -> Self {
        Self::new(CfRuleType::ContainsText { text: text.into() })
    }

    /// Highlight cells where a formula evaluates to TRUE
    pub fn expression(formula: impl Into<String>) -> Self {
        Self::new(CfRuleType::Expression {
            formula: formula.into(),
        })
    }

    /// Add a cell range to this rule
    pub fn with_range(mut self, range: CellRange) -> Self {
        self.ranges.push(range);
        self
    }

    /// Set the format to apply when this rule matches
    pub fn with_format(mut self, format: Style) -> Self {
        self.format = Some(format);
        self
    }

    /// Set the rule priority
    pub fn with_priority(mut self, priority: u32) -> Self {
        self.priority = priority;
        self
    }

    /// Check if this rule applies to a specific cell
    pub fn applies_to(&self, row: u32, col: u16) -> bool {
        let addr = crate::address::CellAddress::new(row, col);
        self.ranges.iter().any(|r| r.contains(&addr))
    }
}

impl RangeAnchored for ConditionalFormatRule {
    fn ranges(&self) -> &[CellRange] {
        &self.ranges
    }

    fn ranges_mut(&mut self) -> &mut Vec<CellRange> {
        &mut self.ranges
    }
}

/// Types of conditional format rules
#[derive(Debug, Clone, PartialEq)]
pub enum CfRuleType {
    /// Compare the cell value against one or two formulas
    CellIs {
        operator: CfOperator,
        formula1: String,
        formula2: Option<String>,
    },

    /// The cell text contains a substring
    ContainsText { text: String },

    /// A formula that evaluates to TRUE/FALSE
    Expression { formula: String },
}

/// Comparison operators for CellIs rules
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CfOperator {
    Between,
    NotBetween,
    Equal,
    NotEqual,
    GreaterThan,
    LessThan,
    GreaterThanOrEqual,
    LessThanOrEqual,
}
