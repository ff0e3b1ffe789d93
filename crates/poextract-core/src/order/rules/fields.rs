//! Document-level field rules.
//!
//! Each field is bound to one labeled pattern. The first match in document
//! order wins; a field without a match stays empty.

use regex::Regex;

use super::patterns::{
    ADDRESS_LINE, AMOUNT_EXCL_TAX, AMOUNT_INCL_TAX, AMOUNT_TAX, DELIVERY_DATE, DESIGNATION,
    ISSUE_DATE, MARKET_NUMBER, ORDER_NUMBER,
};
use crate::models::record::{CommonField, CommonFields};

/// A document-level field and the pattern capturing its value in group 1.
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub field: CommonField,
    pub pattern: &'static Regex,
}

impl FieldRule {
    /// First captured value in `text`, trimmed.
    pub fn capture(&self, text: &str) -> Option<String> {
        self.pattern
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string())
    }
}

/// The rule table, in output column order.
pub fn field_rules() -> [FieldRule; 9] {
    [
        FieldRule { field: CommonField::OrderNumber, pattern: &ORDER_NUMBER },
        FieldRule { field: CommonField::IssueDate, pattern: &ISSUE_DATE },
        FieldRule { field: CommonField::Designation, pattern: &DESIGNATION },
        FieldRule { field: CommonField::DeliveryDate, pattern: &DELIVERY_DATE },
        FieldRule { field: CommonField::AmountExclTax, pattern: &AMOUNT_EXCL_TAX },
        FieldRule { field: CommonField::AmountTax, pattern: &AMOUNT_TAX },
        FieldRule { field: CommonField::AmountInclTax, pattern: &AMOUNT_INCL_TAX },
        FieldRule { field: CommonField::MarketNumber, pattern: &MARKET_NUMBER },
        FieldRule { field: CommonField::AddressLine1, pattern: &ADDRESS_LINE },
    ]
}

/// Extract every document-level field from `text`.
pub fn extract_common_fields(text: &str) -> CommonFields {
    let mut fields = CommonFields::default();
    for rule in field_rules() {
        if let Some(value) = rule.capture(text) {
            fields.set(rule.field, value);
        }
    }
    fields
}
