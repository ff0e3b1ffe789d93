//! Regex patterns for French purchase-order extraction.

use lazy_static::lazy_static;
use regex::Regex;

/// Phrase introducing a budgetary allocation block.
pub const ALLOCATION_ANCHOR: &str = "Imputation budgétaire";

lazy_static! {
    // Order header
    pub static ref ORDER_NUMBER: Regex = Regex::new(
        r"Bon de commande\s*(\d+)"
    ).unwrap();

    // Dates (DD.MM.YYYY, kept verbatim)
    pub static ref ISSUE_DATE: Regex = Regex::new(
        r"Date d[’']?émission\s*[:\-]?\s*(\d{2}\.\d{2}\.\d{4})"
    ).unwrap();

    pub static ref DELIVERY_DATE: Regex = Regex::new(
        r"Date de livraison[:\s]+(\d{2}\.\d{2}\.\d{4})"
    ).unwrap();

    // First order line: item 00010 up to the next number
    pub static ref DESIGNATION: Regex = Regex::new(
        r"00010\s+(.*?)\s+\d"
    ).unwrap();

    // Totals (French format: 1.234,56)
    pub static ref AMOUNT_EXCL_TAX: Regex = Regex::new(
        r"Montant HT\s*[:\-]?\s*([\d.,]+)"
    ).unwrap();

    pub static ref AMOUNT_TAX: Regex = Regex::new(
        r"Montant TVA\s*[:\-]?\s*([\d.,]+)"
    ).unwrap();

    pub static ref AMOUNT_INCL_TAX: Regex = Regex::new(
        r"Montant TTC\s*[:\-]?\s*([\d.,]+)"
    ).unwrap();

    // Public market reference
    pub static ref MARKET_NUMBER: Regex = Regex::new(
        r"March[eé]\s+n[°:]?\s*(\d{8,})"
    ).unwrap();

    // Uppercase name line directly above "<number> RUE ..."
    pub static ref ADDRESS_LINE: Regex = Regex::new(
        r"\n\s*([A-Z][A-Z\s]+)\n\s*\d{1,3}\s+RUE"
    ).unwrap();

    // Allocation block token shapes, anchored at the token start
    pub static ref BUDGET_ACCOUNT: Regex = Regex::new(r"^\d{3,}-\S+").unwrap();
    pub static ref HEADING_CODE: Regex = Regex::new(r"^P\d+$").unwrap();
    pub static ref ORG_STRUCTURE: Regex = Regex::new(r"^\d{2}$").unwrap();
    pub static ref PROGRAM_AUTHORIZATION: Regex = Regex::new(r"^\d{7}$").unwrap();
    pub static ref DESTINATION_CODE: Regex = Regex::new(r"^\d{10}$").unwrap();
    pub static ref ELEMENT_CODE: Regex = Regex::new(r"^A\d+").unwrap();
}
