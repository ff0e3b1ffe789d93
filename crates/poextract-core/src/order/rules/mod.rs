//! Rule-based extractors for purchase orders.

pub mod allocation;
pub mod fields;
pub mod patterns;

pub use allocation::{match_block_at, scan_allocations, TokenShape};
pub use fields::{extract_common_fields, field_rules, FieldRule};
pub use patterns::ALLOCATION_ANCHOR;
