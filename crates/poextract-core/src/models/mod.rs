//! Data models for extracted purchase orders.

pub mod config;
pub mod record;

pub use config::{BatchConfig, ExportConfig, PoConfig, ScanConfig};
pub use record::{AllocationBlock, CommonField, CommonFields, Dataset, Record};
