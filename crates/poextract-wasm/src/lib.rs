//! WASM bindings for purchase-order extraction.
//!
//! The browser extracts PDF text itself (e.g. with pdf.js) and hands the
//! string over; this crate turns it into records and tables.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use poextract_core::export::to_csv_string;
use poextract_core::{Dataset, FieldExtractor, Record};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Extract the records of one document's text.
///
/// Returns an array of objects keyed by the output column names.
#[wasm_bindgen]
pub fn extract_records(text: &str, doc_id: &str) -> Result<JsValue, JsValue> {
    let records = FieldExtractor::new().extract(text, doc_id);
    to_js(&records)
}

/// Serialize as plain JS objects (flattened records would become `Map`s).
fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Output column names, in table order.
#[wasm_bindgen]
pub fn columns() -> Vec<String> {
    Record::columns().into_iter().map(String::from).collect()
}

/// Accumulates uploaded documents into one table.
#[wasm_bindgen]
pub struct DatasetBuilder {
    extractor: FieldExtractor,
    dataset: Dataset,
}

#[wasm_bindgen]
impl DatasetBuilder {
    /// Create an empty builder.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            extractor: FieldExtractor::new(),
            dataset: Dataset::new(),
        }
    }

    /// Add one document; returns the number of rows it produced.
    #[wasm_bindgen]
    pub fn add_document(&mut self, text: &str, doc_id: &str) -> usize {
        let records = self.extractor.extract(text, doc_id);
        let count = records.len();
        self.dataset.push_document(records);
        count
    }

    /// Number of rows collected so far.
    #[wasm_bindgen]
    pub fn len(&self) -> usize {
        self.dataset.len()
    }

    #[wasm_bindgen]
    pub fn is_empty(&self) -> bool {
        self.dataset.is_empty()
    }

    /// Drop every collected row.
    #[wasm_bindgen]
    pub fn clear(&mut self) {
        self.dataset = Dataset::new();
    }

    /// Render the table as CSV, ready for a download link.
    #[wasm_bindgen]
    pub fn to_csv(&self) -> Result<String, JsValue> {
        to_csv_string(&self.dataset).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Render the table as a JSON string.
    #[wasm_bindgen]
    pub fn to_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.dataset).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Collected rows as JS objects.
    #[wasm_bindgen]
    pub fn records(&self) -> Result<JsValue, JsValue> {
        to_js(self.dataset.records())
    }
}

impl Default for DatasetBuilder {
    fn default() -> Self {
        Self::new()
    }
}
