//! Record and dataset models.
//!
//! Every value is kept exactly as it appears in the document text: dates stay
//! `DD.MM.YYYY`, amounts keep their locale separators.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Document-level fields, one value per purchase order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommonField {
    OrderNumber,
    IssueDate,
    Designation,
    DeliveryDate,
    AmountExclTax,
    AmountTax,
    AmountInclTax,
    MarketNumber,
    AddressLine1,
}

impl CommonField {
    /// All document-level fields, in output column order.
    pub const ALL: [CommonField; 9] = [
        CommonField::OrderNumber,
        CommonField::IssueDate,
        CommonField::Designation,
        CommonField::DeliveryDate,
        CommonField::AmountExclTax,
        CommonField::AmountTax,
        CommonField::AmountInclTax,
        CommonField::MarketNumber,
        CommonField::AddressLine1,
    ];

    /// Column name in exported tables.
    pub fn column(&self) -> &'static str {
        match self {
            CommonField::OrderNumber => "commande",
            CommonField::IssueDate => "date_emission",
            CommonField::Designation => "designation",
            CommonField::DeliveryDate => "date_livraison",
            CommonField::AmountExclTax => "montant_ht",
            CommonField::AmountTax => "montant_tva",
            CommonField::AmountInclTax => "montant_ttc",
            CommonField::MarketNumber => "marche",
            CommonField::AddressLine1 => "adresse_ligne_1",
        }
    }
}

/// Scalar fields shared by every record of a document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommonFields {
    /// Purchase order number (bon de commande).
    #[serde(rename = "commande")]
    pub order_number: String,

    /// Issue date, `DD.MM.YYYY`.
    #[serde(rename = "date_emission")]
    pub issue_date: String,

    /// Designation of the first order line.
    pub designation: String,

    /// Delivery date, `DD.MM.YYYY`.
    #[serde(rename = "date_livraison")]
    pub delivery_date: String,

    /// Amount excluding tax (HT).
    #[serde(rename = "montant_ht")]
    pub amount_excl_tax: String,

    /// Tax amount (TVA).
    #[serde(rename = "montant_tva")]
    pub amount_tax: String,

    /// Amount including tax (TTC).
    #[serde(rename = "montant_ttc")]
    pub amount_incl_tax: String,

    /// Public market number.
    #[serde(rename = "marche")]
    pub market_number: String,

    /// First line of the supplier address.
    #[serde(rename = "adresse_ligne_1")]
    pub address_line_1: String,
}

impl CommonFields {
    pub fn get(&self, field: CommonField) -> &str {
        match field {
            CommonField::OrderNumber => &self.order_number,
            CommonField::IssueDate => &self.issue_date,
            CommonField::Designation => &self.designation,
            CommonField::DeliveryDate => &self.delivery_date,
            CommonField::AmountExclTax => &self.amount_excl_tax,
            CommonField::AmountTax => &self.amount_tax,
            CommonField::AmountInclTax => &self.amount_incl_tax,
            CommonField::MarketNumber => &self.market_number,
            CommonField::AddressLine1 => &self.address_line_1,
        }
    }

    pub fn set(&mut self, field: CommonField, value: String) {
        let slot = match field {
            CommonField::OrderNumber => &mut self.order_number,
            CommonField::IssueDate => &mut self.issue_date,
            CommonField::Designation => &mut self.designation,
            CommonField::DeliveryDate => &mut self.delivery_date,
            CommonField::AmountExclTax => &mut self.amount_excl_tax,
            CommonField::AmountTax => &mut self.amount_tax,
            CommonField::AmountInclTax => &mut self.amount_incl_tax,
            CommonField::MarketNumber => &mut self.market_number,
            CommonField::AddressLine1 => &mut self.address_line_1,
        };
        *slot = value;
    }

    /// Fields that were not found in the document.
    pub fn missing(&self) -> Vec<CommonField> {
        CommonField::ALL
            .into_iter()
            .filter(|f| self.get(*f).is_empty())
            .collect()
    }
}

/// One budgetary allocation block (imputation budgétaire).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationBlock {
    /// Budget account code, e.g. `611-2281`.
    #[serde(rename = "compte_budgetaire")]
    pub budget_account: String,

    /// Heading (rubrique) code, `P` followed by digits.
    #[serde(rename = "rubrique")]
    pub heading_code: String,

    /// Organizational structure, two digits.
    #[serde(rename = "structure_organique")]
    pub organizational_structure: String,

    /// Program authorization number, seven digits.
    #[serde(rename = "autorisation_programme")]
    pub program_authorization: String,

    /// Destination code, ten digits.
    #[serde(rename = "destination")]
    pub destination_code: String,

    /// Element (EC) code, `A` followed by digits.
    #[serde(rename = "n_ec")]
    pub element_code: String,
}

impl AllocationBlock {
    /// Check if the block carries no values (placeholder row).
    pub fn is_empty(&self) -> bool {
        self.budget_account.is_empty()
            && self.heading_code.is_empty()
            && self.organizational_structure.is_empty()
            && self.program_authorization.is_empty()
            && self.destination_code.is_empty()
            && self.element_code.is_empty()
    }
}

/// One output row: document fields plus one allocation block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Source document label (file name).
    #[serde(rename = "pdf")]
    pub doc_id: String,

    #[serde(flatten)]
    pub common: CommonFields,

    #[serde(flatten)]
    pub allocation: AllocationBlock,

    /// Always equal to `allocation.element_code`.
    pub element_otp: String,
}

impl Record {
    /// Build a record; `element_otp` is copied from the block's element code.
    pub fn new(doc_id: impl Into<String>, common: CommonFields, allocation: AllocationBlock) -> Self {
        let element_otp = allocation.element_code.clone();
        Self {
            doc_id: doc_id.into(),
            common,
            allocation,
            element_otp,
        }
    }

    /// Header row shared by every exported table.
    pub fn columns() -> Vec<&'static str> {
        let mut columns = Vec::with_capacity(17);
        columns.push("pdf");
        columns.extend(CommonField::ALL.iter().map(|f| f.column()));
        columns.extend([
            "compte_budgetaire",
            "rubrique",
            "structure_organique",
            "autorisation_programme",
            "destination",
            "n_ec",
            "element_otp",
        ]);
        columns
    }

    /// Row values, in the order of [`Record::columns`].
    pub fn values(&self) -> Vec<&str> {
        let mut values = Vec::with_capacity(17);
        values.push(self.doc_id.as_str());
        values.extend(CommonField::ALL.iter().map(|f| self.common.get(*f)));
        values.extend([
            self.allocation.budget_account.as_str(),
            self.allocation.heading_code.as_str(),
            self.allocation.organizational_structure.as_str(),
            self.allocation.program_authorization.as_str(),
            self.allocation.destination_code.as_str(),
            self.allocation.element_code.as_str(),
            self.element_otp.as_str(),
        ]);
        values
    }
}

/// Ordered collection of records across many documents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dataset {
    records: Vec<Record>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the records of one document, keeping their order.
    pub fn push_document(&mut self, records: Vec<Record>) {
        self.records.extend(records);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn into_records(self) -> Vec<Record> {
        self.records
    }

    /// Number of distinct source documents.
    pub fn document_count(&self) -> usize {
        self.records
            .iter()
            .map(|r| r.doc_id.as_str())
            .collect::<HashSet<_>>()
            .len()
    }
}

impl FromIterator<Record> for Dataset {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl Extend<Record> for Dataset {
    fn extend<I: IntoIterator<Item = Record>>(&mut self, iter: I) {
        self.records.extend(iter);
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
