//! Excel workbook export.

use rust_xlsxwriter::{Format, Workbook};

use super::Result;
use crate::models::record::{Dataset, Record};

/// Name of the single worksheet.
pub const SHEET_NAME: &str = "Extraction";

/// Render the dataset as an `.xlsx` workbook.
///
/// Every cell is written as text so amounts and dates keep their layout.
pub fn to_xlsx_bytes(dataset: &Dataset) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    for (col, name) in Record::columns().into_iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, name, &header_format)?;
    }

    for (row, record) in dataset.iter().enumerate() {
        let row = row as u32 + 1;
        for (col, value) in record.values().into_iter().enumerate() {
            if !value.is_empty() {
                worksheet.write_string(row, col as u16, value)?;
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::record::{AllocationBlock, CommonFields};
    use calamine::{Data, Reader, Xlsx};
    use pretty_assertions::assert_eq;

    fn read_back(bytes: Vec<u8>) -> (Vec<String>, calamine::Range<Data>) {
        let mut workbook: Xlsx<_> =
            calamine::open_workbook_from_rs(std::io::Cursor::new(bytes)).unwrap();
        let names = workbook.sheet_names().to_vec();
        let range = workbook.worksheet_range(SHEET_NAME).unwrap();
        (names, range)
    }

    #[test]
    fn test_workbook_layout() {
        let common = CommonFields {
            order_number: "4500001234".to_string(),
            issue_date: "01.02.2024".to_string(),
            amount_excl_tax: "1.234,56".to_string(),
            ..CommonFields::default()
        };
        let allocation = AllocationBlock {
            budget_account: "611-2281".to_string(),
            heading_code: "P12".to_string(),
            organizational_structure: "03".to_string(),
            program_authorization: "2024001".to_string(),
            destination_code: "0102030405".to_string(),
            element_code: "A17".to_string(),
        };
        let dataset: Dataset = vec![Record::new("a.pdf", common, allocation)]
            .into_iter()
            .collect();

        let bytes = to_xlsx_bytes(&dataset).unwrap();
        let (names, range) = read_back(bytes);

        assert_eq!(names, vec![SHEET_NAME.to_string()]);
        assert_eq!(range.height(), 2);

        let header: Vec<String> = range
            .rows()
            .next()
            .unwrap()
            .iter()
            .map(|cell| cell.to_string())
            .collect();
        assert_eq!(header, Record::columns());

        assert_eq!(range.get_value((1, 0)), Some(&Data::String("a.pdf".to_string())));
        assert_eq!(range.get_value((1, 1)), Some(&Data::String("4500001234".to_string())));
        assert_eq!(range.get_value((1, 2)), Some(&Data::String("01.02.2024".to_string())));
        assert_eq!(range.get_value((1, 5)), Some(&Data::String("1.234,56".to_string())));
        assert_eq!(range.get_value((1, 13)), Some(&Data::String("2024001".to_string())));
        assert_eq!(range.get_value((1, 16)), Some(&Data::String("A17".to_string())));
    }

    #[test]
    fn test_empty_dataset_keeps_header() {
        let (names, range) = read_back(to_xlsx_bytes(&Dataset::default()).unwrap());

        assert_eq!(names, vec![SHEET_NAME.to_string()]);
        assert_eq!(range.height(), 1);
        assert_eq!(range.get_value((0, 0)), Some(&Data::String("pdf".to_string())));
    }
}
