//! CSV export.

use std::io::Write;

use super::Result;
use crate::models::record::{Dataset, Record};

/// Write the dataset as CSV: one header row, one line per record.
pub fn write_csv<W: Write>(dataset: &Dataset, writer: W) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);

    wtr.write_record(Record::columns())?;
    for record in dataset {
        wtr.write_record(record.values())?;
    }

    wtr.flush()?;
    Ok(())
}

/// Render the dataset as a CSV string.
pub fn to_csv_string(dataset: &Dataset) -> Result<String> {
    let mut buf = Vec::new();
    write_csv(dataset, &mut buf)?;
    // csv only writes the UTF-8 strings it was given
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::record::{AllocationBlock, CommonFields};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_header_only() {
        let csv = to_csv_string(&Dataset::new()).unwrap();
        assert_eq!(
            csv,
            "pdf,commande,date_emission,designation,date_livraison,montant_ht,montant_tva,\
             montant_ttc,marche,adresse_ligne_1,compte_budgetaire,rubrique,structure_organique,\
             autorisation_programme,destination,n_ec,element_otp\n"
        );
    }

    #[test]
    fn test_values_quoted_only_when_needed() {
        let common = CommonFields {
            order_number: "4500000001".to_string(),
            amount_incl_tax: "1.234,56".to_string(),
            designation: "Papier \"recyclé\"".to_string(),
            ..CommonFields::default()
        };
        let block = AllocationBlock {
            element_code: "A9".to_string(),
            ..AllocationBlock::default()
        };
        let dataset: Dataset = vec![Record::new("bc é.pdf", common, block)].into_iter().collect();

        let csv = to_csv_string(&dataset).unwrap();
        let row = csv.lines().nth(1).unwrap();
        assert_eq!(
            row,
            "bc é.pdf,4500000001,,\"Papier \"\"recyclé\"\"\",,,,\"1.234,56\",,,,,,,,A9,A9"
        );
    }
}
