use crate::domain::model::{Delimiter, Table};
use crate::utils::error::{MsesError, Result};
use csv::WriterBuilder;

/// Serialize a table with a header row.
///
/// Values use Rust's shortest round-trip formatting, so reading the output back
/// reproduces the same `f64` bits.
pub fn write_table(table: &Table, delimiter: Delimiter) -> Result<Vec<u8>> {
    let mut writer = WriterBuilder::new()
        .delimiter(delimiter.as_byte())
        .from_writer(Vec::new());

    writer.write_record(table.names())?;
    for row in 0..table.len() {
        writer.write_record(table.columns().iter().map(|c| c[row].to_string()))?;
    }

    writer.into_inner().map_err(|e| MsesError::ProcessingError {
        message: format!("failed to flush output: {}", e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::reader::parse_table;

    fn table() -> Table {
        Table::new(
            vec!["x".to_string(), "cp".to_string()],
            vec![vec![0.0, 0.1, 1.0 / 3.0], vec![1.0, -0.25, 0.125]],
        )
        .unwrap()
    }

    #[test]
    fn test_write_comma() {
        let bytes = write_table(&table(), Delimiter::Comma).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "x,cp");
        assert_eq!(lines[1], "0,1");
        assert_eq!(lines[2], "0.1,-0.25");
    }

    #[test]
    fn test_write_space_reads_back_exactly() {
        let original = table();
        let bytes = write_table(&original, Delimiter::Space).unwrap();
        let text = String::from_utf8(bytes).unwrap();

        assert!(text.starts_with("x cp\n"));
        assert_eq!(parse_table(&text).unwrap(), original);
    }
}
