use crate::domain::model::{Curve, Table};
use crate::utils::error::{MsesError, Result};
use std::path::Path;

fn tokens(line: &str) -> impl Iterator<Item = &str> {
    line.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
}

fn default_names(width: usize) -> Vec<String> {
    (0..width)
        .map(|i| match i {
            0 => "x".to_string(),
            1 => "y".to_string(),
            _ => format!("c{}", i),
        })
        .collect()
}

/// Parse a delimited numeric data file.
///
/// The first line is always a header and never parsed as data. Its tokens name
/// the columns when they match the column count and none of them is a number,
/// so an airfoil title such as `NACA 2412` is skipped like any other header.
pub fn parse_table(content: &str) -> Result<Table> {
    let mut lines = content.lines();
    let header: Vec<String> = lines
        .next()
        .map(|line| tokens(line).map(str::to_string).collect())
        .unwrap_or_default();

    let mut columns: Vec<Vec<f64>> = Vec::new();
    for (index, line) in lines.enumerate() {
        let line_no = index + 2;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let row = tokens(trimmed)
            .map(|t| {
                t.parse::<f64>().map_err(|_| MsesError::Parse {
                    line: line_no,
                    message: format!("'{}' is not a number", t),
                })
            })
            .collect::<Result<Vec<f64>>>()?;

        if columns.is_empty() {
            if row.len() < 2 {
                return Err(MsesError::Parse {
                    line: line_no,
                    message: format!("expected at least 2 columns, found {}", row.len()),
                });
            }
            columns = vec![Vec::new(); row.len()];
        } else if row.len() != columns.len() {
            return Err(MsesError::Parse {
                line: line_no,
                message: format!("expected {} columns, found {}", columns.len(), row.len()),
            });
        }

        for (column, value) in columns.iter_mut().zip(row) {
            column.push(value);
        }
    }

    if columns.is_empty() {
        return Err(MsesError::Parse {
            line: 1,
            message: "no data rows after header".to_string(),
        });
    }

    let header_is_names = header.len() == columns.len()
        && header.iter().all(|t| t.parse::<f64>().is_err())
        && {
            let mut unique = header.clone();
            unique.sort();
            unique.dedup();
            unique.len() == header.len()
        };
    let names = if header_is_names {
        header
    } else {
        tracing::debug!("Header row not usable as column names, using defaults");
        default_names(columns.len())
    };

    Table::new(names, columns)
}

/// Read a two-column MSES geometry or pressure file into a curve.
///
/// Extra columns are ignored; use [`parse_table`] to keep them.
pub fn read_geometry<P: AsRef<Path>>(path: P) -> Result<Curve> {
    let content = std::fs::read_to_string(&path)?;
    let table = parse_table(&content)?;
    let columns = table.columns();
    Ok(Curve::new(columns[0].clone(), columns[1].clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_whitespace_with_named_header() {
        let content = "x  z\n 1.0   0.0\n0.5 0.06\n\n0.0 0.0\n";
        let table = parse_table(content).unwrap();

        assert_eq!(table.names(), &["x".to_string(), "z".to_string()]);
        assert_eq!(table.column("x").unwrap(), &[1.0, 0.5, 0.0]);
        assert_eq!(table.column("z").unwrap(), &[0.0, 0.06, 0.0]);
    }

    #[test]
    fn test_parse_comma_separated() {
        let content = "x,cp,cf\n1.0,0.2,0.001\n0.0,1.0,0.0\n";
        let table = parse_table(content).unwrap();

        assert_eq!(table.width(), 3);
        assert_eq!(table.column("cf").unwrap(), &[0.001, 0.0]);
    }

    #[test]
    fn test_parse_unusable_header_gets_default_names() {
        let content = "NACA 2412 airfoil\n1.0 0.0\n0.0 0.0\n";
        let table = parse_table(content).unwrap();
        assert_eq!(table.names(), &["x".to_string(), "y".to_string()]);

        // numeric first line is still skipped
        let content = "9.0 9.0 9.0\n1.0 0.0 1.0\n";
        let table = parse_table(content).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.names()[2], "c2");
    }

    #[test]
    fn test_parse_airfoil_title_is_not_column_names() {
        let content = "NACA 2412\n1.0 0.0\n0.0 0.0\n1.0 -0.01\n";
        let table = parse_table(content).unwrap();

        assert_eq!(table.names(), &["x".to_string(), "y".to_string()]);
        assert_eq!(table.column("x").unwrap(), &[1.0, 0.0, 1.0]);
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_parse_skips_comments() {
        let content = "x y\n# upper\n1.0 0.0\n# lower\n0.0 0.0\n";
        assert_eq!(parse_table(content).unwrap().len(), 2);
    }

    #[test]
    fn test_parse_rejects_bad_rows() {
        let err = parse_table("x y\n1.0 0.0\n0.5\n").unwrap_err();
        assert!(matches!(err, MsesError::Parse { line: 3, .. }));

        let err = parse_table("x y\n1.0 abc\n").unwrap_err();
        assert!(matches!(err, MsesError::Parse { line: 2, .. }));

        let err = parse_table("x y\n").unwrap_err();
        assert!(matches!(err, MsesError::Parse { .. }));

        let err = parse_table("x\n1.0\n").unwrap_err();
        assert!(matches!(err, MsesError::Parse { line: 2, .. }));
    }

    #[test]
    fn test_read_geometry_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "x z").unwrap();
        writeln!(file, "1.0 0.0").unwrap();
        writeln!(file, "0.0 0.0").unwrap();
        writeln!(file, "1.0 -0.01").unwrap();

        let curve = read_geometry(file.path()).unwrap();
        assert_eq!(curve.x, vec![1.0, 0.0, 1.0]);
        assert_eq!(curve.y, vec![0.0, 0.0, -0.01]);
    }
}
