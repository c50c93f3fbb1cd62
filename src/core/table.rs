use crate::core::geometry::{check_ascending, find_leading_edge, join_surfaces, split_at_leading_edge};
use crate::core::interp::interp_all;
use crate::domain::model::{LeadingEdgeDedup, Surface, SurfacePair, Table};
use crate::utils::error::{MsesError, Result};

/// Split every column of `table` at the leading edge found in `x_column`.
pub fn split_table(table: &Table, x_column: &str) -> Result<SurfacePair<Table>> {
    let le = find_leading_edge(table.column(x_column)?)?;
    tracing::debug!(leading_edge = le, columns = table.width(), "Splitting table");

    let mut upper = Vec::with_capacity(table.width());
    let mut lower = Vec::with_capacity(table.width());
    for (_, column) in table.iter() {
        let split = split_at_leading_edge(column, le);
        upper.push(split.upper);
        lower.push(split.lower);
    }

    Ok(SurfacePair::new(
        Table::new(table.names().to_vec(), upper)?,
        Table::new(table.names().to_vec(), lower)?,
    ))
}

/// Split every column and resample each surface onto `xout`.
///
/// The x column of both result tables is `xout` itself.
pub fn interpolate_table(xout: &[f64], table: &Table, x_column: &str) -> Result<SurfacePair<Table>> {
    let split = split_table(table, x_column)?;
    let xs = SurfacePair::new(
        split.upper.column(x_column)?.to_vec(),
        split.lower.column(x_column)?.to_vec(),
    );
    check_ascending(&xs)?;

    split.try_map(|surface, side| {
        let columns = side
            .iter()
            .map(|(name, column)| {
                if name == x_column {
                    xout.to_vec()
                } else {
                    interp_all(xout, &xs[surface], column)
                }
            })
            .collect();
        Table::new(side.names().to_vec(), columns)
    })
}

/// Merge upper and lower tables back into MSES order.
///
/// Whether the leading edge point is duplicated is decided once, from
/// `x_column` and `geometry_column`, and applied to every column.
pub fn merge_tables(
    lower: &Table,
    upper: &Table,
    x_column: &str,
    geometry_column: &str,
    dedup: LeadingEdgeDedup,
) -> Result<Table> {
    for (surface, side) in [(Surface::Lower, lower), (Surface::Upper, upper)] {
        if side.is_empty() {
            return Err(MsesError::EmptySurface { surface });
        }
    }
    if lower.width() != upper.width() {
        return Err(MsesError::length_mismatch(
            "lower/upper column count",
            upper.width(),
            lower.width(),
        ));
    }

    let first = |side: &Table, name: &str| -> Result<f64> { Ok(side.column(name)?[0]) };
    let drop_first = dedup.applies(
        (first(lower, x_column)?, first(lower, geometry_column)?),
        (first(upper, x_column)?, first(upper, geometry_column)?),
    );
    let skip = usize::from(drop_first);
    if drop_first {
        tracing::debug!("Dropping duplicate leading edge row from lower surface");
    }

    let columns = upper
        .iter()
        .map(|(name, up)| Ok(join_surfaces(lower.column(name)?, up, skip)))
        .collect::<Result<Vec<_>>>()?;

    Table::new(upper.names().to_vec(), columns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn pressure_table() -> Table {
        Table::new(
            vec!["x".to_string(), "z".to_string(), "cp".to_string()],
            vec![
                vec![1.0, 0.5, 0.0, 0.5, 1.0],
                vec![0.0, 0.06, 0.0, -0.04, 0.0],
                vec![0.2, -0.8, 1.0, 0.1, 0.2],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_split_table_keeps_columns_aligned() {
        let split = split_table(&pressure_table(), "x").unwrap();

        assert_eq!(split.upper.column("x").unwrap(), &[0.0, 0.5, 1.0]);
        assert_eq!(split.upper.column("cp").unwrap(), &[1.0, -0.8, 0.2]);
        assert_eq!(split.lower.column("x").unwrap(), &[0.5, 1.0]);
        assert_eq!(split.lower.column("z").unwrap(), &[-0.04, 0.0]);
        assert_eq!(split.upper.len() + split.lower.len(), 5);
    }

    #[test]
    fn test_split_table_missing_x_column() {
        let result = split_table(&pressure_table(), "xc");
        assert!(matches!(result, Err(MsesError::MissingColumn { .. })));
    }

    #[test]
    fn test_interpolate_table() {
        let xout = [0.0, 0.25, 0.75];
        let result = interpolate_table(&xout, &pressure_table(), "x").unwrap();

        assert_eq!(result.upper.column("x").unwrap(), &xout);
        assert_eq!(result.lower.column("x").unwrap(), &xout);
        assert_relative_eq!(result.upper.column("cp").unwrap()[1], 0.1, epsilon = 1e-12);
        assert_relative_eq!(result.lower.column("z").unwrap()[0], -0.04);
        assert_relative_eq!(result.lower.column("z").unwrap()[2], -0.02, epsilon = 1e-12);
    }

    #[test]
    fn test_merge_tables_round_trip() {
        let table = pressure_table();
        let split = split_table(&table, "x").unwrap();

        let merged = merge_tables(
            &split.lower,
            &split.upper,
            "x",
            "z",
            LeadingEdgeDedup::ZeroOrdinate,
        )
        .unwrap();

        assert_eq!(merged, table);
    }

    #[test]
    fn test_merge_tables_uses_geometry_column_for_dedup() {
        let names = vec!["x".to_string(), "z".to_string(), "cp".to_string()];
        let upper = Table::new(
            names.clone(),
            vec![vec![0.0, 1.0], vec![0.0, 0.0], vec![1.0, 0.2]],
        )
        .unwrap();
        let lower = Table::new(
            names,
            vec![vec![0.0, 1.0], vec![0.0, 0.0], vec![1.0, 0.3]],
        )
        .unwrap();

        let merged =
            merge_tables(&lower, &upper, "x", "z", LeadingEdgeDedup::ZeroOrdinate).unwrap();

        // cp is non-zero at the leading edge but follows the geometry decision
        assert_eq!(merged.len(), 3);
        assert_eq!(merged.column("cp").unwrap(), &[0.2, 1.0, 0.3]);
    }

    #[test]
    fn test_merge_tables_rejects_empty_surface() {
        let names = vec!["x".to_string(), "z".to_string()];
        let empty = Table::new(names.clone(), vec![vec![], vec![]]).unwrap();
        let upper = Table::new(names, vec![vec![0.0], vec![0.0]]).unwrap();

        let result = merge_tables(&empty, &upper, "x", "z", LeadingEdgeDedup::Never);
        assert!(matches!(
            result,
            Err(MsesError::EmptySurface {
                surface: Surface::Lower
            })
        ));
    }

    #[test]
    fn test_merge_tables_rejects_different_widths() {
        let lower = Table::new(
            vec!["x".to_string(), "z".to_string()],
            vec![vec![0.5, 1.0], vec![-0.04, 0.0]],
        )
        .unwrap();
        let upper = Table::new(
            vec!["x".to_string(), "z".to_string(), "cp".to_string()],
            vec![vec![0.0, 1.0], vec![0.0, 0.0], vec![1.0, 0.2]],
        )
        .unwrap();

        let result = merge_tables(&lower, &upper, "x", "z", LeadingEdgeDedup::ZeroOrdinate);
        assert!(matches!(
            result,
            Err(MsesError::LengthMismatch {
                expected: 3,
                actual: 2,
                ..
            })
        ));
    }
}
