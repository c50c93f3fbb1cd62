use crate::utils::error::{MsesError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::ops::Index;

/// One side of the airfoil contour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Surface {
    Upper,
    Lower,
}

impl Surface {
    pub const ALL: [Surface; 2] = [Surface::Upper, Surface::Lower];

    pub fn as_str(&self) -> &'static str {
        match self {
            Surface::Upper => "upper",
            Surface::Lower => "lower",
        }
    }
}

impl fmt::Display for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A value held once per surface, addressed by [`Surface`] rather than by position.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SurfacePair<T> {
    pub upper: T,
    pub lower: T,
}

impl<T> SurfacePair<T> {
    pub fn new(upper: T, lower: T) -> Self {
        Self { upper, lower }
    }

    pub fn get(&self, surface: Surface) -> &T {
        match surface {
            Surface::Upper => &self.upper,
            Surface::Lower => &self.lower,
        }
    }

    pub fn map<U, F: FnMut(T) -> U>(self, mut f: F) -> SurfacePair<U> {
        SurfacePair {
            upper: f(self.upper),
            lower: f(self.lower),
        }
    }

    pub fn try_map<U, F: FnMut(Surface, T) -> Result<U>>(self, mut f: F) -> Result<SurfacePair<U>> {
        Ok(SurfacePair {
            upper: f(Surface::Upper, self.upper)?,
            lower: f(Surface::Lower, self.lower)?,
        })
    }
}

impl<T> Index<Surface> for SurfacePair<T> {
    type Output = T;

    fn index(&self, surface: Surface) -> &T {
        self.get(surface)
    }
}

/// Closed contour in MSES order: trailing edge, upper surface forward to the
/// leading edge, then the lower surface back to the trailing edge.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Curve {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

impl Curve {
    pub fn new(x: Vec<f64>, y: Vec<f64>) -> Self {
        Self { x, y }
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

/// Points of a single surface, ordered leading edge to trailing edge.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SurfaceCurve {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

impl SurfaceCurve {
    pub fn new(x: Vec<f64>, y: Vec<f64>) -> Self {
        Self { x, y }
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

/// How the merge treats a lower-surface point that repeats the leading edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "kebab-case")]
pub enum LeadingEdgeDedup {
    /// Drop when x matches and both ordinates are exactly zero (geometry files).
    #[default]
    ZeroOrdinate,
    /// Drop when x and the ordinate both match.
    Coincident,
    Never,
}

impl LeadingEdgeDedup {
    /// `lower` and `upper` are the first (x, value) points of each surface.
    pub fn applies(&self, lower: (f64, f64), upper: (f64, f64)) -> bool {
        match self {
            LeadingEdgeDedup::ZeroOrdinate => {
                lower.0 == upper.0 && lower.1 == 0.0 && upper.1 == 0.0
            }
            LeadingEdgeDedup::Coincident => lower.0 == upper.0 && lower.1 == upper.1,
            LeadingEdgeDedup::Never => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Write upper and lower surfaces as separate files
    #[default]
    Split,
    /// Resample both surfaces onto a common x grid
    Interp,
    /// Rebuild the closed curve from upper and lower surface files
    Merge,
    /// Split, merge back and verify the input is reproduced
    Roundtrip,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Split => "split",
            Mode::Interp => "interp",
            Mode::Merge => "merge",
            Mode::Roundtrip => "roundtrip",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum Delimiter {
    #[default]
    Comma,
    Space,
    Tab,
}

impl Delimiter {
    pub fn as_byte(&self) -> u8 {
        match self {
            Delimiter::Comma => b',',
            Delimiter::Space => b' ',
            Delimiter::Tab => b'\t',
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Delimiter::Comma => "csv",
            Delimiter::Space => "dat",
            Delimiter::Tab => "tsv",
        }
    }
}

/// Evenly spaced target grid for interpolation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridSpec {
    pub points: usize,
    pub x_min: f64,
    pub x_max: f64,
}

impl Default for GridSpec {
    fn default() -> Self {
        Self {
            points: 151,
            x_min: 0.0,
            x_max: 1.0,
        }
    }
}

/// Named numeric columns of equal length, as read from a data file.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    names: Vec<String>,
    columns: Vec<Vec<f64>>,
}

impl Table {
    pub fn new(names: Vec<String>, columns: Vec<Vec<f64>>) -> Result<Self> {
        if names.len() != columns.len() {
            return Err(MsesError::length_mismatch(
                "table header",
                columns.len(),
                names.len(),
            ));
        }

        let mut seen = HashSet::new();
        for name in &names {
            if !seen.insert(name.as_str()) {
                return Err(MsesError::Parse {
                    line: 1,
                    message: format!("duplicate column name '{}'", name),
                });
            }
        }

        if let Some(first) = columns.first() {
            for (name, column) in names.iter().zip(&columns).skip(1) {
                if column.len() != first.len() {
                    return Err(MsesError::length_mismatch(
                        format!("column '{}'", name),
                        first.len(),
                        column.len(),
                    ));
                }
            }
        }

        Ok(Self { names, columns })
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn columns(&self) -> &[Vec<f64>] {
        &self.columns
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.columns.first().map(Vec::len).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.names
            .iter()
            .position(|n| n == name)
            .ok_or_else(|| MsesError::MissingColumn {
                name: name.to_string(),
            })
    }

    pub fn column(&self, name: &str) -> Result<&[f64]> {
        let index = self.column_index(name)?;
        Ok(&self.columns[index])
    }

    /// First column whose name is not `x_column`.
    pub fn first_data_column(&self, x_column: &str) -> Option<&str> {
        self.names
            .iter()
            .map(String::as_str)
            .find(|name| *name != x_column)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.names
            .iter()
            .map(String::as_str)
            .zip(self.columns.iter().map(Vec::as_slice))
    }
}

/// Everything read by the extract phase.
#[derive(Debug, Clone)]
pub struct SourceData {
    pub table: Table,
    /// Lower surface table, present in merge mode only.
    pub lower: Option<Table>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutputFile {
    pub name: String,
    pub contents: Vec<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub mode: Mode,
    pub input: String,
    pub lower_input: Option<String>,
    pub columns: Vec<String>,
    pub input_points: usize,
    pub leading_edge_index: Option<usize>,
    pub upper_points: usize,
    pub lower_points: usize,
    pub merged_points: Option<usize>,
    pub leading_edge_deduplicated: Option<bool>,
    pub grid_points: Option<usize>,
    pub files: Vec<String>,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct TransformResult {
    pub outputs: Vec<OutputFile>,
    pub summary: RunSummary,
}
