pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::domain::model::{Delimiter, GridSpec, LeadingEdgeDedup, Mode};
#[cfg(feature = "cli")]
use crate::domain::ports::ConfigProvider;
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{self, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "mses-split")]
#[command(about = "Split, interpolate and merge MSES airfoil surface data")]
pub struct CliConfig {
    /// MSES data file (upper surface file in merge mode)
    pub input: String,

    #[arg(long, value_enum, default_value_t = Mode::Split)]
    pub mode: Mode,

    /// Lower surface file, required in merge mode
    #[arg(long)]
    pub lower_input: Option<String>,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    /// Number of points of the interpolation grid
    #[arg(long, default_value = "151")]
    pub points: usize,

    #[arg(long, default_value = "0.0", allow_hyphen_values = true)]
    pub x_min: f64,

    #[arg(long, default_value = "1.0", allow_hyphen_values = true)]
    pub x_max: f64,

    #[arg(long, value_enum, default_value_t = Delimiter::Comma)]
    pub delimiter: Delimiter,

    /// Column holding x-coordinates (defaults to the first column)
    #[arg(long)]
    pub x_column: Option<String>,

    /// Column used for the leading edge duplicate check (defaults to the first non-x column)
    #[arg(long)]
    pub geometry_column: Option<String>,

    #[arg(long, value_enum, default_value_t = LeadingEdgeDedup::ZeroOrdinate)]
    pub dedup: LeadingEdgeDedup,

    /// Also bundle all outputs into a ZIP archive
    #[arg(long)]
    pub archive: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn input_path(&self) -> &str {
        &self.input
    }

    fn lower_input_path(&self) -> Option<&str> {
        self.lower_input.as_deref()
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn mode(&self) -> Mode {
        self.mode
    }

    fn grid(&self) -> GridSpec {
        GridSpec {
            points: self.points,
            x_min: self.x_min,
            x_max: self.x_max,
        }
    }

    fn delimiter(&self) -> Delimiter {
        self.delimiter
    }

    fn x_column(&self) -> Option<&str> {
        self.x_column.as_deref()
    }

    fn geometry_column(&self) -> Option<&str> {
        self.geometry_column.as_deref()
    }

    fn dedup(&self) -> LeadingEdgeDedup {
        self.dedup
    }

    fn archive(&self) -> bool {
        self.archive
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_path("input", &self.input)?;
        validation::validate_path("output_path", &self.output_path)?;

        if self.mode == Mode::Merge {
            let lower = validation::validate_required_field("lower_input", &self.lower_input)?;
            validation::validate_path("lower_input", lower)?;
        }
        if self.mode == Mode::Interp {
            validation::validate_grid("grid", &self.grid())?;
        }
        if let Some(column) = &self.x_column {
            validation::validate_non_empty_string("x_column", column)?;
        }
        if let Some(column) = &self.geometry_column {
            validation::validate_non_empty_string("geometry_column", column)?;
        }

        Ok(())
    }
}
