pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{cli::LocalStorage, toml_config::TomlConfig};

pub use self::core::geometry::{
    find_leading_edge, interpolate_surfaces, merge_surfaces, merge_surfaces_with, split_surfaces,
};
pub use self::core::interp::{interp, linspace};
pub use self::core::reader::{parse_table, read_geometry};
pub use self::core::table::{interpolate_table, merge_tables, split_table};
pub use self::core::{engine::MsesEngine, pipeline::MsesPipeline};
pub use domain::model::{
    Curve, Delimiter, GridSpec, LeadingEdgeDedup, Mode, Surface, SurfaceCurve, SurfacePair, Table,
};
pub use utils::error::{MsesError, Result};
