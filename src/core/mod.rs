pub mod engine;
pub mod geometry;
pub mod interp;
pub mod pipeline;
pub mod reader;
pub mod table;
pub mod writer;

pub use crate::domain::model::{SourceData, TransformResult};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
