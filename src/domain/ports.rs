use crate::domain::model::{
    Delimiter, GridSpec, LeadingEdgeDedup, Mode, SourceData, TransformResult,
};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn input_path(&self) -> &str;
    fn lower_input_path(&self) -> Option<&str>;
    fn output_path(&self) -> &str;
    fn mode(&self) -> Mode;
    fn grid(&self) -> GridSpec;
    fn delimiter(&self) -> Delimiter;
    fn x_column(&self) -> Option<&str>;
    fn geometry_column(&self) -> Option<&str>;
    fn dedup(&self) -> LeadingEdgeDedup;
    fn archive(&self) -> bool;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<SourceData>;
    async fn transform(&self, data: SourceData) -> Result<TransformResult>;
    async fn load(&self, result: TransformResult) -> Result<String>;
}
