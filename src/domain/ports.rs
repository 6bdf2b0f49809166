use crate::adapters::database::GdpDatabase;
use crate::domain::model::{GdpTable, RawTable};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Where the raw markup comes from.
pub trait PageSource: Send + Sync {
    fn fetch(&self, url: &str) -> impl std::future::Future<Output = Result<String>> + Send;
}

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<RawTable>;
    async fn transform(&self, table: RawTable) -> Result<GdpTable>;
    /// Returns the path the CSV was written to.
    async fn load_csv(&self, table: &GdpTable) -> Result<String>;
    /// Returns the number of rows written.
    async fn load_db(&self, table: &GdpTable, db: &GdpDatabase) -> Result<u64>;
}
