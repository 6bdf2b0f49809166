use crate::adapters::csv_sink;
use crate::adapters::database::GdpDatabase;
use crate::adapters::http::HttpFetcher;
use crate::adapters::storage::LocalStorage;
use crate::config::EtlConfig;
use crate::core::extract::extract_table;
use crate::core::transform::transform_table;
use crate::core::{GdpTable, PageSource, Pipeline, RawTable, Storage};
use crate::utils::error::Result;

pub struct GdpPipeline<S: Storage, P: PageSource> {
    pub(crate) storage: S,
    pub(crate) source: P,
    pub(crate) config: EtlConfig,
}

impl<S: Storage, P: PageSource> GdpPipeline<S, P> {
    pub fn new(storage: S, source: P, config: EtlConfig) -> Self {
        Self {
            storage,
            source,
            config,
        }
    }
}

impl GdpPipeline<LocalStorage, HttpFetcher> {
    /// Local disk relative to the working directory and a live HTTP client.
    pub fn from_config(config: EtlConfig) -> Result<Self> {
        let source = HttpFetcher::new(&config.user_agent, config.timeout_seconds)?;
        Ok(Self::new(LocalStorage::default(), source, config))
    }
}

#[async_trait::async_trait]
impl<S: Storage, P: PageSource> Pipeline for GdpPipeline<S, P> {
    async fn extract(&self) -> Result<RawTable> {
        tracing::info!("🌐 Fetching {}", self.config.url);
        let markup = self.source.fetch(&self.config.url).await?;

        let table = extract_table(
            &markup,
            &self.config.table_attribs,
            &self.config.table_locator,
        )?;
        tracing::info!("📊 Extracted {} records", table.len());
        Ok(table)
    }

    async fn transform(&self, table: RawTable) -> Result<GdpTable> {
        let table = transform_table(table)?;
        tracing::info!("🔧 Transformed {} records to billions", table.len());
        Ok(table)
    }

    async fn load_csv(&self, table: &GdpTable) -> Result<String> {
        csv_sink::write_csv_table(&self.storage, &self.config.csv_path, table).await?;
        tracing::info!("💾 CSV saved: {}", self.config.csv_path);
        Ok(self.config.csv_path.clone())
    }

    async fn load_db(&self, table: &GdpTable, db: &GdpDatabase) -> Result<u64> {
        let rows = db.replace_table(table, &self.config.table_name).await?;
        tracing::info!("🗄️ Loaded {} rows into table {}", rows, self.config.table_name);
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::EtlError;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    struct StaticPage(String);

    impl PageSource for StaticPage {
        async fn fetch(&self, _url: &str) -> Result<String> {
            Ok(self.0.clone())
        }
    }

    #[derive(Clone, Default)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                EtlError::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    const PAGE: &str = r#"<html><body>
<table><tbody><tr><td>a</td></tr></tbody></table>
<table><tbody><tr><td>b</td></tr></tbody></table>
<table><tbody>
<tr><th>Country</th><th>Region</th><th>Estimate</th></tr>
<tr><td><a href="/wiki/China">China</a></td><td>Asia</td><td>19,373,586</td></tr>
<tr><td><a href="/wiki/Tonga">Tonga</a></td><td>Oceania</td><td>—</td></tr>
<tr><td><a href="/wiki/Palau">Palau</a></td><td>Oceania</td><td>267</td></tr>
</tbody></table>
</body></html>"#;

    fn pipeline(storage: MockStorage) -> GdpPipeline<MockStorage, StaticPage> {
        GdpPipeline::new(storage, StaticPage(PAGE.to_string()), EtlConfig::default())
    }

    #[tokio::test]
    async fn test_extract_and_transform() {
        let pipeline = pipeline(MockStorage::default());

        let raw = pipeline.extract().await.unwrap();
        assert_eq!(raw.len(), 2);
        assert_eq!(raw.columns, ["Country", "GDP_USD_millions"]);

        let table = pipeline.transform(raw).await.unwrap();
        assert_eq!(table.columns, ["Country", "GDP_USD_billions"]);
        assert_eq!(table.records[0].gdp, 19373.59);
        assert_eq!(table.records[1].gdp, 0.27);
    }

    #[tokio::test]
    async fn test_load_csv_goes_through_storage() {
        let storage = MockStorage::default();
        let pipeline = pipeline(storage.clone());

        let raw = pipeline.extract().await.unwrap();
        let table = pipeline.transform(raw).await.unwrap();
        let path = pipeline.load_csv(&table).await.unwrap();

        assert_eq!(path, "./Countries_by_GDP.csv");
        let written = storage.read_file(&path).await.unwrap();
        let text = String::from_utf8(written).unwrap();
        assert_eq!(text, "Country,GDP_USD_billions\nChina,19373.59\nPalau,0.27\n");
    }
}
