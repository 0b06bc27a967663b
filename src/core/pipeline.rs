use crate::adapters::{csv_table, http, report::RankingReport};
use crate::core::topsis::TopsisEngine;
use crate::core::{ConfigProvider, DecisionTable, Pipeline, Storage, TransformResult};
use crate::domain::model::{ImpactVector, ScoredTable, WeightVector};
use crate::utils::error::{Result, TopsisError};
use crate::utils::validation::is_remote;
use reqwest::Client;
use std::io::Write;
use zip::write::{SimpleFileOptions, ZipWriter};

pub struct TopsisPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    client: Client,
}

impl<S: Storage, C: ConfigProvider> TopsisPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self {
            storage,
            config,
            client: Client::new(),
        }
    }

    fn input_delimiter(&self) -> u8 {
        self.config
            .delimiter()
            .unwrap_or_else(|| csv_table::delimiter_for(self.config.input_location()))
    }

    fn output_file(&self, name: &str) -> String {
        format!("{}/{}", self.config.output_path().trim_end_matches('/'), name)
    }

    fn render(&self, format: &str, scored: &ScoredTable) -> Result<String> {
        let precision = self.config.precision();
        match format {
            "csv" => csv_table::write_scored_table(scored, b',', precision),
            "tsv" => csv_table::write_scored_table(scored, b'\t', precision),
            "json" => RankingReport::from_scored(scored).to_json(),
            other => Err(TopsisError::InvalidConfigValueError {
                field: "output_formats".to_string(),
                value: other.to_string(),
                reason: "Unsupported format".to_string(),
            }),
        }
    }

    fn bundle(outputs: &[(String, String)]) -> Result<Vec<u8>> {
        let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
        for (name, content) in outputs {
            zip.start_file(name.as_str(), SimpleFileOptions::default())?;
            zip.write_all(content.as_bytes())?;
        }
        Ok(zip.finish()?.into_inner())
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for TopsisPipeline<S, C> {
    async fn extract(&self) -> Result<DecisionTable> {
        let location = self.config.input_location();

        let data = if is_remote(location) {
            http::fetch_table(&self.client, location).await?
        } else {
            tracing::debug!("Reading decision table from: {}", location);
            self.storage.read_file(location).await?
        };

        csv_table::read_decision_table(&data, self.input_delimiter(), self.config.has_header())
    }

    async fn transform(&self, table: DecisionTable) -> Result<TransformResult> {
        let weights = WeightVector::parse(self.config.weights())?;
        let impacts = ImpactVector::parse(self.config.impacts())?;

        let scored = TopsisEngine::score(table, &weights, &impacts)?;

        let mut outputs = Vec::new();
        for format in self.config.output_formats() {
            let name = format!("{}.{}", self.config.output_name(), format);
            outputs.push((name, self.render(format, &scored)?));
        }

        Ok(TransformResult { scored, outputs })
    }

    async fn load(&self, result: TransformResult) -> Result<String> {
        if let Some(bundle) = self.config.bundle_name() {
            let bundle_name = if bundle.ends_with(".zip") {
                bundle.to_string()
            } else {
                format!("{}.zip", bundle)
            };

            tracing::debug!(
                "Creating ZIP bundle with {} files",
                result.outputs.len()
            );
            let zip_data = Self::bundle(&result.outputs)?;

            let path = self.output_file(&bundle_name);
            tracing::debug!("Writing ZIP bundle ({} bytes) to {}", zip_data.len(), path);
            self.storage.write_file(&path, &zip_data).await?;
            return Ok(path);
        }

        let mut written = Vec::with_capacity(result.outputs.len());
        for (name, content) in &result.outputs {
            let path = self.output_file(name);
            tracing::debug!("Writing {} ({} bytes)", path, content.len());
            self.storage.write_file(&path, content.as_bytes()).await?;
            written.push(path);
        }

        Ok(written.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn new() -> Self {
            Self {
                files: Arc::new(Mutex::new(HashMap::new())),
            }
        }

        async fn put(&self, path: &str, data: &str) {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.as_bytes().to_vec());
        }

        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                TopsisError::IoError(std::io::Error::new(
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

    struct MockConfig {
        input: String,
        weights: String,
        impacts: String,
        formats: Vec<String>,
        bundle: Option<String>,
    }

    impl MockConfig {
        fn new(input: &str, weights: &str, impacts: &str) -> Self {
            Self {
                input: input.to_string(),
                weights: weights.to_string(),
                impacts: impacts.to_string(),
                formats: vec!["csv".to_string()],
                bundle: None,
            }
        }
    }

    impl ConfigProvider for MockConfig {
        fn input_location(&self) -> &str {
            &self.input
        }

        fn weights(&self) -> &str {
            &self.weights
        }

        fn impacts(&self) -> &str {
            &self.impacts
        }

        fn has_header(&self) -> Option<bool> {
            None
        }

        fn delimiter(&self) -> Option<u8> {
            None
        }

        fn output_path(&self) -> &str {
            "out"
        }

        fn output_name(&self) -> &str {
            "topsis_result"
        }

        fn output_formats(&self) -> &[String] {
            &self.formats
        }

        fn precision(&self) -> Option<usize> {
            Some(4)
        }

        fn bundle_name(&self) -> Option<&str> {
            self.bundle.as_deref()
        }
    }

    const CARS: &str = "Model,Price,Mileage\nA,1,1\nB,2,2\nC,3,3\n";

    #[tokio::test]
    async fn test_extract_from_storage() {
        let storage = MockStorage::new();
        storage.put("cars.csv", CARS).await;
        let pipeline = TopsisPipeline::new(storage, MockConfig::new("cars.csv", "1,1", "+,+"));

        let table = pipeline.extract().await.unwrap();

        assert_eq!(table.len(), 3);
        assert_eq!(table.criterion_names(), vec!["Price", "Mileage"]);
    }

    #[tokio::test]
    async fn test_extract_missing_file() {
        let pipeline =
            TopsisPipeline::new(MockStorage::new(), MockConfig::new("nope.csv", "1", "+"));
        let err = pipeline.extract().await.unwrap_err();
        assert!(matches!(err, TopsisError::IoError(_)));
    }

    #[tokio::test]
    async fn test_extract_from_http_source() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/tables/cars.csv");
            then.status(200)
                .header("Content-Type", "text/csv")
                .body(CARS);
        });

        let config = MockConfig::new(&server.url("/tables/cars.csv"), "1,1", "+,+");
        let pipeline = TopsisPipeline::new(MockStorage::new(), config);

        let table = pipeline.extract().await.unwrap();

        api_mock.assert();
        assert_eq!(table.rows()[2].id, "C");
    }

    #[tokio::test]
    async fn test_extract_http_failure_is_api_error() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/missing.csv");
            then.status(404);
        });

        let config = MockConfig::new(&server.url("/missing.csv"), "1", "+");
        let pipeline = TopsisPipeline::new(MockStorage::new(), config);

        let err = pipeline.extract().await.unwrap_err();

        api_mock.assert();
        assert!(matches!(err, TopsisError::ApiError(_)));
    }

    #[tokio::test]
    async fn test_transform_renders_requested_formats() {
        let storage = MockStorage::new();
        storage.put("cars.csv", CARS).await;
        let mut config = MockConfig::new("cars.csv", "1,1", "+,+");
        config.formats = vec!["csv".to_string(), "tsv".to_string(), "json".to_string()];
        let pipeline = TopsisPipeline::new(storage, config);

        let table = pipeline.extract().await.unwrap();
        let result = pipeline.transform(table).await.unwrap();

        let names: Vec<&str> = result.outputs.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(
            names,
            vec!["topsis_result.csv", "topsis_result.tsv", "topsis_result.json"]
        );

        let csv_lines: Vec<&str> = result.outputs[0].1.lines().collect();
        assert_eq!(csv_lines[0], "Model,Price,Mileage,Topsis Score,Rank");
        assert_eq!(csv_lines[1], "A,1,1,0.0000,3");
        assert_eq!(csv_lines[2], "B,2,2,0.5000,2");
        assert_eq!(csv_lines[3], "C,3,3,1.0000,1");
        assert_eq!(result.scored.ranks(), vec![3, 2, 1]);
    }

    #[tokio::test]
    async fn test_transform_rejects_shape_mismatch() {
        let storage = MockStorage::new();
        storage.put("cars.csv", CARS).await;
        let pipeline = TopsisPipeline::new(storage, MockConfig::new("cars.csv", "1,1,1", "+,+"));

        let table = pipeline.extract().await.unwrap();
        let err = pipeline.transform(table).await.unwrap_err();

        assert!(matches!(err, TopsisError::ShapeMismatch { expected: 2, actual: 3, .. }));
    }

    #[tokio::test]
    async fn test_load_writes_each_format() {
        let storage = MockStorage::new();
        storage.put("cars.csv", CARS).await;
        let mut config = MockConfig::new("cars.csv", "1,1", "-,-");
        config.formats = vec!["csv".to_string(), "json".to_string()];
        let pipeline = TopsisPipeline::new(storage.clone(), config);

        let table = pipeline.extract().await.unwrap();
        let result = pipeline.transform(table).await.unwrap();
        let written = pipeline.load(result).await.unwrap();

        assert_eq!(written, "out/topsis_result.csv, out/topsis_result.json");
        let csv = String::from_utf8(storage.get_file("out/topsis_result.csv").await.unwrap()).unwrap();
        assert!(csv.contains("A,1,1,1.0000,1"));
        assert!(storage.get_file("out/topsis_result.json").await.is_some());
    }

    #[tokio::test]
    async fn test_load_bundles_into_zip() {
        let storage = MockStorage::new();
        storage.put("cars.csv", CARS).await;
        let mut config = MockConfig::new("cars.csv", "1,1", "+,+");
        config.formats = vec!["csv".to_string(), "tsv".to_string()];
        config.bundle = Some("results".to_string());
        let pipeline = TopsisPipeline::new(storage.clone(), config);

        let table = pipeline.extract().await.unwrap();
        let result = pipeline.transform(table).await.unwrap();
        let written = pipeline.load(result).await.unwrap();

        assert_eq!(written, "out/results.zip");
        let zip_bytes = storage.get_file("out/results.zip").await.unwrap();
        let mut archive = zip::ZipArchive::new(std::io::Cursor::new(zip_bytes)).unwrap();

        let mut file_names: Vec<String> = (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect();
        file_names.sort();
        assert_eq!(file_names, vec!["topsis_result.csv", "topsis_result.tsv"]);

        let mut csv_file = archive.by_name("topsis_result.csv").unwrap();
        let mut content = String::new();
        std::io::Read::read_to_string(&mut csv_file, &mut content).unwrap();
        assert!(content.starts_with("Model,Price,Mileage,Topsis Score,Rank"));
    }
}
