use std::io::ErrorKind;
use std::path::PathBuf;
use std::time::Duration;

use formats::BoundaryDocument;
use navigation::{BoundarySource, DatasetRef, FetchError, MapConfig};
use tracing::debug;

/// Boundary documents stored as GeoJSON files under one directory.
///
/// The file name comes from the configured dataset template and every read is
/// bounded by the configured fetch timeout.
#[derive(Debug, Clone)]
pub struct DirSource {
    root: PathBuf,
    config: MapConfig,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>, config: &MapConfig) -> Self {
        Self {
            root: root.into(),
            config: config.clone(),
        }
    }

    pub fn path_of(&self, dataset: &DatasetRef) -> PathBuf {
        self.root.join(self.config.dataset_location(dataset))
    }

    fn timeout(&self) -> Duration {
        self.config.fetch_timeout()
    }

    async fn read(&self, dataset: &DatasetRef) -> Result<BoundaryDocument, FetchError> {
        let path = self.path_of(dataset);
        debug!(dataset = %dataset, path = %path.display(), "reading boundary document");
        let text = match tokio::fs::read_to_string(&path).await {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Err(FetchError::NotFound(dataset.clone()));
            }
            Err(source) => {
                return Err(FetchError::Io {
                    dataset: dataset.clone(),
                    source,
                })
            }
        };
        BoundaryDocument::from_geojson_str(&text).map_err(|source| FetchError::Parse {
            dataset: dataset.clone(),
            source,
        })
    }
}

impl BoundarySource for DirSource {
    async fn fetch(&self, dataset: &DatasetRef) -> Result<BoundaryDocument, FetchError> {
        match tokio::time::timeout(self.timeout(), self.read(dataset)).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::TimedOut {
                dataset: dataset.clone(),
                after_ms: self.config.fetch_timeout_ms,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::DirSource;
    use navigation::{BoundarySource, DatasetRef, FetchError, MapConfig};

    #[tokio::test]
    async fn reads_documents_through_the_template() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(
            dir.path().join("geo_root.json"),
            r#"{"type":"FeatureCollection","features":[]}"#,
        )
        .expect("write");
        let config = MapConfig {
            dataset_url_template: "geo_{dataset}.json".to_string(),
            ..MapConfig::default()
        };
        let source = DirSource::new(dir.path(), &config);

        let doc = source.fetch(&DatasetRef::from("root")).await.expect("doc");
        assert!(doc.features.is_empty());

        let missing = source.fetch(&DatasetRef::from("nope")).await;
        assert!(matches!(missing, Err(FetchError::NotFound(_))));
    }

    #[tokio::test]
    async fn malformed_documents_are_parse_errors() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("bad.json"), r#"{"type":"Feature"}"#).expect("write");
        let source = DirSource::new(dir.path(), &MapConfig::default());
        let result = source.fetch(&DatasetRef::from("bad")).await;
        assert!(matches!(result, Err(FetchError::Parse { .. })));
    }
}
