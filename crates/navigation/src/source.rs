use std::collections::HashMap;
use std::future::Future;

use formats::{BoundaryDocument, BoundaryParseError};

/// Opaque dataset reference; only the fetch collaborator knows how to resolve it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DatasetRef(String);

impl DatasetRef {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for DatasetRef {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl std::fmt::Display for DatasetRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug)]
pub enum FetchError {
    NotFound(DatasetRef),
    Io {
        dataset: DatasetRef,
        source: std::io::Error,
    },
    Parse {
        dataset: DatasetRef,
        source: BoundaryParseError,
    },
    TimedOut {
        dataset: DatasetRef,
        after_ms: u64,
    },
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchError::NotFound(dataset) => write!(f, "dataset {dataset} not found"),
            FetchError::Io { dataset, source } => write!(f, "reading dataset {dataset}: {source}"),
            FetchError::Parse { dataset, source } => write!(f, "parsing dataset {dataset}: {source}"),
            FetchError::TimedOut { dataset, after_ms } => {
                write!(f, "fetching dataset {dataset} timed out after {after_ms} ms")
            }
        }
    }
}

impl std::error::Error for FetchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FetchError::Io { source, .. } => Some(source),
            FetchError::Parse { source, .. } => Some(source),
            FetchError::NotFound(_) | FetchError::TimedOut { .. } => None,
        }
    }
}

/// Fetch collaborator: turns a dataset reference into a parsed boundary document.
///
/// The future is not required to be `Send`; the map core runs on a single
/// logical thread and awaits one fetch at a time per request.
pub trait BoundarySource {
    fn fetch(&self, dataset: &DatasetRef) -> impl Future<Output = Result<BoundaryDocument, FetchError>>;
}

/// Documents held in memory, keyed by dataset reference.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    documents: HashMap<DatasetRef, BoundaryDocument>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, dataset: impl Into<DatasetRef>, document: BoundaryDocument) {
        self.documents.insert(dataset.into(), document);
    }

    pub fn with(mut self, dataset: impl Into<DatasetRef>, document: BoundaryDocument) -> Self {
        self.insert(dataset, document);
        self
    }
}

impl BoundarySource for MemorySource {
    fn fetch(&self, dataset: &DatasetRef) -> impl Future<Output = Result<BoundaryDocument, FetchError>> {
        let result = self
            .documents
            .get(dataset)
            .cloned()
            .ok_or_else(|| FetchError::NotFound(dataset.clone()));
        std::future::ready(result)
    }
}

#[cfg(test)]
mod tests {
    use super::{BoundarySource, DatasetRef, FetchError, MemorySource};
    use formats::BoundaryDocument;

    #[test]
    fn memory_source_resolves_known_datasets() {
        let source = MemorySource::new().with("100000_full", BoundaryDocument::default());
        let doc = pollster::block_on(source.fetch(&DatasetRef::from("100000_full")));
        assert!(doc.is_ok());

        let missing = pollster::block_on(source.fetch(&DatasetRef::from("nope")));
        match missing {
            Err(FetchError::NotFound(ds)) => assert_eq!(ds.as_str(), "nope"),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn fetch_error_messages_name_the_dataset() {
        let err = FetchError::TimedOut {
            dataset: DatasetRef::from("440000_full"),
            after_ms: 250,
        };
        assert_eq!(err.to_string(), "fetching dataset 440000_full timed out after 250 ms");
    }
}
