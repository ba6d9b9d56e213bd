//! Where provider rows come from. The registry owns validation and
//! normalization; sources only fetch.

use async_trait::async_trait;
use serde_json::Value;
use tracing::{info, instrument};

use crate::error::{DirectoryError, Result};

/// A source of raw provider rows.
#[async_trait]
pub trait RegistrySource: Send + Sync {
    /// Unique identifier for this source, used in logs.
    fn source_name(&self) -> &'static str;

    /// Fetches every row from this source.
    async fn fetch_rows(&self) -> Result<Vec<Value>>;
}

/// Reads rows from a JSON file holding a top-level array of row objects.
pub struct JsonFileSource {
    path: String,
}

impl JsonFileSource {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl RegistrySource for JsonFileSource {
    fn source_name(&self) -> &'static str {
        "json_file"
    }

    #[instrument(skip(self), fields(path = %self.path))]
    async fn fetch_rows(&self) -> Result<Vec<Value>> {
        let payload = tokio::fs::read_to_string(&self.path).await?;
        let data: Value = serde_json::from_str(&payload)?;

        let rows = data
            .as_array()
            .ok_or_else(|| DirectoryError::MissingField("top-level row array not found".into()))?;

        info!("Fetched {} rows from {}", rows.len(), self.path);
        Ok(rows.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_fetch_rows_from_json_array() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"name": "Dr Ali", "address": "Main St", "category": "دكتور",
                 "specialization": "قلب", "phone": "123", "notes": ""}}]"#
        )
        .unwrap();

        let source = JsonFileSource::new(file.path().to_str().unwrap());
        let rows = source.fetch_rows().await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["name"], "Dr Ali");
    }

    #[tokio::test]
    async fn test_fetch_rows_rejects_non_array_payload() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"rows": []}}"#).unwrap();

        let source = JsonFileSource::new(file.path().to_str().unwrap());
        let err = source.fetch_rows().await.unwrap_err();
        assert!(matches!(err, DirectoryError::MissingField(_)));
    }

    #[tokio::test]
    async fn test_fetch_rows_missing_file_is_io_error() {
        let source = JsonFileSource::new("no-such-file.json");
        let err = source.fetch_rows().await.unwrap_err();
        assert!(matches!(err, DirectoryError::Io(_)));
    }
}
