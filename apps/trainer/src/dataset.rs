//! Dataset fetch from a local file or an HTTP URL.

use crate::config::DatasetSource;
use reqwest::header::CACHE_CONTROL;
use reqwest::Client;
use thiserror::Error;
use vocab_core::{parse_dataset, DatasetError, VocabEntry};

/// Shown once when the dataset cannot be loaded.
pub const LOAD_ERROR_MESSAGE: &str =
    "データ読み込みに失敗しました。データファイルの場所を確認してください（VOCAB_DATASET）。";

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("HTTP {status}")]
    Status { status: u16 },

    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Dataset(#[from] DatasetError),
}

/// Fetch and parse the dataset.
pub async fn load(source: &DatasetSource) -> Result<Vec<VocabEntry>, LoadError> {
    let body = match source {
        DatasetSource::Path(path) => {
            tokio::fs::read_to_string(path)
                .await
                .map_err(|source| LoadError::Io {
                    path: path.display().to_string(),
                    source,
                })?
        }
        DatasetSource::Url(url) => fetch(url).await?,
    };

    let entries = parse_dataset(&body)?;
    tracing::info!(%source, entries = entries.len(), "dataset loaded");
    Ok(entries)
}

async fn fetch(url: &str) -> Result<String, LoadError> {
    let response = Client::new()
        .get(url)
        .header(CACHE_CONTROL, "no-cache")
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(LoadError::Status {
            status: status.as_u16(),
        });
    }

    Ok(response.text().await?)
}
