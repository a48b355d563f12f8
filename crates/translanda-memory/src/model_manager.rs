// SPDX-FileCopyrightText: 2026 TransLanda Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! First-run download of the sentence embedding model.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use translanda_config::model::KnowledgeConfig;
use translanda_core::error::TranslandaError;

const MODEL_URL: &str =
    "https://huggingface.co/onnx-community/all-MiniLM-L6-v2-ONNX/resolve/main/onnx/model_quantized.onnx";
const TOKENIZER_URL: &str =
    "https://huggingface.co/sentence-transformers/all-MiniLM-L6-v2/resolve/main/tokenizer.json";

/// Resolves and fetches the ONNX model and tokenizer under
/// `<data_dir>/models/<model_name>/`.
pub struct ModelManager {
    data_dir: PathBuf,
    model_name: String,
}

impl ModelManager {
    pub fn new(data_dir: impl Into<PathBuf>, model_name: impl Into<String>) -> Self {
        Self {
            data_dir: data_dir.into(),
            model_name: model_name.into(),
        }
    }

    pub fn from_config(config: &KnowledgeConfig) -> Self {
        Self::new(&config.model_dir, &config.model_name)
    }

    pub fn model_dir(&self) -> PathBuf {
        self.data_dir.join("models").join(&self.model_name)
    }

    pub fn model_path(&self) -> PathBuf {
        self.model_dir().join("model.onnx")
    }

    pub fn tokenizer_path(&self) -> PathBuf {
        self.model_dir().join("tokenizer.json")
    }

    pub fn is_model_available(&self) -> bool {
        self.model_path().exists() && self.tokenizer_path().exists()
    }

    /// Returns the model path, downloading missing files first.
    ///
    /// Files already on disk are never fetched again, so a half-finished
    /// first run resumes where it stopped.
    pub async fn ensure_model(&self) -> Result<PathBuf, TranslandaError> {
        if self.is_model_available() {
            return Ok(self.model_path());
        }

        let model_dir = self.model_dir();
        info!(dir = %model_dir.display(), model = %self.model_name, "downloading embedding model");
        tokio::fs::create_dir_all(&model_dir)
            .await
            .map_err(TranslandaError::storage)?;

        for (dest, url) in [
            (self.model_path(), MODEL_URL),
            (self.tokenizer_path(), TOKENIZER_URL),
        ] {
            if dest.exists() {
                continue;
            }
            let size = download_file(url, &dest).await?;
            info!(file = %dest.display(), bytes = size, "downloaded");
        }

        Ok(self.model_path())
    }
}

/// Streams `url` into a temp file next to `dest`, then renames it into place.
async fn download_file(url: &str, dest: &Path) -> Result<usize, TranslandaError> {
    let response = reqwest::get(url)
        .await
        .and_then(|r| r.error_for_status())
        .map_err(|e| TranslandaError::embedding(format!("cannot download {url}: {e}")))?;

    let bytes = response
        .bytes()
        .await
        .map_err(|e| TranslandaError::embedding(format!("cannot read body of {url}: {e}")))?;

    let partial = dest.with_extension("part");
    if let Err(e) = tokio::fs::write(&partial, &bytes).await {
        warn!(file = %partial.display(), error = %e, "model write failed");
        let _ = tokio::fs::remove_file(&partial).await;
        return Err(TranslandaError::storage(e));
    }
    tokio::fs::rename(&partial, dest)
        .await
        .map_err(TranslandaError::storage)?;

    Ok(bytes.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_live_under_model_name() {
        let mgr = ModelManager::new("/srv/translanda", "all-MiniLM-L6-v2");
        assert_eq!(
            mgr.model_path(),
            PathBuf::from("/srv/translanda/models/all-MiniLM-L6-v2/model.onnx")
        );
        assert_eq!(
            mgr.tokenizer_path(),
            PathBuf::from("/srv/translanda/models/all-MiniLM-L6-v2/tokenizer.json")
        );
    }

    #[test]
    fn from_config_uses_knowledge_section() {
        let config = KnowledgeConfig {
            model_dir: "/data".into(),
            model_name: "mini".into(),
            ..KnowledgeConfig::default()
        };
        let mgr = ModelManager::from_config(&config);
        assert_eq!(mgr.model_dir(), PathBuf::from("/data/models/mini"));
    }

    #[tokio::test]
    async fn existing_files_skip_download() {
        let dir = tempfile::tempdir().unwrap();
        let mgr = ModelManager::new(dir.path(), "local");
        std::fs::create_dir_all(mgr.model_dir()).unwrap();
        std::fs::write(mgr.model_path(), b"onnx").unwrap();
        std::fs::write(mgr.tokenizer_path(), b"{}").unwrap();

        assert!(mgr.is_model_available());
        assert_eq!(mgr.ensure_model().await.unwrap(), mgr.model_path());
    }

    #[test]
    fn missing_files_are_reported_unavailable() {
        let mgr = ModelManager::new("/nonexistent/translanda", "all-MiniLM-L6-v2");
        assert!(!mgr.is_model_available());
    }
}
