// SPDX-FileCopyrightText: 2026 TransLanda Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Flat JSON file store behind the transcript and knowledge traits.
//!
//! The memory document is `{ "<user_id>": ["line", ...], ... }`, written with
//! 4-space indentation and non-ASCII text kept verbatim. Every write goes to a
//! sibling temp file first and is then renamed into place.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use translanda_config::model::{KnowledgeConfig, MemoryConfig};
use translanda_core::error::TranslandaError;
use translanda_core::traits::{KnowledgeSource, TranscriptStore};
use translanda_core::types::{KnowledgeEntry, MemoryMap, Transcript, UserId};

use crate::types::{BaseConversationDocument, CuratedDocument};

/// JSON flat-file backend.
///
/// Per-key operations are whole-document read-modify-write cycles,
/// serialised by an internal lock so concurrent writers cannot lose
/// each other's updates within one process.
pub struct JsonFileStore {
    memory_path: PathBuf,
    base_conversation_path: PathBuf,
    responses_path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    /// Creates a store over explicit file paths. Files are not touched until used.
    pub fn new(
        memory_path: impl Into<PathBuf>,
        base_conversation_path: impl Into<PathBuf>,
        responses_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            memory_path: memory_path.into(),
            base_conversation_path: base_conversation_path.into(),
            responses_path: responses_path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn from_config(memory: &MemoryConfig, knowledge: &KnowledgeConfig) -> Self {
        Self::new(
            &memory.memory_file,
            &memory.base_conversation_file,
            &knowledge.responses_file,
        )
    }

    pub fn memory_path(&self) -> &Path {
        &self.memory_path
    }

    async fn read_memory(&self) -> Result<MemoryMap, TranslandaError> {
        match read_optional(&self.memory_path).await? {
            Some(content) => serde_json::from_str(&content).map_err(|e| {
                TranslandaError::MalformedStore {
                    path: self.memory_path.clone(),
                    source: e,
                }
            }),
            None => Ok(MemoryMap::new()),
        }
    }

    async fn write_memory(&self, memory: &MemoryMap) -> Result<(), TranslandaError> {
        let bytes = to_indented_json(memory)?;
        write_atomically(&self.memory_path, &bytes).await?;
        debug!(
            path = %self.memory_path.display(),
            users = memory.len(),
            "memory store written"
        );
        Ok(())
    }
}

#[async_trait]
impl TranscriptStore for JsonFileStore {
    async fn load_memory(&self) -> Result<MemoryMap, TranslandaError> {
        let _guard = self.write_lock.lock().await;
        self.read_memory().await
    }

    async fn save_memory(&self, memory: &MemoryMap) -> Result<(), TranslandaError> {
        let _guard = self.write_lock.lock().await;
        self.write_memory(memory).await
    }

    async fn get_transcript(
        &self,
        user_id: &UserId,
    ) -> Result<Option<Transcript>, TranslandaError> {
        let _guard = self.write_lock.lock().await;
        let mut memory = self.read_memory().await?;
        Ok(memory.remove(user_id.as_str()))
    }

    async fn put_transcript(
        &self,
        user_id: &UserId,
        transcript: &Transcript,
    ) -> Result<(), TranslandaError> {
        let _guard = self.write_lock.lock().await;
        let mut memory = self.read_memory().await?;
        memory.insert(user_id.to_string(), transcript.clone());
        self.write_memory(&memory).await
    }
}

#[async_trait]
impl KnowledgeSource for JsonFileStore {
    async fn load_curated_entries(&self) -> Result<Vec<KnowledgeEntry>, TranslandaError> {
        let Some(content) = read_optional(&self.responses_path).await? else {
            debug!(path = %self.responses_path.display(), "no curated entries file");
            return Ok(Vec::new());
        };

        match serde_json::from_str::<CuratedDocument>(&content) {
            Ok(doc) => Ok(doc.preguntas),
            Err(e) => {
                warn!(
                    path = %self.responses_path.display(),
                    error = %e,
                    "curated entries file is malformed, matching disabled"
                );
                Ok(Vec::new())
            }
        }
    }

    async fn load_base_conversation(&self) -> Result<Transcript, TranslandaError> {
        let Some(content) = read_optional(&self.base_conversation_path).await? else {
            return Ok(Transcript::new());
        };

        let doc: BaseConversationDocument =
            serde_json::from_str(&content).map_err(|e| TranslandaError::MalformedStore {
                path: self.base_conversation_path.clone(),
                source: e,
            })?;
        Ok(doc.conversacion_base)
    }
}

/// Reads a file, mapping "not found" to `None`.
async fn read_optional(path: &Path) -> Result<Option<String>, TranslandaError> {
    match tokio::fs::read_to_string(path).await {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(TranslandaError::storage(e)),
    }
}

fn to_indented_json<T: Serialize>(value: &T) -> Result<Vec<u8>, TranslandaError> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value
        .serialize(&mut serializer)
        .map_err(|e| TranslandaError::Internal(format!("failed to serialize memory: {e}")))?;
    Ok(buf)
}

async fn write_atomically(path: &Path, bytes: &[u8]) -> Result<(), TranslandaError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(TranslandaError::storage)?;
    }

    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = PathBuf::from(tmp_name);

    tokio::fs::write(&tmp_path, bytes)
        .await
        .map_err(TranslandaError::storage)?;
    if let Err(e) = tokio::fs::rename(&tmp_path, path).await {
        let _ = tokio::fs::remove_file(&tmp_path).await;
        return Err(TranslandaError::storage(e));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_in(dir: &Path) -> JsonFileStore {
        JsonFileStore::new(
            dir.join("memoria.json"),
            dir.join("conversacion_base.json"),
            dir.join("preguntas.json"),
        )
    }

    #[tokio::test]
    async fn absent_files_load_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());

        assert!(store.load_memory().await.unwrap().is_empty());
        assert!(store.load_curated_entries().await.unwrap().is_empty());
        assert!(store.load_base_conversation().await.unwrap().is_empty());
        assert!(store.get_transcript(&UserId::from("1")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn malformed_memory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("memoria.json"), "{not json").unwrap();
        let store = store_in(dir.path());

        let err = store.load_memory().await.unwrap_err();
        assert!(matches!(err, TranslandaError::MalformedStore { .. }), "got {err:?}");
    }

    #[tokio::test]
    async fn malformed_base_conversation_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("conversacion_base.json"), "[1, 2").unwrap();
        let store = store_in(dir.path());

        let err = store.load_base_conversation().await.unwrap_err();
        assert!(matches!(err, TranslandaError::MalformedStore { .. }));
    }

    #[tokio::test]
    async fn malformed_curated_entries_degrade_to_empty() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("preguntas.json"), "{\"preguntas\": 7}").unwrap();
        let store = store_in(dir.path());

        assert!(store.load_curated_entries().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn curated_entries_load_in_file_order() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("preguntas.json"),
            r#"{"preguntas": [
                {"keys": ["hola", "buenas"], "response": "¡Hola!"},
                {"keys": ["precio"], "response": "Depende del viaje."}
            ]}"#,
        )
        .unwrap();
        let store = store_in(dir.path());

        let entries = store.load_curated_entries().await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].keys, vec!["hola", "buenas"]);
        assert_eq!(entries[1].response, "Depende del viaje.");
    }

    #[tokio::test]
    async fn base_conversation_loads_seed_lines() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("conversacion_base.json"),
            r#"{"conversacion_base": ["User: hi", "Model: hello"]}"#,
        )
        .unwrap();
        let store = store_in(dir.path());

        assert_eq!(
            store.load_base_conversation().await.unwrap(),
            vec!["User: hi", "Model: hello"]
        );
    }

    #[tokio::test]
    async fn put_transcript_leaves_other_users_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());

        store
            .put_transcript(&UserId::from("1"), &vec!["User: a".into()])
            .await
            .unwrap();
        store
            .put_transcript(&UserId::from("2"), &vec!["User: b".into()])
            .await
            .unwrap();

        let memory = store.load_memory().await.unwrap();
        assert_eq!(memory.len(), 2);
        assert_eq!(memory["1"], vec!["User: a"]);
        assert_eq!(memory["2"], vec!["User: b"]);
    }

    #[tokio::test]
    async fn written_file_is_indented_and_keeps_non_ascii() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());

        store
            .put_transcript(&UserId::from("42"), &vec!["Model: ¿Adónde vamos? 🌊".into()])
            .await
            .unwrap();

        let raw = std::fs::read_to_string(dir.path().join("memoria.json")).unwrap();
        assert!(raw.contains("\n    \"42\": ["), "got: {raw}");
        assert!(raw.contains("¿Adónde vamos? 🌊"), "got: {raw}");
        assert!(!dir.path().join("memoria.json.tmp").exists());
    }

    #[tokio::test]
    async fn save_creates_missing_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("data/state");
        let store = store_in(&nested);

        let mut memory = MemoryMap::new();
        memory.insert("7".into(), vec!["User: x".into()]);
        store.save_memory(&memory).await.unwrap();

        assert_eq!(store.load_memory().await.unwrap(), memory);
    }
}
