//! Catalog ingestion. Reads product documents from the data directory,
//! splits them and indexes them into the vector store at startup.

use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::core::errors::ApiError;

use super::splitter::TextSplitter;
use super::store::{DocumentChunk, VectorStore};

const CHUNK_SIZE: usize = 1000;
const CHUNK_OVERLAP: usize = 200;

/// Load every supported file under `data_dir` into the store. A missing
/// directory is not an error: the store stays empty and retrieval reports
/// no matches.
pub async fn load_catalog(store: &VectorStore, data_dir: &Path) -> Result<usize, ApiError> {
    if !data_dir.is_dir() {
        tracing::warn!(
            "Catalog data directory {} not found; retrieval store starts empty",
            data_dir.display()
        );
        return Ok(0);
    }

    let splitter = TextSplitter::new(CHUNK_SIZE, CHUNK_OVERLAP);
    let mut chunks = Vec::new();

    let entries = fs::read_dir(data_dir).map_err(ApiError::internal)?;
    for entry in entries {
        let entry = entry.map_err(ApiError::internal)?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let source = entry.file_name().to_string_lossy().to_string();
        let text = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => match read_json_records(&path) {
                Some(text) => text,
                None => {
                    tracing::warn!("Skipping unreadable catalog file {}", source);
                    continue;
                }
            },
            Some("txt") | Some("md") => match fs::read_to_string(&path) {
                Ok(text) => text,
                Err(err) => {
                    tracing::warn!("Skipping unreadable catalog file {}: {}", source, err);
                    continue;
                }
            },
            _ => continue,
        };

        for piece in splitter.split(&text) {
            chunks.push(DocumentChunk {
                content: piece,
                source: source.clone(),
            });
        }
    }

    if chunks.is_empty() {
        tracing::warn!("No catalog documents found under {}", data_dir.display());
        return Ok(0);
    }

    let total = store.add_documents(chunks).await?;
    Ok(total)
}

/// Flatten a JSON catalog file into retrievable text: one "key: value" block
/// per record, records separated by blank lines.
fn read_json_records(path: &Path) -> Option<String> {
    let contents = fs::read_to_string(path).ok()?;
    let value: Value = serde_json::from_str(&contents).ok()?;

    let records = match value {
        Value::Array(items) => items,
        other => vec![other],
    };

    let blocks: Vec<String> = records.iter().map(render_record).collect();
    Some(blocks.join("\n\n"))
}

fn render_record(record: &Value) -> String {
    match record {
        Value::Object(map) => map
            .iter()
            .map(|(key, value)| format!("{}: {}", key, render_scalar(value)))
            .collect::<Vec<_>>()
            .join("\n"),
        other => render_scalar(other),
    }
}

fn render_scalar(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
