//! Upload ingestion: turns PDF/TXT files into plain text for prompt context.
//!
//! One upload produces one [`DocumentContext`]; a new upload replaces the old
//! one wholesale. A single bad file rejects the whole upload so the session's
//! existing context is never half-replaced.

use shared::chat::DocumentContext;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("unsupported file format: {0} (only PDF and TXT are accepted)")]
    UnsupportedFormat(String),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not extract text from {path}: {message}")]
    Extraction { path: PathBuf, message: String },
}

/// Extract plain text from a single PDF or TXT file.
pub fn extract_text(path: &Path) -> Result<String, DocumentError> {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .to_lowercase();

    let bytes = match ext.as_str() {
        "txt" | "pdf" => fs::read(path).map_err(|source| DocumentError::Io {
            path: path.to_path_buf(),
            source,
        })?,
        other => {
            let label = if other.is_empty() {
                path.display().to_string()
            } else {
                format!(".{other}")
            };
            return Err(DocumentError::UnsupportedFormat(label));
        }
    };

    match ext.as_str() {
        // Tolerate odd encodings rather than rejecting the file.
        "txt" => Ok(String::from_utf8_lossy(&bytes).into_owned()),
        "pdf" => {
            pdf_extract::extract_text_from_mem(&bytes).map_err(|e| DocumentError::Extraction {
                path: path.to_path_buf(),
                message: e.to_string(),
            })
        }
        _ => unreachable!("extension filtered above"),
    }
}

/// Extract and concatenate a batch of uploads into one document context.
pub fn load_documents(paths: &[PathBuf]) -> Result<DocumentContext, DocumentError> {
    let mut chunks = Vec::with_capacity(paths.len());
    let mut sources = Vec::with_capacity(paths.len());

    for path in paths {
        let text = extract_text(path)?;
        tracing::info!(path = %path.display(), chars = text.len(), "extracted document text");
        chunks.push(text);
        sources.push(
            path.file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
        );
    }

    Ok(DocumentContext::new(chunks.join("\n\n"), sources))
}
