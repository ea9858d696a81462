
use std::path::Path;

use tracing::{debug, warn};

use crate::Result;

/// A raw knowledge source: its full text plus the provenance label carried
/// by every chunk derived from it. Immutable once loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub text: String,
    pub source: String,
}

const TEXT_EXTENSIONS: [&str; 4] = ["md", "markdown", "txt", "rtf"];

/// Load every supported document from `dir`, sorted by file name.
///
/// Markdown/text files are read as (lossy) UTF-8; PDFs are text-extracted.
/// Unreadable or empty files are skipped with a warning rather than failing
/// the whole batch. A missing directory yields an empty list.
#[inline]
pub fn load_documents(dir: &Path) -> Result<Vec<Document>> {
    if !dir.is_dir() {
        warn!("Knowledge directory {:?} does not exist", dir);
        return Ok(Vec::new());
    }

    let mut paths: Vec<_> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .collect();
    paths.sort();

    let mut documents = Vec::new();
    for path in paths {
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            continue;
        };
        let ext = ext.to_ascii_lowercase();

        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };

        let text = if TEXT_EXTENSIONS.contains(&ext.as_str()) {
            match std::fs::read(&path) {
                Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
                Err(e) => {
                    warn!("Skipping unreadable file {:?}: {}", path, e);
                    continue;
                }
            }
        } else if ext == "pdf" {
            match pdf_extract::extract_text(&path) {
                Ok(text) => text,
                Err(e) => {
                    warn!("Skipping PDF {:?}: {}", path, e);
                    continue;
                }
            }
        } else {
            continue;
        };

        if text.trim().is_empty() {
            debug!("Skipping empty document {:?}", path);
            continue;
        }

        documents.push(Document {
            text,
            source: name.to_string(),
        });
    }

    debug!("Loaded {} documents from {:?}", documents.len(), dir);
    Ok(documents)
}
