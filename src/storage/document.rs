//! Whole-document JSON file I/O shared by the record stores.

use super::StorageError;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Top-level container a document must have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentShape {
    Object,
    Array,
}

impl DocumentShape {
    fn matches(&self, value: &Value) -> bool {
        match self {
            DocumentShape::Object => value.is_object(),
            DocumentShape::Array => value.is_array(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentShape::Object => "object",
            DocumentShape::Array => "array",
        }
    }
}

/// Create `dir` and its parents if needed.
pub fn ensure_dir(dir: &Path) -> Result<(), StorageError> {
    fs::create_dir_all(dir).map_err(|source| {
        tracing::error!(path = %dir.display(), error = %source, "failed to create data directory");
        StorageError::CreateDir {
            path: dir.to_path_buf(),
            source,
        }
    })
}

/// Read and decode the document at `path`.
///
/// Returns `Ok(None)` if the file does not exist. Fails closed on anything
/// else: unreadable file, bad syntax, wrong container, or a record that does
/// not decode.
pub fn load<T: DeserializeOwned>(path: &Path, shape: DocumentShape) -> Result<Option<T>, StorageError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            tracing::error!(path = %path.display(), error = %source, "failed to read document");
            return Err(StorageError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let value: Value = serde_json::from_str(&content).map_err(|source| {
        tracing::error!(path = %path.display(), error = %source, "invalid JSON in document");
        StorageError::Malformed {
            path: path.to_path_buf(),
            source,
        }
    })?;

    if !shape.matches(&value) {
        tracing::error!(path = %path.display(), expected = shape.as_str(), "unexpected document shape");
        return Err(StorageError::InvalidShape {
            path: path.to_path_buf(),
            expected: shape.as_str(),
        });
    }

    let decoded = serde_json::from_value(value).map_err(|source| {
        tracing::error!(path = %path.display(), error = %source, "invalid record in document");
        StorageError::Malformed {
            path: path.to_path_buf(),
            source,
        }
    })?;

    tracing::debug!(path = %path.display(), "loaded document");
    Ok(Some(decoded))
}

/// Encode `data` as indented JSON and replace the file at `path` with it.
pub fn save<T: Serialize + ?Sized>(path: &Path, data: &T) -> Result<(), StorageError> {
    let mut json = serde_json::to_string_pretty(data).map_err(|source| StorageError::Encode {
        path: path.to_path_buf(),
        source,
    })?;
    json.push('\n');

    fs::write(path, json).map_err(|source| {
        tracing::error!(path = %path.display(), error = %source, "failed to write document");
        StorageError::Write {
            path: path.to_path_buf(),
            source,
        }
    })?;

    tracing::debug!(path = %path.display(), "wrote document");
    Ok(())
}
