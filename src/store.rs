//! Local file store
//!
//! One directory per resource kind, one JSON file per instance named by its
//! identifier. Pull writes here; push/edit/validate read from here.

use crate::error::SyncError;
use anyhow::{Context, Result};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// File store rooted at a directory (the working directory in normal runs).
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Serialize `doc` to `{root}/{dir}/{id}.json` as indented, key-sorted
    /// JSON, creating the directory if needed. Returns the file path.
    pub fn write(&self, dir: &str, id: &str, doc: &Value) -> Result<PathBuf> {
        let dir_path = self.root.join(dir);
        fs::create_dir_all(&dir_path)
            .with_context(|| format!("Failed to create directory {}", dir_path.display()))?;

        let path = dir_path.join(format!("{id}.json"));
        // serde_json::Map keeps keys sorted, so pretty printing is enough.
        let content = serde_json::to_string_pretty(doc)?;
        fs::write(&path, content)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path)
    }

    /// Parse every `*.json` file directly under `{root}/{dir}` (non-recursive,
    /// directory listing order). An absent or empty directory is
    /// [`SyncError::NoLocalFiles`]: the caller should pull first.
    pub fn read_all(&self, dir: &str) -> Result<Vec<Value>> {
        let dir_path = self.root.join(dir);
        let entries = match fs::read_dir(&dir_path) {
            Ok(entries) => entries,
            Err(_) => return Err(SyncError::NoLocalFiles(dir.to_string()).into()),
        };

        let mut docs = Vec::new();
        for entry in entries {
            let path = entry
                .with_context(|| format!("Failed to list {}", dir_path.display()))?
                .path();
            if !is_json_file(&path) {
                continue;
            }
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let doc = serde_json::from_str(&content)
                .with_context(|| format!("Invalid JSON in {}", path.display()))?;
            docs.push(doc);
        }

        if docs.is_empty() {
            return Err(SyncError::NoLocalFiles(dir.to_string()).into());
        }
        Ok(docs)
    }
}

fn is_json_file(path: &Path) -> bool {
    path.is_file() && path.extension().and_then(|e| e.to_str()) == Some("json")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn write_then_read_round_trips() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let store = FileStore::new(tmp.path());

        let doc = json!({"id": 42, "name": "cpu-high", "type": "metric alert"});
        let path = store.write("monitors", "42", &doc).expect("write");
        assert!(path.ends_with("monitors/42.json"));

        let docs = store.read_all("monitors").expect("read_all");
        assert_eq!(docs, vec![doc]);
    }

    #[test]
    fn written_json_is_indented_and_key_sorted() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let store = FileStore::new(tmp.path());

        let doc = json!({"zebra": 1, "alpha": 2});
        let path = store.write("dashboards", "d1", &doc).expect("write");

        let content = fs::read_to_string(path).expect("read back");
        let alpha = content.find("alpha").expect("alpha present");
        let zebra = content.find("zebra").expect("zebra present");
        assert!(alpha < zebra, "keys should be sorted");
        assert!(content.contains("\n  "), "output should be indented");
    }

    #[test]
    fn absent_directory_is_no_local_files() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let store = FileStore::new(tmp.path());

        let err = store.read_all("monitors").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SyncError>(),
            Some(SyncError::NoLocalFiles(kind)) if kind == "monitors"
        ));
    }

    #[test]
    fn empty_directory_is_no_local_files() {
        let tmp = tempfile::tempdir().expect("tempdir");
        fs::create_dir(tmp.path().join("users")).expect("mkdir");
        let store = FileStore::new(tmp.path());

        let err = store.read_all("users").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SyncError>(),
            Some(SyncError::NoLocalFiles(_))
        ));
    }

    #[test]
    fn non_json_files_are_ignored() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let store = FileStore::new(tmp.path());
        store
            .write("notebooks", "1", &json!({"name": "nb"}))
            .expect("write");
        fs::write(tmp.path().join("notebooks/README.txt"), "not json").expect("write txt");

        let docs = store.read_all("notebooks").expect("read_all");
        assert_eq!(docs.len(), 1);
    }
}
