//! Directory document loader

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::errors::{RagError, Result};

/// A loaded source document
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Path relative to the documents directory
    pub source: String,
    pub content: String,
}

/// Loads documents with matching extensions from a directory tree
pub struct DocumentLoader {
    root: PathBuf,
    extensions: Vec<String>,
}

impl DocumentLoader {
    pub fn new(root: impl Into<PathBuf>, extensions: &[String]) -> Self {
        Self {
            root: root.into(),
            extensions: extensions
                .iter()
                .map(|e| e.trim_start_matches('.').to_lowercase())
                .collect(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Load every matching file, sorted by path
    ///
    /// A missing directory or one without any matching non-empty files is a
    /// configuration error: the index has to be populated before queries.
    pub fn load_documents(&self) -> Result<Vec<Document>> {
        if !self.root.is_dir() {
            return Err(RagError::Configuration(format!(
                "Documents directory not found: {}",
                self.root.display()
            )));
        }

        let mut paths = Vec::new();
        self.collect_files(&self.root, &mut paths)?;
        paths.sort();

        let mut documents = Vec::new();
        for path in paths {
            let content = match fs::read_to_string(&path) {
                Ok(content) => content,
                Err(e) if e.kind() == ErrorKind::InvalidData => {
                    warn!(path = %path.display(), "skipping document that is not valid UTF-8");
                    continue;
                }
                Err(e) => {
                    return Err(RagError::Configuration(format!(
                        "Failed to read document {}: {}",
                        path.display(),
                        e
                    )))
                }
            };
            if content.trim().is_empty() {
                debug!(path = %path.display(), "skipping empty document");
                continue;
            }
            let source = path
                .strip_prefix(&self.root)
                .unwrap_or(&path)
                .to_string_lossy()
                .replace('\\', "/");
            documents.push(Document { source, content });
        }

        if documents.is_empty() {
            return Err(RagError::Configuration(format!(
                "No documents with extensions [{}] found in {}",
                self.extensions.join(", "),
                self.root.display()
            )));
        }

        info!(count = documents.len(), root = %self.root.display(), "documents loaded");
        Ok(documents)
    }

    fn collect_files(&self, dir: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
        let unreadable = |e: std::io::Error| {
            RagError::Configuration(format!("Failed to read directory {}: {}", dir.display(), e))
        };
        for entry in fs::read_dir(dir).map_err(unreadable)? {
            let path = entry.map_err(unreadable)?.path();
            if path.is_dir() {
                self.collect_files(&path, out)?;
            } else if self.matches(&path) {
                out.push(path);
            }
        }
        Ok(())
    }

    fn matches(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| self.extensions.iter().any(|x| x.eq_ignore_ascii_case(e)))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn exts() -> Vec<String> {
        vec!["txt".to_string(), ".md".to_string()]
    }

    #[test]
    fn test_missing_directory() {
        let loader = DocumentLoader::new("/definitely/not/here", &exts());
        let err = loader.load_documents().unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_empty_directory() {
        let temp_dir = TempDir::new().unwrap();
        let loader = DocumentLoader::new(temp_dir.path(), &exts());
        assert!(loader.load_documents().unwrap_err().is_configuration());
    }

    #[test]
    fn test_loads_matching_files_sorted() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir(temp_dir.path().join("nested")).unwrap();
        fs::write(temp_dir.path().join("b.txt"), "beta").unwrap();
        fs::write(temp_dir.path().join("a.MD"), "alpha").unwrap();
        fs::write(temp_dir.path().join("nested").join("c.md"), "gamma").unwrap();
        fs::write(temp_dir.path().join("image.png"), "binary").unwrap();
        fs::write(temp_dir.path().join("blank.txt"), "   ").unwrap();

        let docs = DocumentLoader::new(temp_dir.path(), &exts())
            .load_documents()
            .unwrap();
        let sources: Vec<&str> = docs.iter().map(|d| d.source.as_str()).collect();

        assert_eq!(sources, vec!["a.MD", "b.txt", "nested/c.md"]);
        assert_eq!(docs[0].content, "alpha");
    }

    #[test]
    fn test_non_utf8_file_is_skipped() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("broken.txt"), [0xff, 0xfe, 0x00, 0x41]).unwrap();
        fs::write(temp_dir.path().join("good.md"), "Shipping takes three days.").unwrap();

        let docs = DocumentLoader::new(temp_dir.path(), &exts())
            .load_documents()
            .unwrap();

        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].source, "good.md");
    }

    #[test]
    fn test_only_non_utf8_files_is_configuration_error() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("broken.txt"), [0xff, 0xfe]).unwrap();

        let err = DocumentLoader::new(temp_dir.path(), &exts())
            .load_documents()
            .unwrap_err();
        assert!(err.is_configuration());
    }
}
