//! Destinations for generated sources
//!
//! The generator hands every artifact to a [`SourceSink`]. Tests and the
//! JSON output collect them in a [`MemorySink`]; the CLI writes them to an
//! output directory through a [`DirectorySink`].

use crate::error::SinkError;
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

/// Extension of every generated file
pub const SOURCE_EXTENSION: &str = "cs";

/// Receives named, generated source units
pub trait SourceSink {
    /// Add one unit. `name` has no extension.
    fn add_source(&mut self, name: &str, text: &str) -> Result<(), SinkError>;
}

/// Keeps sources in memory, ordered by name
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    sources: BTreeMap<String, String>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.sources.get(name).map(String::as_str)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sources.keys().map(String::as_str)
    }

    pub fn sources(&self) -> &BTreeMap<String, String> {
        &self.sources
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl SourceSink for MemorySink {
    fn add_source(&mut self, name: &str, text: &str) -> Result<(), SinkError> {
        self.sources.insert(name.to_string(), text.to_string());
        Ok(())
    }
}

/// Writes `{name}.cs` files into a directory.
///
/// Files whose content is unchanged are not rewritten, so timestamps only
/// move when output does.
#[derive(Debug)]
pub struct DirectorySink {
    root: PathBuf,
    written: HashSet<String>,
    changed: usize,
}

impl DirectorySink {
    /// Create the directory if needed
    pub fn create(root: impl Into<PathBuf>) -> Result<Self, SinkError> {
        let root = root.into();
        std::fs::create_dir_all(&root).map_err(|source| SinkError::Io {
            path: root.clone(),
            source,
        })?;
        Ok(Self {
            root,
            written: HashSet::new(),
            changed: 0,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path a unit named `name` is written to
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.root.join(format!("{}.{}", name, SOURCE_EXTENSION))
    }

    /// Files actually created or rewritten so far
    pub fn changed(&self) -> usize {
        self.changed
    }

    /// Delete generated files starting with `{prefix}_` that were not
    /// written through this sink. Returns the removed paths.
    pub fn prune_stale(&self, prefix: &str) -> Result<Vec<PathBuf>, SinkError> {
        let io = |path: &Path| {
            let path = path.to_path_buf();
            move |source| SinkError::Io { path, source }
        };
        let marker = format!("{}_", prefix);
        let mut removed = Vec::new();

        for entry in std::fs::read_dir(&self.root).map_err(io(&self.root))? {
            let path = entry.map_err(io(&self.root))?.path();
            let is_source = path.extension().and_then(|e| e.to_str()) == Some(SOURCE_EXTENSION);
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if is_source && stem.starts_with(&marker) && !self.written.contains(stem) {
                std::fs::remove_file(&path).map_err(io(&path))?;
                removed.push(path);
            }
        }
        removed.sort();
        Ok(removed)
    }
}

impl SourceSink for DirectorySink {
    fn add_source(&mut self, name: &str, text: &str) -> Result<(), SinkError> {
        let path = self.path_for(name);
        self.written.insert(name.to_string());

        if std::fs::read_to_string(&path).is_ok_and(|existing| existing == text) {
            tracing::trace!(path = %path.display(), "unchanged");
            return Ok(());
        }
        std::fs::write(&path, text).map_err(|source| SinkError::Io {
            path: path.clone(),
            source,
        })?;
        self.changed += 1;
        tracing::debug!(path = %path.display(), "wrote generated source");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_sink_orders_by_name() {
        let mut sink = MemorySink::new();
        sink.add_source("Gen_B", "b").unwrap();
        sink.add_source("Gen_A", "a").unwrap();
        assert_eq!(sink.names().collect::<Vec<_>>(), vec!["Gen_A", "Gen_B"]);
        assert_eq!(sink.get("Gen_B"), Some("b"));
        assert_eq!(sink.len(), 2);
    }

    #[test]
    fn test_directory_sink_writes_and_skips_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("Generated");

        let mut sink = DirectorySink::create(&out).unwrap();
        sink.add_source("Gen_Api_Run_Errors", "class A {}\n").unwrap();
        assert_eq!(sink.changed(), 1);
        assert_eq!(
            std::fs::read_to_string(out.join("Gen_Api_Run_Errors.cs")).unwrap(),
            "class A {}\n"
        );

        let mut again = DirectorySink::create(&out).unwrap();
        again.add_source("Gen_Api_Run_Errors", "class A {}\n").unwrap();
        assert_eq!(again.changed(), 0);
        again.add_source("Gen_Api_Run_Errors", "class B {}\n").unwrap();
        assert_eq!(again.changed(), 1);
    }

    #[test]
    fn test_prune_stale_keeps_written_and_foreign_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("Gen_Old_Errors.cs"), "").unwrap();
        std::fs::write(dir.path().join("Handwritten.cs"), "").unwrap();
        std::fs::write(dir.path().join("Gen_Notes.txt"), "").unwrap();

        let mut sink = DirectorySink::create(dir.path()).unwrap();
        sink.add_source("Gen_New_Errors", "").unwrap();
        let removed = sink.prune_stale("Gen").unwrap();

        assert_eq!(removed, vec![dir.path().join("Gen_Old_Errors.cs")]);
        assert!(dir.path().join("Gen_New_Errors.cs").exists());
        assert!(dir.path().join("Handwritten.cs").exists());
        assert!(dir.path().join("Gen_Notes.txt").exists());
    }
}
