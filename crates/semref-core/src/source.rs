//! Per-invocation source snapshot cache.
//!
//! A [`SourceCache`] reads each file at most once per invocation and hands
//! out shared snapshots of its content. Every byte offset computed during
//! an operation refers to these snapshots, so a concurrent editor touching
//! the tree mid-operation cannot shift offsets under us. Writes go through
//! the cache as well, keeping the snapshot current for the rest of the
//! invocation.
//!
//! The cache also enforces project containment: every path it resolves
//! must live inside the project root it was created with.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use tracing::{debug, trace};

use crate::error::{CoreError, CoreResult};

/// Read-once-per-path snapshot cache scoped to one invocation.
#[derive(Debug)]
pub struct SourceCache {
    root: PathBuf,
    files: RefCell<HashMap<PathBuf, Rc<str>>>,
}

impl SourceCache {
    /// Create a cache rooted at the given project directory.
    ///
    /// The root must exist; it is canonicalized so containment checks are
    /// immune to `..` segments and symlinked aliases.
    pub fn new(root: impl AsRef<Path>) -> CoreResult<Self> {
        let root = root.as_ref();
        let root = fs::canonicalize(root).map_err(|_| {
            CoreError::input(format!(
                "project root not found: {}",
                root.display()
            ))
        })?;
        debug!(root = %root.display(), "source cache created");
        Ok(SourceCache {
            root,
            files: RefCell::new(HashMap::new()),
        })
    }

    /// The canonical project root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a path to its canonical form and verify it lies inside the
    /// project root.
    ///
    /// Relative paths are resolved against the root. A path outside the
    /// root (or one that does not exist) is `CoreError::Input`.
    pub fn resolve(&self, file: &Path) -> CoreResult<PathBuf> {
        let joined = if file.is_absolute() {
            file.to_path_buf()
        } else {
            self.root.join(file)
        };
        let resolved = fs::canonicalize(&joined)
            .map_err(|_| CoreError::input(format!("file not found: {}", joined.display())))?;
        if !resolved.starts_with(&self.root) {
            return Err(CoreError::input(format!(
                "file {} is outside the project root {}",
                resolved.display(),
                self.root.display()
            )));
        }
        Ok(resolved)
    }

    /// Get the snapshot of a file, reading it on first access.
    pub fn content(&self, file: &Path) -> CoreResult<Rc<str>> {
        let path = self.resolve(file)?;
        if let Some(content) = self.files.borrow().get(&path) {
            return Ok(Rc::clone(content));
        }
        let text = fs::read_to_string(&path)
            .map_err(|e| CoreError::io(format!("failed to read {}", path.display()), e))?;
        trace!(file = %path.display(), bytes = text.len(), "file read into cache");
        let content: Rc<str> = Rc::from(text);
        self.files
            .borrow_mut()
            .insert(path, Rc::clone(&content));
        Ok(content)
    }

    /// Write new content for a file and refresh its snapshot.
    pub fn write(&self, file: &Path, content: &str) -> CoreResult<()> {
        let path = self.resolve(file)?;
        fs::write(&path, content)
            .map_err(|e| CoreError::io(format!("failed to write {}", path.display()), e))?;
        debug!(file = %path.display(), bytes = content.len(), "file written");
        self.files.borrow_mut().insert(path, Rc::from(content));
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
