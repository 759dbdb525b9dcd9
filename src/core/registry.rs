//! The public-API index (`public-api.ts`).
//!
//! Every generated package is exported from the index with one line:
//!
//! ```text
//! export * from './packages/<dir>/<selector>';
//! ```
//!
//! The index is shared by every later build and generate call, so it must
//! never be left half-written. [`Registry::register_export`] captures the
//! current content, writes the new content by atomic replacement, reads it
//! back, and restores the captured content if anything went wrong.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::util::fs::write_atomic;

/// Errors updating the index.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("malformed export statement: {statement:?}")]
    MalformedEntry { statement: String },

    #[error("failed to read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{} did not contain the new export after writing", path.display())]
    Verify { path: PathBuf },

    #[error("failed to restore {} after a failed update; the index may be inconsistent", path.display())]
    Restore {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Storage operations the registry needs from the index file.
pub trait IndexIo: Send + Sync {
    /// Read the whole file; `Ok(None)` if it does not exist.
    fn read(&self, path: &Path) -> io::Result<Option<String>>;

    /// Replace the whole file with `contents`, all or nothing.
    fn replace(&self, path: &Path, contents: &str) -> io::Result<()>;

    /// Remove the file.
    fn remove(&self, path: &Path) -> io::Result<()>;
}

/// [`IndexIo`] on the real filesystem, replacing through a staged temp file.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiskIo;

impl IndexIo for DiskIo {
    fn read(&self, path: &Path) -> io::Result<Option<String>> {
        match std::fs::read_to_string(path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn replace(&self, path: &Path, contents: &str) -> io::Result<()> {
        write_atomic(path, contents.as_bytes())
    }

    fn remove(&self, path: &Path) -> io::Result<()> {
        std::fs::remove_file(path)
    }
}

/// Build the canonical export line for a generated source file.
pub fn export_statement(package_dir: &str, file_stem: &str) -> String {
    format!("export * from './packages/{}/{}';", package_dir, file_stem)
}

/// Handle to a workspace's public-API index.
pub struct Registry {
    path: PathBuf,
    io: Box<dyn IndexIo>,
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry").field("path", &self.path).finish()
    }
}

impl Registry {
    /// Registry backed by the file at `path`.
    pub fn new(path: PathBuf) -> Self {
        Registry::with_io(path, Box::new(DiskIo))
    }

    /// Registry with a custom storage backend.
    pub fn with_io(path: PathBuf, io: Box<dyn IndexIo>) -> Self {
        Registry { path, io }
    }

    /// Path of the index file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one export statement to the index.
    ///
    /// On error the index holds exactly its previous content (or is absent,
    /// if it was absent before).
    pub fn register_export(&self, statement: &str) -> Result<(), RegistryError> {
        let statement = statement.trim();
        if statement.is_empty() || statement.contains('\n') || statement.contains('\r') {
            return Err(RegistryError::MalformedEntry {
                statement: statement.to_string(),
            });
        }

        let original = self.read()?;
        let mut updated = original.clone().unwrap_or_default();
        if !updated.is_empty() && !updated.ends_with('\n') {
            updated.push('\n');
        }
        updated.push_str(statement);
        updated.push('\n');

        let result = self
            .io
            .replace(&self.path, &updated)
            .map_err(|source| RegistryError::Write {
                path: self.path.clone(),
                source,
            })
            .and_then(|()| self.verify(&updated));

        if let Err(e) = result {
            tracing::warn!("rolling back {}: {}", self.path.display(), e);
            self.restore(original.as_deref())?;
            return Err(e);
        }

        tracing::debug!("registered `{}` in {}", statement, self.path.display());
        Ok(())
    }

    fn read(&self) -> Result<Option<String>, RegistryError> {
        self.io.read(&self.path).map_err(|source| RegistryError::Read {
            path: self.path.clone(),
            source,
        })
    }

    fn verify(&self, expected: &str) -> Result<(), RegistryError> {
        match self.read()? {
            Some(actual) if actual == expected => Ok(()),
            _ => Err(RegistryError::Verify {
                path: self.path.clone(),
            }),
        }
    }

    fn restore(&self, original: Option<&str>) -> Result<(), RegistryError> {
        let restored = match original {
            Some(contents) => self.io.replace(&self.path, contents),
            None => match self.io.remove(&self.path) {
                Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
                other => other,
            },
        };

        restored.map_err(|source| RegistryError::Restore {
            path: self.path.clone(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FaultyIndexIo, IndexFault};
    use tempfile::TempDir;

    const EXISTING: &str = "export * from './packages/alpha/alpha';\n";

    #[test]
    fn test_export_statement() {
        assert_eq!(
            export_statement("myWidget", "my-widget"),
            "export * from './packages/myWidget/my-widget';"
        );
    }

    #[test]
    fn test_register_appends_one_line() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("public-api.ts");
        std::fs::write(&path, EXISTING).unwrap();

        let registry = Registry::new(path.clone());
        registry
            .register_export("export * from './packages/beta/index';")
            .unwrap();

        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "export * from './packages/alpha/alpha';\nexport * from './packages/beta/index';\n"
        );
    }

    #[test]
    fn test_register_adds_missing_trailing_newline() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("public-api.ts");
        std::fs::write(&path, "// header").unwrap();

        Registry::new(path.clone()).register_export("export * from './packages/b/b';").unwrap();

        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "// header\nexport * from './packages/b/b';\n"
        );
    }

    #[test]
    fn test_register_creates_missing_index() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("public-api.ts");

        Registry::new(path.clone()).register_export("export * from './packages/b/b';").unwrap();

        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "export * from './packages/b/b';\n"
        );
    }

    #[test]
    fn test_rejects_malformed_statement() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("public-api.ts");
        std::fs::write(&path, EXISTING).unwrap();
        let registry = Registry::new(path.clone());

        for bad in ["", "   ", "export * from 'a';\nexport * from 'b';"] {
            let err = registry.register_export(bad).unwrap_err();
            assert!(matches!(err, RegistryError::MalformedEntry { .. }));
        }
        assert_eq!(std::fs::read_to_string(&path).unwrap(), EXISTING);
    }

    #[test]
    fn test_write_fault_restores_original() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("public-api.ts");
        std::fs::write(&path, EXISTING).unwrap();

        let registry = Registry::with_io(path.clone(), Box::new(FaultyIndexIo::new(IndexFault::Write)));
        let err = registry
            .register_export("export * from './packages/beta/index';")
            .unwrap_err();

        assert!(matches!(err, RegistryError::Write { .. }));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), EXISTING);
    }

    #[test]
    fn test_torn_write_is_rolled_back() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("public-api.ts");
        std::fs::write(&path, EXISTING).unwrap();

        let registry =
            Registry::with_io(path.clone(), Box::new(FaultyIndexIo::new(IndexFault::TornWrite)));
        let err = registry
            .register_export("export * from './packages/beta/index';")
            .unwrap_err();

        assert!(matches!(err, RegistryError::Verify { .. }));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), EXISTING);
    }

    #[test]
    fn test_failed_write_to_absent_index_leaves_it_absent() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("public-api.ts");

        let registry = Registry::with_io(path.clone(), Box::new(FaultyIndexIo::new(IndexFault::TornWrite)));
        assert!(registry.register_export("export * from './packages/b/b';").is_err());
        assert!(!path.exists());
    }
}
