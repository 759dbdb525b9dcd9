//! Test utilities for zerogen unit tests.
//!
//! Provides on-disk workspace fixtures plus stand-ins for the capabilities
//! that normally shell out to node (type check, bundling) or touch the index
//! file (registry storage), so tests can inject failures deterministically.
//!
//! ```rust,ignore
//! use crate::test_support::{StubBundler, StubCompiler, WorkspaceFixture};
//!
//! let fixture = WorkspaceFixture::new("demo");
//! fixture.component("alpha");
//! let report = build(&fixture.workspace(), &StubCompiler::passing(), &StubBundler::new(), ..);
//! ```

use std::collections::{HashMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{bail, Result};
use serde_json::json;
use tempfile::TempDir;

use crate::builder::{BuildTarget, Bundler, Compiler, TypecheckError};
use crate::core::manifest::PluginDescriptor;
use crate::core::registry::{DiskIo, IndexIo};
use crate::core::workspace::{
    Workspace, DESCRIPTOR_NAME, INDEX_NAME, PACKAGES_DIR, TSCONFIG_NAME,
};
use crate::util::naming::kebab_case;

/// A scaffolded workspace in a temporary directory.
///
/// Contains `plugin.json`, an empty `packages/`, an empty `public-api.ts`
/// and a `tsconfig.json`. Removed on drop.
pub struct WorkspaceFixture {
    _tmp: TempDir,
    root: PathBuf,
}

impl WorkspaceFixture {
    /// Create a workspace whose descriptor is named `name`.
    pub fn new(name: &str) -> Self {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join(name);
        std::fs::create_dir_all(root.join(PACKAGES_DIR)).unwrap();

        PluginDescriptor::new(name)
            .save(&root.join(DESCRIPTOR_NAME))
            .unwrap();
        std::fs::write(root.join(INDEX_NAME), "").unwrap();
        std::fs::write(root.join(TSCONFIG_NAME), "{}\n").unwrap();

        WorkspaceFixture { _tmp: tmp, root }
    }

    /// Workspace root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The package root.
    pub fn packages_dir(&self) -> PathBuf {
        self.root.join(PACKAGES_DIR)
    }

    /// Open the fixture as a [`Workspace`].
    pub fn workspace(&self) -> Workspace {
        Workspace::load(&self.root).unwrap()
    }

    /// Add a component package with its entry file.
    pub fn component(&self, name: &str) -> PathBuf {
        let dir = self.manifest(
            name,
            json!({"name": name, "version": "1.0.0", "zero": {"component": true}}),
        );
        std::fs::write(
            dir.join(format!("{}.ts", kebab_case(name))),
            format!("export const tag = '{}';\n", kebab_case(name)),
        )
        .unwrap();
        dir
    }

    /// Add a module package with its entry file.
    pub fn module(&self, name: &str) -> PathBuf {
        let dir = self.manifest(
            name,
            json!({"name": name, "version": "1.0.0", "zero": {"module": true}}),
        );
        std::fs::write(dir.join("index.js"), format!("export const id = '{}';\n", name)).unwrap();
        dir
    }

    /// Add a package directory with the given raw `package.json`.
    pub fn manifest(&self, name: &str, manifest: serde_json::Value) -> PathBuf {
        let dir = self.bare_dir(name);
        std::fs::write(
            dir.join("package.json"),
            serde_json::to_string_pretty(&manifest).unwrap(),
        )
        .unwrap();
        dir
    }

    /// Add a directory under `packages/` with no manifest.
    pub fn bare_dir(&self, name: &str) -> PathBuf {
        let dir = self.packages_dir().join(name);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    /// Current content of the index file.
    pub fn index(&self) -> String {
        std::fs::read_to_string(self.root.join(INDEX_NAME)).unwrap_or_default()
    }
}

/// [`Compiler`] that never spawns anything.
#[derive(Debug, Default)]
pub struct StubCompiler {
    failure: Option<String>,
    calls: AtomicUsize,
}

impl StubCompiler {
    /// A type check that always passes.
    pub fn passing() -> Self {
        StubCompiler::default()
    }

    /// A type check that always fails with `diagnostics`.
    pub fn failing(diagnostics: &str) -> Self {
        StubCompiler {
            failure: Some(diagnostics.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of times the type check ran.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Compiler for StubCompiler {
    fn typecheck(&self, _workspace_root: &Path) -> Result<(), TypecheckError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.failure {
            Some(diagnostics) => Err(TypecheckError {
                diagnostics: diagnostics.clone(),
            }),
            None => Ok(()),
        }
    }
}

/// [`Bundler`] that copies the entry into the artifact.
///
/// The artifact content depends only on the entry, so repeated builds
/// produce identical digests.
#[derive(Debug, Default)]
pub struct StubBundler {
    failing: HashSet<String>,
    panicking: HashSet<String>,
    silent: HashSet<String>,
    delays: HashMap<String, u64>,
    calls: Mutex<Vec<String>>,
}

impl StubBundler {
    pub fn new() -> Self {
        StubBundler::default()
    }

    /// Fail bundling of `package` with an error.
    pub fn failing(mut self, package: &str) -> Self {
        self.failing.insert(package.to_string());
        self
    }

    /// Panic while bundling `package`.
    pub fn panicking(mut self, package: &str) -> Self {
        self.panicking.insert(package.to_string());
        self
    }

    /// Report success for `package` without writing the artifact.
    pub fn without_output(mut self, package: &str) -> Self {
        self.silent.insert(package.to_string());
        self
    }

    /// Sleep before bundling `package`.
    pub fn with_delay(mut self, package: &str, millis: u64) -> Self {
        self.delays.insert(package.to_string(), millis);
        self
    }

    /// Packages bundled so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

impl Bundler for StubBundler {
    fn bundle(&self, target: &BuildTarget) -> Result<()> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(target.package.clone());
        }

        if let Some(millis) = self.delays.get(&target.package) {
            std::thread::sleep(Duration::from_millis(*millis));
        }
        if self.panicking.contains(&target.package) {
            panic!("stub panic for `{}`", target.package);
        }
        if self.failing.contains(&target.package) {
            bail!("stub failure for `{}`", target.package);
        }
        if self.silent.contains(&target.package) {
            return Ok(());
        }

        let source = std::fs::read_to_string(&target.entry).unwrap_or_default();
        std::fs::write(
            target.artifact_path(),
            format!("// {}\n{}", target.package, source),
        )?;
        Ok(())
    }
}

/// Fault to inject into the first index replacement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexFault {
    /// The replacement fails and nothing is written.
    Write,
    /// Half of the new content is written and success is reported.
    TornWrite,
}

/// [`IndexIo`] that injects one fault, then behaves like [`DiskIo`].
#[derive(Debug)]
pub struct FaultyIndexIo {
    fault: IndexFault,
    tripped: AtomicBool,
}

impl FaultyIndexIo {
    pub fn new(fault: IndexFault) -> Self {
        FaultyIndexIo {
            fault,
            tripped: AtomicBool::new(false),
        }
    }
}

impl IndexIo for FaultyIndexIo {
    fn read(&self, path: &Path) -> io::Result<Option<String>> {
        DiskIo.read(path)
    }

    fn replace(&self, path: &Path, contents: &str) -> io::Result<()> {
        if self.tripped.swap(true, Ordering::SeqCst) {
            return DiskIo.replace(path, contents);
        }

        match self.fault {
            IndexFault::Write => Err(io::Error::other("injected write fault")),
            IndexFault::TornWrite => {
                let cut = contents
                    .char_indices()
                    .map(|(i, _)| i)
                    .nth(contents.chars().count() / 2)
                    .unwrap_or(0);
                std::fs::write(path, &contents[..cut])
            }
        }
    }

    fn remove(&self, path: &Path) -> io::Result<()> {
        DiskIo.remove(path)
    }
}
