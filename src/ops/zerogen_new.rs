//! Implementation of `zerogen new`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use crate::core::manifest::PluginDescriptor;
use crate::core::workspace::{DESCRIPTOR_NAME, INDEX_NAME, PACKAGES_DIR, TSCONFIG_NAME};
use crate::ops::templates;
use crate::util::fs::{is_empty_dir, remove_dir_all_if_exists, reset_dir, write_string};
use crate::util::process::{find_executable, ProcessBuilder};
use crate::util::shell::{Shell, Status};

/// Directory of the plugin server inside a workspace.
pub const SERVER_DIR: &str = "server";

/// Options for creating a new workspace.
#[derive(Debug, Clone, Default)]
pub struct NewOptions {
    /// Plugin name, written to `plugin.json`
    pub name: String,

    /// Run `npm install` once the files are in place
    pub install: bool,

    /// npm program (defaults to `npm` from PATH)
    pub npm: Option<PathBuf>,
}

/// Create a new plugin workspace at `path`.
///
/// `path` must not exist or be an empty directory. If any step fails the
/// directory is left as it was found.
pub fn new_workspace(path: &Path, opts: &NewOptions, shell: &Shell) -> Result<()> {
    let name = opts.name.trim();
    if name.is_empty() {
        bail!("workspace name must not be empty");
    }

    let existed = path.exists();
    if existed && !is_empty_dir(path) {
        bail!(
            "destination `{}` already exists and is not empty",
            path.display()
        );
    }

    fs::create_dir_all(path)
        .with_context(|| format!("failed to create directory: {}", path.display()))?;

    if let Err(e) = scaffold(path, name, opts, shell) {
        let cleanup = if existed {
            reset_dir(path)
        } else {
            remove_dir_all_if_exists(path)
        };
        if let Err(cleanup) = cleanup {
            shell.warn(format!("could not clean up {}: {:#}", path.display(), cleanup));
        }
        return Err(e.context(format!("failed to create workspace `{}`", name)));
    }

    Ok(())
}

fn scaffold(root: &Path, name: &str, opts: &NewOptions, shell: &Shell) -> Result<()> {
    write_json(&root.join("package.json"), &templates::workspace_manifest(name))?;
    PluginDescriptor::new(name).save(&root.join(DESCRIPTOR_NAME))?;
    write_json(&root.join(TSCONFIG_NAME), &templates::tsconfig())?;

    write_string(&root.join(INDEX_NAME), "")?;
    write_string(&root.join("index.ts"), templates::INDEX_TS)?;
    write_string(&root.join(".gitignore"), templates::GITIGNORE)?;

    let packages = root.join(PACKAGES_DIR);
    fs::create_dir_all(&packages)
        .with_context(|| format!("failed to create directory: {}", packages.display()))?;

    let server = root.join(SERVER_DIR);
    write_string(&server.join("index.js"), templates::SERVER_INDEX_JS)?;
    let plugins = server.join("plugins");
    fs::create_dir_all(&plugins)
        .with_context(|| format!("failed to create directory: {}", plugins.display()))?;

    shell.status(Status::Created, format!("workspace `{}` at {}", name, root.display()));

    if opts.install {
        install(root, opts.npm.as_deref(), shell)?;
    }

    Ok(())
}

fn install(root: &Path, npm: Option<&Path>, shell: &Shell) -> Result<()> {
    let npm = match npm {
        Some(npm) => npm.to_path_buf(),
        None => {
            let name = if cfg!(windows) { "npm.cmd" } else { "npm" };
            find_executable(name).unwrap_or_else(|| PathBuf::from(name))
        }
    };

    shell.status(Status::Info, "installing dependencies with npm");
    let status = ProcessBuilder::new(&npm).arg("install").cwd(root).status()?;
    if !status.success() {
        bail!("`npm install` exited with code {:?}", status.code());
    }
    Ok(())
}

fn write_json(path: &Path, value: &serde_json::Value) -> Result<()> {
    let mut text = serde_json::to_string_pretty(value)?;
    text.push('\n');
    write_string(path, &text)
}
