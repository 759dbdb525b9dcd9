//! Implementation of `zerogen generate component|module`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use crate::builder::entry::{MODULE_ENTRY, MODULE_STEM};
use crate::core::manifest::{Kind, KindBlock, PackageManifest};
use crate::core::package::PACKAGE_MANIFEST;
use crate::core::registry::{export_statement, Registry};
use crate::core::workspace::Workspace;
use crate::ops::templates::{component_source, module_source, ComponentNames, ModuleNames};
use crate::util::naming::kebab_case;
use crate::util::shell::{Shell, Status};

/// Description used when none is given.
pub const DEFAULT_DESCRIPTION: &str = "No description";

/// Options for generating a package.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Component or Module
    pub kind: Kind,

    /// Package (directory) name
    pub name: String,

    /// Stored in the kind block of `package.json`
    pub description: Option<String>,
}

/// What a successful generation produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateResult {
    pub package_dir: PathBuf,
    pub source_file: PathBuf,
    pub export: String,
}

/// Generate a package and register it in the workspace index.
pub fn generate_package(
    ws: &Workspace,
    opts: &GenerateOptions,
    shell: &Shell,
) -> Result<GenerateResult> {
    generate_package_with_registry(ws, &ws.registry(), opts, shell)
}

/// Like [`generate_package`], registering through `registry`.
///
/// Either the package directory exists and the index exports it, or neither
/// changed.
pub fn generate_package_with_registry(
    ws: &Workspace,
    registry: &Registry,
    opts: &GenerateOptions,
    shell: &Shell,
) -> Result<GenerateResult> {
    if opts.kind == Kind::Unknown {
        bail!("only components and modules can be generated");
    }
    let name = validate_name(&opts.name)?;

    let package_dir = ws.package_dir(name);
    if package_dir.exists() {
        bail!(
            "{} `{}` already exists at {}",
            opts.kind,
            name,
            package_dir.display()
        );
    }

    fs::create_dir_all(&package_dir)
        .with_context(|| format!("failed to create directory: {}", package_dir.display()))?;

    match populate(ws, registry, opts, name, &package_dir, shell) {
        Ok(result) => Ok(result),
        Err(e) => {
            tracing::debug!("removing incomplete package {}", package_dir.display());
            if let Err(cleanup) = fs::remove_dir_all(&package_dir) {
                shell.warn(format!(
                    "could not remove incomplete package {}: {}",
                    package_dir.display(),
                    cleanup
                ));
            }
            Err(e.context(format!("failed to generate {} `{}`", opts.kind, name)))
        }
    }
}

fn validate_name(name: &str) -> Result<&str> {
    let name = name.trim();
    if name.is_empty() {
        bail!("package name must not be empty");
    }
    if name.contains(['/', '\\']) || name == "." || name == ".." {
        bail!("package name `{}` must be a single directory name", name);
    }
    if kebab_case(name).is_empty() {
        bail!("package name `{}` contains no letters or digits", name);
    }
    Ok(name)
}

fn populate(
    ws: &Workspace,
    registry: &Registry,
    opts: &GenerateOptions,
    name: &str,
    package_dir: &Path,
    shell: &Shell,
) -> Result<GenerateResult> {
    let description = opts
        .description
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .unwrap_or(DEFAULT_DESCRIPTION);

    let descriptor = ws.descriptor();
    let (stem, file_name, source) = match opts.kind {
        Kind::Component => {
            let names = ComponentNames::new(name, &descriptor.components.selector_prefix);
            let source = component_source(&names, description);
            let file_name = format!("{}.ts", names.kebab);
            (names.kebab, file_name, source)
        }
        _ => {
            let names = ModuleNames::new(name, &descriptor.modules.id_prefix);
            let source = module_source(&names, description);
            (MODULE_STEM.to_string(), MODULE_ENTRY.to_string(), source)
        }
    };

    let mut manifest = PackageManifest {
        name: Some(name.to_string()),
        kind_block: Some(KindBlock::new(opts.kind, description)),
        ..Default::default()
    };
    manifest.set_field("version", "1.0.0");
    manifest.set_field("main", file_name.clone());
    manifest.save(&package_dir.join(PACKAGE_MANIFEST))?;

    let source_file = package_dir.join(&file_name);
    fs::write(&source_file, source)
        .with_context(|| format!("failed to write {}", source_file.display()))?;
    shell.status(Status::Generated, format!("{} `{}`", opts.kind, name));

    let export = export_statement(name, &stem);
    registry.register_export(&export)?;
    shell.status(
        Status::Registered,
        format!("`{}` in {}", name, registry.path().display()),
    );

    Ok(GenerateResult {
        package_dir: package_dir.to_path_buf(),
        source_file,
        export,
    })
}
