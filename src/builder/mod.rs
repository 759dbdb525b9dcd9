//! Build machinery.
//!
//! - `entry` - kind classification and build targets
//! - `compile` - the workspace-wide type check
//! - `bundle` - per-package bundling
//! - `executor` - concurrent fan-out of bundling tasks

pub mod bundle;
pub mod compile;
pub mod entry;
pub mod executor;

pub use bundle::{Bundler, EsbuildBundler};
pub use compile::{Compiler, TscCompiler, TypecheckError};
pub use entry::{BuildTarget, EntryResolver, InvalidOutDir, Resolution, NO_ENTRY_REASON};
pub use executor::{BundleExecutor, Bundled};
