//! Manifest file discovery, parsing and writing
//!
//! This module provides functionality to:
//! - Enumerate workspace packages from pnpm-workspace.yaml
//! - Parse package.json and override files into a typed model
//! - Write manifests back with stable formatting

mod package_json;
mod workspace;
mod writer;

pub use package_json::{DependencyMap, PackageManifest};
pub use workspace::{
    find_workspace_packages, find_workspace_root, is_pnpm_workspace, parse_workspace_patterns,
    WorkspacePackage, PACKAGE_JSON, WORKSPACE_FILE,
};
pub use writer::write_manifest;
