//! # Run Configuration and Configuration Documents
//!
//! Two things live here:
//!
//! - **`SyncOptions`**: the fully-resolved configuration for one sync run.
//!   It is assembled once at the CLI boundary and passed by reference into
//!   every component entry point, never stored in process-wide state.
//!
//! - **`ConfigDocument` loading**: the YAML documents that drive per-file
//!   decisions. A document maps filenames to option mappings, with the
//!   reserved `*defaults*` key holding options that apply to every file.
//!   Two documents exist per module iteration: the central one (read once
//!   per run from the configs directory) and the module-local one (read
//!   from the module's own working copy).
//!
//! A missing or blank document is an empty mapping, not an error. A
//! document that exists but fails to parse is a fatal `ConfigParse` error
//! naming the path, since silently ignoring a typoed document would
//! desynchronize the whole fleet.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde_yaml::Value;

use crate::constants::{CONF_FILE, MANAGED_MODULES_FILE, MODULE_CONF_FILE, MODULE_FILES_DIR};
use crate::error::{Error, Result};

/// Options attached to one filename: option name to scalar value.
pub type OptionMap = BTreeMap<String, Value>;

/// A parsed configuration document: filename to option mapping.
pub type ConfigDocument = BTreeMap<String, OptionMap>;

/// Fully-resolved configuration for a single sync run.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Directory the module working copies live under.
    pub project_root: PathBuf,
    /// Directory holding the central configuration and template tree.
    pub configs: PathBuf,
    /// Registry file name, relative to `configs`.
    pub managed_modules_conf: String,
    /// Optional regular expression restricting which modules are synced.
    pub filter: Option<String>,
    /// Namespace assumed for module identifiers without an embedded one.
    pub namespace: String,
    /// Git base URI prefix that module clone URIs are resolved against.
    pub git_base: String,
    /// Branch the sync operates on.
    pub branch: String,
    /// Commit message used when pushing synced changes.
    pub message: String,
    /// Skip all git operations and work on existing checkouts only.
    pub offline: bool,
    /// Render changes but only report what would be committed.
    pub noop: bool,
    /// Tag pattern handed to downstream release tooling.
    pub tag_pattern: String,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            project_root: PathBuf::from("modules"),
            configs: PathBuf::from("."),
            managed_modules_conf: MANAGED_MODULES_FILE.to_string(),
            filter: None,
            namespace: "fleet".to_string(),
            git_base: "git@github.com:".to_string(),
            branch: "master".to_string(),
            message: "Update template files".to_string(),
            offline: false,
            noop: false,
            tag_pattern: "%s".to_string(),
        }
    }
}

impl SyncOptions {
    /// Path of the central configuration document.
    pub fn global_config_path(&self) -> PathBuf {
        self.configs.join(CONF_FILE)
    }

    /// Root of the template tree.
    pub fn templates_root(&self) -> PathBuf {
        self.configs.join(MODULE_FILES_DIR)
    }

    /// Path of the managed-modules registry.
    pub fn registry_path(&self) -> PathBuf {
        self.configs.join(&self.managed_modules_conf)
    }

    /// Working-copy directory of one module.
    pub fn module_dir(&self, name: &str) -> PathBuf {
        self.project_root.join(name)
    }

    /// Path of one module's local configuration document.
    pub fn module_config_path(&self, name: &str) -> PathBuf {
        self.module_dir(name).join(MODULE_CONF_FILE)
    }

    /// Destination path of a managed file inside a module's working copy.
    pub fn module_file(&self, name: &str, file: &str) -> PathBuf {
        self.module_dir(name).join(file)
    }

    /// Source template path for a managed file.
    pub fn template_path(&self, file: &str) -> PathBuf {
        self.templates_root().join(file)
    }
}

/// Load a configuration document from `path`.
///
/// Returns an empty document when the path does not exist or the file has
/// no content. A filename key with no options (`Gemfile:` on a line of its
/// own) normalizes to an empty option mapping.
pub fn parse_config(path: &Path) -> Result<ConfigDocument> {
    if !path.exists() {
        return Ok(ConfigDocument::new());
    }

    let raw = fs::read_to_string(path)?;
    if raw.trim().is_empty() {
        return Ok(ConfigDocument::new());
    }

    // Option values may be omitted in YAML, so parse through Option and
    // normalize nulls to empty mappings afterwards.
    let parsed: Option<BTreeMap<String, Option<OptionMap>>> = serde_yaml::from_str(&raw)
        .map_err(|e| Error::ConfigParse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

    Ok(parsed
        .unwrap_or_default()
        .into_iter()
        .map(|(file, options)| (file, options.unwrap_or_default()))
        .collect())
}
