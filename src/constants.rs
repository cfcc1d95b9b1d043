//! Well-known file and key names used across a sync run.

/// Central configuration document, relative to the configs directory.
pub const CONF_FILE: &str = "defaults.yml";

/// Per-module configuration document, relative to a module's working copy.
pub const MODULE_CONF_FILE: &str = ".fleet-sync.yml";

/// Directory holding the template tree, relative to the configs directory.
pub const MODULE_FILES_DIR: &str = "templates";

/// Managed-modules registry, relative to the configs directory.
pub const MANAGED_MODULES_FILE: &str = "managed_modules.yml";

/// Reserved configuration key holding defaults that apply to every file.
///
/// This key is never treated as a manageable file. The `*` characters keep
/// it from colliding with any real path.
pub const GLOBAL_DEFAULTS_KEY: &str = "*defaults*";

/// Option key that excludes a file (or a whole subtree) from management.
pub const UNMANAGED_KEY: &str = "unmanaged";

/// Option key that marks a managed file for removal from the module.
pub const DELETE_KEY: &str = "delete";
