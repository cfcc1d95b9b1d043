//! Shared test utilities for integration and E2E tests.
//!
//! Provides a `SyncFixture` that lays out a configs directory (template
//! tree, central configuration, managed-modules registry) plus a project
//! root for module working copies, and helpers to run the CLI against it.
//!
//! ## Usage
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = SyncFixture::new()
//!         .with_registry("widget:\n")
//!         .with_template("Gemfile", "plain\n");
//!     fixture.sync_command().assert().success();
//! }
//! ```

use assert_fs::prelude::*;
use std::path::Path;

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    pub use assert_fs::prelude::*;
    #[allow(unused_imports)]
    pub use assert_fs::TempDir;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::registries;
    pub use super::SyncFixture;
}

/// Common registry snippets for testing.
#[allow(dead_code)]
pub mod registries {
    /// Single module, mapping form.
    pub const SINGLE: &str = "widget:\n";

    /// Several modules, mapping form.
    pub const THREE: &str = "a-mod:\nb-mod:\nc-other:\n";

    /// Sequence form with a namespaced identifier.
    pub const NAMESPACED: &str = "- acme/widget\n";

    /// Invalid YAML for error testing.
    pub const INVALID_YAML: &str = "- [nested, sequence]\n";
}

/// A test fixture with a configs directory and a project root.
pub struct SyncFixture {
    temp_dir: assert_fs::TempDir,
}

impl SyncFixture {
    /// Create a new fixture with an empty template tree.
    pub fn new() -> Self {
        let temp_dir = assert_fs::TempDir::new().expect("Failed to create temp directory");
        temp_dir
            .child("configs/templates")
            .create_dir_all()
            .expect("Failed to create template tree");
        Self { temp_dir }
    }

    /// Create a fixture without a template tree, for error-path tests.
    #[allow(dead_code)]
    pub fn without_templates() -> Self {
        let temp_dir = assert_fs::TempDir::new().expect("Failed to create temp directory");
        temp_dir
            .child("configs")
            .create_dir_all()
            .expect("Failed to create configs directory");
        Self { temp_dir }
    }

    /// Write the managed-modules registry.
    pub fn with_registry(self, content: &str) -> Self {
        self.write("configs/managed_modules.yml", content)
    }

    /// Write the central configuration document.
    #[allow(dead_code)]
    pub fn with_defaults(self, content: &str) -> Self {
        self.write("configs/defaults.yml", content)
    }

    /// Add a template file under the template tree.
    pub fn with_template(self, path: &str, content: &str) -> Self {
        self.write(&format!("configs/templates/{}", path), content)
    }

    /// Add a file inside a module's working copy.
    #[allow(dead_code)]
    pub fn with_module_file(self, module: &str, path: &str, content: &str) -> Self {
        self.write(&format!("modules/{}/{}", module, path), content)
    }

    fn write(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child(path)
            .write_str(content)
            .expect("Failed to write fixture file");
        self
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Path of the configs directory.
    pub fn configs(&self) -> std::path::PathBuf {
        self.temp_dir.path().join("configs")
    }

    /// Path of the project root.
    pub fn project_root(&self) -> std::path::PathBuf {
        self.temp_dir.path().join("modules")
    }

    /// Path of one managed file inside a module working copy.
    #[allow(dead_code)]
    pub fn module_file(&self, module: &str, path: &str) -> std::path::PathBuf {
        self.project_root().join(module).join(path)
    }

    /// Create a command configured to run in this fixture's directory.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("fleet-sync");
        cmd.current_dir(self.path());
        cmd
    }

    /// Create an offline sync command against this fixture's layout.
    pub fn sync_command(&self) -> assert_cmd::Command {
        let mut cmd = self.command();
        cmd.arg("sync")
            .arg("--offline")
            .arg("--configs")
            .arg(self.configs())
            .arg("--project-root")
            .arg(self.project_root());
        cmd
    }
}

impl Default for SyncFixture {
    fn default() -> Self {
        Self::new()
    }
}
