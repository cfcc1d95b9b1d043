//! # Per-File Action Planning
//!
//! Given the resolved configuration for one candidate file, exactly one of
//! three actions follows: render the template and write the result, delete
//! the file from the module, or skip it as unmanaged. The decision is a
//! pure function returning a tagged `Action`, so it can be tested without
//! a filesystem or a git checkout; the sync loop executes the chosen
//! action against the real collaborators.
//!
//! Three context keys are injected into the rendering scope after the
//! merge: `module_name`, `namespace` and `git_base`. They are reserved and
//! overwrite any user-supplied option of the same name.

use std::path::PathBuf;

use serde_yaml::Value;

use crate::config::{OptionMap, SyncOptions};
use crate::constants::DELETE_KEY;
use crate::resolver::{truthy, ConfigCascade};

/// Identity of the module a file is being planned for.
#[derive(Debug, Clone)]
pub struct ModuleContext {
    pub namespace: String,
    pub name: String,
    pub git_base: String,
}

/// The action chosen for one candidate file.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Render the template and write the output into the module.
    Render {
        template: PathBuf,
        dest: PathBuf,
        context: OptionMap,
    },
    /// Remove the file from the module working copy.
    Delete { dest: PathBuf },
    /// The file is unmanaged; leave it alone.
    Skip,
}

/// Decide the action for `filename` within one module.
pub fn plan(
    filename: &str,
    cascade: &ConfigCascade,
    module: &ModuleContext,
    opts: &SyncOptions,
) -> Action {
    if cascade.is_unmanaged(filename) {
        return Action::Skip;
    }

    let mut context = cascade.effective(filename);
    context.insert(
        "module_name".to_string(),
        Value::String(module.name.clone()),
    );
    context.insert(
        "namespace".to_string(),
        Value::String(module.namespace.clone()),
    );
    context.insert(
        "git_base".to_string(),
        Value::String(module.git_base.clone()),
    );

    if truthy(context.get(DELETE_KEY)) {
        return Action::Delete {
            dest: opts.module_file(&module.name, filename),
        };
    }

    Action::Render {
        template: opts.template_path(filename),
        dest: opts.module_file(&module.name, filename),
        context,
    }
}
