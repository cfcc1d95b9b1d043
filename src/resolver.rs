//! # Per-File Configuration Resolution
//!
//! `ConfigCascade` merges the four configuration scopes that apply to a
//! file within a module, in increasing precedence:
//!
//! 1. central defaults (the `*defaults*` key of the central document)
//! 2. central per-file options (keyed by filename)
//! 3. module-local defaults (the `*defaults*` key of the module document)
//! 4. module-local per-file options (keyed by filename)
//!
//! A key set in a later scope overwrites the same key from an earlier one;
//! keys that appear in only one scope survive into the result. The merge is
//! a pure function of the two documents, so a cascade can be built once per
//! module and queried for every candidate file.
//!
//! The cascade also answers the "unmanaged" question: a file is unmanaged
//! when it, or any ancestor directory of it, resolves to an effective
//! configuration with a truthy `unmanaged` flag. The ascent is purely
//! textual over the path segments. Ancestors are configuration keys, not
//! filesystem entries, and need not exist on disk. Marking one directory
//! key unmanaged therefore silently disables management of everything
//! beneath it.

use std::path::Path;

use serde_yaml::Value;

use crate::config::{ConfigDocument, OptionMap};
use crate::constants::{GLOBAL_DEFAULTS_KEY, UNMANAGED_KEY};

static EMPTY: OptionMap = OptionMap::new();

/// The four configuration scopes for one module, ready to merge per file.
#[derive(Debug, Clone, Copy)]
pub struct ConfigCascade<'a> {
    global_defaults: &'a OptionMap,
    global: &'a ConfigDocument,
    module_defaults: &'a OptionMap,
    module: &'a ConfigDocument,
}

impl<'a> ConfigCascade<'a> {
    /// Build a cascade from the central and module-local documents.
    pub fn new(global: &'a ConfigDocument, module: &'a ConfigDocument) -> Self {
        Self {
            global_defaults: global.get(GLOBAL_DEFAULTS_KEY).unwrap_or(&EMPTY),
            global,
            module_defaults: module.get(GLOBAL_DEFAULTS_KEY).unwrap_or(&EMPTY),
            module,
        }
    }

    /// Merge the four scopes into the effective configuration for `filename`.
    pub fn effective(&self, filename: &str) -> OptionMap {
        let mut merged = self.global_defaults.clone();
        for layer in [
            self.global.get(filename),
            Some(self.module_defaults),
            self.module.get(filename),
        ]
        .into_iter()
        .flatten()
        {
            for (key, value) in layer {
                merged.insert(key.clone(), value.clone());
            }
        }
        merged
    }

    /// Whether `filename` is excluded from management.
    ///
    /// Ascends from the file itself through every parent directory and
    /// returns true at the first level whose effective configuration sets
    /// a truthy `unmanaged` flag.
    pub fn is_unmanaged(&self, filename: &str) -> bool {
        for ancestor in Path::new(filename).ancestors() {
            let level = ancestor.to_string_lossy();
            if level.is_empty() {
                continue;
            }
            if truthy(self.effective(&level).get(UNMANAGED_KEY)) {
                return true;
            }
        }
        false
    }
}

/// Flag truthiness for option values: absent, `null` and `false` are
/// falsy, any other value counts as set.
pub fn truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) | Some(Value::Bool(false)) => false,
        Some(_) => true,
    }
}
