//! # Managed-Modules Registry
//!
//! The registry lists the modules a sync run operates on. Two YAML shapes
//! are accepted and normalized at this boundary into one canonical form,
//! so the rest of the tool only ever sees `ModuleEntry` values:
//!
//! ```yaml
//! # sequence form, ids only (entries may still attach options)
//! - acme/widget
//! - gadget:
//!     branch: develop
//!
//! # mapping form, id to options
//! acme/widget:
//! gadget:
//!   branch: develop
//! ```
//!
//! Registry order is preserved. It is the processing order of the sync
//! loop, so modules sync in the order an operator wrote them down.
//!
//! Module identifiers optionally embed a namespace (`acme/widget`). The
//! split lives here as well since it is part of module identity.

use std::fs;
use std::path::Path;

use regex::Regex;
use serde::Deserialize;
use serde_yaml::Mapping;

use crate::config::OptionMap;
use crate::error::{Error, Result};

/// One normalized registry entry.
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleEntry {
    /// Module identifier, optionally namespaced (`acme/widget`).
    pub id: String,
    /// Per-module options such as a branch override.
    pub options: OptionMap,
}

/// Raw registry document, before normalization.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawRegistry {
    List(Vec<RawEntry>),
    Map(Mapping),
}

/// One raw sequence entry: a bare id or an id with attached options.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawEntry {
    Id(String),
    WithOptions(Mapping),
}

/// Load the registry at `path`, normalize it and apply the filter.
///
/// A registry that parses but yields no entries is a fatal error, since it
/// almost always means the tool was pointed at the wrong configs
/// directory. The filter is applied afterwards; a filter that matches
/// nothing leaves a valid, empty work list.
pub fn managed_modules(path: &Path, filter: Option<&str>) -> Result<Vec<ModuleEntry>> {
    let raw = if path.exists() {
        fs::read_to_string(path)?
    } else {
        String::new()
    };

    let mut entries = if raw.trim().is_empty() {
        Vec::new()
    } else {
        let registry: RawRegistry =
            serde_yaml::from_str(&raw).map_err(|e| Error::ConfigParse {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
        normalize(registry, path)?
    };

    if entries.is_empty() {
        return Err(Error::EmptyRegistry {
            path: path.display().to_string(),
            hint: Some(
                "check that you specified the configs directory containing managed_modules.yml"
                    .to_string(),
            ),
        });
    }

    if let Some(pattern) = filter {
        let re = Regex::new(pattern)?;
        entries.retain(|entry| re.is_match(&entry.id));
    }

    Ok(entries)
}

/// Split a module identifier into its namespace and name.
///
/// An identifier without a separator takes `default_namespace`. More than
/// one separator is ambiguous and rejected.
pub fn split_full_name(id: &str, default_namespace: &str) -> Result<(String, String)> {
    let mut parts = id.split('/');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(name), None, _) => Ok((default_namespace.to_string(), name.to_string())),
        (Some(namespace), Some(name), None) => Ok((namespace.to_string(), name.to_string())),
        _ => Err(Error::InvalidModuleName {
            name: id.to_string(),
        }),
    }
}

fn normalize(registry: RawRegistry, path: &Path) -> Result<Vec<ModuleEntry>> {
    match registry {
        RawRegistry::List(items) => items
            .into_iter()
            .flat_map(|item| match item {
                RawEntry::Id(id) => vec![Ok(ModuleEntry {
                    id,
                    options: OptionMap::new(),
                })],
                RawEntry::WithOptions(mapping) => mapping_entries(mapping, path),
            })
            .collect(),
        RawRegistry::Map(mapping) => mapping_entries(mapping, path).into_iter().collect(),
    }
}

fn mapping_entries(mapping: Mapping, path: &Path) -> Vec<Result<ModuleEntry>> {
    mapping
        .into_iter()
        .map(|(key, value)| {
            let id = key
                .as_str()
                .ok_or_else(|| Error::ConfigParse {
                    path: path.display().to_string(),
                    message: "module identifiers must be strings".to_string(),
                })?
                .to_string();
            let options: Option<OptionMap> =
                serde_yaml::from_value(value).map_err(|e| Error::ConfigParse {
                    path: path.display().to_string(),
                    message: format!("invalid options for module '{}': {}", id, e),
                })?;
            Ok(ModuleEntry {
                id,
                options: options.unwrap_or_default(),
            })
        })
        .collect()
}
