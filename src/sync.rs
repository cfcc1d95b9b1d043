//! # Sync Orchestration
//!
//! `run` drives one full sync: it loads the central configuration and the
//! managed-modules registry once, then processes each module strictly in
//! registry order. Per module it pulls the working copy, loads the
//! module-local configuration, discovers the candidate files, plans an
//! action for each and executes it, and finally hands the managed-file set
//! to git for committing.
//!
//! Modules are processed one at a time and files within a module
//! sequentially. The git collaborator operates on one checkout at a time,
//! and sequential processing keeps log output deterministic.
//!
//! ## Error policy
//!
//! Startup problems (unparseable documents, missing template tree, empty
//! registry) abort the run before any module is touched. An invalid module
//! name or a git failure aborts only that module; the error is logged,
//! recorded in the module's report, and the run moves on. A missing
//! template or a rendering failure aborts the whole run, annotated with
//! the file and module, because it signals configuration drift an operator
//! must resolve. There is no mid-module rollback: files already written or
//! deleted stay that way, and re-running recomputes every file from the
//! same sources, which restores consistency.

use std::collections::BTreeSet;

use crate::action::{self, Action, ModuleContext};
use crate::catalog;
use crate::config::{self, SyncOptions};
use crate::error::{Error, Result};
use crate::git;
use crate::registry::{self, ModuleEntry};
use crate::renderer;
use crate::resolver::ConfigCascade;

/// Outcome of one module's sync.
#[derive(Debug, Clone, Default)]
pub struct ModuleReport {
    /// Module identifier as written in the registry.
    pub id: String,
    /// Files this run manages in the module, deletions included.
    pub managed: Vec<String>,
    /// Files skipped as unmanaged.
    pub unmanaged: Vec<String>,
    /// Recoverable errors hit while processing this module.
    pub errors: Vec<String>,
}

impl ModuleReport {
    fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            ..Self::default()
        }
    }
}

/// Aggregated outcome of a sync run.
#[derive(Debug, Clone, Default)]
pub struct SyncReport {
    pub modules: Vec<ModuleReport>,
}

impl SyncReport {
    /// Whether any module recorded a recoverable error.
    pub fn has_errors(&self) -> bool {
        self.modules.iter().any(|m| !m.errors.is_empty())
    }
}

/// Run a full sync over every registry module matching the filter.
pub fn run(opts: &SyncOptions) -> Result<SyncReport> {
    let global = config::parse_config(&opts.global_config_path())?;
    let modules = registry::managed_modules(&opts.registry_path(), opts.filter.as_deref())?;

    let mut report = SyncReport::default();
    for entry in &modules {
        report.modules.push(sync_module(opts, &global, entry)?);
    }

    Ok(report)
}

fn sync_module(
    opts: &SyncOptions,
    global: &config::ConfigDocument,
    entry: &ModuleEntry,
) -> Result<ModuleReport> {
    log::info!("Syncing {}", entry.id);
    let mut report = ModuleReport::new(&entry.id);

    let (namespace, name) = match registry::split_full_name(&entry.id, &opts.namespace) {
        Ok(split) => split,
        Err(err) => {
            log::error!("Skipping {}: {}", entry.id, err);
            report.errors.push(err.to_string());
            return Ok(report);
        }
    };

    let branch = git::branch_for(&entry.options, opts);

    if !opts.offline {
        if let Err(err) = git::pull(opts, &namespace, &name, branch) {
            log::error!("Failed to fetch {}: {}", entry.id, err);
            report.errors.push(err.to_string());
            return Ok(report);
        }
    }

    let module_doc = config::parse_config(&opts.module_config_path(&name))?;
    let candidates = catalog::discover(&opts.templates_root(), global, &module_doc)?;
    let cascade = ConfigCascade::new(global, &module_doc);
    let module_context = ModuleContext {
        namespace,
        name: name.clone(),
        git_base: opts.git_base.clone(),
    };

    let mut unmanaged = BTreeSet::new();
    for filename in &candidates {
        match action::plan(filename, &cascade, &module_context, opts) {
            Action::Skip => {
                log::info!("Not managing {} in {}", filename, name);
                unmanaged.insert(filename.clone());
            }
            Action::Delete { dest } => {
                log::debug!("Deleting {} from {}", filename, name);
                renderer::remove(&dest)?;
            }
            Action::Render {
                template,
                dest,
                context,
            } => {
                if !template.is_file() {
                    return Err(Error::TemplateMissing {
                        path: template.display().to_string(),
                        file: filename.clone(),
                        module: name.clone(),
                    });
                }
                let rendered = renderer::compile(&template)
                    .and_then(|tpl| renderer::render(&tpl, &context))
                    .map_err(|e| Error::Render {
                        file: filename.clone(),
                        module: name.clone(),
                        source: Box::new(e),
                    })?;
                renderer::write_output(&rendered, &dest)?;
            }
        }
    }

    report.managed = candidates
        .iter()
        .filter(|file| !unmanaged.contains(*file))
        .cloned()
        .collect();
    report.unmanaged = unmanaged.into_iter().collect();

    if !opts.offline {
        let outcome = if opts.noop {
            git::update_noop(opts, &name, branch)
        } else {
            git::update(opts, &name, &report.managed, branch)
        };
        if let Err(err) = outcome {
            log::error!("Failed to update {}: {}", entry.id, err);
            report.errors.push(err.to_string());
        }
    }

    Ok(report)
}
