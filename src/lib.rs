//! # fleet-sync Library
//!
//! This library implements the core of `fleet-sync`, a tool that keeps a
//! fleet of independently-versioned git repositories ("modules") in sync
//! with a central tree of template files: CI configs, lint rules, license
//! files and other boilerplate that should look the same everywhere.
//!
//! ## Core Concepts
//!
//! - **Configuration documents (`config`)**: YAML mappings from filename
//!   to options. A central document applies to every module; each module
//!   may carry a local document with overrides. The reserved `*defaults*`
//!   key holds options that apply to every file.
//! - **Configuration cascade (`resolver`)**: for each file, four scopes
//!   merge with later-wins precedence into one effective configuration.
//!   The cascade also decides whether a file is unmanaged, by ascending
//!   its path and looking for an `unmanaged` flag at any level.
//! - **Candidate catalog (`catalog`)**: the files a module is judged
//!   against, discovered from the template tree and the configuration
//!   documents.
//! - **Actions (`action`)**: per file, exactly one of render, delete or
//!   skip, decided from the effective configuration.
//! - **Orchestration (`sync`)**: iterates the managed-modules registry in
//!   order, executes the per-file actions and reports the managed and
//!   unmanaged sets per module.
//!
//! ## Execution Flow
//!
//! For each module listed in `managed_modules.yml`:
//!
//! 1. Resolve the module's namespace and name.
//! 2. Pull or clone its working copy at the target branch.
//! 3. Load the module-local configuration document.
//! 4. Discover the candidate files.
//! 5. Render, delete or skip each candidate.
//! 6. Commit and push the managed files (or report, in no-op mode).
//!
//! The `git` and `renderer` modules are the seams to the outside world;
//! everything between them is pure configuration resolution.

pub mod action;
pub mod catalog;
pub mod config;
pub mod constants;
pub mod error;
pub mod git;
pub mod output;
pub mod registry;
pub mod renderer;
pub mod resolver;
pub mod sync;
