//! # Git Collaborator
//!
//! All version-control work shells out to the system git command, which
//! automatically handles:
//! - SSH keys from ~/.ssh/
//! - Git credential helpers
//! - Personal access tokens
//! - Any authentication configured in ~/.gitconfig
//!
//! Three operations cover the sync lifecycle: `pull` brings a module's
//! working copy to the target branch before files are rendered, `update`
//! stages the managed files and pushes a commit afterwards, and
//! `update_noop` reports what would be committed without touching the
//! remote. Failures carry the command and stderr so the operator can rerun
//! the exact git invocation by hand.

use std::fs;
use std::path::Path;
use std::process::Command;

use crate::config::{OptionMap, SyncOptions};
use crate::error::{Error, Result};

/// Branch a module syncs on: a `branch` option in its registry entry
/// overrides the run-level branch.
pub fn branch_for<'a>(module_options: &'a OptionMap, opts: &'a SyncOptions) -> &'a str {
    match module_options.get("branch") {
        Some(serde_yaml::Value::String(branch)) => branch,
        _ => &opts.branch,
    }
}

/// Ensure `name`'s working copy exists under the project root, checked out
/// at `branch` and up to date with its remote.
pub fn pull(opts: &SyncOptions, namespace: &str, name: &str, branch: &str) -> Result<()> {
    let repo_dir = opts.module_dir(name);
    let url = format!("{}{}/{}", opts.git_base, namespace, name);

    if repo_dir.join(".git").is_dir() {
        run_git(&repo_dir, &["fetch", "origin"])?;
        run_git(&repo_dir, &["checkout", branch])?;
        run_git(&repo_dir, &["pull", "--ff-only", "origin", branch])?;
        return Ok(());
    }

    if let Some(parent) = repo_dir.parent() {
        fs::create_dir_all(parent)?;
    }

    let output = Command::new("git")
        .args(["clone", "--branch", branch, url.as_str()])
        .arg(&repo_dir)
        .output()
        .map_err(|e| Error::GitClone {
            url: url.clone(),
            branch: branch.to_string(),
            message: e.to_string(),
            hint: None,
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);

        // Provide a helpful hint for common auth failures
        let hint = if stderr.contains("Authentication failed")
            || stderr.contains("Permission denied")
            || stderr.contains("Could not read from remote repository")
        {
            Some(
                "make sure you have access to the repository:\n\
                 - SSH key added to ssh-agent\n\
                 - Git credentials configured\n\
                 - Personal access token set up"
                    .to_string(),
            )
        } else {
            None
        };

        return Err(Error::GitClone {
            url,
            branch: branch.to_string(),
            message: stderr.trim().to_string(),
            hint,
        });
    }

    Ok(())
}

/// Stage the managed files, commit and push to `branch`.
///
/// Nothing is committed when staging produces no changes, so re-running a
/// converged sync leaves the module untouched.
pub fn update(opts: &SyncOptions, name: &str, files: &[String], branch: &str) -> Result<()> {
    let repo_dir = opts.module_dir(name);

    for file in files {
        if repo_dir.join(file).exists() {
            run_git(&repo_dir, &["add", "--", file])?;
        } else {
            // A managed file marked for deletion; drop it from the index
            // if it was ever tracked.
            run_git(&repo_dir, &["rm", "--cached", "--ignore-unmatch", "--", file])?;
        }
    }

    let staged = run_git(&repo_dir, &["diff", "--cached", "--name-only"])?;
    if staged.trim().is_empty() {
        log::info!("No changes in {}", name);
        return Ok(());
    }

    run_git(&repo_dir, &["commit", "-m", &opts.message])?;
    run_git(&repo_dir, &["push", "origin", branch])?;
    Ok(())
}

/// Report the files that differ from the checked-out state without
/// committing anything.
pub fn update_noop(opts: &SyncOptions, name: &str, branch: &str) -> Result<()> {
    let repo_dir = opts.module_dir(name);
    let changed = run_git(&repo_dir, &["status", "--porcelain"])?;

    if changed.trim().is_empty() {
        log::info!("No changes would be made to {}", name);
        return Ok(());
    }

    log::info!("Would commit to {} on branch {}:", name, branch);
    for line in changed.lines() {
        log::info!("  {}", line);
    }
    Ok(())
}

fn run_git(repo_dir: &Path, args: &[&str]) -> Result<String> {
    let output = Command::new("git")
        .arg("-C")
        .arg(repo_dir)
        .args(args)
        .output()
        .map_err(|e| Error::GitCommand {
            command: args.join(" "),
            dir: repo_dir.display().to_string(),
            stderr: e.to_string(),
        })?;

    if !output.status.success() {
        return Err(Error::GitCommand {
            command: args.join(" "),
            dir: repo_dir.display().to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
