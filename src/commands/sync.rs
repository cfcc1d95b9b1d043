//! Sync command implementation
//!
//! The sync command runs the full per-module pipeline:
//! 1. Load the central configuration and the managed-modules registry
//! 2. Pull or clone each module's working copy
//! 3. Resolve the effective configuration for every candidate file
//! 4. Render, delete or skip each file
//! 5. Commit and push the managed files (or report, in no-op mode)

use std::time::Instant;

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use fleet_sync::config::SyncOptions;
use fleet_sync::output::{emoji, OutputConfig};
use fleet_sync::sync;

/// Arguments for the sync command
#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Directory module working copies are cloned into
    #[arg(long, value_name = "DIR", default_value = "modules")]
    pub project_root: PathBuf,

    /// Directory containing defaults.yml, templates/ and managed_modules.yml
    #[arg(short, long, value_name = "DIR", default_value = ".", env = "FLEET_SYNC_CONFIGS")]
    pub configs: PathBuf,

    /// Registry file name, relative to the configs directory
    #[arg(long, value_name = "FILE", default_value = "managed_modules.yml")]
    pub managed_modules_conf: String,

    /// Regular expression restricting which modules are synced
    #[arg(short, long, value_name = "REGEX")]
    pub filter: Option<String>,

    /// Namespace assumed for modules without an embedded one
    #[arg(long, value_name = "NAMESPACE", default_value = "fleet")]
    pub namespace: String,

    /// Git base URI prefix module clone URIs are resolved against
    #[arg(long, value_name = "URI", default_value = "git@github.com:")]
    pub git_base: String,

    /// Branch to sync on
    #[arg(short, long, value_name = "BRANCH", default_value = "master")]
    pub branch: String,

    /// Commit message used when pushing synced changes
    #[arg(short, long, value_name = "MSG", default_value = "Update template files")]
    pub message: String,

    /// Tag pattern handed to downstream release tooling
    #[arg(long, value_name = "PATTERN", default_value = "%s")]
    pub tag_pattern: String,

    /// Skip all git operations and work on existing checkouts only
    #[arg(long)]
    pub offline: bool,

    /// Render changes but only report what would be committed
    #[arg(short = 'n', long)]
    pub noop: bool,

    /// Suppress all output except errors
    #[arg(short, long)]
    pub quiet: bool,
}

/// Execute the sync command
pub fn execute(args: SyncArgs, output: &OutputConfig) -> Result<()> {
    let start_time = Instant::now();

    let options = SyncOptions {
        project_root: args.project_root,
        configs: args.configs,
        managed_modules_conf: args.managed_modules_conf,
        filter: args.filter,
        namespace: args.namespace,
        git_base: args.git_base,
        branch: args.branch,
        message: args.message,
        offline: args.offline,
        noop: args.noop,
        tag_pattern: args.tag_pattern,
    };

    if !args.quiet {
        println!("{} Fleet Sync", emoji(output, "🔄", "[SYNC]"));
        println!();

        if options.noop {
            println!(
                "{} NO-OP MODE - Nothing will be committed",
                emoji(output, "🔎", "[NOOP]")
            );
            println!();
        }
        if options.offline {
            println!(
                "{} OFFLINE MODE - Working on existing checkouts only",
                emoji(output, "📴", "[OFFLINE]")
            );
            println!();
        }
    }

    match sync::run(&options) {
        Ok(report) => {
            let duration = start_time.elapsed();

            if !args.quiet {
                for module in &report.modules {
                    if !module.errors.is_empty() {
                        println!(
                            "{} {} failed: {}",
                            emoji(output, "⚠️", "[WARN]"),
                            module.id,
                            module.errors.join("; ")
                        );
                    } else {
                        println!(
                            "{} {} ({} managed, {} unmanaged)",
                            emoji(output, "✅", "[OK]"),
                            module.id,
                            module.managed.len(),
                            module.unmanaged.len()
                        );
                    }
                }

                println!();
                println!(
                    "Synced {} modules in {:.2}s",
                    report.modules.len(),
                    duration.as_secs_f64()
                );
            }

            if report.has_errors() {
                anyhow::bail!("one or more modules failed to sync");
            }
            Ok(())
        }
        Err(e) => {
            if !args.quiet {
                println!("{} Sync failed", emoji(output, "❌", "[FAIL]"));
                println!();
            }
            Err(e.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn args_for(configs: PathBuf, project_root: PathBuf) -> SyncArgs {
        SyncArgs {
            project_root,
            configs,
            managed_modules_conf: "managed_modules.yml".to_string(),
            filter: None,
            namespace: "fleet".to_string(),
            git_base: "git@github.com:".to_string(),
            branch: "master".to_string(),
            message: "Update template files".to_string(),
            tag_pattern: "%s".to_string(),
            offline: true,
            noop: false,
            quiet: true,
        }
    }

    #[test]
    fn test_execute_missing_templates_root() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("managed_modules.yml"), "widget:\n").unwrap();

        let args = args_for(temp.path().to_path_buf(), temp.path().join("modules"));
        let result = execute(args, &OutputConfig::without_color());

        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Directory not found"));
    }

    #[test]
    fn test_execute_offline_sync() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("templates")).unwrap();
        fs::write(temp.path().join("templates/Gemfile"), "plain\n").unwrap();
        fs::write(temp.path().join("managed_modules.yml"), "widget:\n").unwrap();

        let args = args_for(temp.path().to_path_buf(), temp.path().join("modules"));
        let result = execute(args, &OutputConfig::without_color());

        assert!(result.is_ok());
        assert!(temp.path().join("modules/widget/Gemfile").exists());
    }

    #[test]
    fn test_execute_empty_registry() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("templates")).unwrap();
        fs::write(temp.path().join("managed_modules.yml"), "").unwrap();

        let args = args_for(temp.path().to_path_buf(), temp.path().join("modules"));
        let result = execute(args, &OutputConfig::without_color());

        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("No modules found"));
    }
}
