//! # Template Rendering
//!
//! Templates are plain text files with `{{ key }}` placeholders that
//! resolve against the effective configuration of the file being rendered.
//! Only scalar values substitute; a placeholder naming an undefined or
//! non-scalar variable is a hard error carrying the variable name, since a
//! silently empty substitution would push broken files to every module.
//!
//! Writing and removing rendered output also lives here so the sync loop
//! touches module working copies through one seam. Removing a file that is
//! already absent succeeds, which keeps delete actions idempotent.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use serde_yaml::Value;

use crate::config::OptionMap;
use crate::error::{Error, Result};

/// A loaded template, ready to render.
#[derive(Debug, Clone)]
pub struct Template {
    path: PathBuf,
    source: String,
}

fn placeholder() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| {
        // Compiled once; the pattern is a literal and cannot fail.
        Regex::new(r"\{\{\s*([A-Za-z0-9_][A-Za-z0-9_.-]*)\s*\}\}")
            .unwrap_or_else(|e| panic!("invalid placeholder pattern: {e}"))
    })
}

/// Load the template at `path`.
pub fn compile(path: &Path) -> Result<Template> {
    let source = fs::read_to_string(path)?;
    Ok(Template {
        path: path.to_path_buf(),
        source,
    })
}

/// Render `template` with `context` as the variable scope.
pub fn render(template: &Template, context: &OptionMap) -> Result<String> {
    let mut output = String::with_capacity(template.source.len());
    let mut cursor = 0;

    for captures in placeholder().captures_iter(&template.source) {
        let (Some(whole), Some(name)) = (captures.get(0), captures.get(1)) else {
            continue;
        };
        output.push_str(&template.source[cursor..whole.start()]);

        let key = name.as_str();
        let value = context.get(key).ok_or_else(|| Error::Template {
            message: format!("undefined variable in {}", template.path.display()),
            variable: Some(key.to_string()),
        })?;
        output.push_str(&scalar(value, key)?);

        cursor = whole.end();
    }
    output.push_str(&template.source[cursor..]);

    Ok(output)
}

/// Write rendered output to `dest`, creating parent directories as needed.
pub fn write_output(content: &str, dest: &Path) -> Result<()> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(dest, content)?;
    Ok(())
}

/// Remove `dest` from a module working copy.
///
/// A file that is already gone is not an error.
pub fn remove(dest: &Path) -> Result<()> {
    match fs::remove_file(dest) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

fn scalar(value: &Value, key: &str) -> Result<String> {
    match value {
        Value::Null => Ok(String::new()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Number(n) => Ok(n.to_string()),
        Value::String(s) => Ok(s.clone()),
        _ => Err(Error::Template {
            message: "only scalar values can be substituted".to_string(),
            variable: Some(key.to_string()),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn template(source: &str) -> Template {
        Template {
            path: PathBuf::from("templates/test.txt"),
            source: source.to_string(),
        }
    }

    fn context(pairs: &[(&str, Value)]) -> OptionMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_render_substitutes_variables() {
        let tpl = template("ruby '{{ ruby_version }}'\nlicense: {{license}}\n");
        let ctx = context(&[
            ("ruby_version", Value::String("2.7".to_string())),
            ("license", Value::String("Apache-2.0".to_string())),
        ]);

        let output = render(&tpl, &ctx).unwrap();
        assert_eq!(output, "ruby '2.7'\nlicense: Apache-2.0\n");
    }

    #[test]
    fn test_render_without_placeholders_is_verbatim() {
        let tpl = template("plain content, no substitution\n");
        let output = render(&tpl, &OptionMap::new()).unwrap();
        assert_eq!(output, "plain content, no substitution\n");
    }

    #[test]
    fn test_render_scalar_types() {
        let tpl = template("{{ count }} {{ enabled }} {{ empty }}");
        let ctx = context(&[
            ("count", Value::Number(3.into())),
            ("enabled", Value::Bool(true)),
            ("empty", Value::Null),
        ]);

        let output = render(&tpl, &ctx).unwrap();
        assert_eq!(output, "3 true ");
    }

    #[test]
    fn test_render_undefined_variable_is_an_error() {
        let tpl = template("ruby '{{ ruby_version }}'");
        let err = render(&tpl, &OptionMap::new()).unwrap_err();

        let display = format!("{}", err);
        assert!(display.contains("Template processing error"));
        assert!(display.contains("(variable: ruby_version)"));
    }

    #[test]
    fn test_render_non_scalar_variable_is_an_error() {
        let tpl = template("{{ owners }}");
        let ctx = context(&[(
            "owners",
            Value::Sequence(vec![Value::String("acme".to_string())]),
        )]);

        let err = render(&tpl, &ctx).unwrap_err();
        assert!(matches!(
            err,
            Error::Template {
                variable: Some(ref v),
                ..
            } if v == "owners"
        ));
    }

    #[test]
    fn test_render_repeated_variable() {
        let tpl = template("{{ name }}-{{ name }}");
        let ctx = context(&[("name", Value::String("widget".to_string()))]);
        assert_eq!(render(&tpl, &ctx).unwrap(), "widget-widget");
    }

    #[test]
    fn test_compile_reads_source() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("Gemfile");
        fs::write(&path, "source 'https://rubygems.org'\n").unwrap();

        let tpl = compile(&path).unwrap();
        let output = render(&tpl, &OptionMap::new()).unwrap();
        assert_eq!(output, "source 'https://rubygems.org'\n");
    }

    #[test]
    fn test_compile_missing_file_is_an_error() {
        assert!(compile(Path::new("/nonexistent/template")).is_err());
    }

    #[test]
    fn test_write_output_creates_parents() {
        let temp = TempDir::new().unwrap();
        let dest = temp.path().join("deep/nested/Gemfile");

        write_output("content", &dest).unwrap();
        assert_eq!(fs::read_to_string(&dest).unwrap(), "content");
    }

    #[test]
    fn test_write_output_overwrites() {
        let temp = TempDir::new().unwrap();
        let dest = temp.path().join("Gemfile");
        fs::write(&dest, "old").unwrap();

        write_output("new", &dest).unwrap();
        assert_eq!(fs::read_to_string(&dest).unwrap(), "new");
    }

    #[test]
    fn test_remove_deletes_file() {
        let temp = TempDir::new().unwrap();
        let dest = temp.path().join(".travis.yml");
        fs::write(&dest, "gone").unwrap();

        remove(&dest).unwrap();
        assert!(!dest.exists());
    }

    #[test]
    fn test_remove_absent_file_is_ok() {
        let temp = TempDir::new().unwrap();
        remove(&temp.path().join("never-existed")).unwrap();
    }
}
