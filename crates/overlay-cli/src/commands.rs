use std::fs;
use std::path::Path;

use anyhow::Context;
use colored::Colorize;
use overlay_config::{to_json, ConfigLoader};
use overlay_merge::{DeepMerger, MergeConfig};
use overlay_types::Value;
use tracing::info;

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let loader = ConfigLoader::new(MergeConfig::new().with_max_depth(cli.max_depth));
    match cli.command {
        Command::Merge(args) => cmd_merge(&loader, args),
        Command::Copy(args) => cmd_copy(&loader, args),
        Command::Check(args) => cmd_check(&loader, args),
    }
}

fn cmd_merge(loader: &ConfigLoader, args: MergeArgs) -> anyhow::Result<()> {
    let merged = loader.load_layers(&args.files)?;
    let text = render(&merged, args.compact)?;
    match args.output {
        Some(path) => {
            fs::write(&path, text + "\n")
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!(path = %path.display(), layers = args.files.len(), "wrote merged config");
            println!(
                "{} Merged {} layers into {}",
                "✓".green().bold(),
                args.files.len().to_string().bold(),
                path.display().to_string().yellow()
            );
        }
        None => println!("{text}"),
    }
    Ok(())
}

fn cmd_copy(loader: &ConfigLoader, args: CopyArgs) -> anyhow::Result<()> {
    let value = loader.load_file(&args.file)?;
    let copied = normalize(loader.merger(), &value)?;
    println!("{}", render(&copied, args.compact)?);
    Ok(())
}

fn normalize(merger: &DeepMerger, value: &Value) -> anyhow::Result<Value> {
    Ok(merger.copy(value)?)
}

fn cmd_check(loader: &ConfigLoader, args: CheckArgs) -> anyhow::Result<()> {
    let mut failed = 0;
    for path in &args.files {
        match check_file(loader, path) {
            Ok(()) => println!("  {} {}", "✓".green(), path.display()),
            Err(err) => {
                failed += 1;
                println!("  {} {}: {}", "✗".red(), path.display(), err.to_string().dimmed());
            }
        }
    }
    if failed > 0 {
        anyhow::bail!("{failed} of {} files failed to parse", args.files.len());
    }
    println!("{} All {} files OK.", "✓".green().bold(), args.files.len());
    Ok(())
}

fn check_file(loader: &ConfigLoader, path: &Path) -> anyhow::Result<()> {
    let value = loader.load_file(path)?;
    to_json(&value)?;
    Ok(())
}

fn render(value: &Value, compact: bool) -> anyhow::Result<String> {
    let json = to_json(value)?;
    let text = if compact {
        serde_json::to_string(&json)?
    } else {
        serde_json::to_string_pretty(&json)?
    };
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn layer(text: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(text.as_bytes()).unwrap();
        file
    }

    #[test]
    fn merge_writes_output_file() {
        let base = layer(r#"{"a": 1, "nested": {"x": true}}"#);
        let top = layer(r##"{"# note": 0, "nested": {"y": "z"}}"##);
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("merged.json");

        cmd_merge(
            &ConfigLoader::default(),
            MergeArgs {
                files: vec![base.path().to_path_buf(), top.path().to_path_buf()],
                compact: true,
                output: Some(out.clone()),
            },
        )
        .unwrap();

        let written = fs::read_to_string(&out).unwrap();
        assert_eq!(written.trim(), r#"{"a":1,"nested":{"x":true,"y":"z"}}"#);
    }

    #[test]
    fn check_fails_on_broken_file() {
        let good = layer("{}");
        let bad = layer("{");
        let result = cmd_check(
            &ConfigLoader::default(),
            CheckArgs {
                files: vec![good.path().to_path_buf(), bad.path().to_path_buf()],
            },
        );
        let err = result.unwrap_err();
        assert!(err.to_string().contains("1 of 2"));
    }

    #[test]
    fn normalize_respects_depth_limit() {
        let nested = Value::record([("a", Value::record([("b", Value::record([("c", 1)]))]))]);
        let shallow = DeepMerger::new(MergeConfig::new().with_max_depth(2));
        let err = normalize(&shallow, &nested).unwrap_err();
        assert!(err.to_string().contains("depth limit of 2"));

        let copied = normalize(&DeepMerger::default(), &nested).unwrap();
        assert!(copied.structurally_equal(&nested));
        assert!(!copied.same(&nested));
    }

    #[test]
    fn render_modes() {
        let value = Value::record([("k", 1)]);
        assert_eq!(render(&value, true).unwrap(), r#"{"k":1}"#);
        assert_eq!(render(&value, false).unwrap(), "{\n  \"k\": 1\n}");
    }
}
