use clap::Parser;

use super::*;
use crate::cli::Commands;
use crate::test_fixtures::TreeFixture;

fn parse(extra: &[&str], path: &std::path::Path) -> (CheckArgs, Cli) {
    let mut argv = vec!["claudelint".to_string(), "--color".to_string(), "never".to_string()];
    argv.push("check".to_string());
    argv.push(path.display().to_string());
    argv.extend(extra.iter().map(|s| (*s).to_string()));

    let mut cli = Cli::try_parse_from(argv).unwrap();
    let Commands::Check(args) = std::mem::replace(&mut cli.command, Commands::Rules) else {
        panic!("expected the check subcommand");
    };
    (args, cli)
}

fn run(fx: &TreeFixture, extra: &[&str]) -> (i32, String) {
    let (args, cli) = parse(extra, &fx.root());
    let mut out = Vec::new();
    let code = run_check_impl(&args, &cli, &mut out).unwrap();
    (code, String::from_utf8(out).unwrap())
}

#[test]
fn clean_plugin_passes() {
    let fx = TreeFixture::new();
    fx.manifest("", "demo").file("README.md", "# demo");

    let (code, output) = run(&fx, &["--no-config"]);

    assert_eq!(code, EXIT_SUCCESS);
    assert!(output.starts_with("Linting plugins in: "), "{output}");
    assert!(output.contains("✓ All checks passed!"), "{output}");
}

#[test]
fn warnings_pass_unless_strict() {
    let fx = TreeFixture::new();
    fx.manifest("", "demo");

    let (code, output) = run(&fx, &["--no-config"]);
    assert_eq!(code, EXIT_SUCCESS);
    assert!(output.contains("[.]: Missing README.md (recommended)"), "{output}");
    assert!(output.contains("Warnings: 1"), "{output}");

    let (code, _) = run(&fx, &["--no-config", "--strict"]);
    assert_eq!(code, EXIT_LINT_FAILED);
}

#[test]
fn errors_fail_the_run() {
    let fx = TreeFixture::new();
    fx.file(".claude-plugin/plugin.json", "{ not json")
        .file("README.md", "# demo");

    let (code, output) = run(&fx, &["--no-config"]);

    assert_eq!(code, EXIT_LINT_FAILED);
    assert!(output.contains("[.claude-plugin/plugin.json]: Invalid JSON"), "{output}");
}

#[test]
fn json_report_uses_relative_paths() {
    let fx = TreeFixture::new();
    fx.manifest("", "demo");

    let (code, output) = run(&fx, &["--no-config", "--format", "json"]);
    let report: serde_json::Value = serde_json::from_str(&output).unwrap();

    assert_eq!(code, EXIT_SUCCESS);
    assert_eq!(report["summary"]["warnings"], 1);
    assert_eq!(report["violations"][0]["rule_id"], "plugin-readme");
    assert_eq!(report["violations"][0]["file_path"], ".");
}

#[test]
fn quiet_omits_header() {
    let fx = TreeFixture::new();
    fx.manifest("", "demo").file("README.md", "# demo");

    let (_, output) = run(&fx, &["--no-config", "--quiet"]);

    assert!(!output.contains("Linting plugins in"));
    assert!(output.contains("Summary:"));
}

#[test]
fn discovered_config_applies() {
    let fx = TreeFixture::new();
    fx.manifest("", "demo")
        .file(".claudelint.yaml", "rules:\n  plugin-readme:\n    enabled: false\n");

    let (code, output) = run(&fx, &["--strict"]);

    assert_eq!(code, EXIT_SUCCESS, "{output}");
    assert!(output.contains("Warnings: 0"));
}

#[test]
fn explicit_config_applies() {
    let fx = TreeFixture::new();
    fx.manifest("", "demo")
        .file("lint/strict.yaml", "strict: true\n");
    let config = fx.root().join("lint/strict.yaml");

    let (code, _) = run(&fx, &["--config", &config.display().to_string()]);

    assert_eq!(code, EXIT_LINT_FAILED);
}

#[test]
fn missing_explicit_config_is_an_error() {
    let fx = TreeFixture::new();
    fx.manifest("", "demo");
    let config = fx.root().join("absent.yaml");
    let (args, cli) = parse(&["--config", &config.display().to_string()], &fx.root());

    let err = run_check_impl(&args, &cli, &mut Vec::new()).unwrap_err();

    assert!(err.to_string().contains("Config file not found"));
    assert_eq!(run_check(&args, &cli), EXIT_CONFIG_ERROR);
}

#[test]
fn missing_repository_is_an_error() {
    let fx = TreeFixture::new();
    let (args, cli) = parse(&["--no-config"], &fx.root().join("absent"));

    let err = run_check_impl(&args, &cli, &mut Vec::new()).unwrap_err();

    assert_eq!(err.error_type(), "RepositoryNotFound");
}

#[test]
fn no_config_ignores_local_file() {
    let fx = TreeFixture::new();
    fx.manifest("", "demo").file(".claudelint.yaml", "strict: true\n");

    let loaded = load_config(&fx.root(), None, true).unwrap();

    assert_eq!(loaded.source, None);
    assert!(!loaded.config.strict);
}
