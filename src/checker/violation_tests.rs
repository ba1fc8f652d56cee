use std::path::PathBuf;

use super::*;

fn make(severity: Severity) -> Violation {
    Violation::new("demo-rule", severity, "something is off".to_string())
}

#[test]
fn display_without_location() {
    let v = make(Severity::Error);
    assert_eq!(v.to_string(), "✗ ERROR: something is off");
}

#[test]
fn display_with_file_and_line() {
    let v = make(Severity::Warning).at("commands/run.md").line(3);
    assert_eq!(v.to_string(), "⚠ WARNING [commands/run.md:3]: something is off");
    assert_eq!(v.file_path, Some(PathBuf::from("commands/run.md")));
}

#[test]
fn tally_counts_each_severity() {
    let violations = vec![
        make(Severity::Error),
        make(Severity::Warning),
        make(Severity::Warning),
        make(Severity::Info),
    ];
    let counts = ViolationCounts::tally(&violations);
    assert_eq!(
        counts,
        ViolationCounts {
            errors: 1,
            warnings: 2,
            info: 1
        }
    );
}

#[test]
fn info_only_run_is_clean() {
    let counts = ViolationCounts::tally(&[make(Severity::Info)]);
    assert!(counts.is_clean());
    assert!(!counts.is_failure(true));
}

#[test]
fn warnings_fail_only_under_strict() {
    let counts = ViolationCounts::tally(&[make(Severity::Warning)]);
    assert!(!counts.is_failure(false));
    assert!(counts.is_failure(true));
}

#[test]
fn severity_order_is_total() {
    assert!(Severity::Error > Severity::Warning);
    assert!(Severity::Warning > Severity::Info);
}

#[test]
fn severity_parses_lowercase_only() {
    assert_eq!("error".parse::<Severity>(), Ok(Severity::Error));
    assert_eq!("info".parse::<Severity>(), Ok(Severity::Info));
    assert!("Error".parse::<Severity>().is_err());
    assert!("fatal".parse::<Severity>().is_err());
}

#[test]
fn relative_to_strips_root() {
    let root = PathBuf::from("/repo");
    let inside = make(Severity::Error).at("/repo/commands/run.md").relative_to(&root);
    let at_root = make(Severity::Error).at("/repo").relative_to(&root);
    let outside = make(Severity::Error).at("/other/file.md").relative_to(&root);

    assert_eq!(inside.file_path, Some(PathBuf::from("commands/run.md")));
    assert_eq!(at_root.file_path, Some(PathBuf::from(".")));
    assert_eq!(outside.file_path, Some(PathBuf::from("/other/file.md")));
    assert_eq!(make(Severity::Info).relative_to(&root).file_path, None);
}
