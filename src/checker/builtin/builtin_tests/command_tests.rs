use crate::checker::builtin::{CommandFrontmatter, CommandNameFormat, CommandNaming, CommandSections};
use crate::test_fixtures::TreeFixture;

use super::{messages, run, run_configured};

const ALL_SECTIONS: &str = "## Name\n\ndemo:do-thing\n\n## Synopsis\n\nx\n\n## Description\n\nx\n\n## Implementation\n\nx\n";

#[test]
fn well_formed_command_passes_every_command_rule() {
    let fx = TreeFixture::new();
    fx.manifest("", "demo").command("", "demo", "run");

    for rule in [
        CommandNaming::RULE,
        CommandFrontmatter::RULE,
        CommandSections::RULE,
        CommandNameFormat::RULE,
    ] {
        assert!(run(&rule, &fx.root()).is_empty(), "{} fired", rule.rule_id);
    }
}

#[test]
fn command_naming() {
    let fx = TreeFixture::new();
    fx.manifest("", "demo")
        .file("commands/good-one.md", "")
        .file("commands/BadOne.md", "")
        .file("commands/notes.txt", "");

    let violations = run(&CommandNaming::RULE, &fx.root());

    assert_eq!(
        messages(&violations),
        vec!["Command name 'BadOne' should use kebab-case"]
    );
    assert_eq!(
        violations[0].file_path.as_deref(),
        Some(fx.root().join("commands/BadOne.md").as_path())
    );
}

#[test]
fn command_frontmatter_variants() {
    let fx = TreeFixture::new();
    fx.manifest("", "demo")
        .file("commands/a-none.md", "# Title\n")
        .file("commands/b-open.md", "---\ndescription: never closed\n")
        .file("commands/c-nodesc.md", "---\nname: x\n---\n")
        .file("commands/d-good.md", "---\ndescription: fine\n---\n");

    let violations = run(&CommandFrontmatter::RULE, &fx.root());

    assert_eq!(
        messages(&violations),
        vec![
            "Missing frontmatter",
            "Invalid frontmatter format",
            "Missing 'description' in frontmatter",
        ]
    );
}

#[test]
fn missing_sections_are_listed_in_order() {
    let fx = TreeFixture::new();
    fx.manifest("", "demo")
        .file("commands/do-thing.md", "## Name\n\ndemo:do-thing\n\n## Description\n\nx\n");

    let violations = run(&CommandSections::RULE, &fx.root());

    assert_eq!(
        messages(&violations),
        vec![
            "Missing recommended section '## Synopsis'",
            "Missing recommended section '## Implementation'",
        ]
    );
}

#[test]
fn sections_option_replaces_defaults() {
    let fx = TreeFixture::new();
    fx.manifest("", "demo").file("commands/do-thing.md", ALL_SECTIONS);

    let violations = run_configured(
        &CommandSections::RULE,
        &fx.root(),
        "rules:\n  command-sections:\n    sections: [Name, Examples]\n",
    );

    assert_eq!(
        messages(&violations),
        vec!["Missing recommended section '## Examples'"]
    );
}

#[test]
fn section_heading_must_stand_alone() {
    let fx = TreeFixture::new();
    fx.manifest("", "demo").file(
        "commands/do-thing.md",
        "## Names\n\n### Synopsis\n\n## Description extra\n\n## Implementation\n",
    );

    let violations = run(&CommandSections::RULE, &fx.root());

    assert_eq!(violations.len(), 3);
}

#[test]
fn name_format_mismatch() {
    let fx = TreeFixture::new();
    fx.manifest("", "demo")
        .file("commands/do-thing.md", "## Name\n\nother:do-thing\n");

    let violations = run(&CommandNameFormat::RULE, &fx.root());

    assert_eq!(
        messages(&violations),
        vec!["Name section should contain 'demo:do-thing', found: 'other:do-thing'"]
    );
}

#[test]
fn name_format_skips_files_without_name_section() {
    let fx = TreeFixture::new();
    fx.manifest("", "demo").file("commands/do-thing.md", "# Nothing here\n");

    assert!(run(&CommandNameFormat::RULE, &fx.root()).is_empty());
}

#[test]
fn declared_commands_directory_is_inspected() {
    let fx = TreeFixture::new();
    fx.file(
        ".claude-plugin/plugin.json",
        r#"{"name": "demo", "commands": "./cmds"}"#,
    )
    .file("cmds/Loud.md", "");

    let violations = run(&CommandNaming::RULE, &fx.root());

    assert_eq!(messages(&violations), vec!["Command name 'Loud' should use kebab-case"]);
}

#[test]
fn excluded_command_files_are_skipped() {
    let fx = TreeFixture::new();
    fx.manifest("", "demo")
        .file("commands/Draft.md", "")
        .file("commands/Other.md", "");

    let violations = run_configured(
        &CommandNaming::RULE,
        &fx.root(),
        "exclude: ['commands/Draft.md']",
    );

    assert_eq!(messages(&violations), vec!["Command name 'Other' should use kebab-case"]);
}
