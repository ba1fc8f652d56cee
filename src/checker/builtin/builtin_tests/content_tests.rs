//! Skills, agents and hooks.

use crate::checker::builtin::{AgentFrontmatter, HooksJsonValid, SkillFrontmatter, VALID_HOOK_EVENTS};
use crate::test_fixtures::TreeFixture;

use super::{messages, run};

#[test]
fn skill_frontmatter_findings() {
    let fx = TreeFixture::new();
    fx.manifest("", "demo")
        .file("skills/a-good/SKILL.md", "---\nname: good\ndescription: fine\n---\n")
        .dir("skills/b-empty")
        .file("skills/c-plain/SKILL.md", "# No frontmatter\n")
        .file("skills/d-partial/SKILL.md", "---\nname: partial\n---\n")
        .file("skills/e-open/SKILL.md", "---\nname: open\n");

    let violations = run(&SkillFrontmatter::RULE, &fx.root());
    let root = fx.root();

    assert_eq!(
        messages(&violations),
        vec![
            "Missing SKILL.md",
            "Missing frontmatter (recommended for SKILL.md)",
            "Missing 'description' in SKILL.md frontmatter",
        ]
    );
    assert_eq!(
        violations[0].file_path.as_deref(),
        Some(root.join("skills/b-empty").as_path())
    );
}

#[test]
fn agent_frontmatter_findings() {
    let fx = TreeFixture::new();
    fx.manifest("", "demo")
        .file("agents/a-good.md", "---\nname: good\ndescription: fine\n---\n")
        .file("agents/b-plain.md", "You are a helper.\n")
        .file("agents/c-open.md", "---\nname: open\n")
        .file("agents/d-nameless.md", "---\ndescription: no name\n---\n");

    let violations = run(&AgentFrontmatter::RULE, &fx.root());

    assert_eq!(
        messages(&violations),
        vec![
            "Missing frontmatter",
            "Invalid frontmatter format",
            "Missing 'name' in frontmatter",
        ]
    );
}

#[test]
fn valid_hooks_file_passes() {
    let fx = TreeFixture::new();
    fx.manifest("", "demo").file(
        "hooks/hooks.json",
        r#"{"hooks": {"PreToolUse": [{"matcher": "Bash", "hooks": [{"type": "command", "command": "check.sh"}]}]}}"#,
    );

    assert!(run(&HooksJsonValid::RULE, &fx.root()).is_empty());
}

#[test]
fn hooks_unknown_event_lists_valid_types() {
    let fx = TreeFixture::new();
    fx.manifest("", "demo")
        .file("hooks/hooks.json", r#"{"hooks": {"OnSave": []}}"#);

    let violations = run(&HooksJsonValid::RULE, &fx.root());

    assert_eq!(
        messages(&violations),
        vec![format!(
            "Unknown event type 'OnSave'. Valid types: {}",
            VALID_HOOK_EVENTS.join(", ")
        )]
    );
}

#[test]
fn hooks_structure_problems() {
    let fx = TreeFixture::new();
    fx.manifest("", "demo").file(
        "hooks/hooks.json",
        r#"{"hooks": {
            "Stop": {"hooks": []},
            "PostToolUse": [
                "not an object",
                {"matcher": "x"},
                {"hooks": "nope"},
                {"hooks": [{"command": "a"}, 5]}
            ]
        }}"#,
    );

    let violations = run(&HooksJsonValid::RULE, &fx.root());

    assert_eq!(
        messages(&violations),
        vec![
            "Event 'Stop' must have an array of hook configurations",
            "Event 'PostToolUse[0]' configuration must be an object",
            "Event 'PostToolUse[1]' must have a 'hooks' array",
            "Event 'PostToolUse[2].hooks' must be an array",
            "Event 'PostToolUse[3].hooks[0]' must have a 'type' field",
            "Event 'PostToolUse[3].hooks[1]' must be an object",
        ]
    );
}

#[test]
fn hooks_top_level_shape() {
    let fx = TreeFixture::new();
    fx.manifest("plugins/a", "a")
        .file("plugins/a/hooks/hooks.json", "{}")
        .manifest("plugins/b", "b")
        .file("plugins/b/hooks/hooks.json", r#"{"hooks": []}"#)
        .manifest("plugins/c", "c")
        .file("plugins/c/hooks/hooks.json", "[]");

    let violations = run(&HooksJsonValid::RULE, &fx.root());

    assert_eq!(
        messages(&violations),
        vec![
            "hooks.json must contain a 'hooks' key",
            "'hooks' must be a JSON object",
            "hooks.json must be a JSON object",
        ]
    );
}

#[test]
fn declared_hooks_file_is_validated() {
    let fx = TreeFixture::new();
    fx.file(
        ".claude-plugin/plugin.json",
        r#"{"name": "demo", "hooks": "./config/hooks.json"}"#,
    )
    .file("config/hooks.json", "not json");

    let violations = run(&HooksJsonValid::RULE, &fx.root());

    assert_eq!(violations.len(), 1);
    assert!(violations[0].message.starts_with("Invalid JSON: "));
    assert_eq!(
        violations[0].file_path.as_deref(),
        Some(fx.root().join("config/hooks.json").as_path())
    );
}
