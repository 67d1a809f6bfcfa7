//! Architectural rules for the session core and the simulator

use architectural_enforcement::{find_violations, rust_sources, workspace_root, Violation};

fn report(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn test_sources_are_found() {
    let core = workspace_root().join("hacking/core/src");
    assert!(
        rust_sources(&core).len() > 5,
        "core sources not found under {}",
        core.display()
    );
}

#[test]
fn test_core_never_sleeps() {
    let core = workspace_root().join("hacking/core/src");
    let violations = find_violations(
        &core,
        &["thread::sleep", "time::sleep", "std::time::Instant", "SystemTime::now"],
    );
    // Session ids are stamped from the system clock; nothing else may read it
    let violations: Vec<Violation> = violations
        .into_iter()
        .filter(|v| !v.path.ends_with("events.rs"))
        .collect();
    assert!(
        violations.is_empty(),
        "session logic must take time from the host clock:\n{}",
        report(&violations)
    );
}

#[test]
fn test_no_unwrap_outside_tests() {
    for crate_dir in ["hacking/core/src", "hacking/sim/src"] {
        let violations = find_violations(
            &workspace_root().join(crate_dir),
            &[".unwrap()", ".expect("],
        );
        assert!(
            violations.is_empty(),
            "propagate errors instead of panicking:\n{}",
            report(&violations)
        );
    }
}

#[test]
fn test_core_uses_channels_only_from_tokio() {
    let manifest = std::fs::read_to_string(workspace_root().join("hacking/core/Cargo.toml"))
        .unwrap();
    let tokio_line = manifest
        .lines()
        .find(|line| line.trim_start().starts_with("tokio"))
        .unwrap();
    assert!(
        tokio_line.contains(r#"features = ["sync"]"#),
        "hacking-core must not pull in the tokio runtime: {tokio_line}"
    );
}
