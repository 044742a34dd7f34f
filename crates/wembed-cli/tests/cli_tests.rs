//! `wembed` binary tests
//!
//! Each test builds a throwaway project and runs the binary inside it.
//!
use pretty_assertions::assert_eq;
use std::process::{Command, Output};
use wembed_test_utils::{decode_markers, loader_script, Project, EMPTY_MODULE};

fn wembed(project: &Project, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_wembed"))
        .args(args)
        .current_dir(project.root())
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run wembed")
}

#[test]
fn test_no_arguments_embeds_defaults() {
    let project = Project::with_defaults(&[0, 1, 2, 3], "const w = 'old'; // XXX\n");

    let out = wembed(&project, &[]);

    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    assert_eq!(project.target_text(), "const w = 'AAECAw=='; // XXX\n");
}

#[test]
fn test_missing_artifact_exits_non_zero() {
    let project = Project::new();
    project.write("js/wasm.js", "const w = 'old'; // XXX\n");

    let out = wembed(&project, &["embed"]);

    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("rust/pkg/strange_attractors_bg.wasm"), "{stderr}");
    assert_eq!(project.target_text(), "const w = 'old'; // XXX\n");
}

#[test]
fn test_expect_exactly_one() {
    let document = "a = 'x'; // XXX\nb = 'y'; // XXX\n";
    let project = Project::with_defaults(b"m", document);

    let out = wembed(&project, &["--expect", "exactly-one"]);

    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("found 2"));
    assert_eq!(project.target_text(), document);
}

#[test]
fn test_check_then_embed() {
    let project = Project::with_defaults(&EMPTY_MODULE, &loader_script("stale"));

    let stale = wembed(&project, &["check"]);
    assert!(!stale.status.success());
    assert!(String::from_utf8_lossy(&stale.stdout).contains("is stale: line(s) 3"));

    assert!(wembed(&project, &["embed"]).status.success());

    let fresh = wembed(&project, &["check"]);
    assert!(fresh.status.success());
    assert!(String::from_utf8_lossy(&fresh.stdout).contains("up to date"));
}

#[test]
fn test_extract_writes_module() {
    let project = Project::with_defaults(&EMPTY_MODULE, &loader_script(""));
    assert!(wembed(&project, &[]).status.success());

    let out = wembed(&project, &["extract", "--output", "restored.wasm"]);

    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    assert_eq!(project.read("restored.wasm"), EMPTY_MODULE.to_vec());
}

#[test]
fn test_config_file_and_flag_precedence() {
    let project = Project::new();
    project.write("build/app.wasm", b"app");
    project.write("web/loader.js", "const m = ''; // @wembed\n");
    project.write(
        "wembed.toml",
        "artifact = \"build/app.wasm\"\ntarget = \"web/other.js\"\ntag = \"// @wembed\"\n",
    );

    let out = wembed(
        &project,
        &["--config", "wembed.toml", "--target", "web/loader.js"],
    );

    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    assert_eq!(project.read_text("web/loader.js"), "const m = 'YXBw'; // @wembed\n");
}

#[test]
fn test_malformed_config_reported() {
    let project = Project::with_defaults(b"m", "a = ''; // XXX\n");
    project.write("wembed.toml", "expect = \"sometimes\"\n");

    let out = wembed(&project, &["--config", "wembed.toml"]);

    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("wembed.toml"));
}

#[test]
fn test_round_trip_through_binary() {
    let bytes = (0u8..=255).rev().collect::<Vec<_>>();
    let project = Project::with_defaults(&bytes, &loader_script("AA=="));

    assert!(wembed(&project, &["-q"]).status.success());

    assert_eq!(decode_markers(&project.target_text()), vec![bytes]);
}
