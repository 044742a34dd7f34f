//! End-to-end embed tests against a real directory tree
//!
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use wembed_core::{EmbedConfig, EmbedError, Embedder, MatchPolicy};
use wembed_test_utils::{decode_markers, loader_script, Project, EMPTY_MODULE};

fn embedder_for(project: &Project) -> Embedder {
    Embedder::new(EmbedConfig::default().rooted_at(project.root())).unwrap()
}

#[test]
fn test_example_scenario() {
    let project = Project::with_defaults(&[0, 1, 2, 3], "const w = 'old'; // XXX\n");

    embedder_for(&project).run().unwrap();

    assert_eq!(project.target_text(), "const w = 'AAECAw=='; // XXX\n");
}

#[test]
fn test_loader_script_round_trip() {
    let project = Project::with_defaults(&EMPTY_MODULE, &loader_script("AGFzbQ=="));

    let report = embedder_for(&project).run().unwrap();
    let text = project.target_text();

    assert_eq!(report.replacements, 1);
    assert_eq!(decode_markers(&text), vec![EMPTY_MODULE.to_vec()]);
    assert!(text.contains("'AGFzbQEAAAA='; // XXX\n"));
    assert!(text.contains("const wasmBinary = window.atob(wasmb64);"));
}

#[test]
fn test_multiple_markers_replaced() {
    let document = "const a = 'AAA'; // XXX\nconst keep = 'k';\nconst b = 'BBB'; // XXX\n";
    let project = Project::with_defaults(b"module", document);

    let report = embedder_for(&project).run().unwrap();

    assert_eq!(report.replacements, 2);
    assert_eq!(
        project.target_text(),
        "const a = 'bW9kdWxl'; // XXX\nconst keep = 'k';\nconst b = 'bW9kdWxl'; // XXX\n"
    );
}

#[test]
fn test_missing_marker_is_noop() {
    let document = "export const w = null;\n";
    let project = Project::with_defaults(b"module", document);

    let report = embedder_for(&project).run().unwrap();

    assert_eq!(report.replacements, 0);
    assert!(!report.changed);
    assert_eq!(project.target_text(), document);
}

#[test]
fn test_missing_artifact_leaves_target_untouched() {
    let project = Project::new();
    project.write("js/wasm.js", "const w = 'old'; // XXX\n");

    let err = embedder_for(&project).run().unwrap_err();

    assert!(matches!(err, EmbedError::ArtifactNotFound { .. }));
    assert!(err.to_string().contains("strange_attractors_bg.wasm"));
    assert_eq!(project.target_text(), "const w = 'old'; // XXX\n");
}

#[test]
fn test_non_utf8_target_rejected() {
    let project = Project::with_defaults(b"module", "");
    project.write("js/wasm.js", [0xc3, 0x28]);

    let err = embedder_for(&project).run().unwrap_err();

    assert!(matches!(err, EmbedError::InvalidUtf8 { .. }));
    assert_eq!(project.read("js/wasm.js"), vec![0xc3, 0x28]);
}

#[test]
fn test_exactly_one_policy_on_disk() {
    let document = "a = 'x'; // XXX\nb = 'y'; // XXX\n";
    let project = Project::with_defaults(b"module", document);
    let config = EmbedConfig::default()
        .with_policy(MatchPolicy::ExactlyOne)
        .rooted_at(project.root());

    let err = Embedder::new(config).unwrap().run().unwrap_err();

    assert!(matches!(err, EmbedError::MarkerCount { found: 2, .. }));
    assert_eq!(project.target_text(), document);
}

#[test]
fn test_check_after_rebuild() {
    let project = Project::with_defaults(b"v1", "a = ''; // XXX\n");
    let embedder = embedder_for(&project);
    embedder.run().unwrap();
    assert!(embedder.check().unwrap().is_up_to_date());

    project.write("rust/pkg/strange_attractors_bg.wasm", b"v2");
    let report = embedder.check().unwrap();
    assert!(!report.is_up_to_date());
    assert_eq!(report.stale_lines, vec![1]);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_round_trip_and_marker_preserved(bytes in proptest::collection::vec(any::<u8>(), 0..512)) {
        let project = Project::with_defaults(&bytes, "let x = 1;\nconst w = 'old'; // XXX\n");
        let embedder = embedder_for(&project);

        embedder.run().unwrap();
        let once = project.target_text();
        prop_assert_eq!(decode_markers(&once), vec![bytes.clone()]);
        prop_assert!(once.starts_with("let x = 1;\nconst w = '"));
        prop_assert!(once.ends_with("'; // XXX\n"));

        embedder.run().unwrap();
        prop_assert_eq!(project.target_text(), once);
    }
}
