use dgc_adapters::SerdeIpldDagCbor;
use dgc_harness::{RunConfig, load_fixture_tree, run_harness};

#[test]
fn bundled_fixture_tree_loads() {
    let cfg = RunConfig::default_paths();
    let files = load_fixture_tree(&cfg.fixture_root).expect("bundled fixtures load");
    assert!(files.len() >= 3, "expected the starter corpus");
    assert!(files.iter().any(|f| f.name == "basic.json"));
    assert!(
        files.iter().any(|f| f.name == "legacy-smoke.json"),
        "nested legacy fixtures should be discovered by the recursive walk"
    );
}

#[test]
fn bundled_roundtrip_vectors_are_green_for_the_reference_codec() {
    let cfg = RunConfig::default_paths();
    let results = run_harness(&SerdeIpldDagCbor::new(), &cfg).expect("harness run");

    let basic = &results.files["basic.json"];
    for (idx, result) in basic.iter().enumerate() {
        assert_eq!(
            result.pass,
            Some(true),
            "basic.json case {idx} should round-trip: {result:?}"
        );
    }
}

#[test]
fn results_align_with_loaded_cases_and_carry_metadata() {
    let cfg = RunConfig::default_paths();
    let files = load_fixture_tree(&cfg.fixture_root).expect("load");
    let results = run_harness(&SerdeIpldDagCbor::new(), &cfg).expect("run");

    assert_eq!(results.files.len(), files.len());
    for file in &files {
        let verdicts = results
            .files
            .get(&file.name)
            .unwrap_or_else(|| panic!("missing result list for {}", file.name));
        assert_eq!(verdicts.len(), file.cases.len());
    }

    assert!(!results.metadata.link.is_empty());
    assert!(!results.metadata.version.is_empty());
}

#[test]
fn repeated_runs_are_byte_identical() {
    let cfg = RunConfig::default_paths();
    let codec = SerdeIpldDagCbor::new();

    let first =
        serde_json::to_string(&run_harness(&codec, &cfg).expect("first run")).expect("serialize");
    let second =
        serde_json::to_string(&run_harness(&codec, &cfg).expect("second run")).expect("serialize");
    assert_eq!(first, second);
}

#[test]
fn skip_set_produces_null_verdicts() {
    let mut cfg = RunConfig::default_paths();
    cfg.skip.insert("lone_break".to_owned());

    let results = run_harness(&SerdeIpldDagCbor::new(), &cfg).expect("run");
    let invalid_in = &results.files["invalid-in.json"];
    let skipped: Vec<_> = invalid_in.iter().filter(|r| r.pass.is_none()).collect();
    assert_eq!(skipped.len(), 1);
    assert_eq!(skipped[0].error, None);
    assert_eq!(skipped[0].output, None);
}
