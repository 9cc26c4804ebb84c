//! Integration tests: write DQM-shaped files with `RootWriter`, read them back,
//! and read a file written by uproot when the fixture has been generated.

use std::path::PathBuf;

use approx::assert_relative_eq;
use rv_root::{Precision, RootError, RootFile, RootWriter, WriteHist};

const TRACKING: &str = "DQMData/Run 1/HLT/Run summary/Tracking/ValidationWRTtp";

fn dqm_file(compress: bool) -> RootFile {
    let mut w = RootWriter::new().compressed(compress);
    w.add(
        TRACKING,
        WriteHist::new("globalEfficiencies", vec![0.0, 1.0, 2.0, 3.0], vec![0.9, 0.8, 0.7])
            .with_title("global efficiencies")
            .with_sumw2(vec![0.01, 0.02, 0.03]),
    );
    w.add(
        &format!("{TRACKING}/hltGeneral_hltAssociatorByHits"),
        WriteHist::new("effic_vs_pt", vec![0.9, 2.0, 5.0, 10.0, 100.0], vec![0.5, 0.75, 0.875, 0.9])
            .with_precision(Precision::Float),
    );
    w.add(
        &format!("{TRACKING}/hltGeneral_hltAssociatorByHits"),
        WriteHist::new("effic", vec![-3.0, -1.5, 0.0, 1.5, 3.0], vec![0.0; 4]),
    );
    RootFile::from_bytes(w.to_bytes().unwrap(), "dqm.root").unwrap()
}

#[test]
fn top_level_keys() {
    let f = dqm_file(false);
    let keys = f.list_keys().unwrap();
    assert_eq!(keys.len(), 1);
    assert_eq!(keys[0].name, "DQMData");
    assert_eq!(keys[0].class_name, "TDirectoryFile");
}

#[test]
fn read_th1d_through_directories_with_spaces() {
    for compress in [false, true] {
        let f = dqm_file(compress);
        let h = f.get_histogram(&format!("{TRACKING}/globalEfficiencies")).unwrap();

        assert_eq!(h.name, "globalEfficiencies");
        assert_eq!(h.title, "global efficiencies");
        assert_eq!(h.bin_edges, vec![0.0, 1.0, 2.0, 3.0]);
        assert_eq!(h.bin_content, vec![0.9, 0.8, 0.7]);
        assert_eq!(h.sumw2, Some(vec![0.01, 0.02, 0.03]));
    }
}

#[test]
fn read_th1f_with_variable_bins() {
    let f = dqm_file(true);
    let h = f.get_histogram(&format!("{TRACKING}/hltGeneral_hltAssociatorByHits/effic_vs_pt")).unwrap();

    assert_eq!(h.n_bins(), 4);
    assert_eq!(h.bin_edges, vec![0.9, 2.0, 5.0, 10.0, 100.0]);
    for (got, want) in h.bin_content.iter().zip([0.5, 0.75, 0.875, 0.9]) {
        assert_relative_eq!(*got, want, epsilon = 1e-6);
    }
    assert!(h.sumw2.is_none());
    assert_eq!(h.variances(), h.bin_content);
}

#[test]
fn uniform_edges_are_rebuilt_from_axis_limits() {
    let f = dqm_file(false);
    let h = f.get_histogram(&format!("{TRACKING}/hltGeneral_hltAssociatorByHits/effic")).unwrap();
    let expected = [-3.0, -1.5, 0.0, 1.5, 3.0];
    assert_eq!(h.bin_edges.len(), expected.len());
    for (got, want) in h.bin_edges.iter().zip(expected) {
        assert_relative_eq!(*got, want, epsilon = 1e-12);
    }
    assert_eq!(h.bin_content.iter().sum::<f64>(), 0.0);
}

#[test]
fn directory_lookup_reuses_resolved_directory() {
    let f = dqm_file(false);
    let dir = f.get_directory(&format!("{TRACKING}/hltGeneral_hltAssociatorByHits")).unwrap();
    let names: Vec<String> = dir.list().into_iter().map(|k| k.name).collect();
    assert_eq!(names, vec!["effic_vs_pt", "effic"]);
    assert_eq!(f.get_histogram_in(&dir, "effic").unwrap().n_bins(), 4);
}

#[test]
fn missing_histogram_reports_full_path() {
    let f = dqm_file(false);
    let path = format!("{TRACKING}/fakerate_vs_coll");
    match f.get_histogram(&path) {
        Err(RootError::KeyNotFound(p)) => assert_eq!(p, path),
        other => panic!("expected KeyNotFound, got {other:?}"),
    }
}

#[test]
fn histogram_is_not_a_directory() {
    let f = dqm_file(false);
    let err = f.get_histogram(&format!("{TRACKING}/globalEfficiencies/x")).unwrap_err();
    assert!(matches!(err, RootError::Deserialization(_)), "{err}");
}

#[test]
fn reject_non_root_bytes() {
    assert!(matches!(RootFile::from_bytes(vec![0u8; 128], "x"), Err(RootError::BadMagic)));
    assert!(matches!(RootFile::from_bytes(b"root".to_vec(), "x"), Err(RootError::BadMagic)));
}

#[test]
fn open_from_disk() {
    let dir = std::env::temp_dir().join(format!("rv_root_open_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("dqm.root");

    let mut w = RootWriter::new();
    w.add("DQMData", WriteHist::new("h", vec![0.0, 1.0], vec![3.0]));
    w.write(&path).unwrap();

    let f = RootFile::open(&path).unwrap();
    assert_eq!(f.get_histogram("DQMData/h").unwrap().bin_content, vec![3.0]);
    std::fs::remove_dir_all(&dir).ok();
}

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../tests/fixtures").join(name)
}

fn floats(v: &serde_json::Value) -> Vec<f64> {
    v.as_array().unwrap().iter().map(|x| x.as_f64().unwrap()).collect()
}

#[test]
fn read_uproot_written_dqm_file() {
    let root_path = fixture_path("dqm_uproot.root");
    if !root_path.exists() {
        eprintln!(
            "Fixture not found: {:?}. Run `python tests/fixtures/generate_dqm_fixture.py` first.",
            root_path
        );
        return;
    }

    let expected: serde_json::Map<String, serde_json::Value> =
        serde_json::from_str(&std::fs::read_to_string(fixture_path("dqm_uproot_expected.json")).unwrap()).unwrap();
    let f = RootFile::open(&root_path).expect("failed to open ROOT file");

    for (path, exp) in &expected {
        let h = f.get_histogram(path).unwrap_or_else(|e| panic!("failed to read '{path}': {e}"));
        // TH1F contents pass through f32.
        let eps = if exp["class"] == "TH1F" { 1e-6 } else { 1e-12 };

        assert_eq!(h.title, exp["title"].as_str().unwrap(), "{path}: title");
        let edges = floats(&exp["bin_edges"]);
        assert_eq!(h.bin_edges.len(), edges.len(), "{path}: bin_edges length");
        for (got, want) in h.bin_edges.iter().zip(&edges) {
            assert_relative_eq!(*got, *want, epsilon = 1e-12);
        }

        let contents = floats(&exp["bin_content"]);
        assert_eq!(h.bin_content.len(), contents.len(), "{path}: bin_content length");
        for (got, want) in h.bin_content.iter().zip(&contents) {
            assert_relative_eq!(*got, *want, epsilon = eps);
        }

        match (&h.sumw2, exp["sumw2"].is_null()) {
            (None, true) => assert_eq!(h.variances(), h.bin_content, "{path}: Poisson variances"),
            (Some(sumw2), false) => {
                let want = floats(&exp["sumw2"]);
                assert_eq!(sumw2.len(), want.len(), "{path}: sumw2 length");
                for (got, want) in sumw2.iter().zip(&want) {
                    assert_relative_eq!(*got, *want, epsilon = 1e-12);
                }
            }
            (got, _) => panic!("{path}: sumw2 {got:?}, expected {}", exp["sumw2"]),
        }
    }
}
