//! End-to-end tests of the `relval` binary on generated DQM files.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use rv_root::{RootWriter, WriteHist};

const TRACKING: &str = "DQMData/Run 1/HLT/Run summary/Tracking/ValidationWRTtp";
const COLLECTIONS: [&str; 2] = ["hltGeneral_hltAssociatorByHits", "hltPhase2Pixel_hltAssociatorByHits"];
const TOP_LEVEL: [&str; 6] = [
    "globalEfficiencies",
    "effic_vs_coll",
    "fakerate_vs_coll",
    "pileuprate_coll",
    "num_assoc(simToReco)_coll",
    "num_assoc(recoToSim)_coll",
];
const NESTED: [&str; 18] = [
    "effic_vs_dz",
    "effic_vs_dxy",
    "effic_vs_hit",
    "effic_vs_phi",
    "effic",
    "efficPt",
    "fakerate_vs_dz",
    "fakerate_vs_dxy",
    "fakerate_vs_dr",
    "fakerate_vs_hit",
    "fakerate_vs_phi",
    "fakeratePt",
    "duplicatesRate_dz",
    "duplicatesRate_dxy",
    "duplicatesRate_dr",
    "duplicatesRate_hit",
    "duplicatesRate_phi",
    "duplicatesRate_Pt",
];

fn bin_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_relval"))
}

fn run(args: &[&str]) -> Output {
    Command::new(bin_path()).args(args).output().unwrap_or_else(|e| panic!("failed to run relval: {e}"))
}

fn tmp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("relval_cli_{name}_{}", std::process::id()));
    std::fs::remove_dir_all(&dir).ok();
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

/// A tracking DQM file; `scale` shifts contents so releases differ.
/// `skip` omits one nested histogram from the first collection.
fn write_tracking(path: &Path, scale: f64, skip: Option<&str>) {
    let edges = vec![0.0, 1.0, 2.0, 3.0, 4.0];
    let contents: Vec<f64> = [0.9, 0.8, 0.7, 0.6].iter().map(|v| v * scale).collect();

    let mut w = RootWriter::new();
    for name in TOP_LEVEL {
        w.add(TRACKING, WriteHist::new(name, edges.clone(), contents.clone()));
    }
    for coll in COLLECTIONS {
        let dir = format!("{TRACKING}/{coll}");
        for name in NESTED {
            if coll == COLLECTIONS[0] && skip == Some(name) {
                continue;
            }
            // Duplicate rates are all zero in every release.
            let values = if name.starts_with("duplicatesRate") { vec![0.0; 4] } else { contents.clone() };
            w.add(&dir, WriteHist::new(name, edges.clone(), values));
        }
    }
    w.write(path).unwrap();
}

fn fixture(dir: &Path, n: usize) -> Vec<String> {
    (0..n)
        .map(|i| {
            let path = dir.join(format!("DQM_{i}.root"));
            write_tracking(&path, 1.0 + 0.05 * i as f64, None);
            path.to_string_lossy().into_owned()
        })
        .collect()
}

fn fast_config(dir: &Path) -> String {
    let path = dir.join("relval.yaml");
    std::fs::write(&path, "output:\n  formats: [svg, json]\n  svg_embed_fonts: false\n").unwrap();
    path.to_string_lossy().into_owned()
}

fn stderr(out: &Output) -> String {
    String::from_utf8_lossy(&out.stderr).into_owned()
}

#[test]
fn tracking_suite_end_to_end() {
    let dir = tmp_dir("tracking");
    let files = fixture(&dir, 2);
    let config = fast_config(&dir);

    let out = run(&[
        "--files",
        &files.join(","),
        "--labels",
        "CMSSW_15_0_0,CMSSW_15_1_0",
        "--tag",
        "check",
        "--odir",
        dir.to_str().unwrap(),
        "--suite",
        "tracking",
        "--config",
        &config,
        "--log-level",
        "warn",
    ]);
    assert!(out.status.success(), "relval failed: {}", stderr(&out));

    let plots = dir.join("Plots_check");
    for name in TOP_LEVEL {
        assert!(plots.join(format!("{name}.svg")).is_file(), "missing {name}.svg");
        assert!(plots.join(format!("{name}.json")).is_file(), "missing {name}.json");
    }
    for coll in COLLECTIONS {
        assert!(plots.join(coll).join("effic.svg").is_file());
        assert!(plots.join(coll).join("fakeratePt.json").is_file());
        // All-zero in every release: nothing written.
        assert!(!plots.join(coll).join("duplicatesRate_Pt.svg").exists());
        assert!(!plots.join(coll).join("duplicatesRate_Pt.json").exists());
    }

    let svg = std::fs::read_to_string(plots.join(COLLECTIONS[0]).join("effic.svg")).unwrap();
    assert!(svg.contains("CMSSW_15_0_0"));
    assert!(svg.contains("CMSSW_15_1_0"));
    assert!(svg.contains(COLLECTIONS[0]));
    assert!(svg.contains(">Efficiency<"));
    assert!(svg.contains(">Ratio<"));

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn three_files_give_two_ratio_curves() {
    let dir = tmp_dir("three");
    let files = fixture(&dir, 3);
    let config = fast_config(&dir);

    let out = run(&[
        "--files",
        &files.join(","),
        "--tag",
        "three",
        "--odir",
        dir.to_str().unwrap(),
        "--suite",
        "tracking",
        "--config",
        &config,
    ]);
    assert!(out.status.success(), "relval failed: {}", stderr(&out));

    let json = std::fs::read(dir.join("Plots_three").join(COLLECTIONS[1]).join("efficPt.json")).unwrap();
    let v: serde_json::Value = serde_json::from_slice(&json).unwrap();
    assert_eq!(v["ratio"]["reference"], "File_0");
    let series = v["ratio"]["series"].as_array().unwrap();
    assert_eq!(series.len(), 2);
    assert_eq!(series[0]["label"], "File_1/File_0");
    assert_eq!(series[1]["label"], "File_2/File_0");
    assert_eq!(v["series"].as_array().unwrap().len(), 3);

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn label_count_mismatch_fails() {
    let dir = tmp_dir("labels");
    let files = fixture(&dir, 2);

    let out = run(&["--files", &files.join(","), "--labels", "only_one", "--tag", "x", "--odir", dir.to_str().unwrap()]);
    assert!(!out.status.success());
    assert!(stderr(&out).contains("must match"), "stderr: {}", stderr(&out));
    assert!(!dir.join("Plots_x").exists());

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn missing_histogram_names_its_path() {
    let dir = tmp_dir("missing");
    let good = dir.join("good.root");
    let bad = dir.join("bad.root");
    write_tracking(&good, 1.0, None);
    write_tracking(&bad, 1.0, Some("effic_vs_hit"));
    let config = fast_config(&dir);

    let files = format!("{},{}", good.display(), bad.display());
    let out = run(&[
        "--files",
        &files,
        "--tag",
        "missing",
        "--odir",
        dir.to_str().unwrap(),
        "--suite",
        "tracking",
        "--config",
        &config,
    ]);
    assert!(!out.status.success());
    let err = stderr(&out);
    assert!(err.contains("bad.root"), "stderr: {err}");
    assert!(err.contains(&format!("{}/effic_vs_hit", COLLECTIONS[0])), "stderr: {err}");

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn missing_suite_directory_fails() {
    let dir = tmp_dir("nosuite");
    let files = fixture(&dir, 1);

    // The generated files carry no HGCAL directory.
    let out = run(&["--files", &files[0], "--tag", "h", "--odir", dir.to_str().unwrap(), "--suite", "hgcal"]);
    assert!(!out.status.success());
    assert!(stderr(&out).contains("HGCalValidator"), "stderr: {}", stderr(&out));

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn bad_config_fails() {
    let dir = tmp_dir("config");
    let files = fixture(&dir, 1);
    let config = dir.join("bad.yaml");
    std::fs::write(&config, "figure: {width: -5}\n").unwrap();

    let out = run(&[
        "--files",
        &files[0],
        "--tag",
        "c",
        "--odir",
        dir.to_str().unwrap(),
        "--config",
        config.to_str().unwrap(),
    ]);
    assert!(!out.status.success());

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn help_documents_log_level() {
    let out = run(&["--help"]);
    assert!(out.status.success());
    let help = String::from_utf8_lossy(&out.stdout);
    assert!(help.contains("--log-level"), "help: {help}");
    assert!(help.contains("Log verbosity level"), "help: {help}");
}
