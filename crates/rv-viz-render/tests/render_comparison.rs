//! Integration tests: build comparison artifacts and render them.

use rv_core::Hist1D;
use rv_viz::{ComparisonArtifact, PlotOptions, YScale};
use rv_viz_render::config::{VizConfig, resolve_config};
use rv_viz_render::output::OutputFormat;
use rv_viz_render::{render_svg, render_to_bytes, render_to_file};

fn hist(values: Vec<f64>) -> Hist1D {
    let edges = (0..=values.len()).map(|i| i as f64 * 0.5).collect();
    Hist1D::from_counts("effic", edges, values).unwrap()
}

fn labels(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("CMSSW_15_{i}_0")).collect()
}

fn artifact(hists: &[Hist1D], options: PlotOptions) -> ComparisonArtifact {
    ComparisonArtifact::build(hists, &labels(hists.len()), &options).unwrap().unwrap()
}

fn three_releases() -> ComparisonArtifact {
    let hists = vec![
        hist(vec![10.0, 20.0, 30.0, 40.0]),
        hist(vec![11.0, 19.0, 33.0, 40.0]),
        hist(vec![9.0, 21.0, 27.0, 44.0]),
    ];
    let mut options = PlotOptions::new("effic", "Efficiency", "#eta");
    options.title = Some("hltGeneral_hltAssociatorByHits".into());
    artifact(&hists, options)
}

#[test]
fn main_and_ratio_panels() {
    let svg = render_svg(&three_releases(), &VizConfig::default()).unwrap();

    assert!(svg.starts_with("<svg"));
    for text in ["CMS", "Preliminary", "hltGeneral_hltAssociatorByHits", "Efficiency", "#eta", "Ratio"] {
        assert!(svg.contains(&format!(">{text}<")), "missing {text}");
    }
    for label in labels(3) {
        assert!(svg.contains(&label), "missing legend entry {label}");
    }
    // Two ratio curves of four points each.
    assert_eq!(svg.matches("<circle").count(), 8);
    // One dashed reference line.
    assert_eq!(svg.matches("stroke-dasharray").count(), 1);
    // One outline per release, each in its own colour.
    assert_eq!(svg.matches("<polyline").count(), 3);
    for color in ["#1f77b4", "#ff7f0e", "#2ca02c"] {
        assert!(svg.contains(color), "missing {color}");
    }
    assert_eq!(svg.matches("<clipPath").count(), 2);
}

#[test]
fn single_release_has_one_panel() {
    let art = artifact(&[hist(vec![1.0, 2.0])], PlotOptions::new("h", "Entries", "x"));
    let svg = render_svg(&art, &VizConfig::default()).unwrap();
    assert!(!svg.contains(">Ratio<"));
    assert!(!svg.contains("<circle"));
    assert!(!svg.contains("stroke-dasharray"));
    assert!(svg.contains(">x<"));
    assert_eq!(svg.matches("<clipPath").count(), 1);
}

#[test]
fn rotated_ticks_are_small_and_tilted() {
    let mut options = PlotOptions::new("globalEfficiencies", "", "");
    options.rotate_ticks = true;
    let art = artifact(&[hist(vec![0.9, 0.8]), hist(vec![0.85, 0.8])], options);
    let svg = render_svg(&art, &VizConfig::default()).unwrap();
    assert!(svg.contains("rotate(-15.0,"));
    assert!(svg.contains(r#"font-size="16.0""#));
}

#[test]
fn single_panel_keeps_ticks_upright() {
    let mut options = PlotOptions::new("globalEfficiencies", "", "");
    options.rotate_ticks = true;
    let art = artifact(&[hist(vec![0.9, 0.8])], options);
    let svg = render_svg(&art, &VizConfig::default()).unwrap();
    assert!(!svg.contains("rotate(-15.0,"));
    assert!(!svg.contains(r#"font-size="16.0""#));
}

#[test]
fn svg_fonts_are_inlined_unless_disabled() {
    let embedded = render_svg(&three_releases(), &VizConfig::default()).unwrap();
    assert_eq!(embedded.matches("@font-face").count(), 3);
    assert!(embedded.contains(r#"font-family="DejaVu Sans""#));

    let config = resolve_config(Some("output: {svg_embed_fonts: false}")).unwrap();
    let plain = render_svg(&three_releases(), &config).unwrap();
    assert!(!plain.contains("@font-face"));
    assert!(plain.len() < embedded.len() / 10);
}

#[test]
fn log_scale_uses_decades() {
    let mut options = PlotOptions::new("h", "Entries", "x");
    options.y_scale = YScale::Log;
    let art = artifact(&[hist(vec![0.0, 10.0, 1000.0])], options);
    let svg = render_svg(&art, &VizConfig::default()).unwrap();
    assert!(svg.contains(r#"10<tspan baseline-shift="super""#));
}

#[test]
fn minimal_theme_drops_header() {
    let config = resolve_config(Some("theme: minimal")).unwrap();
    let svg = render_svg(&three_releases(), &config).unwrap();
    assert!(!svg.contains(">CMS<"));
    assert!(svg.contains("hltGeneral_hltAssociatorByHits"));
}

#[test]
fn json_output_is_the_artifact() {
    let bytes = render_to_bytes(&three_releases(), OutputFormat::Json, &VizConfig::default()).unwrap();
    let v: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(v["schema_version"], "relval_comparison_v0");
    assert_eq!(v["ratio"]["series"].as_array().unwrap().len(), 2);
}

#[cfg(feature = "png")]
#[test]
fn png_output() {
    let config = resolve_config(Some("figure: {width: 288, height: 216}\noutput: {dpi: 72}")).unwrap();
    let bytes = render_to_bytes(&three_releases(), OutputFormat::Png, &config).unwrap();
    assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
}

#[cfg(feature = "pdf")]
#[test]
fn pdf_output() {
    let bytes = render_to_bytes(&three_releases(), OutputFormat::Pdf, &VizConfig::default()).unwrap();
    assert!(bytes.starts_with(b"%PDF"));
}

#[test]
fn writes_files() {
    let dir = std::env::temp_dir().join(format!("rv_viz_render_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let art = three_releases();
    let config = VizConfig::default();

    for format in [OutputFormat::Svg, OutputFormat::Json] {
        let path = dir.join(format!("effic.{}", format.extension()));
        render_to_file(&art, format, &path, &config).unwrap();
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }
    std::fs::remove_dir_all(&dir).ok();
}
