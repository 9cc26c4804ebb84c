//! Fixed DQM layouts compared by `relval`.
//!
//! A suite names a base directory inside the DQM file, the top-level
//! histograms plotted straight into the output directory, and per-collection
//! subdirectories whose histograms get their own output subdirectory.

use clap::ValueEnum;

const PT: &str = "p_{T}";
const ETA: &str = "η";
const PHI: &str = "φ";

/// Suites selectable on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SuiteChoice {
    All,
    Tracking,
    Hgcal,
}

impl SuiteChoice {
    pub fn suites(self) -> Vec<Suite> {
        match self {
            Self::All => vec![tracking(), hgcal()],
            Self::Tracking => vec![tracking()],
            Self::Hgcal => vec![hgcal()],
        }
    }
}

#[derive(Debug, Clone)]
pub struct Suite {
    pub name: &'static str,
    /// Directory holding everything below, relative to the file root.
    pub base: &'static str,
    /// Plotted without axis labels and with rotated x ticks.
    pub top_level: Vec<&'static str>,
    pub collections: Vec<Collection>,
}

#[derive(Debug, Clone)]
pub struct Collection {
    /// Human-readable alias, used only in logs.
    pub alias: &'static str,
    /// Subdirectory under the suite base; also the plot title and output subdirectory.
    pub dir: &'static str,
    pub plots: Vec<NestedPlot>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NestedPlot {
    pub name: String,
    pub y_label: &'static str,
    pub x_label: &'static str,
}

impl NestedPlot {
    fn new(name: impl Into<String>, y_label: &'static str, x_label: &'static str) -> Self {
        Self { name: name.into(), y_label, x_label }
    }
}

impl Suite {
    /// Number of plots the suite asks for.
    pub fn n_plots(&self) -> usize {
        self.top_level.len() + self.collections.iter().map(|c| c.plots.len()).sum::<usize>()
    }
}

pub fn tracking() -> Suite {
    let nested = [
        ("effic_vs_dz", "Efficiency", "dz"),
        ("effic_vs_dxy", "Efficiency", "dxy"),
        ("effic_vs_hit", "Efficiency", "Hit"),
        ("effic_vs_phi", "Efficiency", PHI),
        ("effic", "Efficiency", ETA),
        ("efficPt", "Efficiency", PT),
        ("fakerate_vs_dz", "Fake Rate", "dz"),
        ("fakerate_vs_dxy", "Fake Rate", "dxy"),
        ("fakerate_vs_dr", "Fake Rate", "dR"),
        ("fakerate_vs_hit", "Fake Rate", "Hit"),
        ("fakerate_vs_phi", "Fake Rate", PHI),
        ("fakeratePt", "Fake Rate", PT),
        ("duplicatesRate_dz", "Duplicate Rate", "dz"),
        ("duplicatesRate_dxy", "Duplicate Rate", "dxy"),
        ("duplicatesRate_dr", "Duplicate Rate", "dR"),
        ("duplicatesRate_hit", "Duplicate Rate", "Hit"),
        ("duplicatesRate_phi", "Duplicate Rate", PHI),
        ("duplicatesRate_Pt", "Duplicate Rate", PT),
    ];
    let plots: Vec<NestedPlot> = nested.iter().map(|&(n, y, x)| NestedPlot::new(n, y, x)).collect();

    Suite {
        name: "tracking",
        base: "DQMData/Run 1/HLT/Run summary/Tracking/ValidationWRTtp",
        top_level: vec![
            "globalEfficiencies",
            "effic_vs_coll",
            "fakerate_vs_coll",
            "pileuprate_coll",
            "num_assoc(simToReco)_coll",
            "num_assoc(recoToSim)_coll",
        ],
        collections: [
            ("GeneralTracks", "hltGeneral_hltAssociatorByHits"),
            ("PixelTracks", "hltPhase2Pixel_hltAssociatorByHits"),
        ]
        .into_iter()
        .map(|(alias, dir)| Collection { alias, dir, plots: plots.clone() })
        .collect(),
    }
}

/// Collections carrying tracks, which get the extra `track` step.
const CHARGED: &[&str] = &["electrons", "muons", "charged_hadrons"];

pub fn hgcal() -> Suite {
    let metrics = [("eff", "Efficiency"), ("fake", "Fake Rate")];
    let axes = [("energy", "E (GeV)"), ("pt", PT), ("eta", ETA), ("phi", PHI)];

    let collections = [
        ("Electrons", "electrons"),
        ("Photons", "photons"),
        ("Muons", "muons"),
        ("Pi0", "neutral_pions"),
        ("ChargedHadrons", "charged_hadrons"),
        ("NeutralHadrons", "neutral_hadrons"),
    ]
    .into_iter()
    .map(|(alias, dir)| {
        let mut steps = vec!["energy", "pid"];
        if CHARGED.contains(&dir) {
            steps.push("track");
        }
        let mut plots = Vec::with_capacity(metrics.len() * steps.len() * axes.len());
        for &(metric, y_label) in &metrics {
            for step in &steps {
                for &(axis, x_label) in &axes {
                    plots.push(NestedPlot::new(format!("{metric}_{dir}_{step}_{axis}"), y_label, x_label));
                }
            }
        }
        Collection { alias, dir, plots }
    })
    .collect();

    Suite {
        name: "hgcal",
        base: "DQMData/Run 1/HLT/Run summary/HGCAL/HGCalValidator/hltTiclCandidate",
        top_level: vec![
            "Candidates PDG Id",
            "Candidates charge",
            "Candidates pT",
            "Candidates raw energy",
            "Candidates regressed energy",
            "Candidates type",
            "N of tracksters in candidate",
        ],
        collections,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracking_layout() {
        let s = tracking();
        assert_eq!(s.top_level.len(), 6);
        assert_eq!(s.collections.len(), 2);
        assert!(s.collections.iter().all(|c| c.plots.len() == 18));
        assert_eq!(s.n_plots(), 6 + 2 * 18);
        let effic = &s.collections[0].plots[4];
        assert_eq!((effic.name.as_str(), effic.y_label, effic.x_label), ("effic", "Efficiency", ETA));
    }

    #[test]
    fn hgcal_track_step_only_for_charged() {
        let s = hgcal();
        let count = |dir: &str| s.collections.iter().find(|c| c.dir == dir).unwrap().plots.len();
        // {eff, fake} x steps x {energy, pt, eta, phi}
        assert_eq!(count("photons"), 2 * 2 * 4);
        assert_eq!(count("neutral_pions"), 16);
        assert_eq!(count("electrons"), 2 * 3 * 4);
        assert_eq!(count("charged_hadrons"), 24);
        assert_eq!(s.n_plots(), 7 + 3 * 24 + 3 * 16);
    }

    #[test]
    fn hgcal_names_and_labels() {
        let s = hgcal();
        let muons = s.collections.iter().find(|c| c.alias == "Muons").unwrap();
        assert_eq!(muons.plots[0], NestedPlot::new("eff_muons_energy_energy", "Efficiency", "E (GeV)"));
        assert!(muons.plots.contains(&NestedPlot::new("fake_muons_track_phi", "Fake Rate", PHI)));
        assert!(muons.plots.iter().all(|p| p.name.contains("_muons_")));
    }

    #[test]
    fn choice_order() {
        let names: Vec<_> = SuiteChoice::All.suites().iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["tracking", "hgcal"]);
        assert_eq!(SuiteChoice::Hgcal.suites()[0].name, "hgcal");
    }
}
