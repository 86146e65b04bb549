use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One video returned by the search collaborator, enriched in place as the
/// pipeline runs. Derived fields stay `None` until their stage has executed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoRecord {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub channel: String,
    #[serde(default)]
    pub views: u64,
    /// "YYYY-MM-DD"; the upstream API omits this for some records
    #[serde(default)]
    pub upload_date: Option<String>,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub thumbnail: String,
    #[serde(default)]
    pub duration: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_cover: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_category: Option<RuleCategory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster_id: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster_name: Option<String>,
}

/// Display name + icon token for a rule-based cover category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleCategory {
    pub name: String,
    pub icon: String,
}

/// One 2D scatter-plot coordinate, index-aligned with the cover corpus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlotPoint {
    pub x: f32,
    pub y: f32,
    /// Cluster display name (tooltip grouping)
    pub label: String,
    pub title: String,
}

/// Output of the clustering chain over the cover corpus.
///
/// `labels` is always the same length as the input corpus; in the degenerate
/// fallback (fewer covers than clusters) every label is 0, `names` holds only
/// the fallback entry, and `top_keywords`/`plot` are empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterAssignment {
    pub labels: Vec<usize>,
    pub names: BTreeMap<usize, String>,
    pub top_keywords: BTreeMap<String, Vec<String>>,
    pub plot: Vec<PlotPoint>,
}

impl ClusterAssignment {
    pub fn fallback(n: usize, fallback_name: &str) -> Self {
        let mut names = BTreeMap::new();
        names.insert(0, fallback_name.to_string());
        Self {
            labels: vec![0; n],
            names,
            top_keywords: BTreeMap::new(),
            plot: Vec::new(),
        }
    }
}

/// The complete per-request result handed to the presentation collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SongAnalysis {
    pub song_query: String,
    /// Every record that came in, classification flag set
    pub videos: Vec<VideoRecord>,
    /// Cover subset, enriched with rule category and cluster name/id
    pub cover_videos: Vec<VideoRecord>,
    pub noise_videos: Vec<VideoRecord>,
    pub total_results: usize,
    pub cover_count: usize,
    /// Most-viewed covers, descending
    pub top_covers: Vec<VideoRecord>,
    pub trend_score: f64,
    pub trend_summary: String,
    /// Parallel sequences: sorted "YYYY-MM" keys and upload counts per key
    pub months: Vec<String>,
    pub upload_counts: Vec<usize>,
    /// Cluster display name -> top centroid terms
    pub top_keywords: BTreeMap<String, Vec<String>>,
    /// Empty when clustering fell back to a single group
    pub plot_data: Vec<PlotPoint>,
}
