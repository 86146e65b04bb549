//! Thematic grouping of the cover corpus: TF-IDF vectorization, seeded
//! k-means, majority-vote cluster naming, centroid keyword extraction, and
//! t-SNE plot coordinates.

use std::collections::BTreeMap;
use tracing::{debug, info, warn};

use crate::keywords::{FALLBACK_NAME, NAMER_BUCKETS};
use crate::kmeans::{fit_best, KMeansFit};
use crate::models::{ClusterAssignment, PlotPoint, VideoRecord};
use crate::tsne::Tsne;
use crate::vectorize::{vectorize, TfidfMatrix};

pub struct ClusterParams {
    /// Target cluster count; corpora smaller than this fall back to one group
    pub n_clusters: usize,
    /// K-means restarts, lowest inertia wins
    pub n_init: usize,
    /// Seed for k-means initialization and the t-SNE embedding
    pub seed: u64,
    /// Vocabulary cap for the TF-IDF matrix
    pub max_features: usize,
    /// Centroid terms surfaced per named cluster
    pub n_keywords: usize,
}

impl Default for ClusterParams {
    fn default() -> Self {
        Self {
            n_clusters: 4,
            n_init: 10,
            seed: 42,
            max_features: crate::vectorize::MAX_FEATURES,
            n_keywords: 5,
        }
    }
}

fn text_for_video(v: &VideoRecord) -> String {
    format!("{} {}", v.title, v.description).trim().to_string()
}

fn count_matches(text_lower: &str, raw: &str, keywords: &[&str]) -> usize {
    keywords
        .iter()
        .filter(|kw| text_lower.contains(*kw) || raw.contains(*kw))
        .count()
}

/// Map each cluster id to a display name by majority keyword-hit voting over
/// its members. Hits are summed across members, not deduplicated. Ties go to
/// the earlier bucket in the fixed consideration order; all-zero clusters get
/// the fallback name.
pub fn map_clusters_to_names(
    videos: &[VideoRecord],
    labels: &[usize],
) -> BTreeMap<usize, String> {
    let mut cluster_texts: BTreeMap<usize, Vec<String>> = BTreeMap::new();
    for (v, &label) in videos.iter().zip(labels) {
        cluster_texts.entry(label).or_default().push(text_for_video(v));
    }

    let mut names = BTreeMap::new();
    for (label, texts) in cluster_texts {
        let mut best_name = FALLBACK_NAME;
        let mut best_count = 0usize;
        for &(name, bucket) in NAMER_BUCKETS {
            let count: usize = texts
                .iter()
                .map(|t| count_matches(&t.to_lowercase(), t, bucket))
                .sum();
            // strictly greater: the first bucket considered wins ties
            if count > best_count {
                best_count = count;
                best_name = name;
            }
        }
        names.insert(label, best_name.to_string());
    }
    names
}

/// Top centroid terms per distinct cluster name. Two cluster ids sharing a
/// name are deduplicated by first occurrence. A malformed vocabulary or
/// centroid state degrades to an empty map with a warning, never an error.
pub fn top_keywords_per_cluster(
    fit: &KMeansFit,
    matrix: &TfidfMatrix,
    names: &BTreeMap<usize, String>,
    n_keywords: usize,
) -> BTreeMap<String, Vec<String>> {
    let mut name_to_id: BTreeMap<&str, usize> = BTreeMap::new();
    for (&id, name) in names {
        name_to_id.entry(name.as_str()).or_insert(id);
    }

    let mut keywords = BTreeMap::new();
    for (name, &id) in &name_to_id {
        let Some(center) = fit.centroids.get(id) else {
            warn!("Keyword extraction aborted - no centroid for cluster {}", id);
            return BTreeMap::new();
        };
        if center.len() != matrix.vocab.len() || matrix.vocab.is_empty() {
            warn!(
                "Keyword extraction aborted - centroid width {} vs vocabulary {}",
                center.len(),
                matrix.vocab.len()
            );
            return BTreeMap::new();
        }

        let mut indices: Vec<usize> = (0..center.len()).collect();
        indices.sort_by(|&a, &b| {
            center[b]
                .partial_cmp(&center[a])
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        let top: Vec<String> = indices
            .into_iter()
            .take(n_keywords)
            .map(|i| matrix.vocab[i].clone())
            .collect();
        keywords.insert(name.to_string(), top);
    }
    keywords
}

/// Cluster the cover corpus.
///
/// Corpora smaller than the target cluster count skip vectorization and
/// clustering entirely: one fallback group, no keywords, no plot data.
pub fn cluster_cover_videos(videos: &[VideoRecord], params: &ClusterParams) -> ClusterAssignment {
    let n = videos.len();
    if n < params.n_clusters {
        info!(
            "Clustering fallback - covers={} below target clusters={}",
            n, params.n_clusters
        );
        return ClusterAssignment::fallback(n, FALLBACK_NAME);
    }

    let start = std::time::Instant::now();
    let corpus: Vec<String> = videos.iter().map(text_for_video).collect();
    let matrix = vectorize(&corpus, params.max_features);
    debug!(
        "Vectorization completed - docs={}, features={}",
        matrix.n_docs(),
        matrix.n_features()
    );

    let fit = fit_best(&matrix.rows, params.n_clusters, params.seed, params.n_init);
    let names = map_clusters_to_names(videos, &fit.labels);
    let top_keywords = top_keywords_per_cluster(&fit, &matrix, &names, params.n_keywords);

    // Perplexity must stay below the sample count to be mathematically valid
    let perplexity = (n - 1).min(5) as f32;
    let coords = Tsne::new(perplexity, params.seed).fit_transform(&matrix.rows);

    let plot: Vec<PlotPoint> = videos
        .iter()
        .zip(&fit.labels)
        .zip(&coords)
        .map(|((v, &label), &(x, y))| PlotPoint {
            x,
            y,
            label: names
                .get(&label)
                .cloned()
                .unwrap_or_else(|| FALLBACK_NAME.to_string()),
            title: v.title.clone(),
        })
        .collect();

    info!(
        "Clustering completed - duration={:.2}s, covers={}, clusters={}, named={}",
        start.elapsed().as_secs_f32(),
        n,
        params.n_clusters,
        names.len()
    );

    ClusterAssignment {
        labels: fit.labels,
        names,
        top_keywords,
        plot,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn video(title: &str, description: &str) -> VideoRecord {
        VideoRecord {
            title: title.to_string(),
            description: description.to_string(),
            channel: String::new(),
            views: 0,
            upload_date: None,
            url: String::new(),
            thumbnail: String::new(),
            duration: String::new(),
            is_cover: None,
            rule_category: None,
            cluster_id: None,
            cluster_name: None,
        }
    }

    #[test]
    fn small_corpus_falls_back_to_single_cluster() {
        let videos = vec![
            video("piano cover", ""),
            video("guitar cover", ""),
            video("vocal cover", ""),
        ];
        let result = cluster_cover_videos(&videos, &ClusterParams::default());
        assert_eq!(result.labels, vec![0, 0, 0]);
        assert_eq!(result.names.len(), 1);
        assert_eq!(result.names[&0], "Other / Remix");
        assert!(result.top_keywords.is_empty());
        assert!(result.plot.is_empty());
    }

    #[test]
    fn empty_corpus_falls_back_to_empty_structures() {
        let result = cluster_cover_videos(&[], &ClusterParams::default());
        assert!(result.labels.is_empty());
        assert_eq!(result.names[&0], "Other / Remix");
        assert!(result.plot.is_empty());
    }

    #[test]
    fn labels_are_dense_and_in_range() {
        let videos: Vec<VideoRecord> = (0..8)
            .map(|i| video(&format!("cover take {i}"), "different words here"))
            .collect();
        let result = cluster_cover_videos(&videos, &ClusterParams::default());
        assert_eq!(result.labels.len(), 8);
        assert!(result.labels.iter().all(|&l| l < 4));
        assert_eq!(result.plot.len(), 8);
    }

    #[test]
    fn namer_votes_by_keyword_hits() {
        let videos = vec![
            video("piano cover", "ギター"),
            video("piano cover", "ギター"),
            video("acoustic version", ""),
            video("acoustic version", ""),
        ];
        let labels = vec![0, 0, 1, 1];
        let names = map_clusters_to_names(&videos, &labels);
        assert_eq!(names[&0], "Instrumental");
        assert_eq!(names[&1], "Acoustic / Soft");
    }

    #[test]
    fn namer_all_zero_hits_falls_back() {
        let videos = vec![video("mystery upload", "nothing relevant")];
        let names = map_clusters_to_names(&videos, &[0]);
        assert_eq!(names[&0], "Other / Remix");
    }

    #[test]
    fn namer_tie_goes_to_earlier_bucket() {
        // "sing" (vocal) and "piano" (instrumental): one hit each, vocal is
        // considered first
        let videos = vec![video("sing over piano", "")];
        let names = map_clusters_to_names(&videos, &[0]);
        assert_eq!(names[&0], "Vocal cover");
    }

    #[test]
    fn duplicate_names_dedup_by_first_cluster_id() {
        let videos = vec![
            video("piano cover", ""),
            video("ピアノ cover", ""),
            video("acoustic take", ""),
            video("acoustic again", ""),
        ];
        let corpus: Vec<String> = videos.iter().map(text_for_video).collect();
        let matrix = vectorize(&corpus, 800);
        let fit = fit_best(&matrix.rows, 4, 42, 10);
        // Force two ids onto one name
        let mut names = BTreeMap::new();
        names.insert(0usize, "Instrumental".to_string());
        names.insert(1usize, "Instrumental".to_string());
        names.insert(2usize, "Acoustic / Soft".to_string());
        names.insert(3usize, "Other / Remix".to_string());
        let keywords = top_keywords_per_cluster(&fit, &matrix, &names, 5);
        assert_eq!(keywords.len(), 3);
        assert!(keywords.contains_key("Instrumental"));
        for terms in keywords.values() {
            assert!(terms.len() <= 5);
        }
    }

    #[test]
    fn keyword_extraction_degrades_to_empty_on_missing_centroid() {
        let matrix = vectorize(&["piano cover".to_string()], 800);
        let fit = KMeansFit {
            labels: vec![0],
            centroids: vec![],
            inertia: 0.0,
        };
        let mut names = BTreeMap::new();
        names.insert(0usize, "Instrumental".to_string());
        let keywords = top_keywords_per_cluster(&fit, &matrix, &names, 5);
        assert!(keywords.is_empty());
    }

    #[test]
    fn clustering_is_deterministic_for_fixed_seed() {
        let videos: Vec<VideoRecord> = vec![
            video("piano cover", "ギター"),
            video("piano cover", "ギター"),
            video("acoustic version", ""),
            video("acoustic version", ""),
            video("acoustic version", ""),
        ];
        let params = ClusterParams::default();
        let a = cluster_cover_videos(&videos, &params);
        let b = cluster_cover_videos(&videos, &params);
        assert_eq!(a.labels, b.labels);
        assert_eq!(a.names, b.names);
        assert_eq!(a.top_keywords, b.top_keywords);
        assert_eq!(a.plot.len(), b.plot.len());
        for (pa, pb) in a.plot.iter().zip(&b.plot) {
            assert_eq!((pa.x, pa.y), (pb.x, pb.y));
            assert_eq!(pa.label, pb.label);
        }
    }

    #[test]
    fn mixed_corpus_names_instrumental_and_acoustic_groups() {
        let videos = vec![
            video("piano cover", "ギター"),
            video("piano cover", "ギター"),
            video("acoustic version", ""),
            video("acoustic version", ""),
            video("acoustic version", ""),
        ];
        let result = cluster_cover_videos(&videos, &ClusterParams::default());
        assert_eq!(result.labels.len(), 5);

        // The two piano/guitar docs share a cluster, as do the three acoustic
        // docs; naming must reflect the dominant keywords of each.
        assert_eq!(result.labels[0], result.labels[1]);
        assert_eq!(result.labels[2], result.labels[3]);
        assert_eq!(result.labels[3], result.labels[4]);
        assert_ne!(result.labels[0], result.labels[2]);
        assert_eq!(result.names[&result.labels[0]], "Instrumental");
        assert_eq!(result.names[&result.labels[2]], "Acoustic / Soft");
        assert_eq!(result.plot.len(), 5);
    }
}
