//! The per-request analysis pipeline: classify, score, aggregate, cluster,
//! and enrich, in that order, handing back one complete result object.

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::classify::{classify_cover_type, classify_title, TitleClass};
use crate::cluster::{cluster_cover_videos, ClusterParams};
use crate::models::{SongAnalysis, VideoRecord};
use crate::trend::{calculate_trend_score, generate_trend_summary, monthly_upload_data, top_covers};

pub struct PipelineParams {
    /// Seed for the clustering and projection stages
    pub seed: u64,
    /// How many most-viewed covers to surface
    pub top_n: usize,
    pub cluster: ClusterParams,
}

impl Default for PipelineParams {
    fn default() -> Self {
        Self {
            seed: 42,
            top_n: 3,
            cluster: ClusterParams::default(),
        }
    }
}

impl PipelineParams {
    pub fn with_seed(seed: u64) -> Self {
        let mut params = Self::default();
        params.seed = seed;
        params.cluster.seed = seed;
        params
    }
}

/// Run the whole pipeline over one batch of raw records.
///
/// Records are split cover/noise from the title alone; all further analytics
/// run only on the cover subset. Each cover record is enriched in place with
/// its rule-based category and its cluster id/name. Nothing here aborts the
/// request: degenerate and failing sub-stages degrade to empty structures.
pub fn analyze_song(
    records: Vec<VideoRecord>,
    song_query: &str,
    today: NaiveDate,
    params: &PipelineParams,
) -> SongAnalysis {
    let pipeline_start = std::time::Instant::now();
    let total_results = records.len();
    info!(
        "Analysis started - song={:?}, records={}",
        song_query, total_results
    );

    // 1) cover/noise split
    let mut cover_videos: Vec<VideoRecord> = Vec::new();
    let mut noise_videos: Vec<VideoRecord> = Vec::new();
    let mut videos: Vec<VideoRecord> = Vec::with_capacity(total_results);
    for mut record in records {
        match classify_title(&record.title) {
            TitleClass::Cover => {
                record.is_cover = Some(true);
                cover_videos.push(record.clone());
            }
            TitleClass::Noise => {
                record.is_cover = Some(false);
                noise_videos.push(record.clone());
            }
        }
        videos.push(record);
    }
    let cover_count = cover_videos.len();
    debug!(
        "Title classification - covers={}, noise={}",
        cover_count,
        noise_videos.len()
    );

    // 2) analytics over the clean cover subset only
    let trend_score = calculate_trend_score(&cover_videos, today);
    let trend_summary = generate_trend_summary(trend_score).to_string();
    let (months, upload_counts) = monthly_upload_data(&cover_videos);
    debug!(
        "Trend analytics - score={}, months={}",
        trend_score,
        months.len()
    );

    // 3) clustering chain
    let clusters = cluster_cover_videos(&cover_videos, &params.cluster);

    // 4) enrich each cover record: stable rule-based category plus the
    //    volatile cluster assignment
    for (i, video) in cover_videos.iter_mut().enumerate() {
        let category = classify_cover_type(video);
        video.rule_category = Some(category);
        let label = clusters.labels[i];
        video.cluster_id = Some(label);
        video.cluster_name = Some(
            clusters
                .names
                .get(&label)
                .cloned()
                .unwrap_or_else(|| crate::keywords::FALLBACK_NAME.to_string()),
        );
    }

    let top = top_covers(&cover_videos, params.top_n);

    info!(
        "Analysis completed - duration={:.2}s, covers={}, clusters_named={}, plot_points={}",
        pipeline_start.elapsed().as_secs_f32(),
        cover_count,
        clusters.names.len(),
        clusters.plot.len()
    );

    SongAnalysis {
        song_query: song_query.to_string(),
        videos,
        cover_videos,
        noise_videos,
        total_results,
        cover_count,
        top_covers: top,
        trend_score,
        trend_summary,
        months,
        upload_counts,
        top_keywords: clusters.top_keywords,
        plot_data: clusters.plot,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn video(title: &str, description: &str, views: u64, date: &str) -> VideoRecord {
        VideoRecord {
            title: title.to_string(),
            description: description.to_string(),
            channel: "ch".to_string(),
            views,
            upload_date: Some(date.to_string()),
            url: String::new(),
            thumbnail: String::new(),
            duration: "3:10".to_string(),
            is_cover: None,
            rule_category: None,
            cluster_id: None,
            cluster_name: None,
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::parse_from_str("2025-06-01", "%Y-%m-%d").unwrap()
    }

    #[test]
    fn three_covers_take_the_fallback_path() {
        let records = vec![
            video("song piano cover", "", 100, "2025-05-01"),
            video("song guitar cover", "", 50, "2025-04-01"),
            video("song acoustic version", "", 25, "2025-03-01"),
            video("song (official music video)", "", 1_000_000, "2025-01-01"),
        ];
        let result = analyze_song(records, "song", today(), &PipelineParams::default());

        assert_eq!(result.total_results, 4);
        assert_eq!(result.cover_count, 3);
        assert_eq!(result.noise_videos.len(), 1);
        for v in &result.cover_videos {
            assert_eq!(v.cluster_id, Some(0));
            assert_eq!(v.cluster_name.as_deref(), Some("Other / Remix"));
            assert!(v.rule_category.is_some());
        }
        assert!(result.plot_data.is_empty());
        assert!(result.top_keywords.is_empty());
        assert!(result.trend_score > 0.0);
    }

    #[test]
    fn five_covers_cluster_and_name_deterministically() {
        let records = vec![
            video("piano cover", "ギター", 10, "2025-05-01"),
            video("piano cover", "ギター", 20, "2025-05-02"),
            video("acoustic version", "", 30, "2025-05-03"),
            video("acoustic version", "", 40, "2025-05-04"),
            video("acoustic version", "", 50, "2025-05-05"),
        ];
        let params = PipelineParams::default();
        let a = analyze_song(records.clone(), "song", today(), &params);
        let b = analyze_song(records, "song", today(), &params);

        assert_eq!(a.cover_count, 5);
        assert_eq!(a.plot_data.len(), 5);

        // piano/guitar records share a cluster named Instrumental; the
        // acoustic records share a cluster named Acoustic / Soft
        let piano_name = a.cover_videos[0].cluster_name.as_deref().unwrap();
        let acoustic_name = a.cover_videos[2].cluster_name.as_deref().unwrap();
        assert_eq!(piano_name, "Instrumental");
        assert_eq!(acoustic_name, "Acoustic / Soft");
        assert_eq!(
            a.cover_videos[0].cluster_id,
            a.cover_videos[1].cluster_id
        );
        assert_eq!(
            a.cover_videos[2].cluster_id,
            a.cover_videos[4].cluster_id
        );

        // same input order + seed = identical assignment
        for (va, vb) in a.cover_videos.iter().zip(&b.cover_videos) {
            assert_eq!(va.cluster_id, vb.cluster_id);
            assert_eq!(va.cluster_name, vb.cluster_name);
        }
    }

    #[test]
    fn empty_input_yields_complete_empty_result() {
        let result = analyze_song(Vec::new(), "song", today(), &PipelineParams::default());
        assert_eq!(result.total_results, 0);
        assert_eq!(result.cover_count, 0);
        assert_eq!(result.trend_score, 0.0);
        assert!(result.trend_summary.contains("low current activity"));
        assert!(result.months.is_empty());
        assert!(result.upload_counts.is_empty());
        assert!(result.plot_data.is_empty());
        assert!(result.top_covers.is_empty());
    }

    #[test]
    fn every_record_is_classified_exactly_once() {
        let records = vec![
            video("random vlog", "", 1, "2025-05-01"),
            video("song cover", "", 1, "2025-05-01"),
        ];
        let result = analyze_song(records, "song", today(), &PipelineParams::default());
        assert!(result.videos.iter().all(|v| v.is_cover.is_some()));
        assert_eq!(
            result.cover_videos.len() + result.noise_videos.len(),
            result.videos.len()
        );
    }

    #[test]
    fn top_covers_come_from_enriched_cover_set() {
        let records = vec![
            video("cover one", "", 5, "2025-05-01"),
            video("cover two", "", 500, "2025-05-01"),
            video("cover three", "", 50, "2025-05-01"),
            video("cover four", "", 5000, "2025-05-01"),
        ];
        let result = analyze_song(records, "song", today(), &PipelineParams::default());
        assert_eq!(result.top_covers.len(), 3);
        assert_eq!(result.top_covers[0].views, 5000);
        assert!(result.top_covers[0].cluster_id.is_some());
    }

    #[test]
    fn seed_is_an_explicit_parameter() {
        let params = PipelineParams::with_seed(7);
        assert_eq!(params.seed, 7);
        assert_eq!(params.cluster.seed, 7);
    }
}
