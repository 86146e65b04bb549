//! Cover-song search analytics.
//!
//! Takes the raw video records a search collaborator returns for a song
//! query and produces a classified, scored, and clustered result set:
//! cover/noise separation, a 0-100 trend score with a summary line, a
//! monthly upload histogram, and keyword-named thematic clusters with 2D
//! plot coordinates. Pure in-process transformation; retrieval and
//! presentation live elsewhere.

pub mod classify;
pub mod cluster;
pub mod error;
pub mod keywords;
pub mod kmeans;
pub mod models;
pub mod orchestrator;
pub mod trend;
pub mod tsne;
pub mod vectorize;

pub use error::DateParseError;
pub use models::{ClusterAssignment, PlotPoint, RuleCategory, SongAnalysis, VideoRecord};
pub use orchestrator::{analyze_song, PipelineParams};
