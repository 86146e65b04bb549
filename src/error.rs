use thiserror::Error;

/// Per-record parse failure for an upload date that matched neither the
/// flexible ISO-8601 form nor strict `YYYY-MM-DD`.
///
/// The orchestrator's policy is to skip such records from trend scoring and
/// monthly aggregation (with a logged warning); callers that want a hard
/// error can propagate this instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unparsable upload date: {raw:?}")]
pub struct DateParseError {
    pub raw: String,
}

impl DateParseError {
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }
}
