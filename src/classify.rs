//! Rule-based classification: cover-vs-noise from the title alone, and the
//! finer five-way cover category from title + description.

use crate::keywords::{
    rule_category, ACOUSTIC_ICON, ACOUSTIC_KEYWORDS, ACOUSTIC_NAME, BAND_ICON, BAND_KEYWORDS,
    BAND_NAME, COVER_KEYWORDS, FALLBACK_ICON, FALLBACK_NAME, INSTRUMENTAL_ICON,
    INSTRUMENTAL_KEYWORDS, INSTRUMENTAL_NAME, NOISE_KEYWORDS, VOCAL_ICON, VOCAL_KEYWORDS,
    VOCAL_NAME,
};
use crate::models::{RuleCategory, VideoRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleClass {
    Cover,
    Noise,
}

fn any_match(lowered: &str, raw: &str, keywords: &[&str]) -> bool {
    // Lower-cased text catches every ASCII entry; the raw text additionally
    // catches Japanese entries, where lower-casing is a no-op anyway.
    keywords
        .iter()
        .any(|kw| lowered.contains(kw) || raw.contains(kw))
}

/// Binary cover/noise decision from the title alone.
///
/// Cover keywords are scanned first, in list order, so a title carrying both
/// a cover and a noise trigger is still a cover. Anything matching neither
/// list is treated conservatively as noise.
pub fn classify_title(title: &str) -> TitleClass {
    let lowered = title.to_lowercase();

    if any_match(&lowered, title, COVER_KEYWORDS) {
        return TitleClass::Cover;
    }
    if any_match(&lowered, title, NOISE_KEYWORDS) {
        return TitleClass::Noise;
    }
    TitleClass::Noise // ambiguous = noise
}

/// Five-way cover category from title + description.
///
/// The title is doubled into the search text so title hits outweigh
/// description hits. Buckets are evaluated in fixed priority order; the first
/// bucket with any hit wins.
pub fn classify_cover_type(video: &VideoRecord) -> RuleCategory {
    let raw = format!("{} {} {}", video.title, video.title, video.description);
    let lowered = raw.to_lowercase();

    if any_match(&lowered, &raw, ACOUSTIC_KEYWORDS) {
        return rule_category(ACOUSTIC_NAME, ACOUSTIC_ICON);
    }
    if any_match(&lowered, &raw, BAND_KEYWORDS) {
        return rule_category(BAND_NAME, BAND_ICON);
    }
    if any_match(&lowered, &raw, VOCAL_KEYWORDS) {
        return rule_category(VOCAL_NAME, VOCAL_ICON);
    }
    if any_match(&lowered, &raw, INSTRUMENTAL_KEYWORDS) {
        return rule_category(INSTRUMENTAL_NAME, INSTRUMENTAL_ICON);
    }
    rule_category(FALLBACK_NAME, FALLBACK_ICON)
}
