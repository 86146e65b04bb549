//! Static keyword tables driving every heuristic classification stage.
//!
//! All tables are ordered and matching is first-match-wins, never best-match,
//! so the order here is load-bearing. English entries are matched against
//! lower-cased text; Japanese entries are matched against the raw text as
//! well, since case-folding is a no-op for those scripts.

use crate::models::RuleCategory;

/// Titles containing any of these are covers, checked before the noise list.
pub const COVER_KEYWORDS: &[&str] = &[
    // English
    "cover",
    "acoustic",
    "band cover",
    "piano cover",
    "guitar cover",
    "drum cover",
    "instrumental cover",
    "vocals cover",
    "acoustic version",
    "arrangement",
    "cover version",
    "cover by",
    // Japanese
    "歌ってみた",         // tried singing (most common)
    "弾いてみた",         // tried playing (guitar/piano)
    "叩いてみた",         // tried drumming
    "弾き語り",           // acoustic self-play-and-sing
    "弾き語ってみた",     // tried performing acoustic
    "カバー",             // cover
    "アレンジ",           // arrangement
    "ピアノ",             // piano
    "ギター",             // guitar
    "バンドカバー",       // band cover
    "インスト",           // instrumental
    "アコースティック",   // acoustic
    "歌わせていただきました",
];

/// Official/promotional content markers; only consulted when no cover
/// keyword matched.
pub const NOISE_KEYWORDS: &[&str] = &[
    // English
    "official music video",
    "official video",
    "mv",
    "m/v",
    "official audio",
    "lyric",
    "lyrics",
    "karaoke",
    "remix",
    "slowed",
    "reverb",
    "reaction",
    "live",
    "performance",
    "short",
    "shorts",
    "teaser",
    "trailer",
    "full album",
    "concert",
    // Japanese
    "公式",               // official
    "ミュージックビデオ", // music video
    "歌詞",               // lyrics
    "カラオケ",           // karaoke
    "ライブ",             // live
    "生放送",             // live stream
    "ショート",           // shorts
];

pub const ACOUSTIC_KEYWORDS: &[&str] = &[
    "acoustic",
    "acoustic version",
    "unplugged",
    "アコースティック",
    "アコギ",
];

pub const BAND_KEYWORDS: &[&str] = &[
    "band",
    "full band",
    "arrange",
    "arrangement",
    "バンドカバー",
    "編成",
    "full arrangement",
    "アレンジ",
];

pub const VOCAL_KEYWORDS: &[&str] = &[
    "vocal",
    "vocals",
    "a cappella",
    "a-capella",
    "vocal cover",
    "sing",
    "歌ってみた",
    "ボーカル",
    "ボーカルカバー",
    "アカペラ",
    "歌わせていただきました",
];

pub const INSTRUMENTAL_KEYWORDS: &[&str] = &[
    "instrumental",
    "inst",
    "instrumental cover",
    "piano",
    "guitar",
    "drum",
    "bass",
    "solo",
    "弾いてみた",
    "インスト",
    "ピアノ",
    "ギター",
];

pub const ACOUSTIC_NAME: &str = "Acoustic / Soft";
pub const BAND_NAME: &str = "Band / Full Arrangement";
pub const VOCAL_NAME: &str = "Vocal cover";
pub const INSTRUMENTAL_NAME: &str = "Instrumental";
pub const FALLBACK_NAME: &str = "Other / Remix";

pub const ACOUSTIC_ICON: &str = "bi bi-music-note-beamed";
pub const BAND_ICON: &str = "bi bi-people-fill";
pub const VOCAL_ICON: &str = "bi bi-mic-fill";
pub const INSTRUMENTAL_ICON: &str = "bi bi-music-note-list";
pub const FALLBACK_ICON: &str = "bi bi-question-circle-fill";

/// Bucket consideration order for cluster naming. Ties on the hit count go to
/// the earlier bucket, so this order is part of the contract.
pub const NAMER_BUCKETS: &[(&str, &[&str])] = &[
    (VOCAL_NAME, VOCAL_KEYWORDS),
    (INSTRUMENTAL_NAME, INSTRUMENTAL_KEYWORDS),
    (ACOUSTIC_NAME, ACOUSTIC_KEYWORDS),
    (BAND_NAME, BAND_KEYWORDS),
];

pub fn rule_category(name: &str, icon: &str) -> RuleCategory {
    RuleCategory {
        name: name.to_string(),
        icon: icon.to_string(),
    }
}
