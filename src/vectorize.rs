//! TF-IDF vectorization of the cover corpus.
//!
//! Unigrams + bigrams over lower-cased alphanumeric runs, common English
//! function words removed (non-English tokens pass through untouched),
//! vocabulary capped by corpus frequency, smoothed idf, L2-normalized rows.

use std::collections::{HashMap, HashSet};
use unicode_normalization::UnicodeNormalization;

pub const MAX_FEATURES: usize = 800;

/// Dense weighted term matrix plus the vocabulary it is indexed by.
/// `rows` is index-aligned with the input corpus.
#[derive(Debug, Clone)]
pub struct TfidfMatrix {
    pub rows: Vec<Vec<f32>>,
    pub vocab: Vec<String>,
}

impl TfidfMatrix {
    pub fn n_docs(&self) -> usize {
        self.rows.len()
    }

    pub fn n_features(&self) -> usize {
        self.vocab.len()
    }
}

fn is_stop_word(word: &str) -> bool {
    const STOP_WORDS: &[&str] = &[
        "a", "an", "and", "are", "as", "at", "be", "by", "for", "from", "has", "he", "in", "is",
        "it", "its", "of", "on", "or", "that", "the", "to", "was", "were", "will", "with", "this",
        "they", "but", "have", "had", "what", "when", "where", "who", "which", "why", "how", "all",
        "each", "every", "both", "few", "more", "most", "other", "some", "such", "no", "nor",
        "not", "only", "own", "same", "so", "than", "too", "very", "can", "just", "should", "now",
        "also", "been", "being", "do", "does", "did", "doing", "would", "could", "might", "must",
        "shall", "about", "above", "after", "again", "against", "am", "any", "before", "below",
        "between", "into", "through", "during", "out", "over", "under", "up", "down", "then",
        "once", "here", "there", "if", "else", "while", "because", "until", "we", "you", "your",
        "our", "their", "him", "her", "them", "me", "my", "myself", "itself", "those", "these",
        "his",
    ];
    STOP_WORDS.contains(&word)
}

/// Lower-cased alphanumeric runs, length >= 2, numbers-only and English
/// stopword tokens dropped. Japanese text survives as whole runs since CJK
/// characters are alphanumeric.
pub fn tokenize(text: &str) -> Vec<String> {
    text.nfc()
        .collect::<String>()
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|s| s.chars().count() > 1)
        .filter(|s| !is_stop_word(s))
        .filter(|s| !s.chars().all(|c| c.is_numeric()))
        .map(String::from)
        .collect()
}

/// Unigrams plus adjacent-pair bigrams ("piano cover") per document.
fn terms_for(text: &str) -> Vec<String> {
    let tokens = tokenize(text);
    let mut terms = tokens.clone();
    for pair in tokens.windows(2) {
        terms.push(format!("{} {}", pair[0], pair[1]));
    }
    terms
}

/// Build the TF-IDF matrix for a corpus.
///
/// Vocabulary keeps the `max_features` highest-frequency terms; equal-count
/// terms break ties lexicographically so the matrix is deterministic for a
/// fixed corpus order. Weights are raw count * `ln((1+n)/(1+df)) + 1`,
/// then each row is L2-normalized.
pub fn vectorize(corpus: &[String], max_features: usize) -> TfidfMatrix {
    let per_doc_terms: Vec<Vec<String>> = corpus.iter().map(|t| terms_for(t)).collect();

    let mut total_counts: HashMap<&str, usize> = HashMap::new();
    let mut doc_counts: HashMap<&str, usize> = HashMap::new();
    for terms in &per_doc_terms {
        let mut seen: HashSet<&str> = HashSet::new();
        for term in terms {
            *total_counts.entry(term.as_str()).or_insert(0) += 1;
            seen.insert(term.as_str());
        }
        for term in seen {
            *doc_counts.entry(term).or_insert(0) += 1;
        }
    }

    let mut ranked: Vec<(&str, usize)> = total_counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    ranked.truncate(max_features);

    let vocab: Vec<String> = ranked.iter().map(|(t, _)| t.to_string()).collect();
    let index: HashMap<&str, usize> = vocab
        .iter()
        .enumerate()
        .map(|(i, t)| (t.as_str(), i))
        .collect();

    let n_docs = corpus.len() as f32;
    let idf: Vec<f32> = vocab
        .iter()
        .map(|t| {
            let df = *doc_counts.get(t.as_str()).unwrap_or(&0) as f32;
            ((1.0 + n_docs) / (1.0 + df)).ln() + 1.0
        })
        .collect();

    let rows: Vec<Vec<f32>> = per_doc_terms
        .iter()
        .map(|terms| {
            let mut row = vec![0.0f32; vocab.len()];
            for term in terms {
                if let Some(&i) = index.get(term.as_str()) {
                    row[i] += 1.0;
                }
            }
            for (i, w) in row.iter_mut().enumerate() {
                *w *= idf[i];
            }
            let norm = row.iter().map(|w| w * w).sum::<f32>().sqrt();
            if norm > 0.0 {
                for w in row.iter_mut() {
                    *w /= norm;
                }
            }
            row
        })
        .collect();

    TfidfMatrix { rows, vocab }
}
