use crate::records::CatalogEntry;

/// Minimum similarity for a candidate to count as a match. Below this the
/// matcher returns no result at all.
pub const MATCH_THRESHOLD: f64 = 0.5;

/// A candidate that cleared [`MATCH_THRESHOLD`], with its similarity score.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult<'a> {
    pub entry: &'a CatalogEntry,
    pub score: f64,
}

/// Lowercases, strips everything that is not alphanumeric or whitespace,
/// and trims. Applied identically to the query and every candidate title
/// before any comparison.
pub fn normalize_title(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect::<String>()
        .to_lowercase()
        .trim()
        .to_owned()
}

/// Similarity of two titles in `[0, 1]`.
///
/// Scoring rules apply in order, first hit wins: identical normalized
/// strings score 1.0, a substring relation scores 0.9, anything else falls
/// back to `1 - distance / max(len, 1)` using plain Levenshtein distance.
pub fn similarity(query: &str, candidate: &str) -> f64 {
    let a = normalize_title(query);
    let b = normalize_title(candidate);

    if a == b {
        return 1.0;
    }
    if a.contains(&b) || b.contains(&a) {
        return 0.9;
    }

    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let distance = levenshtein(&a, &b);
    let max_len = a.len().max(b.len()).max(1);

    1.0 - distance as f64 / max_len as f64
}

/// Picks the highest-scoring candidate for `query`. Ties go to the first
/// candidate encountered, so the result is stable but order-dependent.
/// Returns `None` when no candidate reaches [`MATCH_THRESHOLD`].
///
/// O(candidates × query_len × title_len); fine for catalogs in the
/// hundreds, a scaling concern well beyond that.
pub fn best_match<'a>(query: &str, candidates: &'a [CatalogEntry]) -> Option<MatchResult<'a>> {
    let mut best: Option<MatchResult<'a>> = None;

    for entry in candidates {
        let score = similarity(query, &entry.title);
        if best.as_ref().is_none_or(|current| score > current.score) {
            best = Some(MatchResult { entry, score });
        }
    }

    best.filter(|result| result.score >= MATCH_THRESHOLD)
}

fn levenshtein(a: &[char], b: &[char]) -> usize {
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut previous: Vec<usize> = (0..=b.len()).collect();
    let mut current = vec![0; b.len() + 1];

    for (i, &ca) in a.iter().enumerate() {
        current[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let substitution = previous[j] + usize::from(ca != cb);
            current[j + 1] = substitution
                .min(previous[j + 1] + 1)
                .min(current[j] + 1);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(title: &str) -> CatalogEntry {
        CatalogEntry {
            title: title.to_owned(),
            url: format!("https://example.com/shows/{title}"),
        }
    }

    #[test]
    fn normalization_strips_punctuation_and_case() {
        assert_eq!(normalize_title("  Dr. STONE!? "), "dr stone");
        assert_eq!(normalize_title("Naruto"), "naruto");
    }

    #[test]
    fn exact_match_beats_substring_candidate() {
        let candidates = vec![entry("Naruto"), entry("Naruto Shippuden")];
        let result = best_match("Naruto", &candidates).unwrap();
        assert_eq!(result.entry.title, "Naruto");
        assert_eq!(result.score, 1.0);
    }

    #[test]
    fn substring_relation_scores_point_nine() {
        assert_eq!(similarity("Shippuden", "Naruto Shippuden"), 0.9);
        assert_eq!(similarity("Naruto Shippuden", "Shippuden"), 0.9);
    }

    #[test]
    fn close_misspelling_clears_threshold() {
        let candidates = vec![entry("One Piece")];
        let result = best_match("One Pece", &candidates).unwrap();
        assert_eq!(result.entry.title, "One Piece");
        assert!(result.score > MATCH_THRESHOLD && result.score < 1.0);
    }

    #[test]
    fn unrelated_title_is_rejected() {
        let candidates = vec![entry("Naruto")];
        assert!(best_match("Completely Unrelated Show", &candidates).is_none());
    }

    #[test]
    fn ties_go_to_the_first_candidate() {
        let mut first = entry("Bleach");
        first.url = "https://example.com/shows/bleach-first".to_owned();
        let candidates = vec![first.clone(), entry("Bleach")];
        let result = best_match("Bleach", &candidates).unwrap();
        assert_eq!(result.entry.url, first.url);
    }

    #[test]
    fn empty_candidate_list_yields_none() {
        assert!(best_match("Naruto", &[]).is_none());
    }

    #[test]
    fn levenshtein_basics() {
        let chars = |s: &str| s.chars().collect::<Vec<_>>();
        assert_eq!(levenshtein(&chars("kitten"), &chars("sitting")), 3);
        assert_eq!(levenshtein(&chars(""), &chars("abc")), 3);
        assert_eq!(levenshtein(&chars("abc"), &chars("abc")), 0);
    }
}
