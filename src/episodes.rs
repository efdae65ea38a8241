use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Sorted, de-duplicated set of episode numbers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EpisodeSet(BTreeSet<u32>);

impl EpisodeSet {
    pub fn contains(&self, episode: u32) -> bool {
        self.0.contains(&episode)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<u32> for EpisodeSet {
    fn from_iter<I: IntoIterator<Item = u32>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Result of parsing an episode list. Tokens that could not be parsed are
/// kept aside so callers can report them without losing the valid part of
/// the list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedEpisodes {
    pub episodes: EpisodeSet,
    pub rejected: Vec<String>,
}

/// Parses an episode list like `"1-5, 10, 15-20"`.
///
/// Tokens are comma separated; each token is a single number or an
/// inclusive `start-end` range. Whitespace around tokens and around the
/// hyphen is ignored. A reversed range (`5-3`) contributes nothing. A
/// malformed token is skipped and returned in `rejected`.
pub fn parse_episode_list(text: &str) -> ParsedEpisodes {
    let mut episodes = BTreeSet::new();
    let mut rejected = Vec::new();

    for token in text.split(',') {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        match parse_token(token) {
            Some(range) => episodes.extend(range),
            None => rejected.push(token.to_owned()),
        }
    }

    ParsedEpisodes {
        episodes: EpisodeSet(episodes),
        rejected,
    }
}

fn parse_token(token: &str) -> Option<std::ops::RangeInclusive<u32>> {
    match token.split_once('-') {
        Some((start, end)) => {
            let start: u32 = start.trim().parse().ok()?;
            let end: u32 = end.trim().parse().ok()?;
            Some(start..=end)
        }
        None => {
            let value: u32 = token.parse().ok()?;
            Some(value..=value)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn episodes(text: &str) -> Vec<u32> {
        parse_episode_list(text).episodes.iter().collect()
    }

    #[test]
    fn parses_singles_and_ranges() {
        assert_eq!(episodes("1-3, 5, 10-12"), vec![1, 2, 3, 5, 10, 11, 12]);
    }

    #[test]
    fn reversed_range_contributes_nothing() {
        assert_eq!(episodes("5-3"), Vec::<u32>::new());
        assert_eq!(episodes("5-3, 7"), vec![7]);
    }

    #[test]
    fn empty_input_yields_empty_set() {
        let parsed = parse_episode_list("");
        assert!(parsed.episodes.is_empty());
        assert!(parsed.rejected.is_empty());
    }

    #[test]
    fn output_is_sorted_regardless_of_input_order() {
        assert_eq!(episodes("5,1,3"), episodes("1,3,5"));
        assert_eq!(episodes("5,1,3"), vec![1, 3, 5]);
    }

    #[test]
    fn duplicates_are_merged() {
        assert_eq!(episodes("1-4, 3, 2-5"), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn whitespace_around_hyphen_is_ignored() {
        assert_eq!(episodes(" 7 - 9 "), vec![7, 8, 9]);
    }

    #[test]
    fn malformed_tokens_are_skipped_and_reported() {
        let parsed = parse_episode_list("1, abc, 3-x, 5");
        assert_eq!(parsed.episodes.iter().collect::<Vec<_>>(), vec![1, 5]);
        assert_eq!(parsed.rejected, vec!["abc", "3-x"]);
    }

    #[test]
    fn extra_hyphens_are_malformed() {
        let parsed = parse_episode_list("1-2-3");
        assert!(parsed.episodes.is_empty());
        assert_eq!(parsed.rejected, vec!["1-2-3"]);
    }

    #[test]
    fn stray_commas_are_tolerated() {
        let parsed = parse_episode_list("1,,2,");
        assert_eq!(parsed.episodes.iter().collect::<Vec<_>>(), vec![1, 2]);
        assert!(parsed.rejected.is_empty());
    }
}
