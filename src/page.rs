use std::sync::LazyLock;

use regex::Regex;

/// What the host-page scraper hands the core: the show title and the
/// episode currently playing. Both are untrusted; absence of either means
/// the filler check simply does not run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewingContext {
    pub title: String,
    pub episode: u32,
}

static EPISODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"E(\d+)").expect("episode regex"));

/// Extracts the episode number from an episode heading like
/// `"E3 - The Chase"`. Returns `None` when no number is present; absence
/// is signalled, never mapped to zero.
pub fn episode_number_from_title(title_text: &str) -> Option<u32> {
    let caps = EPISODE_RE.captures(title_text)?;
    caps[1].parse().ok()
}
