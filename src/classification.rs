use std::sync::LazyLock;

use regex::Regex;

use crate::episodes::{self, ParsedEpisodes};

// A classification section is a div whose class list carries the episode
// type, followed within a bounded window by the span holding the episode
// links. The window keeps a filler div from swallowing a later section's
// span.
static SECTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?is)<div[^>]*class="([^"]*)"[^>]*>.{0,500}?<span[^>]*class="[^"]*Episodes[^"]*"[^>]*>(.+?)</span>"#,
    )
    .expect("section regex")
});

static ANCHOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<a[^>]*>([^<]+)</a>").expect("anchor regex"));

/// Extracts the filler episode list from a classification document.
///
/// Scans labeled sections in document order and takes the first one whose
/// class list qualifies as plain filler. The episode texts are the anchor
/// contents of that section's `Episodes` span, joined and fed through the
/// range parser. No qualifying section is a valid outcome and yields an
/// empty set.
pub fn extract_filler_episodes(html: &str) -> ParsedEpisodes {
    for caps in SECTION_RE.captures_iter(html) {
        let class_attr = &caps[1];
        if !is_filler_class(class_attr) {
            tracing::debug!(class = class_attr, "skipping non-filler section");
            continue;
        }

        let texts: Vec<&str> = ANCHOR_RE
            .captures_iter(caps.get(2).map_or("", |m| m.as_str()))
            .filter_map(|anchor| anchor.get(1))
            .map(|m| m.as_str().trim())
            .collect();

        return episodes::parse_episode_list(&texts.join(", "));
    }

    ParsedEpisodes::default()
}

/// `filler` must appear as a whole class name, and the section must not be
/// a mixed one. Mixed sections cover partially-filler episodes, which
/// never count.
fn is_filler_class(class_attr: &str) -> bool {
    class_attr.split_whitespace().any(|class| class == "filler")
        && !class_attr.contains("mixed")
}
