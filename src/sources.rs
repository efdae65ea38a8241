use std::sync::LazyLock;
use std::time::Duration;

use anyhow::Context as _;
use async_trait::async_trait;
use regex::Regex;
use url::Url;

use crate::records::CatalogEntry;

/// Production catalog site. Override with `--base-url` or
/// `FILLERSKIP_BASE_URL`.
pub const DEFAULT_BASE_URL: &str = "https://www.animefillerlist.com";

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Supplies the full list of known shows. Network backed, may fail or
/// return zero entries.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch_catalog(&self) -> anyhow::Result<Vec<CatalogEntry>>;
}

/// Supplies the raw classification document for one show.
#[async_trait]
pub trait ClassificationSource: Send + Sync {
    async fn fetch_classification(&self, url: &str) -> anyhow::Result<String>;
}

/// HTTP implementation of both sources, scraping animefillerlist.com (or a
/// stand-in with the same page shapes).
#[derive(Debug, Clone)]
pub struct AnimeFillerList {
    client: reqwest::Client,
    base_url: Url,
}

impl AnimeFillerList {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        let base_url = Url::parse(base_url)
            .with_context(|| format!("parse catalog base url: {base_url}"))?;
        let client = reqwest::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .context("build http client")?;

        Ok(Self { client, base_url })
    }

    async fn fetch_html(&self, url: Url) -> anyhow::Result<String> {
        tracing::debug!(%url, "fetching");
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .with_context(|| format!("fetch {url}"))?
            .error_for_status()
            .with_context(|| format!("fetch {url}"))?;

        response
            .text()
            .await
            .with_context(|| format!("read body: {url}"))
    }
}

#[async_trait]
impl CatalogSource for AnimeFillerList {
    async fn fetch_catalog(&self) -> anyhow::Result<Vec<CatalogEntry>> {
        let url = self.base_url.join("/shows").context("build shows url")?;
        let html = self.fetch_html(url).await?;
        let entries = scrape_show_links(&html, &self.base_url);
        tracing::debug!(count = entries.len(), "scraped catalog entries");
        Ok(entries)
    }
}

#[async_trait]
impl ClassificationSource for AnimeFillerList {
    async fn fetch_classification(&self, url: &str) -> anyhow::Result<String> {
        let url = Url::parse(url).with_context(|| format!("parse classification url: {url}"))?;
        self.fetch_html(url).await
    }
}

static SHOW_LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<a[^>]*href="(/shows/[^"]+)"[^>]*>([^<]+)</a>"#).expect("show link regex")
});

/// Pulls `(title, url)` pairs out of the catalog page. Markup drift simply
/// means fewer entries; a page with no recognizable show links yields an
/// empty catalog, never an error.
pub fn scrape_show_links(html: &str, base_url: &Url) -> Vec<CatalogEntry> {
    let mut entries = Vec::new();

    for caps in SHOW_LINK_RE.captures_iter(html) {
        let title = caps[2].trim();
        if title.is_empty() {
            continue;
        }
        let Ok(url) = base_url.join(&caps[1]) else {
            continue;
        };
        entries.push(CatalogEntry {
            title: title.to_owned(),
            url: url.to_string(),
        });
    }

    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scrapes_show_links_and_joins_urls() {
        let base = Url::parse("https://www.animefillerlist.com").unwrap();
        let html = r#"
            <ul>
              <li><a class="show" href="/shows/naruto">Naruto</a></li>
              <li><a href="/shows/one-piece"> One Piece </a></li>
              <li><a href="/about">About</a></li>
            </ul>
        "#;

        let entries = scrape_show_links(html, &base);
        assert_eq!(
            entries,
            vec![
                CatalogEntry {
                    title: "Naruto".to_owned(),
                    url: "https://www.animefillerlist.com/shows/naruto".to_owned(),
                },
                CatalogEntry {
                    title: "One Piece".to_owned(),
                    url: "https://www.animefillerlist.com/shows/one-piece".to_owned(),
                },
            ]
        );
    }

    #[test]
    fn page_without_show_links_yields_empty_catalog() {
        let base = Url::parse("https://www.animefillerlist.com").unwrap();
        assert!(scrape_show_links("<html><body>redesigned</body></html>", &base).is_empty());
    }

    #[test]
    fn whitespace_only_titles_are_skipped() {
        let base = Url::parse("https://www.animefillerlist.com").unwrap();
        let html = r#"<a href="/shows/ghost"> </a>"#;
        assert!(scrape_show_links(html, &base).is_empty());
    }
}
