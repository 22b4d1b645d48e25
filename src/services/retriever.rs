// src/services/retriever.rs

//! Announcement retrieval.
//!
//! Searches the government site for a year's holiday announcement, follows
//! the result whose title matches the query exactly, and returns the text of
//! the article body.

use std::sync::Arc;
use std::time::Duration;

use url::Url;

use crate::error::{AppError, Result};
use crate::models::RetrieverConfig;
use crate::services::completion::CompletionGate;
use crate::services::source::WebSource;
use crate::utils::resolve_url;

/// Title of the yearly State Council announcement.
pub fn announcement_title(year: i32) -> String {
    format!("国务院办公厅关于{year}年部分节假日安排的通知")
}

/// Fetches raw announcement text for a year.
pub struct Retriever {
    source: Arc<dyn WebSource>,
    config: RetrieverConfig,
}

impl Retriever {
    pub fn new(source: Arc<dyn WebSource>, config: RetrieverConfig) -> Self {
        Self { source, config }
    }

    /// Search URL for a year's announcement.
    pub fn search_url(&self, year: i32) -> Result<Url> {
        let query = announcement_title(year);
        Ok(Url::parse_with_params(
            &self.config.search_url,
            &[("t", "paper"), ("advance", "false"), ("q", query.as_str())],
        )?)
    }

    /// Retrieve the announcement body for `year`.
    ///
    /// The crawl runs on its own task and reports through a one-shot gate;
    /// this waits for that single report.
    pub async fn fetch(&self, year: i32) -> Result<String> {
        let delay = Duration::from_millis(self.config.request_delay_ms);
        if delay.as_millis() > 0 {
            tokio::time::sleep(delay).await;
        }

        let search_url = self.search_url(year)?;
        let (gate, completion) = CompletionGate::new();
        let source = Arc::clone(&self.source);
        let selector = self.config.content_selector.clone();

        tokio::spawn(async move {
            match crawl(source.as_ref(), year, &search_url, &selector).await {
                Ok(text) => gate.succeed(text),
                Err(e) => gate.fail(e),
            };
        });

        completion.wait().await
    }
}

async fn crawl(
    source: &dyn WebSource,
    year: i32,
    search_url: &Url,
    selector: &str,
) -> Result<String> {
    let title = announcement_title(year);
    log::debug!("Searching announcement: {}", search_url);

    let anchors = source.anchors(search_url.as_str()).await?;
    let anchor = anchors
        .iter()
        .find(|a| a.text.trim() == title)
        .ok_or_else(|| AppError::crawl(format!("year {year}"), "no announcement link found"))?;

    let article_url = resolve_url(search_url, &anchor.href);
    log::info!("Fetching {} announcement from {}", year, article_url);

    source
        .container_text(&article_url, selector)
        .await?
        .ok_or_else(|| {
            AppError::crawl(
                format!("year {year}"),
                format!("no '{selector}' element at {article_url}"),
            )
        })
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::services::source::Anchor;

    /// In-memory site serving one announcement per registered year.
    #[derive(Default)]
    pub(crate) struct FakeSite {
        articles: Mutex<HashMap<i32, String>>,
        searches: AtomicUsize,
    }

    impl FakeSite {
        pub(crate) fn with(self, year: i32, text: &str) -> Self {
            self.articles
                .lock()
                .unwrap()
                .insert(year, text.to_string());
            self
        }

        pub(crate) fn searches(&self) -> usize {
            self.searches.load(Ordering::SeqCst)
        }
    }

    fn year_of(url: &str) -> Option<i32> {
        let url = Url::parse(url).ok()?;
        if let Some((_, q)) = url.query_pairs().find(|(k, _)| k == "q") {
            return q.chars().filter(char::is_ascii_digit).collect::<String>().parse().ok();
        }
        url.path().trim_start_matches("/article/").parse().ok()
    }

    #[async_trait]
    impl WebSource for FakeSite {
        async fn anchors(&self, url: &str) -> Result<Vec<Anchor>> {
            self.searches.fetch_add(1, Ordering::SeqCst);
            let year = year_of(url).ok_or_else(|| AppError::crawl(url, "bad query"))?;
            if !self.articles.lock().unwrap().contains_key(&year) {
                return Ok(vec![Anchor {
                    href: "/article/unrelated".to_string(),
                    text: "无关链接".to_string(),
                }]);
            }
            Ok(vec![
                Anchor {
                    href: "/article/unrelated".to_string(),
                    text: "无关链接".to_string(),
                },
                Anchor {
                    href: format!("/article/{year}"),
                    text: format!(" {} ", announcement_title(year)),
                },
            ])
        }

        async fn container_text(&self, url: &str, _selector: &str) -> Result<Option<String>> {
            let year = year_of(url).ok_or_else(|| AppError::crawl(url, "bad article"))?;
            Ok(self.articles.lock().unwrap().get(&year).cloned())
        }
    }

    pub(crate) fn instant_config() -> RetrieverConfig {
        RetrieverConfig {
            search_url: "http://search.test/s.htm".to_string(),
            request_delay_ms: 0,
            ..RetrieverConfig::default()
        }
    }

    #[test]
    fn test_announcement_title() {
        assert_eq!(
            announcement_title(2024),
            "国务院办公厅关于2024年部分节假日安排的通知"
        );
    }

    #[test]
    fn test_search_url_is_encoded() {
        let retriever = Retriever::new(Arc::new(FakeSite::default()), instant_config());
        let url = retriever.search_url(2024).unwrap();
        assert!(url.as_str().starts_with("http://search.test/s.htm?t=paper&advance=false&q="));
        assert!(url.as_str().is_ascii());
        assert_eq!(year_of(url.as_str()), Some(2024));
    }

    #[tokio::test]
    async fn test_fetch_follows_matching_link() {
        let site = Arc::new(FakeSite::default().with(2024, "一、元旦：1月1日放假。"));
        let retriever = Retriever::new(site.clone(), instant_config());

        let text = retriever.fetch(2024).await.unwrap();
        assert_eq!(text, "一、元旦：1月1日放假。");
        assert_eq!(site.searches(), 1);
    }

    #[tokio::test]
    async fn test_fetch_without_matching_link_fails() {
        let site = Arc::new(FakeSite::default());
        let retriever = Retriever::new(site, instant_config());

        let err = retriever.fetch(2030).await.unwrap_err();
        assert!(matches!(err, AppError::Crawl { .. }));
    }
}
