// src/services/source.rs

//! Web content access used by the retriever.

use async_trait::async_trait;
use scraper::{Html, Selector};

use crate::error::{AppError, Result};
use crate::models::RetrieverConfig;
use crate::utils::http::{create_async_client, fetch_page_async};

/// A hyperlink found on a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchor {
    /// Raw `href` attribute, possibly relative
    pub href: String,
    /// Visible link text
    pub text: String,
}

/// Source of web pages.
#[async_trait]
pub trait WebSource: Send + Sync {
    /// Fetch `url` and list its `a[href]` elements.
    async fn anchors(&self, url: &str) -> Result<Vec<Anchor>>;

    /// Fetch `url` and return the text of the first element matching
    /// `selector`, or `None` if nothing matches.
    async fn container_text(&self, url: &str, selector: &str) -> Result<Option<String>>;
}

/// [`WebSource`] backed by a reqwest client and scraper.
pub struct HttpSource {
    client: reqwest::Client,
}

impl HttpSource {
    pub fn new(config: &RetrieverConfig) -> Result<Self> {
        Ok(Self {
            client: create_async_client(config)?,
        })
    }

    fn parse_selector(s: &str) -> Result<Selector> {
        Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
    }
}

#[async_trait]
impl WebSource for HttpSource {
    async fn anchors(&self, url: &str) -> Result<Vec<Anchor>> {
        let document = fetch_page_async(&self.client, url).await?;
        Ok(collect_anchors(&document))
    }

    async fn container_text(&self, url: &str, selector: &str) -> Result<Option<String>> {
        let document = fetch_page_async(&self.client, url).await?;
        let selector = Self::parse_selector(selector)?;
        Ok(container_text(&document, &selector))
    }
}

fn collect_anchors(document: &Html) -> Vec<Anchor> {
    let Ok(link_sel) = Selector::parse("a[href]") else {
        return Vec::new();
    };
    document
        .select(&link_sel)
        .filter_map(|el| {
            let href = el.value().attr("href")?;
            Some(Anchor {
                href: href.to_string(),
                text: el.text().collect(),
            })
        })
        .collect()
}

fn container_text(document: &Html, selector: &Selector) -> Option<String> {
    document
        .select(selector)
        .next()
        .map(|el| el.text().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEARCH_PAGE: &str = r#"
        <html><body>
          <ul>
            <li><a href="/zhengce/content/2023-10/25/content_6911527.htm">国务院办公厅关于2024年部分节假日安排的通知</a></li>
            <li><a href="https://www.gov.cn/other.htm"><em>国务院</em>其他通知</a></li>
            <li><a name="anchor-without-href">跳过</a></li>
          </ul>
        </body></html>
    "#;

    #[test]
    fn test_collect_anchors() {
        let document = Html::parse_document(SEARCH_PAGE);
        let anchors = collect_anchors(&document);
        assert_eq!(anchors.len(), 2);
        assert_eq!(
            anchors[0].href,
            "/zhengce/content/2023-10/25/content_6911527.htm"
        );
        assert_eq!(anchors[0].text, "国务院办公厅关于2024年部分节假日安排的通知");
        assert_eq!(anchors[1].text, "国务院其他通知");
    }

    #[test]
    fn test_container_text() {
        let document = Html::parse_document(
            r#"<table><tr><td id="UCAP-CONTENT"><p>一、元旦：1月1日放假。</p>
<p>二、春节：2月10日至17日放假。</p></td></tr></table>"#,
        );
        let selector = HttpSource::parse_selector("td#UCAP-CONTENT").unwrap();
        let text = container_text(&document, &selector).unwrap();
        assert!(text.contains("一、元旦：1月1日放假。"));
        assert!(text.contains("\n二、春节"));
    }

    #[test]
    fn test_missing_container() {
        let document = Html::parse_document("<div>nothing</div>");
        let selector = HttpSource::parse_selector("td#UCAP-CONTENT").unwrap();
        assert!(container_text(&document, &selector).is_none());
    }

    #[test]
    fn test_parse_selector_invalid() {
        assert!(HttpSource::parse_selector("[[invalid").is_err());
    }
}
