//! RSS 뉴스 피드 서비스.
//!
//! 고정 카탈로그의 RSS 피드를 가져와 뉴스 항목으로 파싱합니다.

use chrono::{DateTime, Utc};
use rss::Channel;
use tracing::debug;

use bedrock_core::NewsItem;

use crate::error::{DataError, Result};

/// 피드 카탈로그: (키, URL).
pub const FEED_CATALOG: &[(&str, &str)] = &[
    ("energy", "https://oilprice.com/rss/main"),
    (
        "commodities",
        "https://www.investing.com/rss/news_11.rss",
    ),
    (
        "bloomberg",
        "https://feeds.bloomberg.com/markets/news.rss",
    ),
    (
        "minerals-and-metals",
        "https://www.mining.com/feed/",
    ),
];

/// 뉴스 피드 서비스.
#[derive(Clone)]
pub struct NewsService {
    client: reqwest::Client,
}

impl NewsService {
    /// 새 서비스 생성.
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .expect("HTTP 클라이언트 생성 실패"),
        }
    }

    /// 피드 키로 URL 조회.
    pub fn feed_url(feed: &str) -> Option<&'static str> {
        FEED_CATALOG
            .iter()
            .find(|(key, _)| *key == feed)
            .map(|(_, url)| *url)
    }

    /// 사용 가능한 피드 키 목록.
    pub fn feed_keys() -> Vec<&'static str> {
        FEED_CATALOG.iter().map(|(key, _)| *key).collect()
    }

    /// 피드를 가져와 뉴스 항목으로 파싱.
    ///
    /// # Errors
    /// 알 수 없는 피드 키는 `InvalidData`, 전송 실패는 `FetchError`,
    /// RSS 파싱 실패는 `ParseError`를 반환합니다.
    pub async fn fetch(&self, feed: &str) -> Result<Vec<NewsItem>> {
        let url = Self::feed_url(feed)
            .ok_or_else(|| DataError::InvalidData(format!("unknown feed: {}", feed)))?;

        debug!(feed = feed, url = url, "Fetching RSS feed");

        let body = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| DataError::FetchError(e.to_string()))?
            .bytes()
            .await
            .map_err(|e| DataError::FetchError(e.to_string()))?;

        let channel =
            Channel::read_from(&body[..]).map_err(|e| DataError::ParseError(e.to_string()))?;

        Ok(Self::items_from_channel(&channel, feed))
    }

    /// 파싱된 채널에서 뉴스 항목 추출.
    fn items_from_channel(channel: &Channel, feed: &str) -> Vec<NewsItem> {
        channel
            .items()
            .iter()
            .filter_map(|item| {
                let title = item.title()?.to_string();
                let link = item.link()?.to_string();
                Some(NewsItem {
                    title,
                    link,
                    description: item.description().map(String::from),
                    published_at: item
                        .pub_date()
                        .and_then(|d| DateTime::parse_from_rfc2822(d).ok())
                        .map(|d| d.with_timezone(&Utc)),
                    source: feed.to_string(),
                })
            })
            .collect()
    }
}

impl Default for NewsService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feed_catalog_lookup() {
        assert!(NewsService::feed_url("energy").is_some());
        assert!(NewsService::feed_url("unknown").is_none());
        assert_eq!(NewsService::feed_keys().len(), FEED_CATALOG.len());
    }

    #[test]
    fn test_items_from_channel() {
        let xml = r#"<?xml version="1.0"?>
            <rss version="2.0"><channel>
                <title>Energy News</title>
                <link>https://example.com</link>
                <description>feed</description>
                <item>
                    <title>Brent climbs</title>
                    <link>https://example.com/a</link>
                    <description>Prices rose.</description>
                    <pubDate>Mon, 01 Jul 2024 09:00:00 GMT</pubDate>
                </item>
                <item>
                    <title>No link item</title>
                </item>
            </channel></rss>"#;

        let channel = Channel::read_from(xml.as_bytes()).unwrap();
        let items = NewsService::items_from_channel(&channel, "energy");

        // 링크 없는 항목은 제외
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "Brent climbs");
        assert_eq!(items[0].source, "energy");
        assert!(items[0].published_at.is_some());
    }
}
