//! 뉴스 피드 endpoint.
//!
//! 고정 카탈로그의 RSS 피드를 프록시합니다.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use bedrock_core::NewsItem;
use bedrock_data::{DataError, NewsService};

use crate::error::{api_error, ApiResult};
use crate::state::AppState;

/// 뉴스 조회 쿼리 파라미터.
#[derive(Debug, Deserialize)]
pub struct NewsQuery {
    /// 피드 키 (기본 "energy")
    pub feed: Option<String>,
}

/// 뉴스 목록 응답.
#[derive(Debug, Serialize)]
pub struct NewsListResponse {
    /// 피드 키
    pub feed: String,
    /// 기사 수
    pub count: usize,
    /// 기사 목록
    pub items: Vec<NewsItem>,
}

/// 사용 가능한 피드 목록 응답.
#[derive(Debug, Serialize)]
pub struct FeedsResponse {
    /// 피드 키 목록
    pub feeds: Vec<&'static str>,
}

/// 뉴스 조회.
///
/// GET /api/v1/news?feed=..
pub async fn get_news(
    State(state): State<Arc<AppState>>,
    Query(query): Query<NewsQuery>,
) -> ApiResult<Json<NewsListResponse>> {
    let feed = query.feed.unwrap_or_else(|| "energy".to_string());

    let items = state.news.fetch(&feed).await.map_err(|e| match e {
        DataError::InvalidData(msg) => api_error(StatusCode::BAD_REQUEST, "UNKNOWN_FEED", msg),
        other => api_error(StatusCode::BAD_GATEWAY, "FEED_ERROR", other.to_string()),
    })?;

    Ok(Json(NewsListResponse {
        feed,
        count: items.len(),
        items,
    }))
}

/// 사용 가능한 피드 목록.
///
/// GET /api/v1/news/feeds
pub async fn list_feeds() -> Json<FeedsResponse> {
    Json(FeedsResponse {
        feeds: NewsService::feed_keys(),
    })
}

/// 뉴스 라우터 생성.
pub fn news_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(get_news))
        .route("/feeds", get(list_feeds))
}
