//! 뉴스 피드 타입.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 뉴스 항목.
///
/// RSS 피드에서 파싱된 단일 기사.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsItem {
    /// 기사 제목
    pub title: String,
    /// 기사 링크
    pub link: String,
    /// 요약 (없을 수 있음)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// 발행 시각
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
    /// 출처 피드 키 (예: "energy")
    pub source: String,
}
