//! API 라우트.
//!
//! 모든 REST API 엔드포인트를 정의하고 라우터를 구성합니다.
//!
//! # 라우트 구조
//!
//! - `/health` - 헬스 체크 (liveness)
//! - `/health/ready` - 상세 헬스 체크 (readiness)
//! - `/api/v1/vessels` - 선박 조회 (뷰포트/검색/상세/항적)
//! - `/api/v1/ports` - 항구 조회 (뷰포트/국가/검색/설비)
//! - `/api/v1/prices` - 원자재 가격 (유가/석탄/광물)
//! - `/api/v1/news` - 뉴스 피드

pub mod health;
pub mod news;
pub mod ports;
pub mod prices;
pub mod vessels;

pub use health::{health_router, ComponentHealth, ComponentStatus, HealthResponse};
pub use news::{news_router, FeedsResponse, NewsListResponse};
pub use ports::{ports_router, PortsListResponse};
pub use prices::prices_router;
pub use vessels::{
    vessels_router, VesselSearchResponse, VesselTrackResponse, VesselsListResponse,
};

use axum::Router;
use std::sync::Arc;

use crate::state::AppState;

/// 전체 API 라우터 생성.
///
/// 모든 서브 라우터를 조합하여 하나의 라우터로 반환합니다.
pub fn create_api_router() -> Router<Arc<AppState>> {
    Router::new()
        // 헬스 체크 엔드포인트
        .nest("/health", health_router())
        // API v1 엔드포인트
        .nest("/api/v1/vessels", vessels_router())
        .nest("/api/v1/ports", ports_router())
        .nest("/api/v1/prices", prices_router())
        .nest("/api/v1/news", news_router())
}
