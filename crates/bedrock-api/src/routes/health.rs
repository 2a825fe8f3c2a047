//! 헬스 체크 endpoint.
//!
//! 서버 상태 확인을 위한 헬스 체크 엔드포인트를 제공합니다.
//! 로드밸런서나 오케스트레이션 시스템(Kubernetes 등)에서 사용됩니다.

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::state::AppState;

/// 헬스 체크 응답 구조체.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// 전체 서비스 상태 ("healthy" | "degraded" | "unhealthy")
    pub status: String,

    /// API 버전
    pub version: String,

    /// 서버 업타임(초)
    pub uptime_secs: i64,

    /// 현재 시간 (ISO 8601)
    pub timestamp: String,

    /// 개별 컴포넌트 상태
    pub components: ComponentHealth,
}

/// 개별 컴포넌트 상태.
#[derive(Debug, Serialize, Deserialize)]
pub struct ComponentHealth {
    /// Redis 연결 상태
    pub redis: ComponentStatus,

    /// 업스트림 선박 데이터 소스 상태
    pub vessel_source: ComponentStatus,

    /// WebSocket 구역 레지스트리 상태
    pub websocket: ComponentStatus,

    /// 항구 디렉터리 상태
    pub ports: ComponentStatus,
}

/// 컴포넌트 상태.
#[derive(Debug, Serialize, Deserialize)]
pub struct ComponentStatus {
    /// 상태 ("up" | "down" | "not_configured")
    pub status: String,

    /// 추가 정보 (선택적)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ComponentStatus {
    /// 정상 상태.
    pub fn up() -> Self {
        Self {
            status: "up".to_string(),
            message: None,
        }
    }

    /// 비정상 상태.
    pub fn down(message: impl Into<String>) -> Self {
        Self {
            status: "down".to_string(),
            message: Some(message.into()),
        }
    }

    /// 미설정 상태.
    pub fn not_configured() -> Self {
        Self {
            status: "not_configured".to_string(),
            message: None,
        }
    }

    /// 정보 포함 정상 상태.
    pub fn up_with_info(message: impl Into<String>) -> Self {
        Self {
            status: "up".to_string(),
            message: Some(message.into()),
        }
    }
}

/// 간단한 헬스 체크 (liveness probe용).
///
/// 서버가 응답 가능한 상태인지만 확인합니다.
/// GET /health
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// 상세 헬스 체크 (readiness probe용).
///
/// 모든 의존성(Redis, 업스트림 등)의 상태를 확인합니다.
/// GET /health/ready
pub async fn health_ready(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let mut overall_status = "healthy";
    let status_code = StatusCode::OK;

    // Redis 상태 확인
    let redis_status = if state.cache.is_some() {
        if state.is_redis_healthy().await {
            ComponentStatus::up()
        } else {
            // Redis 실패는 degraded로 처리 (캐시는 miss로 우회 가능)
            overall_status = "degraded";
            ComponentStatus::down("연결 실패")
        }
    } else {
        ComponentStatus::not_configured()
    };

    // 업스트림 선박 데이터 소스 확인
    let vessel_source_status = if state.has_vessels() {
        ComponentStatus::up()
    } else {
        if overall_status == "healthy" {
            overall_status = "degraded";
        }
        ComponentStatus::not_configured()
    };

    // WebSocket 레지스트리 확인
    let websocket_status = match &state.rooms {
        Some(rooms) => {
            let stats = rooms.stats().await;
            ComponentStatus::up_with_info(format!(
                "{} rooms, {} connections",
                stats.rooms, stats.connections
            ))
        }
        None => ComponentStatus::not_configured(),
    };

    // 항구 디렉터리 확인
    let ports_status = if state.ports.is_empty() {
        ComponentStatus::not_configured()
    } else {
        ComponentStatus::up_with_info(format!("{} ports loaded", state.ports.len()))
    };

    let response = HealthResponse {
        status: overall_status.to_string(),
        version: state.version.clone(),
        uptime_secs: state.uptime_secs(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        components: ComponentHealth {
            redis: redis_status,
            vessel_source: vessel_source_status,
            websocket: websocket_status,
            ports: ports_status,
        },
    };

    (status_code, Json(response))
}

/// 헬스 체크 라우터 생성.
pub fn health_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(health_check))
        .route("/ready", get(health_ready))
}
