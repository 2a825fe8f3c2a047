//! 모든 핸들러에서 공유되는 애플리케이션 상태.
//!
//! AppState는 모든 API 핸들러에서 공유되는 상태를 관리합니다.
//! Arc로 래핑되어 여러 요청 간에 안전하게 공유됩니다.

use std::sync::Arc;

use bedrock_data::{NewsService, PortDirectory, PriceBoard, RedisCache, VesselSource};

use crate::websocket::RoomRegistry;

/// 애플리케이션 공유 상태.
///
/// 이 구조체는 모든 API 핸들러에서 접근할 수 있는 공유 리소스를 포함합니다.
/// Axum의 State extractor를 통해 핸들러에 주입됩니다.
#[derive(Clone)]
pub struct AppState {
    /// 선박 데이터 소스 (캐시 계층 포함)
    ///
    /// 업스트림 API 키가 없으면 `None`이며 선박 관련 엔드포인트는
    /// 503을 반환합니다.
    pub vessels: Option<Arc<dyn VesselSource>>,

    /// Redis 캐시 (헬스 체크용 핑에 사용)
    pub cache: Option<Arc<RedisCache>>,

    /// 항구 디렉터리
    pub ports: Arc<PortDirectory>,

    /// 원자재 가격 보드
    pub prices: Arc<PriceBoard>,

    /// 뉴스 피드 서비스
    pub news: NewsService,

    /// 구역 구독 레지스트리 (WebSocket)
    pub rooms: Option<Arc<RoomRegistry>>,

    /// 서버 시작 시간 (업타임 계산용)
    pub started_at: chrono::DateTime<chrono::Utc>,

    /// API 버전
    pub version: String,
}

impl AppState {
    /// 새로운 AppState 생성.
    ///
    /// 선택적 구성 요소는 비워두고 `with_*` 빌더로 채웁니다.
    pub fn new() -> Self {
        Self {
            vessels: None,
            cache: None,
            ports: Arc::new(PortDirectory::empty()),
            prices: Arc::new(PriceBoard::new(None)),
            news: NewsService::new(),
            rooms: None,
            started_at: chrono::Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// 선박 데이터 소스 설정.
    pub fn with_vessels(mut self, vessels: Arc<dyn VesselSource>) -> Self {
        self.vessels = Some(vessels);
        self
    }

    /// Redis 캐시 설정.
    pub fn with_cache(mut self, cache: Arc<RedisCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// 항구 디렉터리 설정.
    pub fn with_ports(mut self, ports: PortDirectory) -> Self {
        self.ports = Arc::new(ports);
        self
    }

    /// 가격 보드 설정.
    pub fn with_prices(mut self, prices: PriceBoard) -> Self {
        self.prices = Arc::new(prices);
        self
    }

    /// 구역 레지스트리 설정.
    pub fn with_rooms(mut self, rooms: Arc<RoomRegistry>) -> Self {
        self.rooms = Some(rooms);
        self
    }

    /// 선박 데이터 소스 설정 여부.
    pub fn has_vessels(&self) -> bool {
        self.vessels.is_some()
    }

    /// Redis 캐시 설정 여부.
    pub fn has_cache(&self) -> bool {
        self.cache.is_some()
    }

    /// Redis 연결 상태 확인.
    pub async fn is_redis_healthy(&self) -> bool {
        match &self.cache {
            Some(cache) => cache.ping().await.unwrap_or(false),
            None => false,
        }
    }

    /// 서버 업타임(초).
    pub fn uptime_secs(&self) -> i64 {
        (chrono::Utc::now() - self.started_at).num_seconds()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// 테스트용 AppState 생성.
///
/// 외부 연결 없이 기본 구성 요소만으로 상태를 만듭니다.
#[cfg(any(test, feature = "test-utils"))]
pub fn create_test_state() -> AppState {
    AppState::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state_has_no_optional_components() {
        let state = create_test_state();

        assert!(!state.has_vessels());
        assert!(!state.has_cache());
        assert!(state.rooms.is_none());
        assert!(state.ports.is_empty());
        assert!(!state.version.is_empty());
    }

    #[test]
    fn test_uptime_is_non_negative() {
        let state = create_test_state();
        assert!(state.uptime_secs() >= 0);
    }
}
