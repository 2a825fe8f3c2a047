//! 업스트림 데이터 제공자.
//!
//! 선박 데이터 API에 대한 어댑터와 에러 분류를 정의합니다.
//! 비-2xx 응답은 절대 빈 데이터로 변환하지 않고 분류된 에러로 반환합니다.

pub mod marine_traffic;
pub mod oil_price;

use async_trait::async_trait;
use bedrock_core::{
    BoundingBox, Port, PortSelector, TrackPoint, Vessel, VesselDetails, VesselIdentifier,
};
use thiserror::Error;

/// 업스트림 호출 실패 분류.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// 전송 실패 / 타임아웃 / 5xx
    #[error("Network error: {0}")]
    Network(String),

    /// 요청 한도 초과 (429)
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// 인증 실패 (401/403)
    #[error("Auth error: {0}")]
    Auth(String),

    /// 2xx 응답이지만 본문 해석 실패
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

impl ProviderError {
    /// 브로드캐스트 에러 필드에 사용되는 짧은 분류 코드.
    pub fn code(&self) -> &'static str {
        match self {
            ProviderError::Network(_) => "NetworkError",
            ProviderError::RateLimited(_) => "RateLimited",
            ProviderError::Auth(_) => "AuthError",
            ProviderError::MalformedResponse(_) => "MalformedResponse",
        }
    }

    /// 재시도 가능 여부.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ProviderError::Network(_) | ProviderError::RateLimited(_)
        )
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ProviderError::MalformedResponse(err.to_string())
        } else {
            ProviderError::Network(err.to_string())
        }
    }
}

/// 선박 데이터 소스.
///
/// 구역 갱신 스케줄러와 WebSocket/REST 핸들러가 소비하는 트레이트 경계.
/// 원시 HTTP 어댑터와 cache-aside 서비스가 모두 이를 구현합니다.
#[async_trait]
pub trait VesselSource: Send + Sync {
    /// 경계 내 선박 위치 조회.
    async fn vessels_in_area(
        &self,
        bounds: &BoundingBox,
        vessel_type: Option<&str>,
    ) -> Result<Vec<Vessel>, ProviderError>;

    /// 선박 상세 정보 조회.
    async fn vessel_details(
        &self,
        id: &VesselIdentifier,
    ) -> Result<Option<VesselDetails>, ProviderError>;

    /// 선박 검색.
    ///
    /// 검색 결과는 위치가 없는 마스터 데이터 형식입니다.
    async fn search_vessels(
        &self,
        query: &str,
        search_type: Option<&str>,
    ) -> Result<Vec<VesselDetails>, ProviderError>;

    /// 선박 항적 조회.
    async fn vessel_track(
        &self,
        id: &VesselIdentifier,
        time_span_hours: u32,
    ) -> Result<Vec<TrackPoint>, ProviderError>;

    /// 항구 정보 조회 (업스트림 기준). ID 또는 항구명으로 조회합니다.
    async fn port_info(&self, port: &PortSelector) -> Result<Option<Port>, ProviderError>;
}
