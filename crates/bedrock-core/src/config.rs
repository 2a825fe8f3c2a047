//! 환경변수 기반 애플리케이션 설정.
//!
//! 모든 설정은 환경변수에서 로드되며, 미설정 항목은 기본값을 사용합니다.
//! `.env` 파일 로드는 바이너리 진입점에서 dotenvy로 처리합니다.

use serde::Deserialize;

/// 기본 구역 갱신 주기 (초).
pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 30;

/// HTTP 서버 설정.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 바인딩할 호스트 주소
    pub host: String,
    /// 바인딩할 포트
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

impl ServerConfig {
    /// 환경 변수에서 설정 로드 (`API_HOST`, `API_PORT`).
    pub fn from_env() -> Self {
        let host = std::env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = std::env::var("API_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(3000);

        Self { host, port }
    }

    /// 소켓 주소 반환.
    ///
    /// # Errors
    /// `host:port` 형식이 유효하지 않으면 `AddrParseError`를 반환합니다.
    pub fn socket_addr(&self) -> Result<std::net::SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }
}

/// 애플리케이션 전체 설정.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// HTTP 서버 설정
    pub server: ServerConfig,
    /// Redis URL (미설정 시 캐시 비활성화)
    pub redis_url: Option<String>,
    /// MarineTraffic API 키 (미설정 시 선박 데이터 비활성화)
    pub marinetraffic_api_key: Option<String>,
    /// OilPriceAPI 키 (미설정 시 정적 폴백 가격 사용)
    pub oilprice_api_key: Option<String>,
    /// 항구 데이터 JSON 파일 경로
    pub ports_data_path: Option<String>,
    /// 구역 갱신 주기 (초)
    pub refresh_interval_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            redis_url: None,
            marinetraffic_api_key: None,
            oilprice_api_key: None,
            ports_data_path: None,
            refresh_interval_secs: DEFAULT_REFRESH_INTERVAL_SECS,
        }
    }
}

impl AppConfig {
    /// 환경 변수에서 전체 설정 로드.
    ///
    /// # 환경변수
    ///
    /// - `API_HOST`, `API_PORT`: 서버 바인딩 주소
    /// - `REDIS_URL`: Redis 연결 URL
    /// - `MARINETRAFFIC_API_KEY`: 선박 데이터 API 키
    /// - `OILPRICE_API_KEY`: 유가 API 키
    /// - `PORTS_DATA_PATH`: 항구 데이터 JSON 경로
    /// - `REFRESH_INTERVAL_SECS`: 구역 갱신 주기 (기본 30초)
    pub fn from_env() -> Self {
        let refresh_interval_secs = std::env::var("REFRESH_INTERVAL_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_REFRESH_INTERVAL_SECS);

        Self {
            server: ServerConfig::from_env(),
            redis_url: std::env::var("REDIS_URL").ok(),
            marinetraffic_api_key: std::env::var("MARINETRAFFIC_API_KEY").ok(),
            oilprice_api_key: std::env::var("OILPRICE_API_KEY").ok(),
            ports_data_path: std::env::var("PORTS_DATA_PATH").ok(),
            refresh_interval_secs,
        }
    }
}
