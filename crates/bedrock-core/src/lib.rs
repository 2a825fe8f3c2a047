//! 해상 데이터 플랫폼의 핵심 도메인 모델.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - 선박/항구/가격/뉴스 도메인 타입
//! - 뷰포트 경계(BoundingBox) 및 정규화
//! - 에러 타입 및 설정
//! - 로깅 인프라
//!
//! # 모듈 구성
//!
//! - [`types`]: 도메인 타입 (선박, 항구, 가격, 뉴스, 지리 경계)
//! - [`error`]: 공통 에러 타입
//! - [`config`]: 환경변수 기반 설정
//! - [`logging`]: tracing 기반 구조화 로깅

pub mod config;
pub mod error;
pub mod logging;
pub mod types;

pub use config::{AppConfig, ServerConfig};
pub use error::{BedrockError, BedrockResult};
pub use logging::{init_logging, init_logging_from_env, LogConfig, LogFormat};
pub use types::geo::BoundingBox;
pub use types::news::NewsItem;
pub use types::port::{Port, PortSelector};
pub use types::price::{CoalPrice, MineralPrice, OilPrices, PriceQuote};
pub use types::vessel::{TrackPoint, Vessel, VesselDetails, VesselIdentifier};
