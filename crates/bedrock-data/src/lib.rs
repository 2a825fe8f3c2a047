//! 데이터 접근 계층.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - cache-aside 저장소 (Redis / 인메모리)
//! - 업스트림 선박 데이터 어댑터 (MarineTraffic)
//! - 원자재 가격 스냅샷 서비스
//! - 항구 디렉터리 및 뉴스 피드
//!
//! # 모듈 구성
//!
//! - [`cache`]: `CacheStore` 트레이트와 Redis/메모리 구현
//! - [`provider`]: 업스트림 어댑터 (`VesselSource`, 에러 분류)
//! - [`service`]: cache-aside 선박 데이터 서비스
//! - [`prices`]: 유가/석탄 스냅샷 보드
//! - [`ports`]: 인메모리 항구 디렉터리
//! - [`news`]: RSS 뉴스 피드

pub mod cache;
pub mod error;
pub mod news;
pub mod ports;
pub mod prices;
pub mod provider;
pub mod service;

pub use cache::{CacheStore, MemoryCache, RedisCache, RedisConfig};
pub use error::{DataError, Result};
pub use news::{NewsService, FEED_CATALOG};
pub use ports::PortDirectory;
pub use prices::PriceBoard;
pub use provider::marine_traffic::MarineTrafficClient;
pub use provider::oil_price::{OilPriceClient, PriceSource};
pub use provider::{ProviderError, VesselSource};
pub use service::{VesselDataService, TTL_DETAILS_SECS, TTL_POSITIONS_SECS};
