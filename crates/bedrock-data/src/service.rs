//! cache-aside 선박 데이터 서비스.
//!
//! 업스트림 어댑터 앞에 cache-aside 계층을 씌웁니다. 조회 순서는
//! 캐시 → 미스 시 업스트림 → 성공 시 write-through이며, 캐시 장애는
//! 호출자에게 전파되지 않습니다. 업스트림 실패 시 캐시에는 아무것도
//! 기록하지 않습니다.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use bedrock_core::{
    BoundingBox, Port, PortSelector, TrackPoint, Vessel, VesselDetails, VesselIdentifier,
};

use crate::cache::{get_json, set_json, CacheStore};
use crate::provider::{ProviderError, VesselSource};

// ===== 데이터셋별 TTL (초) =====

/// 실시간 위치
pub const TTL_POSITIONS_SECS: u64 = 300;
/// 선박 상세
pub const TTL_DETAILS_SECS: u64 = 3600;
/// 검색 결과
pub const TTL_SEARCH_SECS: u64 = 1800;
/// 항적
pub const TTL_TRACK_SECS: u64 = 3600;
/// 항구 정보
pub const TTL_PORT_INFO_SECS: u64 = 1800;

/// cache-aside 선박 데이터 서비스.
///
/// `VesselSource`를 구현하므로 구역 갱신 스케줄러와 핸들러는 원시
/// 어댑터 대신 이 서비스를 주입받아 캐시 경로로 조회합니다.
pub struct VesselDataService {
    source: Arc<dyn VesselSource>,
    cache: Arc<dyn CacheStore>,
}

impl VesselDataService {
    /// 새 서비스 생성.
    pub fn new(source: Arc<dyn VesselSource>, cache: Arc<dyn CacheStore>) -> Self {
        Self { source, cache }
    }

    fn area_key(bounds: &BoundingBox, vessel_type: Option<&str>) -> String {
        format!(
            "vessels:area:{}:{}",
            vessel_type.unwrap_or("all"),
            bounds.canonical_form()
        )
    }

    fn details_key(id: &VesselIdentifier) -> String {
        format!("vessel:details:{}", id)
    }

    fn search_key(query: &str, search_type: Option<&str>) -> String {
        format!(
            "vessel:search:{}:{}",
            search_type.unwrap_or("name"),
            query.to_lowercase()
        )
    }

    fn track_key(id: &VesselIdentifier, hours: u32) -> String {
        format!("vessel:track:{}:{}", id, hours)
    }

    fn port_key(port: &PortSelector) -> String {
        match port {
            PortSelector::Id(v) => format!("port:info:id:{}", v.to_uppercase()),
            PortSelector::Name(v) => format!("port:info:name:{}", v.to_lowercase()),
        }
    }
}

#[async_trait]
impl VesselSource for VesselDataService {
    async fn vessels_in_area(
        &self,
        bounds: &BoundingBox,
        vessel_type: Option<&str>,
    ) -> Result<Vec<Vessel>, ProviderError> {
        let key = Self::area_key(bounds, vessel_type);
        if let Some(cached) = get_json::<Vec<Vessel>>(self.cache.as_ref(), &key).await {
            debug!(key = %key, count = cached.len(), "Cache hit: area positions");
            return Ok(cached);
        }

        let vessels = self.source.vessels_in_area(bounds, vessel_type).await?;
        set_json(self.cache.as_ref(), &key, &vessels, TTL_POSITIONS_SECS).await;
        Ok(vessels)
    }

    async fn vessel_details(
        &self,
        id: &VesselIdentifier,
    ) -> Result<Option<VesselDetails>, ProviderError> {
        let key = Self::details_key(id);
        if let Some(cached) = get_json::<Option<VesselDetails>>(self.cache.as_ref(), &key).await {
            debug!(key = %key, "Cache hit: vessel details");
            return Ok(cached);
        }

        let details = self.source.vessel_details(id).await?;
        set_json(self.cache.as_ref(), &key, &details, TTL_DETAILS_SECS).await;
        Ok(details)
    }

    async fn search_vessels(
        &self,
        query: &str,
        search_type: Option<&str>,
    ) -> Result<Vec<VesselDetails>, ProviderError> {
        let key = Self::search_key(query, search_type);
        if let Some(cached) = get_json::<Vec<VesselDetails>>(self.cache.as_ref(), &key).await {
            debug!(key = %key, count = cached.len(), "Cache hit: vessel search");
            return Ok(cached);
        }

        let results = self.source.search_vessels(query, search_type).await?;
        set_json(self.cache.as_ref(), &key, &results, TTL_SEARCH_SECS).await;
        Ok(results)
    }

    async fn vessel_track(
        &self,
        id: &VesselIdentifier,
        time_span_hours: u32,
    ) -> Result<Vec<TrackPoint>, ProviderError> {
        let key = Self::track_key(id, time_span_hours);
        if let Some(cached) = get_json::<Vec<TrackPoint>>(self.cache.as_ref(), &key).await {
            debug!(key = %key, count = cached.len(), "Cache hit: vessel track");
            return Ok(cached);
        }

        let track = self.source.vessel_track(id, time_span_hours).await?;
        set_json(self.cache.as_ref(), &key, &track, TTL_TRACK_SECS).await;
        Ok(track)
    }

    async fn port_info(&self, port: &PortSelector) -> Result<Option<Port>, ProviderError> {
        let key = Self::port_key(port);
        if let Some(cached) = get_json::<Option<Port>>(self.cache.as_ref(), &key).await {
            debug!(key = %key, "Cache hit: port info");
            return Ok(cached);
        }

        let port = self.source.port_info(port).await?;
        set_json(self.cache.as_ref(), &key, &port, TTL_PORT_INFO_SECS).await;
        Ok(port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryCache;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// 호출 횟수를 세는 모의 업스트림.
    struct MockSource {
        calls: AtomicUsize,
        fail: bool,
    }

    impl MockSource {
        fn new(fail: bool) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                fail,
            })
        }

        fn vessel() -> Vessel {
            Vessel {
                mmsi: "538005120".to_string(),
                imo: None,
                ship_name: Some("PACIFIC TRADER".to_string()),
                ship_type: Some("8".to_string()),
                lat: 36.5,
                lon: 128.2,
                speed: Some(12.4),
                course: None,
                heading: None,
                status: None,
                destination: None,
                timestamp: None,
            }
        }
    }

    #[async_trait]
    impl VesselSource for MockSource {
        async fn vessels_in_area(
            &self,
            _bounds: &BoundingBox,
            _vessel_type: Option<&str>,
        ) -> Result<Vec<Vessel>, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(ProviderError::Network("unreachable".to_string()))
            } else {
                Ok(vec![Self::vessel()])
            }
        }

        async fn vessel_details(
            &self,
            _id: &VesselIdentifier,
        ) -> Result<Option<VesselDetails>, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(None)
        }

        async fn search_vessels(
            &self,
            _query: &str,
            _search_type: Option<&str>,
        ) -> Result<Vec<VesselDetails>, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![])
        }

        async fn vessel_track(
            &self,
            _id: &VesselIdentifier,
            _time_span_hours: u32,
        ) -> Result<Vec<TrackPoint>, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![])
        }

        async fn port_info(&self, _port: &PortSelector) -> Result<Option<Port>, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(None)
        }
    }

    fn bounds() -> BoundingBox {
        BoundingBox::new(35.0, 38.0, 126.0, 130.0)
    }

    #[tokio::test]
    async fn test_second_read_served_from_cache() {
        let source = MockSource::new(false);
        let service = VesselDataService::new(source.clone(), Arc::new(MemoryCache::new()));

        let first = service.vessels_in_area(&bounds(), None).await.unwrap();
        let second = service.vessels_in_area(&bounds(), None).await.unwrap();

        assert_eq!(first.len(), 1);
        assert_eq!(second.len(), 1);
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_entry_refetches() {
        let source = MockSource::new(false);
        let service = VesselDataService::new(source.clone(), Arc::new(MemoryCache::new()));

        service.vessels_in_area(&bounds(), None).await.unwrap();
        tokio::time::advance(std::time::Duration::from_secs(TTL_POSITIONS_SECS + 1)).await;
        service.vessels_in_area(&bounds(), None).await.unwrap();

        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_upstream_failure_not_cached() {
        let source = MockSource::new(true);
        let cache = Arc::new(MemoryCache::new());
        let service = VesselDataService::new(source.clone(), cache.clone());

        let result = service.vessels_in_area(&bounds(), None).await;
        assert!(result.is_err());
        assert!(cache.is_empty().await);

        // 실패는 캐시되지 않으므로 재시도 시 업스트림 재호출
        let _ = service.vessels_in_area(&bounds(), None).await;
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_vessel_type_partitions_cache() {
        let source = MockSource::new(false);
        let service = VesselDataService::new(source.clone(), Arc::new(MemoryCache::new()));

        service.vessels_in_area(&bounds(), None).await.unwrap();
        service
            .vessels_in_area(&bounds(), Some("8"))
            .await
            .unwrap();

        // 타입별로 별도 키
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_port_key_normalizes_by_selector() {
        assert_eq!(
            VesselDataService::port_key(&PortSelector::Id("krpus".to_string())),
            "port:info:id:KRPUS"
        );
        assert_eq!(
            VesselDataService::port_key(&PortSelector::Name("Busan".to_string())),
            "port:info:name:busan"
        );
    }

    #[test]
    fn test_area_key_float_insensitive() {
        let a = BoundingBox::new(0.5, 1.0, 2.0, 3.0);
        let b: BoundingBox =
            serde_json::from_str(r#"{"minLat":0.50,"maxLat":1.0,"minLon":2.0,"maxLon":3.0}"#)
                .unwrap();
        assert_eq!(
            VesselDataService::area_key(&a, None),
            VesselDataService::area_key(&b, None)
        );
    }
}
