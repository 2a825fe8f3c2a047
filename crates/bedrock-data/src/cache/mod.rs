//! cache-aside 저장소.
//!
//! 조회 경로는 항상 "캐시 → 미스 시 업스트림 → write-through" 순서이며,
//! 저장소 장애는 호출자에게 전파되지 않고 미스로 강등됩니다.
//! 만료는 읽기 시점에 판정됩니다 (능동 퇴출 없음).

pub mod redis;

use std::collections::HashMap;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::RwLock;
use tokio::time::{Duration, Instant};
use tracing::warn;

pub use redis::{RedisCache, RedisConfig};

/// cache-aside 저장소 트레이트.
///
/// 구현체는 모든 내부 오류를 흡수해야 합니다: `get`은 오류 시 `None`,
/// `set`은 오류 시 무시(로그만)합니다. 동일 키에 대한 동시 쓰기는
/// last-write-wins입니다.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// 키 조회. 미스/만료/저장소 오류 모두 `None`.
    async fn get(&self, key: &str) -> Option<String>;

    /// TTL과 함께 값 저장. 실패는 로그 후 무시.
    async fn set(&self, key: &str, value: String, ttl_secs: u64);

    /// 키 삭제.
    async fn delete(&self, key: &str);

    /// 저장소 연결 상태 확인.
    async fn health_check(&self) -> bool;
}

/// 캐시에서 JSON 값을 조회합니다.
///
/// 역직렬화 실패도 미스로 처리됩니다 (스키마 변경 내성).
pub async fn get_json<T: DeserializeOwned>(store: &dyn CacheStore, key: &str) -> Option<T> {
    let raw = store.get(key).await?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(key = %key, error = %e, "Cached value failed to decode, treating as miss");
            None
        }
    }
}

/// JSON 값을 캐시에 저장합니다.
pub async fn set_json<T: Serialize>(store: &dyn CacheStore, key: &str, value: &T, ttl_secs: u64) {
    match serde_json::to_string(value) {
        Ok(json) => store.set(key, json, ttl_secs).await,
        Err(e) => {
            warn!(key = %key, error = %e, "Failed to serialize value for cache");
        }
    }
}

/// 인메모리 cache-aside 저장소.
///
/// Redis 미설정 배포와 테스트에서 사용됩니다. 만료 판정에
/// `tokio::time::Instant`를 사용하므로 paused clock 테스트가 가능합니다.
#[derive(Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, MemoryEntry>>,
}

struct MemoryEntry {
    value: String,
    expires_at: Instant,
}

impl MemoryCache {
    /// 빈 저장소 생성.
    pub fn new() -> Self {
        Self::default()
    }

    /// 저장된 (만료 포함) 항목 수.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// 저장소가 비어 있는지 확인.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl CacheStore for MemoryCache {
    async fn get(&self, key: &str) -> Option<String> {
        let now = Instant::now();
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                Some(entry) if entry.expires_at > now => return Some(entry.value.clone()),
                Some(_) => {}
                None => return None,
            }
        }
        // 만료된 항목은 읽기 시점에 제거
        let mut entries = self.entries.write().await;
        if let Some(entry) = entries.get(key) {
            if entry.expires_at <= now {
                entries.remove(key);
            }
        }
        None
    }

    async fn set(&self, key: &str, value: String, ttl_secs: u64) {
        let entry = MemoryEntry {
            value,
            expires_at: Instant::now() + Duration::from_secs(ttl_secs),
        };
        self.entries.write().await.insert(key.to_string(), entry);
    }

    async fn delete(&self, key: &str) {
        self.entries.write().await.remove(key);
    }

    async fn health_check(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_cache_roundtrip() {
        let cache = MemoryCache::new();
        cache.set("k", "v".to_string(), 60).await;
        assert_eq!(cache.get("k").await, Some("v".to_string()));

        cache.delete("k").await;
        assert_eq!(cache.get("k").await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_memory_cache_passive_expiry() {
        let cache = MemoryCache::new();
        cache.set("k", "v".to_string(), 30).await;

        tokio::time::advance(Duration::from_secs(29)).await;
        assert_eq!(cache.get("k").await, Some("v".to_string()));

        tokio::time::advance(Duration::from_secs(2)).await;
        assert_eq!(cache.get("k").await, None);
        // 만료 항목은 읽기에서 제거됨
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_memory_cache_last_write_wins() {
        let cache = MemoryCache::new();
        cache.set("k", "first".to_string(), 60).await;
        cache.set("k", "second".to_string(), 60).await;
        assert_eq!(cache.get("k").await, Some("second".to_string()));
    }

    #[tokio::test]
    async fn test_get_json_decode_failure_is_miss() {
        let cache = MemoryCache::new();
        cache.set("k", "not json".to_string(), 60).await;

        let decoded: Option<Vec<String>> = get_json(&cache, "k").await;
        assert!(decoded.is_none());
    }

    #[tokio::test]
    async fn test_set_json_get_json() {
        let cache = MemoryCache::new();
        set_json(&cache, "k", &vec!["a".to_string(), "b".to_string()], 60).await;

        let decoded: Option<Vec<String>> = get_json(&cache, "k").await;
        assert_eq!(decoded, Some(vec!["a".to_string(), "b".to_string()]));
    }
}
