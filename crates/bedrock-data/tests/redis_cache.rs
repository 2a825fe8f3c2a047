//! Redis 캐시 통합 테스트.
//!
//! 실제 Redis 인스턴스가 필요하므로 기본적으로 ignore 처리됩니다.
//! 실행: `REDIS_URL=redis://localhost:6379/0 cargo test -- --ignored`

use bedrock_data::cache::{get_json, set_json, CacheStore};
use bedrock_data::{RedisCache, RedisConfig};

async fn connect() -> RedisCache {
    let url = std::env::var("REDIS_URL").expect("REDIS_URL must be set for integration tests");
    let config = RedisConfig {
        url,
        ..Default::default()
    };
    RedisCache::connect(&config).await.expect("Redis connect")
}

#[tokio::test]
#[ignore]
async fn test_redis_roundtrip() {
    let cache = connect().await;

    cache
        .set("bedrock:test:roundtrip", "value".to_string(), 60)
        .await;
    assert_eq!(
        cache.get("bedrock:test:roundtrip").await,
        Some("value".to_string())
    );

    cache.delete("bedrock:test:roundtrip").await;
    assert_eq!(cache.get("bedrock:test:roundtrip").await, None);
}

#[tokio::test]
#[ignore]
async fn test_redis_json_helpers() {
    let cache = connect().await;

    set_json(&cache, "bedrock:test:json", &vec![1u32, 2, 3], 60).await;
    let decoded: Option<Vec<u32>> = get_json(&cache, "bedrock:test:json").await;
    assert_eq!(decoded, Some(vec![1, 2, 3]));

    cache.delete("bedrock:test:json").await;
}

#[tokio::test]
#[ignore]
async fn test_redis_health_check() {
    let cache = connect().await;
    assert!(cache.health_check().await);
}
