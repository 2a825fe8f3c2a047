//! 원자재 가격 스냅샷 보드.
//!
//! 유가/석탄 시세를 1시간 창으로 메모리에 캐싱합니다. 한도 초과 등
//! 업스트림 실패 시 정적 참고 가격으로 폴백하며, 폴백 여부는 응답에
//! 표시됩니다.

use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::warn;

use bedrock_core::{CoalPrice, MineralPrice, OilPrices, PriceQuote};

use crate::provider::oil_price::{PriceSource, CODE_BRENT, CODE_COAL, CODE_DUBAI, CODE_WTI};

/// 스냅샷 갱신 주기.
const SNAPSHOT_WINDOW: Duration = Duration::from_secs(3600);

// ===== 정적 폴백 가격 (USD) =====

const FALLBACK_BRENT: Decimal = dec!(85.50);
const FALLBACK_WTI: Decimal = dec!(81.20);
const FALLBACK_DUBAI: Decimal = dec!(83.70);
const FALLBACK_COAL: Decimal = dec!(130.00);

struct Snapshot<T> {
    value: T,
    fetched_at: Instant,
}

impl<T: Clone> Snapshot<T> {
    fn fresh(&self) -> Option<T> {
        if self.fetched_at.elapsed() < SNAPSHOT_WINDOW {
            Some(self.value.clone())
        } else {
            None
        }
    }
}

/// 가격 스냅샷 보드.
///
/// 같은 창 안의 요청은 캐시된 스냅샷을 공유하고, 갱신은 Mutex로
/// 직렬화되어 업스트림 호출이 중복되지 않습니다.
pub struct PriceBoard {
    source: Option<Arc<dyn PriceSource>>,
    oil: Mutex<Option<Snapshot<OilPrices>>>,
    coal: Mutex<Option<Snapshot<CoalPrice>>>,
}

impl PriceBoard {
    /// 새 보드 생성.
    ///
    /// `source`가 `None`이면 항상 폴백 가격을 반환합니다.
    pub fn new(source: Option<Arc<dyn PriceSource>>) -> Self {
        Self {
            source,
            oil: Mutex::new(None),
            coal: Mutex::new(None),
        }
    }

    /// 유가 보드 조회 (캐시 창 내에서는 스냅샷 재사용).
    pub async fn oil_prices(&self) -> OilPrices {
        let mut guard = self.oil.lock().await;
        if let Some(snapshot) = guard.as_ref().and_then(Snapshot::fresh) {
            return snapshot;
        }

        let prices = OilPrices {
            brent: self.quote_or_fallback(CODE_BRENT, FALLBACK_BRENT).await,
            wti: self.quote_or_fallback(CODE_WTI, FALLBACK_WTI).await,
            dubai: self.quote_or_fallback(CODE_DUBAI, FALLBACK_DUBAI).await,
        };

        *guard = Some(Snapshot {
            value: prices.clone(),
            fetched_at: Instant::now(),
        });
        prices
    }

    /// 석탄 가격 조회.
    pub async fn coal_price(&self) -> CoalPrice {
        let mut guard = self.coal.lock().await;
        if let Some(snapshot) = guard.as_ref().and_then(Snapshot::fresh) {
            return snapshot;
        }

        let price = CoalPrice {
            thermal: self.quote_or_fallback(CODE_COAL, FALLBACK_COAL).await,
        };

        *guard = Some(Snapshot {
            value: price.clone(),
            fetched_at: Instant::now(),
        });
        price
    }

    /// 광물 참고 가격 보드 (정적).
    pub fn mineral_prices(&self) -> Vec<MineralPrice> {
        vec![
            MineralPrice {
                name: "Copper".to_string(),
                unit: "USD/ton".to_string(),
                price: dec!(9250.00),
            },
            MineralPrice {
                name: "Iron Ore".to_string(),
                unit: "USD/ton".to_string(),
                price: dec!(108.50),
            },
            MineralPrice {
                name: "Nickel".to_string(),
                unit: "USD/ton".to_string(),
                price: dec!(17800.00),
            },
            MineralPrice {
                name: "Aluminum".to_string(),
                unit: "USD/ton".to_string(),
                price: dec!(2280.00),
            },
        ]
    }

    async fn quote_or_fallback(&self, code: &str, fallback: Decimal) -> PriceQuote {
        let Some(source) = &self.source else {
            return PriceQuote::fallback(fallback);
        };

        match source.fetch_quote(code).await {
            Ok(quote) => quote,
            Err(e) => {
                warn!(code = %code, error = %e, "Price fetch failed, using fallback");
                PriceQuote::fallback(fallback)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ProviderError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingSource {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl PriceSource for CountingSource {
        async fn fetch_quote(&self, _code: &str) -> Result<PriceQuote, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(ProviderError::RateLimited("quota".to_string()))
            } else {
                Ok(PriceQuote::live(dec!(86.0), None, None))
            }
        }
    }

    #[tokio::test]
    async fn test_snapshot_reused_within_window() {
        let source = Arc::new(CountingSource {
            calls: AtomicUsize::new(0),
            fail: false,
        });
        let board = PriceBoard::new(Some(source.clone()));

        let first = board.oil_prices().await;
        let second = board.oil_prices().await;

        assert_eq!(first.brent.price, second.brent.price);
        // 3개 코드 x 1회 호출만 발생
        assert_eq!(source.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_rate_limited_uses_fallback() {
        let source = Arc::new(CountingSource {
            calls: AtomicUsize::new(0),
            fail: true,
        });
        let board = PriceBoard::new(Some(source));

        let prices = board.oil_prices().await;
        assert!(prices.brent.is_fallback);
        assert_eq!(prices.brent.price, FALLBACK_BRENT);
    }

    #[tokio::test]
    async fn test_no_source_always_fallback() {
        let board = PriceBoard::new(None);
        let coal = board.coal_price().await;
        assert!(coal.thermal.is_fallback);
        assert_eq!(coal.thermal.price, FALLBACK_COAL);
    }

    #[test]
    fn test_mineral_board_is_nonempty() {
        let board = PriceBoard::new(None);
        assert!(!board.mineral_prices().is_empty());
    }
}
