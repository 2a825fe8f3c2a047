//! OilPriceAPI 클라이언트.
//!
//! oilpriceapi.com을 통해 원유/석탄 벤치마크 가격을 수집합니다.
//! 하루치 시세(`past_day`)로 변화율을 계산하고, 실패 시 `latest`
//! 단건 조회로 폴백합니다.

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::debug;

use bedrock_core::PriceQuote;

use super::ProviderError;

const DEFAULT_BASE_URL: &str = "https://api.oilpriceapi.com/v1";

/// 가격 코드 (oilpriceapi.com 기준).
pub const CODE_BRENT: &str = "BRENT_CRUDE_USD";
pub const CODE_WTI: &str = "WTI_USD";
pub const CODE_DUBAI: &str = "DUBAI_CRUDE_USD";
pub const CODE_COAL: &str = "COAL_USD";

/// 단일 가격 코드 조회 소스.
///
/// 스냅샷 보드가 소비하는 트레이트 경계. 테스트에서 모의 구현으로
/// 대체합니다.
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// 코드 하나의 시세 조회.
    async fn fetch_quote(&self, code: &str) -> Result<PriceQuote, ProviderError>;
}

/// OilPriceAPI 클라이언트.
#[derive(Clone)]
pub struct OilPriceClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct PastDayResponse {
    data: PastDayData,
}

#[derive(Debug, Deserialize)]
struct PastDayData {
    prices: Vec<RawPrice>,
}

#[derive(Debug, Deserialize)]
struct LatestResponse {
    data: RawPrice,
}

#[derive(Debug, Deserialize)]
struct RawPrice {
    price: Decimal,
}

impl OilPriceClient {
    /// 새로운 클라이언트 생성.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .expect("HTTP 클라이언트 생성 실패"),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// 테스트용 base URL 교체.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// 환경변수 `OILPRICE_API_KEY`에서 클라이언트 생성.
    pub fn from_env() -> Option<Self> {
        std::env::var("OILPRICE_API_KEY").ok().map(Self::new)
    }

    async fn get<T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T, ProviderError> {
        let url = format!("{}/{}", self.base_url, path);
        debug!(path = path, "OilPriceAPI request");

        let response = self
            .client
            .get(&url)
            .query(params)
            .header("Authorization", format!("Token {}", self.api_key))
            .send()
            .await
            .map_err(ProviderError::from)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(match status.as_u16() {
                429 => ProviderError::RateLimited(body),
                401 | 403 => ProviderError::Auth(body),
                _ => ProviderError::Network(format!("[{}] {}", status, body)),
            });
        }

        let body = response.text().await.map_err(ProviderError::from)?;
        serde_json::from_str(&body).map_err(|e| ProviderError::MalformedResponse(e.to_string()))
    }

    /// 하루치 시세에서 현재가와 변화율 계산.
    async fn fetch_past_day(&self, code: &str) -> Result<PriceQuote, ProviderError> {
        let response: PastDayResponse = self
            .get("prices/past_day", &[("by_code", code), ("period", "2")])
            .await?;

        let prices = response.data.prices;
        let latest = prices
            .first()
            .ok_or_else(|| ProviderError::MalformedResponse("empty price series".to_string()))?;

        // 시계열은 최신순: 마지막 항목이 기준가
        let (change, change_percent) = match prices.last() {
            Some(baseline) if prices.len() > 1 && !baseline.price.is_zero() => {
                let change = latest.price - baseline.price;
                let percent = change / baseline.price * Decimal::from(100);
                (Some(change), Some(percent.round_dp(2)))
            }
            _ => (None, None),
        };

        Ok(PriceQuote::live(latest.price, change, change_percent))
    }

    /// 최신 단건 시세 조회 (변화율 없음).
    async fn fetch_latest(&self, code: &str) -> Result<PriceQuote, ProviderError> {
        let response: LatestResponse = self
            .get("prices/latest", &[("by_code", code)])
            .await?;

        Ok(PriceQuote::live(response.data.price, None, None))
    }
}

#[async_trait]
impl PriceSource for OilPriceClient {
    /// 코드 하나의 시세 조회.
    ///
    /// `past_day`를 우선 시도하고, 본문 해석 실패 시에만 `latest`로
    /// 폴백합니다. 한도 초과/인증 실패는 그대로 전파합니다.
    async fn fetch_quote(&self, code: &str) -> Result<PriceQuote, ProviderError> {
        match self.fetch_past_day(code).await {
            Ok(quote) => Ok(quote),
            Err(ProviderError::MalformedResponse(_)) => self.fetch_latest(code).await,
            Err(e) => Err(e),
        }
    }
}
