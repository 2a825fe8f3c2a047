//! 원자재 가격 타입.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 단일 가격 시세.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceQuote {
    /// 가격
    pub price: Decimal,
    /// 전일 대비 변화량
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change: Option<Decimal>,
    /// 전일 대비 변화율 (%)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change_percent: Option<Decimal>,
    /// 가격 기준 시각
    pub last_updated: DateTime<Utc>,
    /// 폴백(참고용 고정값) 여부
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_fallback: bool,
}

impl PriceQuote {
    /// 실시간 시세 생성.
    pub fn live(price: Decimal, change: Option<Decimal>, change_percent: Option<Decimal>) -> Self {
        Self {
            price,
            change,
            change_percent,
            last_updated: Utc::now(),
            is_fallback: false,
        }
    }

    /// 폴백 시세 생성 (업스트림 한도 초과 시 사용).
    pub fn fallback(price: Decimal) -> Self {
        Self {
            price,
            change: None,
            change_percent: None,
            last_updated: Utc::now(),
            is_fallback: true,
        }
    }
}

/// 유가 보드 (3대 벤치마크).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OilPrices {
    /// 브렌트유 (USD/배럴)
    pub brent: PriceQuote,
    /// WTI (USD/배럴)
    pub wti: PriceQuote,
    /// 두바이유 (USD/배럴)
    pub dubai: PriceQuote,
}

/// 석탄 가격 (USD/톤).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoalPrice {
    /// 연료탄 (Newcastle 기준)
    pub thermal: PriceQuote,
}

/// 광물 참고 가격.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MineralPrice {
    /// 광물명 (예: "Copper")
    pub name: String,
    /// 단위 (예: "USD/ton")
    pub unit: String,
    /// 참고 가격
    pub price: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_fallback_quote_flag_serialized() {
        let quote = PriceQuote::fallback(dec!(84.50));
        let json = serde_json::to_string(&quote).unwrap();
        assert!(json.contains(r#""isFallback":true"#));
    }

    #[test]
    fn test_live_quote_omits_fallback_flag() {
        let quote = PriceQuote::live(dec!(84.50), Some(dec!(0.35)), Some(dec!(0.42)));
        let json = serde_json::to_string(&quote).unwrap();
        assert!(!json.contains("isFallback"));
        assert!(json.contains(r#""changePercent":"0.42""#));
    }
}
