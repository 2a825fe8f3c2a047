//! 항구 도메인 타입.

use serde::{Deserialize, Serialize};

/// 항구 정보.
///
/// 항구 디렉터리 조회 응답에 사용됩니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Port {
    /// 항구 ID (UN/LOCODE 또는 내부 ID)
    pub id: String,
    /// 항구명
    pub name: String,
    /// 국가 코드 (ISO 3166-1 alpha-2)
    pub country: String,
    /// 위도
    pub lat: f64,
    /// 경도
    pub lon: f64,
    /// 항구 규모 ("L" | "M" | "S")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub harbor_size: Option<String>,
    /// 원유 터미널 보유 여부 정보
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oil_terminal_depth: Option<String>,
    /// 석유 제품 하역 설비 정보
    #[serde(skip_serializing_if = "Option::is_none")]
    pub liquid_bulk_facilities: Option<String>,
}

impl Port {
    /// 석유 관련 설비를 보유한 항구인지 확인.
    pub fn has_oil_facilities(&self) -> bool {
        let present = |v: &Option<String>| {
            v.as_deref()
                .map(|s| !s.trim().is_empty() && s.trim() != "N")
                .unwrap_or(false)
        };
        present(&self.oil_terminal_depth) || present(&self.liquid_bulk_facilities)
    }
}

/// 항구 조회 선택자.
///
/// 업스트림 항구 조회는 항구 ID(UN/LOCODE)와 항구명 어느 쪽으로도
/// 가능합니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortSelector {
    /// 항구 ID로 조회
    Id(String),
    /// 항구명으로 조회
    Name(String),
}

impl PortSelector {
    /// 선택자 값.
    pub fn value(&self) -> &str {
        match self {
            PortSelector::Id(v) | PortSelector::Name(v) => v,
        }
    }
}

impl std::fmt::Display for PortSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PortSelector::Id(v) => write!(f, "id:{}", v),
            PortSelector::Name(v) => write!(f, "name:{}", v),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn port(oil_depth: Option<&str>, liquid: Option<&str>) -> Port {
        Port {
            id: "KRPUS".to_string(),
            name: "Busan".to_string(),
            country: "KR".to_string(),
            lat: 35.1,
            lon: 129.0,
            harbor_size: Some("L".to_string()),
            oil_terminal_depth: oil_depth.map(String::from),
            liquid_bulk_facilities: liquid.map(String::from),
        }
    }

    #[test]
    fn test_oil_facilities_detection() {
        assert!(port(Some("12.5m"), None).has_oil_facilities());
        assert!(port(None, Some("Y")).has_oil_facilities());
        assert!(!port(None, None).has_oil_facilities());
        // 명시적 "N"과 공백은 미보유로 처리
        assert!(!port(Some("N"), Some("  ")).has_oil_facilities());
    }

    #[test]
    fn test_port_selector_display() {
        assert_eq!(PortSelector::Id("KRPUS".to_string()).to_string(), "id:KRPUS");
        assert_eq!(
            PortSelector::Name("Busan".to_string()).to_string(),
            "name:Busan"
        );
        assert_eq!(PortSelector::Name("Busan".to_string()).value(), "Busan");
    }
}
