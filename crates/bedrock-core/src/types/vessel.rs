//! 선박 도메인 타입.
//!
//! 실시간 위치, 상세 정보, 항적 데이터 타입을 정의합니다.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::BedrockError;

/// 선박 실시간 위치 정보.
///
/// 구역 구독 브로드캐스트와 뷰포트 조회 응답에 사용됩니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vessel {
    /// MMSI (해상이동업무식별부호)
    pub mmsi: String,
    /// IMO 번호 (없을 수 있음)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub imo: Option<String>,
    /// 선박명
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ship_name: Option<String>,
    /// 선종 코드 (예: "8" = 탱커)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ship_type: Option<String>,
    /// 위도
    pub lat: f64,
    /// 경도
    pub lon: f64,
    /// 대지 속력 (노트)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
    /// 대지 침로 (도)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course: Option<f64>,
    /// 선수 방위 (도)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heading: Option<f64>,
    /// 항해 상태 코드
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// 목적지
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    /// 위치 수신 시각
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

/// 선박 상세 정보 (마스터 데이터).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VesselDetails {
    /// MMSI
    pub mmsi: String,
    /// IMO 번호
    #[serde(skip_serializing_if = "Option::is_none")]
    pub imo: Option<String>,
    /// 선박명
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ship_name: Option<String>,
    /// 선종
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ship_type: Option<String>,
    /// 선적국
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flag: Option<String>,
    /// 전장 (미터)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<f64>,
    /// 선폭 (미터)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breadth: Option<f64>,
    /// 재화중량톤수
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadweight: Option<f64>,
    /// 건조 연도
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year_built: Option<i32>,
}

/// 항적 포인트.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackPoint {
    /// 위도
    pub lat: f64,
    /// 경도
    pub lon: f64,
    /// 속력 (노트)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
    /// 침로 (도)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course: Option<f64>,
    /// 기록 시각
    pub timestamp: DateTime<Utc>,
}

/// 선박 식별자.
///
/// 상세 조회 시 IMO 번호, MMSI, 선박명 중 하나로 식별합니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VesselIdentifier {
    /// IMO 번호 (7자리)
    Imo(String),
    /// MMSI (9자리)
    Mmsi(String),
    /// 선박명 (부분 일치)
    Name(String),
}

impl VesselIdentifier {
    /// 식별자 타입 문자열과 값에서 생성.
    ///
    /// # Arguments
    /// * `kind` - "imo" | "mmsi" | "name"
    /// * `value` - 식별자 값
    pub fn from_kind(kind: &str, value: impl Into<String>) -> Result<Self, BedrockError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(BedrockError::InvalidInput(
                "vessel identifier is empty".to_string(),
            ));
        }
        match kind.to_lowercase().as_str() {
            "imo" => Ok(Self::Imo(value)),
            "mmsi" => Ok(Self::Mmsi(value)),
            "name" => Ok(Self::Name(value)),
            other => Err(BedrockError::InvalidInput(format!(
                "unknown identifier type: {}",
                other
            ))),
        }
    }

    /// 식별자 값 반환.
    pub fn value(&self) -> &str {
        match self {
            Self::Imo(v) | Self::Mmsi(v) | Self::Name(v) => v,
        }
    }

    /// 식별자 타입 문자열 반환.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Imo(_) => "imo",
            Self::Mmsi(_) => "mmsi",
            Self::Name(_) => "name",
        }
    }
}

impl std::fmt::Display for VesselIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.kind(), self.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_from_kind() {
        let id = VesselIdentifier::from_kind("imo", "9395044").unwrap();
        assert_eq!(id, VesselIdentifier::Imo("9395044".to_string()));
        assert_eq!(id.kind(), "imo");
        assert_eq!(id.value(), "9395044");

        let id = VesselIdentifier::from_kind("MMSI", "538005120").unwrap();
        assert_eq!(id.kind(), "mmsi");
    }

    #[test]
    fn test_identifier_rejects_unknown_kind() {
        assert!(VesselIdentifier::from_kind("callsign", "ABCD").is_err());
    }

    #[test]
    fn test_identifier_rejects_empty_value() {
        assert!(VesselIdentifier::from_kind("imo", "  ").is_err());
    }

    #[test]
    fn test_vessel_serializes_camel_case() {
        let vessel = Vessel {
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
        };

        let json = serde_json::to_string(&vessel).unwrap();
        assert!(json.contains(r#""shipName":"PACIFIC TRADER""#));
        assert!(json.contains(r#""shipType":"8""#));
        // None 필드는 생략
        assert!(!json.contains("imo"));
    }
}
