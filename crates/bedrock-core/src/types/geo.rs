//! 지리 경계(viewport) 타입.
//!
//! 선박 구독 구역과 항구 뷰포트 조회에 사용되는 경계 사각형을 정의합니다.

use serde::{Deserialize, Serialize};

use crate::error::BedrockError;

/// 위경도 경계 사각형.
///
/// 구독 구역 식별에 사용되므로 정규화 형식이 안정적이어야 합니다.
/// 수치적으로 동일한 경계는 입력 표기(예: `0.5` vs `0.50`)와 무관하게
/// 같은 정규화 문자열을 생성합니다.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundingBox {
    /// 남쪽 위도
    pub min_lat: f64,
    /// 북쪽 위도
    pub max_lat: f64,
    /// 서쪽 경도
    pub min_lon: f64,
    /// 동쪽 경도
    pub max_lon: f64,
}

impl BoundingBox {
    /// 새 경계 생성.
    pub fn new(min_lat: f64, max_lat: f64, min_lon: f64, max_lon: f64) -> Self {
        Self {
            min_lat,
            max_lat,
            min_lon,
            max_lon,
        }
    }

    /// 경계 유효성 검사.
    ///
    /// 위도는 [-90, 90], 경도는 [-180, 180] 범위여야 하며
    /// min은 max보다 작아야 합니다.
    pub fn validate(&self) -> Result<(), BedrockError> {
        if !self.min_lat.is_finite()
            || !self.max_lat.is_finite()
            || !self.min_lon.is_finite()
            || !self.max_lon.is_finite()
        {
            return Err(BedrockError::InvalidInput(
                "bounds must be finite numbers".to_string(),
            ));
        }
        if self.min_lat < -90.0 || self.max_lat > 90.0 {
            return Err(BedrockError::InvalidInput(format!(
                "latitude out of range: {}..{}",
                self.min_lat, self.max_lat
            )));
        }
        if self.min_lon < -180.0 || self.max_lon > 180.0 {
            return Err(BedrockError::InvalidInput(format!(
                "longitude out of range: {}..{}",
                self.min_lon, self.max_lon
            )));
        }
        if self.min_lat >= self.max_lat || self.min_lon >= self.max_lon {
            return Err(BedrockError::InvalidInput(
                "min bound must be less than max bound".to_string(),
            ));
        }
        Ok(())
    }

    /// 구역 키 해시에 사용되는 정규화 문자열.
    ///
    /// f64의 최단 왕복 표현을 사용하므로 `0.50`과 `0.5`는 동일한
    /// 문자열이 됩니다. 필드 순서는 고정입니다.
    pub fn canonical_form(&self) -> String {
        format!(
            "{},{},{},{}",
            self.min_lat, self.max_lat, self.min_lon, self.max_lon
        )
    }

    /// 좌표가 경계 내에 있는지 확인.
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        lat >= self.min_lat && lat <= self.max_lat && lon >= self.min_lon && lon <= self.max_lon
    }
}
