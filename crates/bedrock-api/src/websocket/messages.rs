//! WebSocket 메시지 타입.
//!
//! 클라이언트-서버 간 교환되는 메시지 정의.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use bedrock_core::{BoundingBox, Port, TrackPoint, Vessel, VesselDetails};
use bedrock_data::ProviderError;

/// WebSocket 에러.
#[derive(Debug, thiserror::Error)]
pub enum WsError {
    #[error("잘못된 메시지 형식: {0}")]
    InvalidMessage(String),
    #[error("직렬화 실패: {0}")]
    SerializationError(#[from] serde_json::Error),
    #[error("내부 오류: {0}")]
    InternalError(String),
}

// ==================== 클라이언트 → 서버 메시지 ====================

/// 클라이언트에서 서버로 보내는 메시지.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// 구역 구독 (주기적 선박 위치 갱신 수신)
    JoinArea {
        /// 관심 구역 경계
        bounds: BoundingBox,
        /// 선박 타입 필터 (없으면 전체)
        #[serde(default)]
        vessel_type: Option<String>,
    },
    /// 구역 구독 해제
    LeaveArea {
        /// 구독 시 사용한 경계
        bounds: BoundingBox,
        /// 구독 시 사용한 선박 타입 필터
        #[serde(default)]
        vessel_type: Option<String>,
    },
    /// 선박 상세 조회
    VesselDetails {
        /// 선박 식별자 값
        vessel_id: String,
        /// 식별자 종류 ("imo" | "mmsi" | "name", 기본 "mmsi")
        #[serde(default)]
        identifier_type: Option<String>,
    },
    /// 선박 검색
    SearchVessels {
        /// 검색어
        query: String,
        /// 검색 종류 ("name" | "imo" | "mmsi", 기본 "name")
        #[serde(default)]
        search_type: Option<String>,
    },
    /// 항구 정보 조회. ID 또는 항구명 중 하나는 필수.
    PortInfo {
        /// 항구 ID (UN/LOCODE)
        #[serde(default)]
        port_id: Option<String>,
        /// 항구명 (ID가 없을 때 사용)
        #[serde(default)]
        port_name: Option<String>,
    },
    /// 선박 항적 조회
    VesselTrack {
        /// 선박 식별자 값
        vessel_id: String,
        /// 식별자 종류 ("imo" | "mmsi", 기본 "mmsi")
        #[serde(default)]
        identifier_type: Option<String>,
        /// 조회 기간 (시간)
        time_span_hours: u32,
    },
    /// 핑 (연결 유지)
    Ping,
}

impl ClientMessage {
    /// JSON 문자열에서 파싱.
    pub fn from_json(json: &str) -> Result<Self, WsError> {
        serde_json::from_str(json).map_err(|e| WsError::InvalidMessage(e.to_string()))
    }
}

// ==================== 서버 → 클라이언트 메시지 ====================

/// 서버에서 클라이언트로 보내는 메시지.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// 연결 환영 메시지
    Welcome {
        /// 서버 버전
        version: String,
        /// 서버 타임스탬프
        timestamp: i64,
    },
    /// 구역 구독 확인
    Subscribed {
        /// 구독된 구역 키
        room: String,
    },
    /// 구역 구독 해제 확인
    Unsubscribed {
        /// 구독 해제된 구역 키
        room: String,
    },
    /// 구역 선박 위치 갱신
    VesselUpdate(VesselUpdate),
    /// 선박 상세 응답
    VesselDetails {
        /// 선박 상세 (없으면 null)
        data: Option<VesselDetails>,
    },
    /// 선박 검색 결과
    SearchResults {
        /// 검색어
        query: String,
        /// 검색 결과 목록
        data: Vec<VesselDetails>,
    },
    /// 항구 정보 응답
    PortInfo {
        /// 항구 정보 (없으면 null)
        data: Option<Port>,
    },
    /// 선박 항적 응답
    VesselTrack {
        /// 선박 식별자 값
        vessel_id: String,
        /// 항적 포인트 목록
        data: Vec<TrackPoint>,
    },
    /// 퐁 응답
    Pong {
        /// 서버 타임스탬프
        timestamp: i64,
    },
    /// 에러
    Error {
        /// 에러 코드
        code: String,
        /// 에러 메시지
        message: String,
    },
}

impl ServerMessage {
    /// JSON 문자열로 직렬화.
    pub fn to_json(&self) -> Result<String, WsError> {
        serde_json::to_string(self).map_err(WsError::from)
    }

    /// 에러 메시지 생성 헬퍼.
    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        ServerMessage::Error {
            code: code.into(),
            message: message.into(),
        }
    }
}

// ==================== 데이터 타입 ====================

/// 구역 선박 위치 갱신 페이로드.
///
/// 성공/실패 모두 동일한 봉투로 전송됩니다. 실패 시 `data`가 없고
/// `error`에 업스트림 에러 코드가 들어갑니다.
#[derive(Debug, Clone, Serialize)]
pub struct VesselUpdate {
    /// 갱신 성공 여부
    pub success: bool,
    /// 갱신 시각 (ISO 8601)
    pub timestamp: String,
    /// 구역 키
    pub area: String,
    /// 선박 목록 (성공 시)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<Vessel>>,
    /// 에러 코드 (실패 시)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl VesselUpdate {
    /// 성공 갱신 생성.
    pub fn ok(area: impl Into<String>, vessels: Vec<Vessel>) -> Self {
        Self {
            success: true,
            timestamp: Utc::now().to_rfc3339(),
            area: area.into(),
            data: Some(vessels),
            error: None,
        }
    }

    /// 실패 갱신 생성.
    pub fn failed(area: impl Into<String>, error: &ProviderError) -> Self {
        Self {
            success: false,
            timestamp: Utc::now().to_rfc3339(),
            area: area.into(),
            data: None,
            error: Some(error.code().to_string()),
        }
    }
}
