//! REST API 및 WebSocket 서버.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - Axum 기반 REST API (선박/항구/가격/뉴스)
//! - 구역 구독 기반 실시간 WebSocket 서버
//! - 헬스 체크 엔드포인트
//!
//! # 모듈 구성
//!
//! - [`state`]: 애플리케이션 공유 상태 (AppState)
//! - [`routes`]: REST API 엔드포인트
//! - [`websocket`]: 실시간 WebSocket 서버 (구역 레지스트리 포함)
//! - [`error`]: 통합 API 에러 응답

pub mod error;
pub mod routes;
pub mod state;
pub mod websocket;

pub use error::{api_error, ApiErrorResponse, ApiResult};
pub use routes::*;
pub use state::AppState;
pub use websocket::{
    room_key, websocket_handler, websocket_router, ClientMessage, RoomRegistry, ServerMessage,
    VesselUpdate, WsError, WsState,
};

#[cfg(any(test, feature = "test-utils"))]
pub use state::create_test_state;
