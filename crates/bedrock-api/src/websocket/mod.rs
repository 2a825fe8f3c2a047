//! 실시간 WebSocket 서버.
//!
//! 구역 기반 선박 위치 구독과 단건 조회를 제공합니다.
//!
//! # 모듈 구성
//!
//! - [`messages`]: 클라이언트/서버 메시지 타입
//! - [`rooms`]: 구역 구독 레지스트리 및 주기 갱신 스케줄러
//! - [`handler`]: Axum WebSocket 엔드포인트

pub mod handler;
pub mod messages;
pub mod rooms;

pub use handler::{websocket_handler, websocket_router, WsState};
pub use messages::{ClientMessage, ServerMessage, VesselUpdate, WsError};
pub use rooms::{room_key, RegistryStats, RoomRegistry};
