//! WebSocket 연결 handler.
//!
//! Axum WebSocket 엔드포인트 및 메시지 처리.

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
    routing::get,
    Router,
};
use chrono::Utc;
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use bedrock_core::{PortSelector, VesselIdentifier};
use bedrock_data::VesselSource;

use super::messages::{ClientMessage, ServerMessage, VesselUpdate};
use super::rooms::RoomRegistry;

/// WebSocket 상태.
///
/// 구역 레지스트리와 단건 조회에 사용할 데이터 소스를 포함합니다.
#[derive(Clone)]
pub struct WsState {
    /// 구역 구독 레지스트리
    pub registry: Arc<RoomRegistry>,
    /// 단건 조회용 선박 데이터 소스
    pub vessels: Arc<dyn VesselSource>,
}

impl WsState {
    /// 새로운 WebSocket 상태 생성.
    pub fn new(registry: Arc<RoomRegistry>, vessels: Arc<dyn VesselSource>) -> Self {
        Self { registry, vessels }
    }
}

/// WebSocket 업그레이드 핸들러.
///
/// HTTP 연결을 WebSocket으로 업그레이드합니다.
///
/// # 엔드포인트
///
/// `GET /ws`
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(ws_state): State<WsState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, ws_state))
}

/// WebSocket 연결 처리.
async fn handle_socket(socket: WebSocket, state: WsState) {
    let connection_id = Uuid::new_v4();
    info!("WebSocket connected: {}", connection_id);

    // 연결별 송신 채널 등록
    let (tx, mut rx) = mpsc::unbounded_channel();
    state
        .registry
        .register_connection(connection_id, tx.clone())
        .await;

    // WebSocket 스트림 분리
    let (mut sender, mut receiver) = socket.split();

    // 환영 메시지 전송
    let _ = tx.send(ServerMessage::Welcome {
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now().timestamp_millis(),
    });

    // 클라이언트 메시지 수신 태스크
    let state_clone = state.clone();
    let receive_task = tokio::spawn(async move {
        while let Some(result) = receiver.next().await {
            match result {
                Ok(msg) => {
                    if !handle_client_message(connection_id, msg, &state_clone).await {
                        break;
                    }
                }
                Err(e) => {
                    warn!("WebSocket receive error: {}", e);
                    break;
                }
            }
        }
    });

    // 서버 메시지 전송 태스크
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            match msg.to_json() {
                Ok(json) => {
                    if sender.send(Message::Text(json.into())).await.is_err() {
                        break;
                    }
                }
                Err(e) => {
                    warn!("Failed to serialize server message: {}", e);
                }
            }
        }
    });

    // 하나의 태스크가 종료되면 다른 것도 종료
    tokio::select! {
        _ = receive_task => {
            debug!("Receive task ended for connection: {}", connection_id);
        }
        _ = send_task => {
            debug!("Send task ended for connection: {}", connection_id);
        }
    }

    // 연결 정리 (모든 room에서 제거)
    state.registry.remove_connection(connection_id).await;

    info!("WebSocket disconnected: {}", connection_id);
}

/// 클라이언트 메시지 처리.
///
/// # Returns
///
/// `true`면 연결 유지, `false`면 연결 종료
async fn handle_client_message(connection_id: Uuid, msg: Message, state: &WsState) -> bool {
    match msg {
        Message::Text(text) => match ClientMessage::from_json(&text) {
            Ok(client_msg) => process_client_message(connection_id, client_msg, state).await,
            Err(e) => {
                warn!("Invalid message from {}: {}", connection_id, e);
                state
                    .registry
                    .send_to(
                        connection_id,
                        ServerMessage::error("INVALID_MESSAGE", e.to_string()),
                    )
                    .await;
                true // 연결은 유지
            }
        },
        Message::Binary(_) => {
            warn!("Binary messages not supported");
            true
        }
        Message::Ping(_) => true,
        Message::Pong(_) => true,
        Message::Close(_) => {
            debug!("Close message received from {}", connection_id);
            false
        }
    }
}

/// 파싱된 클라이언트 메시지 처리.
async fn process_client_message(connection_id: Uuid, msg: ClientMessage, state: &WsState) -> bool {
    match msg {
        ClientMessage::JoinArea {
            bounds,
            vessel_type,
        } => {
            if let Err(e) = bounds.validate() {
                state
                    .registry
                    .send_to(
                        connection_id,
                        ServerMessage::error("INVALID_BOUNDS", e.to_string()),
                    )
                    .await;
                return true;
            }

            let room = state
                .registry
                .join(connection_id, bounds, vessel_type.clone())
                .await;
            state
                .registry
                .send_to(connection_id, ServerMessage::Subscribed { room: room.clone() })
                .await;

            // 첫 갱신은 주기를 기다리지 않고 요청자에게 즉시 전달
            let update = match state
                .vessels
                .vessels_in_area(&bounds, vessel_type.as_deref())
                .await
            {
                Ok(vessels) => VesselUpdate::ok(&room, vessels),
                Err(e) => {
                    warn!(room = %room, error = %e, "Initial area fetch failed");
                    VesselUpdate::failed(&room, &e)
                }
            };
            state
                .registry
                .send_to(connection_id, ServerMessage::VesselUpdate(update))
                .await;
            true
        }

        ClientMessage::LeaveArea {
            bounds,
            vessel_type,
        } => {
            match state
                .registry
                .leave(connection_id, &bounds, vessel_type.as_deref())
                .await
            {
                Some(room) => {
                    state
                        .registry
                        .send_to(connection_id, ServerMessage::Unsubscribed { room })
                        .await;
                }
                None => {
                    state
                        .registry
                        .send_to(
                            connection_id,
                            ServerMessage::error("NOT_SUBSCRIBED", "해당 구역을 구독하고 있지 않습니다"),
                        )
                        .await;
                }
            }
            true
        }

        ClientMessage::VesselDetails {
            vessel_id,
            identifier_type,
        } => {
            let id = match VesselIdentifier::from_kind(
                identifier_type.as_deref().unwrap_or("mmsi"),
                vessel_id,
            ) {
                Ok(id) => id,
                Err(e) => {
                    state
                        .registry
                        .send_to(
                            connection_id,
                            ServerMessage::error("INVALID_IDENTIFIER", e.to_string()),
                        )
                        .await;
                    return true;
                }
            };

            let response = match state.vessels.vessel_details(&id).await {
                Ok(data) => ServerMessage::VesselDetails { data },
                Err(e) => ServerMessage::error(e.code(), e.to_string()),
            };
            state.registry.send_to(connection_id, response).await;
            true
        }

        ClientMessage::SearchVessels { query, search_type } => {
            if query.trim().is_empty() {
                state
                    .registry
                    .send_to(
                        connection_id,
                        ServerMessage::error("INVALID_QUERY", "검색어가 비어 있습니다"),
                    )
                    .await;
                return true;
            }

            let response = match state
                .vessels
                .search_vessels(&query, search_type.as_deref())
                .await
            {
                Ok(data) => ServerMessage::SearchResults { query, data },
                Err(e) => ServerMessage::error(e.code(), e.to_string()),
            };
            state.registry.send_to(connection_id, response).await;
            true
        }

        ClientMessage::PortInfo { port_id, port_name } => {
            let non_empty = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
            let selector = match (non_empty(port_id), non_empty(port_name)) {
                (Some(id), _) => PortSelector::Id(id),
                (None, Some(name)) => PortSelector::Name(name),
                (None, None) => {
                    state
                        .registry
                        .send_to(
                            connection_id,
                            ServerMessage::error(
                                "INVALID_PORT_ID",
                                "항구 ID 또는 이름이 필요합니다",
                            ),
                        )
                        .await;
                    return true;
                }
            };

            let response = match state.vessels.port_info(&selector).await {
                Ok(data) => ServerMessage::PortInfo { data },
                Err(e) => ServerMessage::error(e.code(), e.to_string()),
            };
            state.registry.send_to(connection_id, response).await;
            true
        }

        ClientMessage::VesselTrack {
            vessel_id,
            identifier_type,
            time_span_hours,
        } => {
            if time_span_hours == 0 {
                state
                    .registry
                    .send_to(
                        connection_id,
                        ServerMessage::error("INVALID_TIME_SPAN", "조회 기간은 1시간 이상이어야 합니다"),
                    )
                    .await;
                return true;
            }

            let id = match VesselIdentifier::from_kind(
                identifier_type.as_deref().unwrap_or("mmsi"),
                vessel_id.clone(),
            ) {
                Ok(id) => id,
                Err(e) => {
                    state
                        .registry
                        .send_to(
                            connection_id,
                            ServerMessage::error("INVALID_IDENTIFIER", e.to_string()),
                        )
                        .await;
                    return true;
                }
            };

            let response = match state.vessels.vessel_track(&id, time_span_hours).await {
                Ok(data) => ServerMessage::VesselTrack { vessel_id, data },
                Err(e) => ServerMessage::error(e.code(), e.to_string()),
            };
            state.registry.send_to(connection_id, response).await;
            true
        }

        ClientMessage::Ping => {
            state
                .registry
                .send_to(
                    connection_id,
                    ServerMessage::Pong {
                        timestamp: Utc::now().timestamp_millis(),
                    },
                )
                .await;
            true
        }
    }
}

/// 독립적인 WebSocket 라우터 생성.
///
/// WsState만으로 동작하는 라우터. main에서 `/ws`에 중첩됩니다.
pub fn websocket_router(ws_state: WsState) -> Router {
    Router::new()
        .route("/", get(websocket_handler))
        .with_state(ws_state)
}
