//! 구역(room) 구독 관리.
//!
//! 동일한 관심 구역을 구독하는 연결들을 하나의 room으로 묶고,
//! room마다 하나의 주기 갱신 태스크를 돌립니다. 마지막 구독자가
//! 떠나면 태스크를 멈추고 room을 제거합니다.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use sha2::{Digest, Sha256};
use tokio::sync::{mpsc, RwLock};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use bedrock_core::BoundingBox;
use bedrock_data::VesselSource;

use super::messages::{ServerMessage, VesselUpdate};

/// 구역 키 생성.
///
/// 동일한 경계를 구독하는 클라이언트들이 같은 room으로 합쳐지도록
/// 경계의 정규형을 해시하여 키를 만듭니다. 부동소수점 표기가 달라도
/// 값이 같으면 같은 키가 나옵니다.
///
/// # 형식
///
/// `area:{vessel_type|all}:{경계 해시 앞 16자}`
pub fn room_key(bounds: &BoundingBox, vessel_type: Option<&str>) -> String {
    let digest = Sha256::digest(bounds.canonical_form().as_bytes());
    format!(
        "area:{}:{}",
        vessel_type.unwrap_or("all"),
        hex::encode(&digest[..8])
    )
}

/// 단일 room 상태.
struct Room {
    /// 구독 경계
    bounds: BoundingBox,
    /// 선박 타입 필터
    vessel_type: Option<String>,
    /// 구독 중인 연결 목록
    members: HashSet<Uuid>,
    /// 갱신 태스크 종료 토큰
    cancel: CancellationToken,
}

/// 레지스트리 내부 상태.
///
/// 연결 목록과 room 목록을 하나의 락으로 보호하여
/// 구독/해제/정리 간의 경합을 차단합니다.
struct RegistryInner {
    /// 연결별 송신 채널
    connections: HashMap<Uuid, mpsc::UnboundedSender<ServerMessage>>,
    /// 키별 room
    rooms: HashMap<String, Room>,
}

/// room 레지스트리 통계 (헬스 체크용).
#[derive(Debug, Clone, Copy)]
pub struct RegistryStats {
    /// 활성 room 수
    pub rooms: usize,
    /// 등록된 연결 수
    pub connections: usize,
}

/// 구역 구독 레지스트리.
///
/// 모든 WebSocket 연결의 구역 구독을 관리하고 주기 갱신을
/// 브로드캐스트합니다.
pub struct RoomRegistry {
    inner: RwLock<RegistryInner>,
    /// 구역 갱신에 사용할 선박 데이터 소스
    source: Arc<dyn VesselSource>,
    /// room별 갱신 주기
    refresh_interval: Duration,
}

impl RoomRegistry {
    /// 새 레지스트리 생성.
    pub fn new(source: Arc<dyn VesselSource>, refresh_interval: Duration) -> Self {
        Self {
            inner: RwLock::new(RegistryInner {
                connections: HashMap::new(),
                rooms: HashMap::new(),
            }),
            source,
            refresh_interval,
        }
    }

    /// 연결 등록.
    ///
    /// 연결별 송신 채널을 등록합니다. 이후 모든 브로드캐스트와
    /// 단건 응답이 이 채널을 통해 전달됩니다.
    pub async fn register_connection(
        &self,
        connection_id: Uuid,
        tx: mpsc::UnboundedSender<ServerMessage>,
    ) {
        let mut inner = self.inner.write().await;
        inner.connections.insert(connection_id, tx);
    }

    /// 특정 연결로 메시지 전송.
    pub async fn send_to(&self, connection_id: Uuid, message: ServerMessage) {
        let inner = self.inner.read().await;
        if let Some(tx) = inner.connections.get(&connection_id) {
            let _ = tx.send(message);
        }
    }

    /// 구역 구독.
    ///
    /// room이 없으면 생성하고 갱신 태스크를 시작합니다. 이미 있으면
    /// 멤버로 추가만 합니다. room 생성과 멤버 추가는 하나의 쓰기 락
    /// 안에서 처리되므로 동시 구독에도 room은 한 번만 만들어집니다.
    ///
    /// # Returns
    ///
    /// 구독된 구역 키
    pub async fn join(
        self: &Arc<Self>,
        connection_id: Uuid,
        bounds: BoundingBox,
        vessel_type: Option<String>,
    ) -> String {
        let key = room_key(&bounds, vessel_type.as_deref());
        let mut inner = self.inner.write().await;

        let room = inner.rooms.entry(key.clone()).or_insert_with(|| {
            info!(room = %key, "Room created");
            Room {
                bounds,
                vessel_type: vessel_type.clone(),
                members: HashSet::new(),
                cancel: CancellationToken::new(),
            }
        });

        // 정리 중이던 room에 재구독이 들어오면 갱신 태스크를 다시 건다
        if room.cancel.is_cancelled() {
            room.cancel = CancellationToken::new();
        }

        room.members.insert(connection_id);
        let member_count = room.members.len();

        // 갱신 태스크는 멤버 0→1 전이에서만 시작
        if member_count == 1 {
            self.clone().spawn_refresh_task(
                key.clone(),
                room.bounds,
                room.vessel_type.clone(),
                room.cancel.clone(),
            );
        }

        debug!(room = %key, connection = %connection_id, members = member_count, "Joined room");
        key
    }

    /// 구역 구독 해제.
    ///
    /// 마지막 멤버가 떠나면 갱신 태스크를 멈추고 room을 제거합니다.
    ///
    /// # Returns
    ///
    /// 해제된 구역 키 (구독 중이 아니었으면 `None`)
    pub async fn leave(
        &self,
        connection_id: Uuid,
        bounds: &BoundingBox,
        vessel_type: Option<&str>,
    ) -> Option<String> {
        let key = room_key(bounds, vessel_type);
        let mut inner = self.inner.write().await;

        let room = inner.rooms.get_mut(&key)?;
        if !room.members.remove(&connection_id) {
            return None;
        }

        if room.members.is_empty() {
            room.cancel.cancel();
            inner.rooms.remove(&key);
            info!(room = %key, "Room removed (last member left)");
        }

        debug!(room = %key, connection = %connection_id, "Left room");
        Some(key)
    }

    /// 연결 해제 시 전체 정리.
    ///
    /// 연결이 끊기면 모든 room에서 해당 연결을 제거하고, 빈 room의
    /// 갱신 태스크를 멈춥니다.
    pub async fn remove_connection(&self, connection_id: Uuid) {
        let mut inner = self.inner.write().await;
        inner.connections.remove(&connection_id);

        let mut emptied = Vec::new();
        for (key, room) in inner.rooms.iter_mut() {
            if room.members.remove(&connection_id) && room.members.is_empty() {
                room.cancel.cancel();
                emptied.push(key.clone());
            }
        }

        for key in emptied {
            inner.rooms.remove(&key);
            info!(room = %key, "Room removed (connection dropped)");
        }
    }

    /// room 멤버 전체에 메시지 브로드캐스트.
    ///
    /// 전송 시점의 멤버 스냅샷에 best-effort로 전달합니다.
    /// 닫힌 채널로의 전송 실패는 무시합니다.
    pub async fn broadcast(&self, room: &str, message: ServerMessage) {
        let inner = self.inner.read().await;
        let Some(target) = inner.rooms.get(room) else {
            return;
        };

        for member in &target.members {
            if let Some(tx) = inner.connections.get(member) {
                let _ = tx.send(message.clone());
            }
        }
    }

    /// 레지스트리 통계 (헬스 체크용).
    pub async fn stats(&self) -> RegistryStats {
        let inner = self.inner.read().await;
        RegistryStats {
            rooms: inner.rooms.len(),
            connections: inner.connections.len(),
        }
    }

    /// room 갱신 태스크 시작.
    ///
    /// 매 주기마다 구역 선박 위치를 조회해 멤버에게 브로드캐스트합니다.
    /// 조회 실패 시 실패 갱신을 브로드캐스트하고 타이머는 계속 돕니다.
    fn spawn_refresh_task(
        self: Arc<Self>,
        key: String,
        bounds: BoundingBox,
        vessel_type: Option<String>,
        cancel: CancellationToken,
    ) {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(self.refresh_interval);
            // 첫 틱은 즉시 완료되므로 소비 (첫 브로드캐스트는 한 주기 후)
            interval.tick().await;

            loop {
                tokio::select! {
                    _ = cancel.cancelled() => {
                        debug!(room = %key, "Refresh task stopped");
                        break;
                    }
                    _ = interval.tick() => {
                        let update = match self
                            .source
                            .vessels_in_area(&bounds, vessel_type.as_deref())
                            .await
                        {
                            Ok(vessels) => {
                                debug!(room = %key, count = vessels.len(), "Room refresh");
                                VesselUpdate::ok(&key, vessels)
                            }
                            Err(e) => {
                                warn!(room = %key, error = %e, "Room refresh failed");
                                VesselUpdate::failed(&key, &e)
                            }
                        };
                        self.broadcast(&key, ServerMessage::VesselUpdate(update)).await;
                    }
                }
            }
        });
    }
}
