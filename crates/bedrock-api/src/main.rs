//! 선박 추적 API 서버.
//!
//! Axum 기반 REST API와 WebSocket 서버를 시작합니다.
//! 헬스 체크, 선박/항구/가격/뉴스 조회, 구역 구독 브로드캐스트를
//! 제공합니다.

use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use axum::Router;
use tokio_util::sync::CancellationToken;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use bedrock_api::routes::create_api_router;
use bedrock_api::state::AppState;
use bedrock_api::websocket::{websocket_router, RoomRegistry, WsState};
use bedrock_core::{init_logging_from_env, AppConfig};
use bedrock_data::{
    CacheStore, MarineTrafficClient, MemoryCache, OilPriceClient, PortDirectory, PriceBoard,
    PriceSource, RedisCache, RedisConfig, VesselDataService, VesselSource,
};

/// 캐시 저장소 생성.
///
/// REDIS_URL이 설정되어 있으면 Redis를 사용하고, 없거나 연결에
/// 실패하면 인메모리 캐시로 대체합니다. 캐시 장애로 서버 기동을
/// 막지 않습니다.
async fn create_cache_store(config: &AppConfig) -> (Arc<dyn CacheStore>, Option<Arc<RedisCache>>) {
    if let Some(url) = &config.redis_url {
        let redis_config = RedisConfig {
            url: url.clone(),
            ..Default::default()
        };
        match RedisCache::connect(&redis_config).await {
            Ok(cache) => {
                info!("Connected to Redis cache");
                let cache = Arc::new(cache);
                return (cache.clone(), Some(cache));
            }
            Err(e) => {
                warn!("Failed to connect to Redis, falling back to in-memory cache: {}", e);
            }
        }
    } else {
        warn!("REDIS_URL not set, using in-memory cache");
    }

    (Arc::new(MemoryCache::new()), None)
}

/// 항구 디렉터리 로드.
fn load_port_directory(config: &AppConfig) -> PortDirectory {
    match &config.ports_data_path {
        Some(path) => match PortDirectory::load(path) {
            Ok(directory) => directory,
            Err(e) => {
                error!("Failed to load port directory: {}", e);
                PortDirectory::empty()
            }
        },
        None => {
            warn!("PORTS_DATA_PATH not set, port directory will be empty");
            PortDirectory::empty()
        }
    }
}

/// AppState 초기화.
async fn create_app_state(
    config: &AppConfig,
) -> (AppState, Option<Arc<dyn VesselSource>>) {
    let (cache_store, redis) = create_cache_store(config).await;

    // 선박 데이터 소스 (캐시 계층 포함)
    let vessels: Option<Arc<dyn VesselSource>> = match &config.marinetraffic_api_key {
        Some(key) => {
            let client = MarineTrafficClient::new(key.clone());
            let service = VesselDataService::new(Arc::new(client), cache_store);
            info!("Vessel data source configured");
            Some(Arc::new(service))
        }
        None => {
            warn!("MARINETRAFFIC_API_KEY not set, vessel endpoints will be disabled");
            None
        }
    };

    // 가격 보드 (키가 없으면 폴백 가격만 제공)
    let price_source: Option<Arc<dyn PriceSource>> = match &config.oilprice_api_key {
        Some(key) => {
            info!("Oil price source configured");
            Some(Arc::new(OilPriceClient::new(key.clone())))
        }
        None => {
            warn!("OILPRICE_API_KEY not set, serving fallback prices");
            None
        }
    };

    let mut state = AppState::new()
        .with_ports(load_port_directory(config))
        .with_prices(PriceBoard::new(price_source));

    if let Some(redis) = redis {
        state = state.with_cache(redis);
    }
    if let Some(vessels) = &vessels {
        state = state.with_vessels(vessels.clone());
    }

    (state, vessels)
}

/// CORS 미들웨어 구성.
///
/// CORS_ORIGINS 환경변수가 설정되어 있으면 해당 origin만 허용합니다.
/// 설정되지 않으면 개발 모드로 간주하여 모든 origin을 허용합니다.
///
/// # 환경변수
///
/// - `CORS_ORIGINS`: 쉼표로 구분된 허용 origin 목록
///   예: `https://dashboard.example.com,https://admin.example.com`
fn cors_layer() -> CorsLayer {
    let allow_origin = match std::env::var("CORS_ORIGINS") {
        Ok(origins) if !origins.is_empty() => {
            // 프로덕션: 특정 origin만 허용
            let origins: Vec<_> = origins
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();

            if origins.is_empty() {
                warn!("CORS_ORIGINS is set but contains no valid origins, allowing any");
                AllowOrigin::any()
            } else {
                info!("CORS configured with {} allowed origins", origins.len());
                AllowOrigin::list(origins)
            }
        }
        _ => {
            // 개발: 모든 origin 허용
            warn!("CORS_ORIGINS not set, allowing any origin (development mode)");
            AllowOrigin::any()
        }
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([axum::http::Method::GET, axum::http::Method::OPTIONS])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::ACCEPT,
        ])
        .max_age(Duration::from_secs(3600))
}

/// 전체 라우터 생성.
fn create_router(state: Arc<AppState>, ws_state: Option<WsState>) -> Router {
    let api_router = create_api_router().with_state(state);

    let mut app = Router::new().merge(api_router);

    // WebSocket은 선박 데이터 소스가 있을 때만 활성화
    if let Some(ws_state) = ws_state {
        app = app.nest("/ws", websocket_router(ws_state));
    }

    app.layer(TraceLayer::new_for_http())
        // 전역 타임아웃 (30초) - 408 상태 코드 반환
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .layer(cors_layer())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // .env 파일 로드 (있는 경우)
    let _ = dotenvy::dotenv();

    // tracing 초기화
    init_logging_from_env()?;

    info!("Starting vessel tracking API server...");

    // 설정 로드
    let config = AppConfig::from_env();
    let addr = config.server.socket_addr().map_err(|e| {
        error!(
            host = %config.server.host,
            port = config.server.port,
            error = %e,
            "소켓 주소 설정이 유효하지 않습니다. API_HOST, API_PORT 환경변수를 확인하세요."
        );
        e
    })?;

    // AppState 생성 (캐시, 업스트림, 항구, 가격 초기화 포함)
    let (state, vessels) = create_app_state(&config).await;

    // WebSocket 구역 레지스트리 (선박 소스가 있을 때만)
    let (state, ws_state) = match vessels {
        Some(vessels) => {
            let registry = Arc::new(RoomRegistry::new(
                vessels.clone(),
                Duration::from_secs(config.refresh_interval_secs),
            ));
            info!(
                refresh_interval_secs = config.refresh_interval_secs,
                "Room registry initialized"
            );
            let ws_state = WsState::new(registry.clone(), vessels);
            (state.with_rooms(registry), Some(ws_state))
        }
        None => {
            warn!("WebSocket disabled (no vessel data source)");
            (state, None)
        }
    };

    let state = Arc::new(state);

    info!(version = %state.version, "Application state initialized");
    info!(
        has_vessels = state.has_vessels(),
        has_cache = state.has_cache(),
        has_websocket = state.rooms.is_some(),
        port_count = state.ports.len(),
        "Service connections status"
    );

    // 전역 종료 토큰 생성 (graceful shutdown용)
    let shutdown_token = CancellationToken::new();

    // 라우터 생성
    let app = create_router(state, ws_state);

    // 서버 시작
    info!(%addr, "API server listening");
    info!("WebSocket available at ws://{}/ws", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown_token.clone()))
        .await?;

    // 종료 시그널 받은 후 정리 작업
    info!("Server shutdown initiated, cleaning up...");
    shutdown_token.cancel();

    info!("Server stopped gracefully");

    Ok(())
}

/// Graceful shutdown 시그널 대기.
///
/// Ctrl+C 또는 SIGTERM 시그널을 수신하면 종료 토큰을 취소합니다.
async fn shutdown_signal(shutdown_token: CancellationToken) {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            warn!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            warn!("Received SIGTERM, initiating graceful shutdown...");
        }
    }

    // 모든 백그라운드 태스크에 종료 시그널 전파
    shutdown_token.cancel();
    info!("Shutdown signal propagated to background tasks");
}
