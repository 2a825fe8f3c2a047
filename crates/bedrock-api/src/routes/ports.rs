//! 항구 조회 endpoint.
//!
//! 인메모리 항구 디렉터리에 대한 뷰포트/국가/검색/설비 조회를 제공합니다.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use bedrock_core::{BoundingBox, Port};

use crate::error::{api_error, ApiResult};
use crate::state::AppState;

/// 뷰포트 조회 쿼리 파라미터.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortViewportQuery {
    /// 남쪽 위도
    pub min_lat: f64,
    /// 북쪽 위도
    pub max_lat: f64,
    /// 서쪽 경도
    pub min_lon: f64,
    /// 동쪽 경도
    pub max_lon: f64,
}

/// 항구 검색 쿼리 파라미터.
#[derive(Debug, Deserialize)]
pub struct PortSearchQuery {
    /// 검색어 (항구명 부분 일치)
    pub q: String,
}

/// 항구 목록 응답.
#[derive(Debug, Serialize)]
pub struct PortsListResponse {
    /// 항구 수
    pub count: usize,
    /// 항구 목록
    pub ports: Vec<Port>,
}

/// 전체 항구 목록 조회.
///
/// GET /api/v1/ports
pub async fn list_ports(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<PortsListResponse>> {
    // 전 지구 뷰포트 조회와 동일
    let ports = state
        .ports
        .in_bounds(&BoundingBox::new(-90.0, 90.0, -180.0, 180.0));

    Ok(Json(PortsListResponse {
        count: ports.len(),
        ports,
    }))
}

/// 뷰포트 내 항구 조회.
///
/// GET /api/v1/ports/viewport?minLat=..&maxLat=..&minLon=..&maxLon=..
pub async fn ports_in_viewport(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PortViewportQuery>,
) -> ApiResult<Json<PortsListResponse>> {
    let bounds = BoundingBox::new(query.min_lat, query.max_lat, query.min_lon, query.max_lon);
    bounds
        .validate()
        .map_err(|e| api_error(StatusCode::BAD_REQUEST, "INVALID_BOUNDS", e.to_string()))?;

    let ports = state.ports.in_bounds(&bounds);

    Ok(Json(PortsListResponse {
        count: ports.len(),
        ports,
    }))
}

/// 국가별 항구 조회.
///
/// GET /api/v1/ports/country/{code}
pub async fn ports_by_country(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> ApiResult<Json<PortsListResponse>> {
    let ports = state.ports.by_country(&code);
    Ok(Json(PortsListResponse {
        count: ports.len(),
        ports,
    }))
}

/// 항구 이름 검색.
///
/// GET /api/v1/ports/search?q=..
pub async fn search_ports(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PortSearchQuery>,
) -> ApiResult<Json<PortsListResponse>> {
    if query.q.trim().is_empty() {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            "INVALID_QUERY",
            "검색어가 비어 있습니다",
        ));
    }

    let ports = state.ports.search(&query.q);
    Ok(Json(PortsListResponse {
        count: ports.len(),
        ports,
    }))
}

/// 석유 설비 보유 항구 조회.
///
/// GET /api/v1/ports/oil-facilities
pub async fn oil_facility_ports(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<PortsListResponse>> {
    let ports = state.ports.oil_facilities();
    Ok(Json(PortsListResponse {
        count: ports.len(),
        ports,
    }))
}

/// 항구 단건 조회.
///
/// GET /api/v1/ports/{id}
pub async fn get_port(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Port>> {
    match state.ports.by_id(&id) {
        Some(port) => Ok(Json(port)),
        None => Err(api_error(
            StatusCode::NOT_FOUND,
            "PORT_NOT_FOUND",
            format!("항구를 찾을 수 없습니다: {}", id),
        )),
    }
}

/// 항구 라우터 생성.
///
/// 고정 경로가 `/{id}`보다 먼저 매칭되도록 등록 순서를 유지합니다.
pub fn ports_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_ports))
        .route("/viewport", get(ports_in_viewport))
        .route("/search", get(search_ports))
        .route("/oil-facilities", get(oil_facility_ports))
        .route("/country/{code}", get(ports_by_country))
        .route("/{id}", get(get_port))
}
