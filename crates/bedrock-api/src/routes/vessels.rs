//! 선박 조회 endpoint.
//!
//! 뷰포트 내 선박 목록, 선박 검색, 상세/항적 조회를 제공합니다.
//! 모든 조회는 캐시 계층을 거쳐 업스트림으로 전달됩니다.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use bedrock_core::{BoundingBox, TrackPoint, Vessel, VesselDetails, VesselIdentifier};
use bedrock_data::{ProviderError, VesselSource};

use crate::error::{api_error, ApiErrorResponse, ApiResult};
use crate::state::AppState;

/// 뷰포트 조회 쿼리 파라미터.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewportQuery {
    /// 남쪽 위도
    pub min_lat: f64,
    /// 북쪽 위도
    pub max_lat: f64,
    /// 서쪽 경도
    pub min_lon: f64,
    /// 동쪽 경도
    pub max_lon: f64,
    /// 선박 타입 필터 (선택)
    pub vessel_type: Option<String>,
}

/// 선박 검색 쿼리 파라미터.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    /// 검색어
    pub q: String,
    /// 검색 종류 ("name" | "imo" | "mmsi", 기본 "name")
    pub search_type: Option<String>,
}

/// 상세 조회 쿼리 파라미터.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentifierQuery {
    /// 식별자 종류 ("imo" | "mmsi" | "name", 기본 "mmsi")
    pub identifier_type: Option<String>,
}

/// 항적 조회 쿼리 파라미터.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackQuery {
    /// 식별자 종류 (기본 "mmsi")
    pub identifier_type: Option<String>,
    /// 조회 기간 (시간, 기본 24)
    pub time_span_hours: Option<u32>,
}

/// 선박 목록 응답.
#[derive(Debug, Serialize)]
pub struct VesselsListResponse {
    /// 선박 수
    pub count: usize,
    /// 선박 목록
    pub vessels: Vec<Vessel>,
}

/// 선박 검색 응답.
#[derive(Debug, Serialize)]
pub struct VesselSearchResponse {
    /// 검색어
    pub query: String,
    /// 결과 수
    pub count: usize,
    /// 검색 결과
    pub results: Vec<VesselDetails>,
}

/// 항적 응답.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VesselTrackResponse {
    /// 선박 식별자 값
    pub vessel_id: String,
    /// 포인트 수
    pub count: usize,
    /// 항적 포인트
    pub track: Vec<TrackPoint>,
}

/// 업스트림 에러를 API 에러 응답으로 변환.
fn upstream_error(e: ProviderError) -> (StatusCode, Json<ApiErrorResponse>) {
    let status = match &e {
        ProviderError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
        _ => StatusCode::BAD_GATEWAY,
    };
    (status, Json(ApiErrorResponse::new(e.code(), e.to_string())))
}

/// 선박 데이터 소스 확보 (미설정 시 503).
fn vessel_source(
    state: &AppState,
) -> Result<Arc<dyn VesselSource>, (StatusCode, Json<ApiErrorResponse>)> {
    state.vessels.clone().ok_or_else(|| {
        api_error(
            StatusCode::SERVICE_UNAVAILABLE,
            "NOT_CONFIGURED",
            "선박 데이터 소스가 설정되지 않았습니다",
        )
    })
}

/// 뷰포트 내 선박 목록 조회.
///
/// GET /api/v1/vessels?minLat=..&maxLat=..&minLon=..&maxLon=..&vesselType=..
pub async fn list_vessels(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ViewportQuery>,
) -> ApiResult<Json<VesselsListResponse>> {
    let source = vessel_source(&state)?;

    let bounds = BoundingBox::new(query.min_lat, query.max_lat, query.min_lon, query.max_lon);
    bounds
        .validate()
        .map_err(|e| api_error(StatusCode::BAD_REQUEST, "INVALID_BOUNDS", e.to_string()))?;

    let vessels = source
        .vessels_in_area(&bounds, query.vessel_type.as_deref())
        .await
        .map_err(upstream_error)?;

    Ok(Json(VesselsListResponse {
        count: vessels.len(),
        vessels,
    }))
}

/// 선박 검색.
///
/// GET /api/v1/vessels/search?q=..&searchType=..
pub async fn search_vessels(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Json<VesselSearchResponse>> {
    let source = vessel_source(&state)?;

    if query.q.trim().is_empty() {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            "INVALID_QUERY",
            "검색어가 비어 있습니다",
        ));
    }

    let results = source
        .search_vessels(&query.q, query.search_type.as_deref())
        .await
        .map_err(upstream_error)?;

    Ok(Json(VesselSearchResponse {
        query: query.q,
        count: results.len(),
        results,
    }))
}

/// 선박 상세 조회.
///
/// GET /api/v1/vessels/{id}?identifierType=..
pub async fn get_vessel(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(query): Query<IdentifierQuery>,
) -> ApiResult<Json<VesselDetails>> {
    let source = vessel_source(&state)?;

    let identifier =
        VesselIdentifier::from_kind(query.identifier_type.as_deref().unwrap_or("mmsi"), id)
            .map_err(|e| {
                api_error(StatusCode::BAD_REQUEST, "INVALID_IDENTIFIER", e.to_string())
            })?;

    let details = source
        .vessel_details(&identifier)
        .await
        .map_err(upstream_error)?;

    match details {
        Some(details) => Ok(Json(details)),
        None => Err(api_error(
            StatusCode::NOT_FOUND,
            "VESSEL_NOT_FOUND",
            format!("선박을 찾을 수 없습니다: {}", identifier),
        )),
    }
}

/// 선박 항적 조회.
///
/// GET /api/v1/vessels/{id}/track?timeSpanHours=..
pub async fn get_vessel_track(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(query): Query<TrackQuery>,
) -> ApiResult<Json<VesselTrackResponse>> {
    let source = vessel_source(&state)?;

    let hours = query.time_span_hours.unwrap_or(24);
    if hours == 0 {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            "INVALID_TIME_SPAN",
            "조회 기간은 1시간 이상이어야 합니다",
        ));
    }

    let identifier = VesselIdentifier::from_kind(
        query.identifier_type.as_deref().unwrap_or("mmsi"),
        id.clone(),
    )
    .map_err(|e| api_error(StatusCode::BAD_REQUEST, "INVALID_IDENTIFIER", e.to_string()))?;

    let track = source
        .vessel_track(&identifier, hours)
        .await
        .map_err(upstream_error)?;

    Ok(Json(VesselTrackResponse {
        vessel_id: id,
        count: track.len(),
        track,
    }))
}

/// 선박 라우터 생성.
pub fn vessels_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_vessels))
        .route("/search", get(search_vessels))
        .route("/{id}", get(get_vessel))
        .route("/{id}/track", get(get_vessel_track))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    struct StubSource;

    #[async_trait]
    impl VesselSource for StubSource {
        async fn vessels_in_area(
            &self,
            _bounds: &BoundingBox,
            _vessel_type: Option<&str>,
        ) -> Result<Vec<Vessel>, ProviderError> {
            Ok(vec![])
        }

        async fn vessel_details(
            &self,
            id: &VesselIdentifier,
        ) -> Result<Option<VesselDetails>, ProviderError> {
            if id.value() == "538005120" {
                Ok(Some(VesselDetails {
                    mmsi: "538005120".to_string(),
                    imo: Some("9395044".to_string()),
                    ship_name: Some("PACIFIC TRADER".to_string()),
                    ship_type: Some("8".to_string()),
                    flag: Some("MH".to_string()),
                    length: Some(333.0),
                    breadth: Some(60.0),
                    deadweight: Some(320000.0),
                    year_built: Some(2009),
                }))
            } else {
                Ok(None)
            }
        }

        async fn search_vessels(
            &self,
            _query: &str,
            _search_type: Option<&str>,
        ) -> Result<Vec<VesselDetails>, ProviderError> {
            Ok(vec![])
        }

        async fn vessel_track(
            &self,
            _id: &VesselIdentifier,
            _time_span_hours: u32,
        ) -> Result<Vec<TrackPoint>, ProviderError> {
            Err(ProviderError::RateLimited("quota exceeded".to_string()))
        }

        async fn port_info(
            &self,
            _port: &bedrock_core::PortSelector,
        ) -> Result<Option<bedrock_core::Port>, ProviderError> {
            Ok(None)
        }
    }

    fn app(with_source: bool) -> Router {
        let mut state = AppState::new();
        if with_source {
            state = state.with_vessels(Arc::new(StubSource));
        }
        vessels_router().with_state(Arc::new(state))
    }

    async fn get_response(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if body.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&body).unwrap()
        };
        (status, json)
    }

    #[tokio::test]
    async fn test_list_vessels_in_viewport() {
        let (status, body) = get_response(
            app(true),
            "/?minLat=35.0&maxLat=38.0&minLon=126.0&maxLon=130.0",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 0);
    }

    #[tokio::test]
    async fn test_list_vessels_rejects_inverted_bounds() {
        let (status, body) = get_response(
            app(true),
            "/?minLat=38.0&maxLat=35.0&minLon=126.0&maxLon=130.0",
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_BOUNDS");
    }

    #[tokio::test]
    async fn test_unconfigured_source_returns_503() {
        let (status, body) = get_response(
            app(false),
            "/?minLat=35.0&maxLat=38.0&minLon=126.0&maxLon=130.0",
        )
        .await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["code"], "NOT_CONFIGURED");
    }

    #[tokio::test]
    async fn test_get_vessel_found() {
        let (status, body) = get_response(app(true), "/538005120").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["shipName"], "PACIFIC TRADER");
    }

    #[tokio::test]
    async fn test_get_vessel_not_found() {
        let (status, body) = get_response(app(true), "/999999999").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "VESSEL_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_search_rejects_empty_query() {
        let (status, body) = get_response(app(true), "/search?q=%20").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_QUERY");
    }

    #[tokio::test]
    async fn test_track_rate_limited_maps_to_429() {
        let (status, body) = get_response(app(true), "/538005120/track?timeSpanHours=24").await;

        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(body["code"], "RateLimited");
    }
}
