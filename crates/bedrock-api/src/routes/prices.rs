//! 원자재 가격 endpoint.
//!
//! 유가/석탄/광물 가격 스냅샷을 제공합니다. 업스트림 실패 시에도
//! 대체 가격으로 항상 응답합니다.

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};

use bedrock_core::{CoalPrice, MineralPrice, OilPrices};

use crate::state::AppState;

/// 유가 조회.
///
/// GET /api/v1/prices/oil
pub async fn get_oil_prices(State(state): State<Arc<AppState>>) -> Json<OilPrices> {
    Json(state.prices.oil_prices().await)
}

/// 석탄 가격 조회.
///
/// GET /api/v1/prices/coal
pub async fn get_coal_price(State(state): State<Arc<AppState>>) -> Json<CoalPrice> {
    Json(state.prices.coal_price().await)
}

/// 광물 가격 조회.
///
/// GET /api/v1/prices/minerals
pub async fn get_mineral_prices(State(state): State<Arc<AppState>>) -> Json<Vec<MineralPrice>> {
    Json(state.prices.mineral_prices())
}

/// 가격 라우터 생성.
pub fn prices_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/oil", get(get_oil_prices))
        .route("/coal", get(get_coal_price))
        .route("/minerals", get(get_mineral_prices))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn app() -> Router {
        // 가격 소스 미설정 → 대체 가격으로 응답
        prices_router().with_state(Arc::new(AppState::new()))
    }

    async fn get_json(app: Router, uri: &str) -> serde_json::Value {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_oil_prices_fall_back_without_source() {
        let body = get_json(app(), "/oil").await;

        assert!(body["brent"]["isFallback"].as_bool().unwrap());
        assert!(body["brent"]["price"].is_string()); // Decimal은 문자열로 직렬화
    }

    #[tokio::test]
    async fn test_coal_price() {
        let body = get_json(app(), "/coal").await;
        assert!(body["thermal"]["price"].is_string());
    }

    #[tokio::test]
    async fn test_mineral_prices_static_board() {
        let body = get_json(app(), "/minerals").await;
        let minerals = body.as_array().unwrap();

        assert!(!minerals.is_empty());
        assert!(minerals.iter().any(|m| m["name"] == "Copper"));
    }
}
