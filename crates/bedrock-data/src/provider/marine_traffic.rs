//! MarineTraffic API 클라이언트.
//!
//! MarineTraffic REST API를 통해 선박 위치/상세/항적 데이터를 수집합니다.
//!
//! # 지원 데이터
//!
//! - 구역 내 선박 위치 (exportvessels)
//! - 선박 마스터 데이터 (vesselmasterdata)
//! - 선박 검색 (vesselsearch)
//! - 항적 (shiptrack)
//! - 항구 정보 (portinfo)
//!
//! # 에러 분류
//!
//! 모든 메서드는 호출당 정확히 한 번의 HTTP 요청을 수행하며,
//! 비-2xx 응답을 분류된 [`ProviderError`]로 반환합니다.
//! 업스트림 실패가 조용히 빈 결과로 바뀌는 일은 없습니다.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;
use tracing::debug;

use bedrock_core::{
    BoundingBox, Port, PortSelector, TrackPoint, Vessel, VesselDetails, VesselIdentifier,
};

use super::{ProviderError, VesselSource};

const DEFAULT_BASE_URL: &str = "https://services.marinetraffic.com/api";

/// MarineTraffic API 클라이언트.
#[derive(Clone)]
pub struct MarineTrafficClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

// ===== 원시 응답 구조 =====
// MarineTraffic jsono 형식은 모든 값을 문자열로 반환합니다.

#[derive(Debug, Deserialize)]
struct RawPosition {
    #[serde(rename = "MMSI")]
    mmsi: String,
    #[serde(rename = "IMO", default)]
    imo: Option<String>,
    #[serde(rename = "SHIPNAME", default)]
    ship_name: Option<String>,
    #[serde(rename = "SHIPTYPE", default)]
    ship_type: Option<String>,
    #[serde(rename = "LAT")]
    lat: String,
    #[serde(rename = "LON")]
    lon: String,
    #[serde(rename = "SPEED", default)]
    speed: Option<String>,
    #[serde(rename = "COURSE", default)]
    course: Option<String>,
    #[serde(rename = "HEADING", default)]
    heading: Option<String>,
    #[serde(rename = "STATUS", default)]
    status: Option<String>,
    #[serde(rename = "DESTINATION", default)]
    destination: Option<String>,
    #[serde(rename = "TIMESTAMP", default)]
    timestamp: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawMasterData {
    #[serde(rename = "MMSI")]
    mmsi: String,
    #[serde(rename = "IMO", default)]
    imo: Option<String>,
    #[serde(rename = "SHIPNAME", default)]
    ship_name: Option<String>,
    #[serde(rename = "VESSEL_TYPE", default)]
    vessel_type: Option<String>,
    #[serde(rename = "FLAG", default)]
    flag: Option<String>,
    #[serde(rename = "LENGTH_OVERALL", default)]
    length: Option<String>,
    #[serde(rename = "BREADTH_EXTREME", default)]
    breadth: Option<String>,
    #[serde(rename = "SUMMER_DWT", default)]
    deadweight: Option<String>,
    #[serde(rename = "YEAR_BUILT", default)]
    year_built: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawTrackPoint {
    #[serde(rename = "LAT")]
    lat: String,
    #[serde(rename = "LON")]
    lon: String,
    #[serde(rename = "SPEED", default)]
    speed: Option<String>,
    #[serde(rename = "COURSE", default)]
    course: Option<String>,
    #[serde(rename = "TIMESTAMP")]
    timestamp: String,
}

#[derive(Debug, Deserialize)]
struct RawPort {
    #[serde(rename = "PORT_ID")]
    id: String,
    #[serde(rename = "PORT_NAME")]
    name: String,
    #[serde(rename = "COUNTRY", default)]
    country: Option<String>,
    #[serde(rename = "LAT")]
    lat: String,
    #[serde(rename = "LON")]
    lon: String,
}

fn parse_f64(value: &str) -> Option<f64> {
    value.trim().parse().ok()
}

fn parse_f64_opt(value: &Option<String>) -> Option<f64> {
    value.as_deref().and_then(parse_f64)
}

/// MarineTraffic 타임스탬프 파싱 ("2024-03-01T09:39:57" UTC).
fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S")
        .ok()
        .map(|naive| naive.and_utc())
}

impl MarineTrafficClient {
    /// 새로운 클라이언트 생성.
    ///
    /// # Arguments
    /// * `api_key` - MarineTraffic API 키
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .expect("HTTP 클라이언트 생성 실패"),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// 테스트용 base URL 교체.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// 환경변수 `MARINETRAFFIC_API_KEY`에서 클라이언트 생성.
    pub fn from_env() -> Option<Self> {
        std::env::var("MARINETRAFFIC_API_KEY").ok().map(Self::new)
    }

    /// API 요청 실행.
    ///
    /// 호출당 정확히 한 번의 HTTP 요청. 상태 코드를 분류해 반환합니다.
    async fn request<T: for<'de> Deserialize<'de>>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<Vec<T>, ProviderError> {
        let url = format!("{}/{}/{}", self.base_url, endpoint, self.api_key);

        debug!(endpoint = endpoint, "MarineTraffic API request");

        let response = self
            .client
            .get(&url)
            .query(&[("protocol", "jsono")])
            .query(params)
            .send()
            .await
            .map_err(ProviderError::from)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(match status.as_u16() {
                429 => ProviderError::RateLimited(format!("{}: {}", endpoint, body)),
                401 | 403 => ProviderError::Auth(format!("{}: {}", endpoint, body)),
                _ => ProviderError::Network(format!("{} [{}]: {}", endpoint, status, body)),
            });
        }

        let body = response.text().await.map_err(ProviderError::from)?;
        serde_json::from_str(&body)
            .map_err(|e| ProviderError::MalformedResponse(format!("{}: {}", endpoint, e)))
    }

    /// 식별자 쿼리 파라미터 구성.
    fn identifier_params(id: &VesselIdentifier) -> (&'static str, String) {
        match id {
            VesselIdentifier::Imo(v) => ("imo", v.clone()),
            VesselIdentifier::Mmsi(v) => ("mmsi", v.clone()),
            VesselIdentifier::Name(v) => ("shipname", v.clone()),
        }
    }
}

#[async_trait]
impl VesselSource for MarineTrafficClient {
    async fn vessels_in_area(
        &self,
        bounds: &BoundingBox,
        vessel_type: Option<&str>,
    ) -> Result<Vec<Vessel>, ProviderError> {
        let mut params = vec![
            ("MINLAT", bounds.min_lat.to_string()),
            ("MAXLAT", bounds.max_lat.to_string()),
            ("MINLON", bounds.min_lon.to_string()),
            ("MAXLON", bounds.max_lon.to_string()),
        ];
        if let Some(ship_type) = vessel_type {
            params.push(("shiptype", ship_type.to_string()));
        }

        let raw: Vec<RawPosition> = self.request("exportvessels", &params).await?;

        let vessels = raw
            .into_iter()
            .filter_map(|r| {
                let lat = parse_f64(&r.lat)?;
                let lon = parse_f64(&r.lon)?;
                Some(Vessel {
                    mmsi: r.mmsi,
                    imo: r.imo.filter(|v| !v.is_empty()),
                    ship_name: r.ship_name,
                    ship_type: r.ship_type,
                    lat,
                    lon,
                    // SPEED는 0.1노트 단위
                    speed: parse_f64_opt(&r.speed).map(|s| s / 10.0),
                    course: parse_f64_opt(&r.course),
                    heading: parse_f64_opt(&r.heading),
                    status: r.status,
                    destination: r.destination,
                    timestamp: r.timestamp.as_deref().and_then(parse_timestamp),
                })
            })
            .collect();

        Ok(vessels)
    }

    async fn vessel_details(
        &self,
        id: &VesselIdentifier,
    ) -> Result<Option<VesselDetails>, ProviderError> {
        let params = vec![Self::identifier_params(id)];
        let raw: Vec<RawMasterData> = self.request("vesselmasterdata", &params).await?;

        Ok(raw.into_iter().next().map(|r| VesselDetails {
            mmsi: r.mmsi,
            imo: r.imo.filter(|v| !v.is_empty()),
            ship_name: r.ship_name,
            ship_type: r.vessel_type,
            flag: r.flag,
            length: parse_f64_opt(&r.length),
            breadth: parse_f64_opt(&r.breadth),
            deadweight: parse_f64_opt(&r.deadweight),
            year_built: r.year_built.as_deref().and_then(|v| v.trim().parse().ok()),
        }))
    }

    async fn search_vessels(
        &self,
        query: &str,
        search_type: Option<&str>,
    ) -> Result<Vec<VesselDetails>, ProviderError> {
        let field = match search_type.map(str::to_lowercase).as_deref() {
            Some("imo") => "imo",
            Some("mmsi") => "mmsi",
            _ => "shipname",
        };
        let params = vec![(field, query.to_string())];
        let raw: Vec<RawMasterData> = self.request("vesselsearch", &params).await?;

        Ok(raw
            .into_iter()
            .map(|r| VesselDetails {
                mmsi: r.mmsi,
                imo: r.imo.filter(|v| !v.is_empty()),
                ship_name: r.ship_name,
                ship_type: r.vessel_type,
                flag: r.flag,
                length: parse_f64_opt(&r.length),
                breadth: parse_f64_opt(&r.breadth),
                deadweight: parse_f64_opt(&r.deadweight),
                year_built: r.year_built.as_deref().and_then(|v| v.trim().parse().ok()),
            })
            .collect())
    }

    async fn vessel_track(
        &self,
        id: &VesselIdentifier,
        time_span_hours: u32,
    ) -> Result<Vec<TrackPoint>, ProviderError> {
        let mut params = vec![Self::identifier_params(id)];
        params.push(("days", ((time_span_hours + 23) / 24).max(1).to_string()));

        let raw: Vec<RawTrackPoint> = self.request("shiptrack", &params).await?;

        Ok(raw
            .into_iter()
            .filter_map(|r| {
                Some(TrackPoint {
                    lat: parse_f64(&r.lat)?,
                    lon: parse_f64(&r.lon)?,
                    speed: parse_f64_opt(&r.speed).map(|s| s / 10.0),
                    course: parse_f64_opt(&r.course),
                    timestamp: parse_timestamp(&r.timestamp)?,
                })
            })
            .collect())
    }

    async fn port_info(&self, port: &PortSelector) -> Result<Option<Port>, ProviderError> {
        let params = vec![match port {
            PortSelector::Id(v) => ("portid", v.clone()),
            PortSelector::Name(v) => ("portname", v.clone()),
        }];
        let raw: Vec<RawPort> = self.request("portinfo", &params).await?;

        Ok(raw.into_iter().next().and_then(|r| {
            Some(Port {
                id: r.id,
                name: r.name,
                country: r.country.unwrap_or_default(),
                lat: parse_f64(&r.lat)?,
                lon: parse_f64(&r.lon)?,
                harbor_size: None,
                oil_terminal_depth: None,
                liquid_bulk_facilities: None,
            })
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(server: &mockito::ServerGuard) -> MarineTrafficClient {
        MarineTrafficClient::new("test-key").with_base_url(server.url())
    }

    #[tokio::test]
    async fn test_vessels_in_area_parses_positions() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/exportvessels/test-key")
            .match_query(mockito::Matcher::UrlEncoded(
                "MINLAT".into(),
                "35".into(),
            ))
            .with_status(200)
            .with_body(
                r#"[{"MMSI":"538005120","IMO":"9395044","SHIPNAME":"PACIFIC TRADER",
                    "SHIPTYPE":"8","LAT":"36.5","LON":"128.2","SPEED":"124",
                    "COURSE":"87","HEADING":"90","STATUS":"0",
                    "TIMESTAMP":"2024-03-01T09:39:57"}]"#,
            )
            .create_async()
            .await;

        let bounds = BoundingBox::new(35.0, 38.0, 126.0, 130.0);
        let vessels = client(&server)
            .vessels_in_area(&bounds, None)
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(vessels.len(), 1);
        let v = &vessels[0];
        assert_eq!(v.mmsi, "538005120");
        assert_eq!(v.ship_name.as_deref(), Some("PACIFIC TRADER"));
        // SPEED 124 = 12.4노트
        assert_eq!(v.speed, Some(12.4));
        assert!(v.timestamp.is_some());
    }

    #[tokio::test]
    async fn test_rate_limit_maps_to_rate_limited() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", mockito::Matcher::Any)
            .with_status(429)
            .with_body("quota exceeded")
            .create_async()
            .await;

        let bounds = BoundingBox::new(35.0, 38.0, 126.0, 130.0);
        let err = client(&server)
            .vessels_in_area(&bounds, None)
            .await
            .unwrap_err();

        assert!(matches!(err, ProviderError::RateLimited(_)));
    }

    #[tokio::test]
    async fn test_auth_failure_maps_to_auth() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", mockito::Matcher::Any)
            .with_status(403)
            .with_body("invalid key")
            .create_async()
            .await;

        let bounds = BoundingBox::new(35.0, 38.0, 126.0, 130.0);
        let err = client(&server)
            .vessels_in_area(&bounds, None)
            .await
            .unwrap_err();

        assert!(matches!(err, ProviderError::Auth(_)));
    }

    #[tokio::test]
    async fn test_server_error_maps_to_network_not_empty() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", mockito::Matcher::Any)
            .with_status(502)
            .create_async()
            .await;

        let bounds = BoundingBox::new(35.0, 38.0, 126.0, 130.0);
        let result = client(&server).vessels_in_area(&bounds, None).await;

        // 실패가 빈 목록으로 둔갑하면 안 됨
        assert!(matches!(result, Err(ProviderError::Network(_))));
    }

    #[tokio::test]
    async fn test_bad_json_maps_to_malformed() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", mockito::Matcher::Any)
            .with_status(200)
            .with_body("<html>maintenance</html>")
            .create_async()
            .await;

        let bounds = BoundingBox::new(35.0, 38.0, 126.0, 130.0);
        let err = client(&server)
            .vessels_in_area(&bounds, None)
            .await
            .unwrap_err();

        assert!(matches!(err, ProviderError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_vessel_details_by_imo() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/vesselmasterdata/test-key")
            .match_query(mockito::Matcher::UrlEncoded(
                "imo".into(),
                "9395044".into(),
            ))
            .with_status(200)
            .with_body(
                r#"[{"MMSI":"538005120","IMO":"9395044","SHIPNAME":"PACIFIC TRADER",
                    "VESSEL_TYPE":"Tanker","FLAG":"MH","LENGTH_OVERALL":"333",
                    "SUMMER_DWT":"320000","YEAR_BUILT":"2009"}]"#,
            )
            .create_async()
            .await;

        let id = VesselIdentifier::Imo("9395044".to_string());
        let details = client(&server).vessel_details(&id).await.unwrap().unwrap();

        assert_eq!(details.flag.as_deref(), Some("MH"));
        assert_eq!(details.year_built, Some(2009));
        assert_eq!(details.length, Some(333.0));
    }

    #[tokio::test]
    async fn test_vessel_details_not_found_is_none() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", mockito::Matcher::Any)
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let id = VesselIdentifier::Mmsi("000000000".to_string());
        let details = client(&server).vessel_details(&id).await.unwrap();
        assert!(details.is_none());
    }

    #[tokio::test]
    async fn test_port_info_by_name_queries_portname() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/portinfo/test-key")
            .match_query(mockito::Matcher::UrlEncoded(
                "portname".into(),
                "Busan".into(),
            ))
            .with_status(200)
            .with_body(
                r#"[{"PORT_ID":"KRPUS","PORT_NAME":"BUSAN","COUNTRY":"KR",
                    "LAT":"35.1","LON":"129.0"}]"#,
            )
            .create_async()
            .await;

        let port = client(&server)
            .port_info(&PortSelector::Name("Busan".to_string()))
            .await
            .unwrap()
            .unwrap();

        mock.assert_async().await;
        assert_eq!(port.id, "KRPUS");
        assert_eq!(port.country, "KR");
    }

    #[tokio::test]
    async fn test_vessel_track_rounds_hours_up_to_days() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/shiptrack/test-key")
            .match_query(mockito::Matcher::UrlEncoded("days".into(), "2".into()))
            .with_status(200)
            .with_body(
                r#"[{"LAT":"36.5","LON":"128.2","SPEED":"110","COURSE":"85",
                    "TIMESTAMP":"2024-03-01T08:00:00"}]"#,
            )
            .create_async()
            .await;

        let id = VesselIdentifier::Mmsi("538005120".to_string());
        let track = client(&server).vessel_track(&id, 36).await.unwrap();

        mock.assert_async().await;
        assert_eq!(track.len(), 1);
        assert_eq!(track[0].speed, Some(11.0));
    }
}
