//! 인메모리 항구 디렉터리.
//!
//! JSON 덤프에서 로드한 항구 데이터에 대한 지리/텍스트 조회를
//! 제공합니다. 데이터셋이 작고 정적이므로 영속 저장소 없이
//! 메모리에서 직접 질의합니다.

use std::path::Path;

use tracing::info;

use bedrock_core::{BoundingBox, Port};

use crate::error::{DataError, Result};

/// 항구 디렉터리.
pub struct PortDirectory {
    ports: Vec<Port>,
}

impl PortDirectory {
    /// 빈 디렉터리 생성.
    pub fn empty() -> Self {
        Self { ports: Vec::new() }
    }

    /// 항구 목록으로 디렉터리 생성.
    pub fn new(ports: Vec<Port>) -> Self {
        Self { ports }
    }

    /// JSON 문자열에서 로드.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let ports: Vec<Port> =
            serde_json::from_str(json).map_err(|e| DataError::ParseError(e.to_string()))?;
        Ok(Self::new(ports))
    }

    /// JSON 파일에서 로드.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| DataError::FetchError(format!("{}: {}", path.display(), e)))?;
        let directory = Self::from_json_str(&json)?;
        info!(count = directory.len(), path = %path.display(), "Port directory loaded");
        Ok(directory)
    }

    /// 등록된 항구 수.
    pub fn len(&self) -> usize {
        self.ports.len()
    }

    /// 디렉터리가 비어 있는지 확인.
    pub fn is_empty(&self) -> bool {
        self.ports.is_empty()
    }

    /// 뷰포트 내 항구 조회.
    pub fn in_bounds(&self, bounds: &BoundingBox) -> Vec<Port> {
        self.ports
            .iter()
            .filter(|p| bounds.contains(p.lat, p.lon))
            .cloned()
            .collect()
    }

    /// 국가 코드로 조회 (대소문자 무시).
    pub fn by_country(&self, country: &str) -> Vec<Port> {
        let country = country.to_uppercase();
        self.ports
            .iter()
            .filter(|p| p.country.to_uppercase() == country)
            .cloned()
            .collect()
    }

    /// 이름 부분 일치 검색 (대소문자 무시).
    pub fn search(&self, query: &str) -> Vec<Port> {
        let query = query.to_lowercase();
        if query.trim().is_empty() {
            return Vec::new();
        }
        self.ports
            .iter()
            .filter(|p| p.name.to_lowercase().contains(&query))
            .cloned()
            .collect()
    }

    /// 석유 설비 보유 항구 조회.
    pub fn oil_facilities(&self) -> Vec<Port> {
        self.ports
            .iter()
            .filter(|p| p.has_oil_facilities())
            .cloned()
            .collect()
    }

    /// ID로 단건 조회 (대소문자 무시).
    pub fn by_id(&self, id: &str) -> Option<Port> {
        let id = id.to_uppercase();
        self.ports
            .iter()
            .find(|p| p.id.to_uppercase() == id)
            .cloned()
    }
}
