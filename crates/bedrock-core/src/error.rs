//! 플랫폼 공통 에러 타입.
//!
//! 이 모듈은 플랫폼 전반에서 사용되는 에러 타입을 정의합니다.

use thiserror::Error;

/// 핵심 플랫폼 에러.
#[derive(Debug, Error)]
pub enum BedrockError {
    /// 설정 에러
    #[error("설정 에러: {0}")]
    Config(String),

    /// 업스트림 데이터 소스 에러
    #[error("업스트림 에러: {0}")]
    Upstream(String),

    /// 요청 한도 초과
    #[error("요청 한도 초과: {0}")]
    RateLimit(String),

    /// 인증 에러
    #[error("인증 에러: {0}")]
    Auth(String),

    /// 네트워크 에러
    #[error("네트워크 에러: {0}")]
    Network(String),

    /// 직렬화 에러
    #[error("직렬화 에러: {0}")]
    Serialization(String),

    /// 캐시 에러
    #[error("캐시 에러: {0}")]
    Cache(String),

    /// 잘못된 입력
    #[error("잘못된 입력: {0}")]
    InvalidInput(String),

    /// 찾을 수 없음
    #[error("찾을 수 없음: {0}")]
    NotFound(String),

    /// 내부 에러
    #[error("내부 에러: {0}")]
    Internal(String),
}

/// 플랫폼 작업을 위한 Result 타입.
pub type BedrockResult<T> = Result<T, BedrockError>;

impl BedrockError {
    /// 재시도 가능한 에러인지 확인합니다.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            BedrockError::Network(_) | BedrockError::RateLimit(_) | BedrockError::Cache(_)
        )
    }
}

impl From<serde_json::Error> for BedrockError {
    fn from(err: serde_json::Error) -> Self {
        BedrockError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_retryable() {
        let network_err = BedrockError::Network("timeout".to_string());
        assert!(network_err.is_retryable());

        let auth_err = BedrockError::Auth("invalid key".to_string());
        assert!(!auth_err.is_retryable());
    }

    #[test]
    fn test_serde_error_conversion() {
        let parse_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err: BedrockError = parse_err.into();
        assert!(matches!(err, BedrockError::Serialization(_)));
    }
}
