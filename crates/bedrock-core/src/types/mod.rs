//! 도메인 타입.
//!
//! 선박, 항구, 가격, 뉴스 등 플랫폼 전반에서 공유되는 타입 정의.

pub mod geo;
pub mod news;
pub mod port;
pub mod price;
pub mod vessel;
