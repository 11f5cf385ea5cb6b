// src/api/handlers/status.rs

use crate::{
    constants,
    platform::{self, PlatformInfo},
};
use axum::Json;

pub async fn liveness() -> &'static str {
    constants::LIVENESS_TEXT
}

/// 支持识别的平台，按匹配优先级排列
pub async fn list_platforms() -> Json<Vec<PlatformInfo>> {
    Json(
        platform::rules()
            .iter()
            .map(|rule| rule.platform.info())
            .collect(),
    )
}
