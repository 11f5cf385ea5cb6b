// src/api/handlers/fetch.rs

use crate::{
    error::{AppError, AppResult},
    models::{FetchRequest, FetchResponse, FetchSuccess},
    normalizer, platform,
    state::AppState,
    utils,
};
use axum::{
    Json,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
};
use log::{error, info, warn};
use std::time::Instant;

pub async fn fetch_media(
    State(state): State<AppState>,
    payload: Result<Json<FetchRequest>, JsonRejection>,
) -> Json<FetchResponse> {
    let url = match payload {
        Ok(Json(request)) => request.url,
        Err(rejection) => {
            return failure(AppError::Validation(format!(
                "请求体无效: {}",
                rejection.body_text()
            )));
        }
    };
    respond(resolve_media(&state, url.as_deref()).await)
}

/// `GET /api/fetch?url=` 与 POST 行为一致
pub async fn fetch_media_query(
    State(state): State<AppState>,
    query: Result<Query<FetchRequest>, QueryRejection>,
) -> Json<FetchResponse> {
    let url = match query {
        Ok(Query(request)) => request.url,
        Err(rejection) => {
            return failure(AppError::Validation(format!(
                "查询参数无效: {}",
                rejection.body_text()
            )));
        }
    };
    respond(resolve_media(&state, url.as_deref()).await)
}

async fn resolve_media(state: &AppState, url: Option<&str>) -> AppResult<FetchSuccess> {
    let url = utils::normalize_input_url(url)?;
    let platform = platform::classify(&url);
    let started = Instant::now();
    info!(
        "开始解析 [{}] '{}' (解析器: {})",
        platform,
        utils::truncate_text(&url, 80),
        state.extractor.name()
    );

    let raw = state.extractor.extract(&url).await?;
    let media = normalizer::normalize(&raw);
    info!(
        "解析成功 [{}] '{}': {} 个可用格式 (耗时 {:.2?})",
        platform,
        utils::truncate_text(&media.title, 60),
        media.formats.len(),
        started.elapsed()
    );

    Ok(FetchSuccess {
        platform: platform.info(),
        media,
    })
}

/// 解析失败也返回 200，错误放在响应体里
fn respond(result: AppResult<FetchSuccess>) -> Json<FetchResponse> {
    match result {
        Ok(success) => Json(FetchResponse::Success(success)),
        Err(e) => failure(e),
    }
}

fn failure(e: AppError) -> Json<FetchResponse> {
    match &e {
        AppError::Validation(_) => warn!("解析请求被拒绝: {}", e),
        _ => error!("解析失败: {}", e),
    }
    Json(FetchResponse::Failure(e.to_body()))
}
