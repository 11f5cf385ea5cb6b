// src/api/handlers/proxy.rs

use crate::{
    error::AppResult,
    models::ProxyQuery,
    proxy::{self, ProxyError},
    state::AppState,
};
use axum::{
    extract::{Query, State, rejection::QueryRejection},
    http::{HeaderMap, header},
    response::Response,
};

pub async fn proxy_media(
    State(state): State<AppState>,
    query: Result<Query<ProxyQuery>, QueryRejection>,
    headers: HeaderMap,
) -> AppResult<Response> {
    let Query(query) = query.map_err(|e| ProxyError::InvalidTarget(e.body_text()))?;
    let target = proxy::validate_target(query.url.as_deref())?;
    // 转发 Range 头，播放器拖动进度时需要
    let range = headers.get(header::RANGE).cloned();

    let response = proxy::forward(&state.http_client, &state.config.proxy, target, range).await?;
    Ok(response)
}
