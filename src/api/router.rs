// src/api/router.rs

use super::handlers;
use crate::state::AppState;
use axum::{
    Router,
    extract::Request,
    middleware::{self, Next},
    response::Response,
    routing::get,
};
use log::info;
use std::time::Instant;
use tower_http::cors::CorsLayer;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::liveness))
        .route(
            "/api/fetch",
            get(handlers::fetch_media_query).post(handlers::fetch_media),
        )
        .route("/api/proxy", get(handlers::proxy_media))
        .route("/api/platforms", get(handlers::list_platforms))
        .layer(middleware::from_fn(log_request))
        // 前端可能部署在任意域名下
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// 每个请求一行访问日志
async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(request).await;

    // 代理请求在这里只统计到响应头发出为止
    info!(
        "{} {} {} - {:.1?}",
        method,
        path,
        response.status().as_u16(),
        started.elapsed()
    );
    response
}
