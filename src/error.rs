// src/error.rs

use crate::{extractor::ExtractionError, proxy::ProxyError};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")] // 只打印内部信息，不加任何前缀
    Validation(String),
    #[error(transparent)]
    Extraction(#[from] ExtractionError),
    #[error(transparent)]
    Proxy(#[from] ProxyError),
    #[error("配置错误: {0}")]
    Config(String),
    #[error("网络请求失败: {0}")]
    Network(#[from] reqwest::Error),
    #[error("I/O 错误: {0}")]
    Io(#[from] std::io::Error),
}

pub type AppResult<T> = Result<T, AppError>;

/// API 错误响应体
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl AppError {
    /// 面向客户端的稳定错误代码
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "validation",
            AppError::Extraction(e) => e.kind(),
            AppError::Proxy(e) => e.kind(),
            _ => "internal",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Extraction(ExtractionError::TimedOut { .. }) => StatusCode::GATEWAY_TIMEOUT,
            AppError::Extraction(_) => StatusCode::BAD_GATEWAY,
            AppError::Proxy(ProxyError::InvalidTarget(_)) => StatusCode::BAD_REQUEST,
            AppError::Proxy(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn to_body(&self) -> ErrorBody {
        let details = match self {
            AppError::Extraction(e) => e.diagnostics().map(str::to_string),
            _ => None,
        };
        ErrorBody {
            error: self.to_string(),
            kind: self.kind(),
            details,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            log::error!("请求处理失败 ({}): {}", status, self);
        } else {
            log::warn!("请求被拒绝 ({}): {}", status, self);
        }
        (status, Json(self.to_body())).into_response()
    }
}
