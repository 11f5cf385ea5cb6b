// src/models.rs

use crate::{error::ErrorBody, platform::PlatformInfo};
use serde::{Deserialize, Serialize};

/// 单个可下载的媒体格式
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NormalizedFormat {
    pub id: String,
    pub ext: String,
    pub note: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
    /// 字节数；`null` 表示未知，而不是 0
    pub size: Option<u64>,
    pub url: String,
}

/// `/api/fetch` 的稳定返回结构，与具体解析器无关
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MediaInfo {
    pub title: String,
    pub thumbnail: Option<String>,
    pub duration: Option<f64>,
    pub formats: Vec<NormalizedFormat>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct FetchRequest {
    pub url: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct ProxyQuery {
    pub url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FetchSuccess {
    pub platform: PlatformInfo,
    #[serde(flatten)]
    pub media: MediaInfo,
}

/// 出错时同样返回 200，错误信息放在 `error` 字段中，兼容只检查该字段的客户端
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum FetchResponse {
    Success(FetchSuccess),
    Failure(ErrorBody),
}
