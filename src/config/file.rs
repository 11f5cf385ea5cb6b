// src/config/file.rs

use crate::error::{AppError, AppResult};
use anyhow::Context;
use log::info;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ServerSection {
    pub host: Option<String>,
    pub port: Option<u16>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ExtractorSection {
    pub binary: Option<String>,
    pub timeout_secs: Option<u64>,
    pub no_check_certificates: Option<bool>,
    pub prefer_free_formats: Option<bool>,
    pub extra_args: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProxySection {
    pub user_agent: Option<String>,
    pub connect_timeout_secs: Option<u64>,
    pub header_timeout_secs: Option<u64>,
    pub idle_timeout_secs: Option<u64>,
    pub max_retries: Option<u32>,
}

/// 配置文件的结构，所有字段均可省略
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ExternalConfig {
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub extractor: ExtractorSection,
    #[serde(default)]
    pub proxy: ProxySection,
}

pub(crate) fn load_external_config(path: &Path) -> AppResult<ExternalConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("读取配置文件 '{}' 失败", path.display()))
        .map_err(|e| AppError::Config(format!("{:#}", e)))?;
    let config = serde_json::from_str(&content)
        .with_context(|| format!("解析配置文件 '{}' 失败", path.display()))
        .map_err(|e| AppError::Config(format!("{:#}", e)))?;
    info!("已加载配置文件: {}", path.display());
    Ok(config)
}
