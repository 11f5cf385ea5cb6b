// src/state.rs

use crate::{
    client::RobustClient,
    config::AppConfig,
    error::AppResult,
    extractor::MediaExtractor,
};
use std::sync::Arc;

/// 所有请求共享的只读依赖，启动时构建一次
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub extractor: Arc<dyn MediaExtractor>,
    pub http_client: Arc<RobustClient>,
}

impl AppState {
    pub fn new(
        config: Arc<AppConfig>,
        extractor: Arc<dyn MediaExtractor>,
    ) -> AppResult<Self> {
        let http_client = Arc::new(RobustClient::new(&config.proxy)?);
        Ok(Self {
            config,
            extractor,
            http_client,
        })
    }
}
