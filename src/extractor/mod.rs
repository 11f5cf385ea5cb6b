// src/extractor/mod.rs

mod error;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod ytdlp;

pub use error::ExtractionError;
pub use ytdlp::YtDlpExtractor;

use async_trait::async_trait;
use serde_json::Value;

/// 外部解析工具输出的原始 JSON，只由 normalizer 读取
#[derive(Debug, Clone, PartialEq)]
pub struct RawExtraction(pub Value);

impl RawExtraction {
    pub fn value(&self) -> &Value {
        &self.0
    }
}

impl From<Value> for RawExtraction {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

#[async_trait]
pub trait MediaExtractor: Send + Sync {
    /// 解析器名称 (用于日志)
    fn name(&self) -> &'static str;

    async fn extract(&self, url: &str) -> Result<RawExtraction, ExtractionError>;
}
