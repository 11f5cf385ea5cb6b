// src/extractor/testing.rs

use super::{ExtractionError, MediaExtractor, RawExtraction};
use async_trait::async_trait;
use serde_json::Value;
use std::{collections::HashMap, time::Duration};

/// 不启动任何进程的解析器替身：按链接返回预设结果
#[derive(Default)]
pub struct CannedExtractor {
    responses: HashMap<String, Canned>,
    fallback: Option<Value>,
}

struct Canned {
    result: Result<Value, fn() -> ExtractionError>,
    delay: Duration,
}

impl CannedExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_response(mut self, url: &str, value: Value) -> Self {
        self.responses.insert(
            url.to_string(),
            Canned {
                result: Ok(value),
                delay: Duration::ZERO,
            },
        );
        self
    }

    pub fn with_delayed_response(mut self, url: &str, value: Value, delay: Duration) -> Self {
        self.responses.insert(
            url.to_string(),
            Canned {
                result: Ok(value),
                delay,
            },
        );
        self
    }

    pub fn with_error(mut self, url: &str, error: fn() -> ExtractionError) -> Self {
        self.responses.insert(
            url.to_string(),
            Canned {
                result: Err(error),
                delay: Duration::ZERO,
            },
        );
        self
    }

    /// 未预设的链接返回该结果；不设置时返回 ExecutionFailed
    pub fn with_fallback(mut self, value: Value) -> Self {
        self.fallback = Some(value);
        self
    }
}

#[async_trait]
impl MediaExtractor for CannedExtractor {
    fn name(&self) -> &'static str {
        "canned"
    }

    async fn extract(&self, url: &str) -> Result<RawExtraction, ExtractionError> {
        match self.responses.get(url) {
            Some(canned) => {
                if !canned.delay.is_zero() {
                    tokio::time::sleep(canned.delay).await;
                }
                match &canned.result {
                    Ok(value) => Ok(RawExtraction(value.clone())),
                    Err(make_error) => Err(make_error()),
                }
            }
            None => self
                .fallback
                .clone()
                .map(RawExtraction)
                .ok_or_else(|| ExtractionError::ExecutionFailed {
                    status: "exit status: 1".to_string(),
                    stderr: format!("ERROR: Unsupported URL: {}", url),
                }),
        }
    }
}
