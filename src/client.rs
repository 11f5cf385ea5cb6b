// src/client.rs

use crate::{config::ProxyConfig, error::*};
use reqwest::{IntoUrl, Response, header};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use std::time::Duration;

const RETRY_MIN_INTERVAL: Duration = Duration::from_millis(200);
const RETRY_MAX_INTERVAL: Duration = Duration::from_secs(5);

/// 代理上游请求用的客户端。
/// 不设置整体超时：大文件传输可能持续很久，超时由代理层按阶段控制。
#[derive(Clone)]
pub struct RobustClient {
    pub client: ClientWithMiddleware,
}

impl RobustClient {
    pub fn new(config: &ProxyConfig) -> AppResult<Self> {
        let retry_policy = ExponentialBackoff::builder()
            .retry_bounds(RETRY_MIN_INTERVAL, RETRY_MAX_INTERVAL)
            .build_with_max_retries(config.max_retries);
        let inner = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .connect_timeout(config.connect_timeout)
            .build()?;
        let client = ClientBuilder::new(inner)
            // 重试只发生在收到响应头之前，已开始的传输不会重放
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();

        Ok(Self { client })
    }

    /// 发起 GET 请求，可选地附带客户端的 Range 头
    pub async fn get<T: IntoUrl>(
        &self,
        url: T,
        range: Option<&header::HeaderValue>,
    ) -> Result<Response, reqwest_middleware::Error> {
        let mut request = self.client.get(url);
        if let Some(range) = range {
            request = request.header(header::RANGE, range.clone());
        }
        request.send().await
    }
}
