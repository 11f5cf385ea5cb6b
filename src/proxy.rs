// src/proxy.rs

//! 下载代理：把上游媒体地址的响应原样转发给调用方。
//! 响应头到达后立即转发，正文逐块读取、逐块写出，内存占用与文件大小无关。

use crate::{client::RobustClient, config::ProxyConfig, utils};
use axum::{
    body::{Body, Bytes},
    http::{HeaderName, HeaderValue},
    response::Response,
};
use indicatif::HumanBytes;
use log::{debug, error, info};
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::time::timeout;
use url::Url;

#[derive(Error, Debug)]
pub enum ProxyError {
    #[error("无效的目标地址: {0}")]
    InvalidTarget(String),
    #[error("无法连接上游服务器: {0}")]
    UpstreamUnreachable(String),
    #[error("上游传输中断: {0}")]
    UpstreamMidStreamFailure(String),
}

impl ProxyError {
    pub fn kind(&self) -> &'static str {
        match self {
            ProxyError::InvalidTarget(_) => "invalid_target",
            ProxyError::UpstreamUnreachable(_) => "upstream_unreachable",
            ProxyError::UpstreamMidStreamFailure(_) => "upstream_failure",
        }
    }
}

/// 逐跳头只对单个连接有效，不能转发
fn is_hop_by_hop(name: &HeaderName) -> bool {
    let name = name.as_str();
    matches!(
        name,
        "connection" | "keep-alive" | "te" | "trailer" | "transfer-encoding" | "upgrade"
    ) || name.starts_with("proxy-")
}

pub fn validate_target(raw: Option<&str>) -> Result<Url, ProxyError> {
    let raw = raw.map(str::trim).unwrap_or_default();
    if raw.is_empty() {
        return Err(ProxyError::InvalidTarget("缺少 url 参数".to_string()));
    }
    utils::parse_http_url(raw).ok_or_else(|| {
        ProxyError::InvalidTarget(format!("'{}'", utils::truncate_text(raw, 120)))
    })
}

/// 日志中只记录主机和路径，签名参数通常放在查询串里
fn describe(url: &Url) -> String {
    format!(
        "{}{}",
        url.host_str().unwrap_or_default(),
        utils::truncate_text(url.path(), 60)
    )
}

pub async fn forward(
    client: &RobustClient,
    config: &ProxyConfig,
    target: Url,
    range: Option<HeaderValue>,
) -> Result<Response, ProxyError> {
    let label = describe(&target);
    let started = Instant::now();

    let upstream = match timeout(config.header_timeout, client.get(target, range.as_ref())).await {
        Ok(Ok(response)) => response,
        Ok(Err(e)) => return Err(ProxyError::UpstreamUnreachable(e.to_string())),
        Err(_) => {
            return Err(ProxyError::UpstreamUnreachable(format!(
                "{} 秒内未收到响应头",
                config.header_timeout.as_secs()
            )));
        }
    };

    let status = upstream.status();
    debug!("上游响应 {} <- {}", status, label);

    let mut builder = Response::builder().status(status);
    for (name, value) in upstream.headers() {
        if !is_hop_by_hop(name) {
            builder = builder.header(name, value);
        }
    }

    let transfer = Transfer {
        upstream,
        idle_timeout: config.idle_timeout,
        label,
        bytes: 0,
        started,
        finished: false,
    };
    let stream = futures::stream::try_unfold(transfer, |mut transfer| async move {
        match transfer.next_chunk().await {
            Ok(Some(chunk)) => Ok(Some((chunk, transfer))),
            Ok(None) => {
                transfer.finish();
                Ok(None)
            }
            Err(e) => {
                transfer.fail(&e);
                Err(e)
            }
        }
    });

    builder
        .body(Body::from_stream(stream))
        .map_err(|e| ProxyError::UpstreamUnreachable(format!("构建响应失败: {}", e)))
}

/// 一次转发的状态。被提前丢弃意味着调用方断开了连接，上游连接随之关闭。
struct Transfer {
    upstream: reqwest::Response,
    idle_timeout: Duration,
    label: String,
    bytes: u64,
    started: Instant,
    finished: bool,
}

impl Transfer {
    async fn next_chunk(&mut self) -> Result<Option<Bytes>, ProxyError> {
        match timeout(self.idle_timeout, self.upstream.chunk()).await {
            Ok(Ok(Some(chunk))) => {
                self.bytes += chunk.len() as u64;
                Ok(Some(chunk))
            }
            Ok(Ok(None)) => Ok(None),
            Ok(Err(e)) => Err(ProxyError::UpstreamMidStreamFailure(e.to_string())),
            Err(_) => Err(ProxyError::UpstreamMidStreamFailure(format!(
                "{} 秒内未收到数据",
                self.idle_timeout.as_secs()
            ))),
        }
    }

    fn finish(&mut self) {
        self.finished = true;
        info!(
            "转发完成: {} ({}, 用时 {:.1?})",
            self.label,
            HumanBytes(self.bytes),
            self.started.elapsed()
        );
    }

    fn fail(&mut self, e: &ProxyError) {
        self.finished = true;
        error!(
            "转发中断: {} (已发送 {}): {}",
            self.label,
            HumanBytes(self.bytes),
            e
        );
    }
}

impl Drop for Transfer {
    fn drop(&mut self) {
        if !self.finished {
            debug!(
                "调用方已断开: {} (已发送 {})",
                self.label,
                HumanBytes(self.bytes)
            );
        }
    }
}
