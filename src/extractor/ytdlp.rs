// src/extractor/ytdlp.rs

use super::{ExtractionError, MediaExtractor, RawExtraction};
use crate::{
    config::ExtractorConfig,
    constants::{self, ytdlp_flags},
    utils,
};
use async_trait::async_trait;
use log::{debug, info, warn};
use std::{
    io,
    process::{Output, Stdio},
    time::{Duration, Instant},
};
use tokio::{process::Command, time::timeout};

const VERSION_PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// 通过 yt-dlp 可执行文件获取媒体元数据
pub struct YtDlpExtractor {
    config: ExtractorConfig,
}

impl YtDlpExtractor {
    pub fn new(config: ExtractorConfig) -> Self {
        Self { config }
    }

    /// 构建命令行参数。链接放在 `--` 之后，避免被当作选项解析。
    pub(crate) fn build_args(&self, url: &str) -> Vec<String> {
        let mut args = vec![
            ytdlp_flags::DUMP_SINGLE_JSON.to_string(),
            ytdlp_flags::NO_WARNINGS.to_string(),
        ];
        if self.config.prefer_free_formats {
            args.push(ytdlp_flags::PREFER_FREE_FORMATS.to_string());
        }
        if self.config.no_check_certificates {
            args.push(ytdlp_flags::NO_CHECK_CERTIFICATES.to_string());
        }
        args.extend(self.config.extra_args.iter().cloned());
        args.push(ytdlp_flags::END_OF_OPTIONS.to_string());
        args.push(url.to_string());
        args
    }

    fn command(&self, args: &[String]) -> Command {
        let mut cmd = Command::new(&self.config.binary);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }

    fn spawn_error(&self, err: io::Error) -> ExtractionError {
        match err.kind() {
            io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied => {
                ExtractionError::NotAvailable {
                    program: self.config.binary.clone(),
                    reason: err.to_string(),
                }
            }
            _ => ExtractionError::ExecutionFailed {
                status: "无法启动进程".to_string(),
                stderr: err.to_string(),
            },
        }
    }

    /// 检查 yt-dlp 是否可用，返回其版本号
    pub async fn version(&self) -> Result<String, ExtractionError> {
        let child = self
            .command(&["--version".to_string()])
            .spawn()
            .map_err(|e| self.spawn_error(e))?;
        let output = match timeout(VERSION_PROBE_TIMEOUT, child.wait_with_output()).await {
            Ok(result) => result.map_err(|e| self.spawn_error(e))?,
            Err(_) => {
                return Err(ExtractionError::TimedOut {
                    secs: VERSION_PROBE_TIMEOUT.as_secs(),
                });
            }
        };
        if !output.status.success() {
            return Err(Self::execution_failed(&output));
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    fn execution_failed(output: &Output) -> ExtractionError {
        ExtractionError::ExecutionFailed {
            status: output.status.to_string(),
            stderr: utils::tail_lossy(&output.stderr, constants::MAX_DIAGNOSTIC_BYTES),
        }
    }

    pub(crate) fn parse_output(stdout: &[u8], stderr: &[u8]) -> Result<RawExtraction, ExtractionError> {
        let diagnostics = || {
            if stdout.iter().all(u8::is_ascii_whitespace) {
                utils::tail_lossy(stderr, constants::MAX_DIAGNOSTIC_BYTES)
            } else {
                utils::head_lossy(stdout, constants::MAX_DIAGNOSTIC_BYTES)
            }
        };
        match serde_json::from_slice::<serde_json::Value>(stdout) {
            Ok(value) if value.is_object() => Ok(RawExtraction(value)),
            Ok(_) => Err(ExtractionError::ParseFailure {
                message: "输出不是 JSON 对象".to_string(),
                output: diagnostics(),
            }),
            Err(e) => Err(ExtractionError::ParseFailure {
                message: e.to_string(),
                output: diagnostics(),
            }),
        }
    }
}

#[async_trait]
impl MediaExtractor for YtDlpExtractor {
    fn name(&self) -> &'static str {
        "yt-dlp"
    }

    async fn extract(&self, url: &str) -> Result<RawExtraction, ExtractionError> {
        let args = self.build_args(url);
        debug!("执行解析命令: {} {}", self.config.binary, args.join(" "));

        let started = Instant::now();
        let child = self.command(&args).spawn().map_err(|e| {
            let err = self.spawn_error(e);
            warn!("启动 '{}' 失败: {}", self.config.binary, err);
            err
        })?;

        // 超时或调用方断开时 future 被丢弃，kill_on_drop 会结束子进程
        let output = match timeout(self.config.timeout, child.wait_with_output()).await {
            Ok(result) => result.map_err(|e| ExtractionError::ExecutionFailed {
                status: "等待进程失败".to_string(),
                stderr: e.to_string(),
            })?,
            Err(_) => {
                warn!(
                    "解析 '{}' 超时 ({} 秒)，已终止子进程",
                    utils::truncate_text(url, 80),
                    self.config.timeout.as_secs()
                );
                return Err(ExtractionError::TimedOut {
                    secs: self.config.timeout.as_secs(),
                });
            }
        };

        if !output.status.success() {
            let err = Self::execution_failed(&output);
            warn!("解析 '{}' 失败: {}", utils::truncate_text(url, 80), err);
            return Err(err);
        }

        let raw = Self::parse_output(&output.stdout, &output.stderr)?;
        info!(
            "解析完成: '{}' (耗时 {:.2?}, 输出 {} 字节)",
            utils::truncate_text(url, 80),
            started.elapsed(),
            output.stdout.len()
        );
        Ok(raw)
    }
}
