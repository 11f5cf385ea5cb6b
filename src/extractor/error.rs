// src/extractor/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractionError {
    /// 解析工具未安装或不在 PATH 中
    #[error("解析工具 '{program}' 不可用: {reason}")]
    NotAvailable { program: String, reason: String },

    /// 进程无法启动，或以非零状态退出
    #[error("解析工具执行失败 ({status}): {stderr}")]
    ExecutionFailed { status: String, stderr: String },

    /// 进程正常退出，但输出不是预期的 JSON 对象
    #[error("无法解析解析工具的输出: {message}")]
    ParseFailure { message: String, output: String },

    #[error("解析超时 (超过 {secs} 秒)")]
    TimedOut { secs: u64 },
}

impl ExtractionError {
    pub fn kind(&self) -> &'static str {
        match self {
            ExtractionError::NotAvailable { .. } => "not_available",
            ExtractionError::ExecutionFailed { .. } => "execution_failed",
            ExtractionError::ParseFailure { .. } => "parse_failure",
            ExtractionError::TimedOut { .. } => "timed_out",
        }
    }

    /// 用于排查问题的原始输出片段
    pub fn diagnostics(&self) -> Option<&str> {
        match self {
            ExtractionError::ExecutionFailed { stderr, .. } if !stderr.is_empty() => Some(stderr),
            ExtractionError::ParseFailure { output, .. } if !output.is_empty() => Some(output),
            _ => None,
        }
    }
}
