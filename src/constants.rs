// src/constants.rs

use std::time::Duration;

pub const UI_WIDTH: usize = 72;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 4000;
pub const DEFAULT_YTDLP_BINARY: &str = "yt-dlp";
pub const LIVENESS_TEXT: &str = "Universal Downloader Backend is running.";
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

pub const DEFAULT_EXTRACT_TIMEOUT: Duration = Duration::from_secs(120);
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_HEADER_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(60);
pub const DEFAULT_MAX_RETRIES: u32 = 2;

/// 错误信息中附带的 stderr / stdout 片段的最大字节数
pub const MAX_DIAGNOSTIC_BYTES: usize = 2000;

pub mod media {
    pub const UNKNOWN_NOTE: &str = "unknown";
    pub const UNKNOWN_EXT: &str = "unknown";
    pub const UNTITLED: &str = "Untitled";
}

pub mod ytdlp_flags {
    pub const DUMP_SINGLE_JSON: &str = "--dump-single-json";
    pub const NO_WARNINGS: &str = "--no-warnings";
    pub const PREFER_FREE_FORMATS: &str = "--prefer-free-formats";
    pub const NO_CHECK_CERTIFICATES: &str = "--no-check-certificates";
    pub const END_OF_OPTIONS: &str = "--";
}
