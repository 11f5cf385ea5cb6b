// src/cli.rs

use clap::{Parser, ValueEnum, crate_version};
use std::path::PathBuf;

/// 定义日志输出级别
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => log::LevelFilter::Off,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

// command 属性
#[derive(Parser, Debug, Clone)]
#[command(
    version = crate_version!(),
    about,
    long_about = None,
    disable_help_flag = true,
    disable_version_flag = true,
)]
pub struct Cli {
    // --- 服务 (Server) ---
    /// 监听地址 (默认: 0.0.0.0)
    #[arg(long, value_name = "HOST", help_heading = "Server")]
    pub host: Option<String>,
    /// 监听端口 (默认: 4000)
    #[arg(short, long, env = "PORT", value_name = "PORT", help_heading = "Server")]
    pub port: Option<u16>,
    /// 从 JSON 文件加载配置，命令行参数优先级更高
    #[arg(short, long, value_name = "FILE", help_heading = "Server")]
    pub config: Option<PathBuf>,

    // --- 解析器 (Extractor) ---
    /// yt-dlp 可执行文件路径 (默认: 在 PATH 中查找 yt-dlp)
    #[arg(long, env = "YTDLP_PATH", value_name = "PATH", help_heading = "Extractor")]
    pub ytdlp_path: Option<String>,
    /// 单次解析的超时时间 (秒)
    #[arg(long, value_name = "SECS", help_heading = "Extractor")]
    pub extract_timeout: Option<u64>,
    /// 跳过 HTTPS 证书校验 (不推荐)
    #[arg(long, action = clap::ArgAction::SetTrue, help_heading = "Extractor")]
    pub no_check_certificates: bool,

    // --- 代理 (Proxy) ---
    /// 代理下载时上游无数据的最长等待时间 (秒)
    #[arg(long, value_name = "SECS", help_heading = "Proxy")]
    pub proxy_idle_timeout: Option<u64>,

    // --- 通用选项 (General) ---
    /// 显示此帮助信息并退出
    #[arg(short = 'h', long, action = clap::ArgAction::Help, global = true, help_heading = "General")]
    _help: Option<bool>,
    /// 显示版本信息并退出
    #[arg(short = 'V', long, action = clap::ArgAction::Version, global = true, help_heading = "General")]
    _version: Option<bool>,
    /// 日志输出级别
    #[arg(long, value_enum, default_value_t = LogLevel::Info, help_heading = "General")]
    pub log_level: LogLevel,
    /// 额外将日志写入该文件
    #[arg(long, value_name = "FILE", help_heading = "General")]
    pub log_file: Option<PathBuf>,
}
