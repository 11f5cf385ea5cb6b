// src/config.rs

pub mod file;

use self::file::{ExternalConfig, load_external_config};
use crate::{cli::Cli, constants, error::AppResult};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    pub binary: String,
    pub timeout: Duration,
    pub no_check_certificates: bool,
    pub prefer_free_formats: bool,
    pub extra_args: Vec<String>,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            binary: constants::DEFAULT_YTDLP_BINARY.to_string(),
            timeout: constants::DEFAULT_EXTRACT_TIMEOUT,
            // 默认校验证书
            no_check_certificates: false,
            prefer_free_formats: true,
            extra_args: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProxyConfig {
    pub user_agent: String,
    pub connect_timeout: Duration,
    /// 从发出请求到收到响应头的最长时间
    pub header_timeout: Duration,
    /// 两个数据块之间的最长间隔
    pub idle_timeout: Duration,
    pub max_retries: u32,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            user_agent: constants::USER_AGENT.to_string(),
            connect_timeout: constants::DEFAULT_CONNECT_TIMEOUT,
            header_timeout: constants::DEFAULT_HEADER_TIMEOUT,
            idle_timeout: constants::DEFAULT_IDLE_TIMEOUT,
            max_retries: constants::DEFAULT_MAX_RETRIES,
        }
    }
}

/// 启动时构建一次，之后只读
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub extractor: ExtractorConfig,
    pub proxy: ProxyConfig,
}

impl AppConfig {
    pub fn new(args: &Cli) -> AppResult<Self> {
        let external_config = match &args.config {
            Some(path) => load_external_config(path)?,
            None => ExternalConfig::default(),
        };
        Ok(Self::resolve(args, external_config))
    }

    /// 合并顺序: 命令行/环境变量 > 配置文件 > 默认值
    pub fn resolve(args: &Cli, external_config: ExternalConfig) -> Self {
        let ExternalConfig {
            server,
            extractor,
            proxy,
        } = external_config;
        let extractor_defaults = ExtractorConfig::default();
        let proxy_defaults = ProxyConfig::default();
        let secs = Duration::from_secs;

        Self {
            server: ServerConfig {
                host: args
                    .host
                    .clone()
                    .or(server.host)
                    .unwrap_or_else(|| constants::DEFAULT_HOST.to_string()),
                port: args.port.or(server.port).unwrap_or(constants::DEFAULT_PORT),
            },
            extractor: ExtractorConfig {
                binary: args
                    .ytdlp_path
                    .clone()
                    .or(extractor.binary)
                    .unwrap_or(extractor_defaults.binary),
                timeout: args
                    .extract_timeout
                    .or(extractor.timeout_secs)
                    .map(secs)
                    .unwrap_or(extractor_defaults.timeout),
                no_check_certificates: args.no_check_certificates
                    || extractor
                        .no_check_certificates
                        .unwrap_or(extractor_defaults.no_check_certificates),
                prefer_free_formats: extractor
                    .prefer_free_formats
                    .unwrap_or(extractor_defaults.prefer_free_formats),
                extra_args: extractor.extra_args.unwrap_or(extractor_defaults.extra_args),
            },
            proxy: ProxyConfig {
                user_agent: proxy.user_agent.unwrap_or(proxy_defaults.user_agent),
                connect_timeout: proxy
                    .connect_timeout_secs
                    .map(secs)
                    .unwrap_or(proxy_defaults.connect_timeout),
                header_timeout: proxy
                    .header_timeout_secs
                    .map(secs)
                    .unwrap_or(proxy_defaults.header_timeout),
                idle_timeout: args
                    .proxy_idle_timeout
                    .or(proxy.idle_timeout_secs)
                    .map(secs)
                    .unwrap_or(proxy_defaults.idle_timeout),
                max_retries: proxy.max_retries.unwrap_or(proxy_defaults.max_retries),
            },
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(any(test, feature = "testing"))]
impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
            },
            extractor: ExtractorConfig {
                timeout: Duration::from_secs(15),
                ..ExtractorConfig::default()
            },
            proxy: ProxyConfig {
                user_agent: "test-agent/1.0".to_string(),
                connect_timeout: Duration::from_secs(5),
                header_timeout: Duration::from_secs(10),
                idle_timeout: Duration::from_secs(10),
                max_retries: 0,
            },
        }
    }
}
