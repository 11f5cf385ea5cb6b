// src/logger.rs

use crate::cli::LogLevel;
use fern::colors::{Color, ColoredLevelConfig};
use std::path::Path;

/// 初始化日志系统：始终输出到 stderr，可选地同时写入文件
pub fn init_logger(level: LogLevel, log_file: Option<&Path>) {
    if level == LogLevel::Off {
        return;
    }

    let colors = ColoredLevelConfig::new()
        .error(Color::Red)
        .warn(Color::Yellow)
        .info(Color::Cyan)
        .debug(Color::White)
        .trace(Color::BrightBlack);

    let stderr_dispatch = fern::Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "[{}] [{:<5}] [{}] - {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                colors.color(record.level()),
                record.target(),
                message
            ))
        })
        .chain(std::io::stderr());

    let mut root = fern::Dispatch::new()
        .level(level.into())
        // 依赖库的日志过于嘈杂，只保留警告
        .level_for("hyper", log::LevelFilter::Warn)
        .level_for("hyper_util", log::LevelFilter::Warn)
        .level_for("reqwest", log::LevelFilter::Warn)
        .level_for("rustls", log::LevelFilter::Warn)
        .chain(stderr_dispatch);

    if let Some(path) = log_file {
        if let Some(dir) = path.parent()
            && !dir.as_os_str().is_empty()
            && let Err(e) = std::fs::create_dir_all(dir)
        {
            eprintln!("警告: 无法创建日志目录 {:?}: {}", dir, e);
        }
        match fern::log_file(path) {
            Ok(file) => {
                root = root.chain(
                    fern::Dispatch::new()
                        .format(|out, message, record| {
                            out.finish(format_args!(
                                "[{}] [{:<5}] [{}:{}] - {}",
                                chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                                record.level(),
                                record.target(),
                                record.line().unwrap_or(0),
                                message
                            ))
                        })
                        .chain(file),
                );
            }
            Err(e) => {
                eprintln!("警告: 无法打开日志文件 {:?}: {}。日志将只输出到终端。", path, e);
            }
        }
    }

    if let Err(e) = root.apply() {
        eprintln!("警告: 日志系统初始化失败: {}", e);
    }
}
