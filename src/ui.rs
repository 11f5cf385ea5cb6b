// src/ui.rs

use crate::constants;
use colored::*;

pub fn box_message(title: &str, content: &[String], color_func: fn(ColoredString) -> ColoredString) {
    println!("\n┌{}┐", "─".repeat(constants::UI_WIDTH - 2));
    println!("  {}", color_func(title.bold()));
    println!("├{}┤", "─".repeat(constants::UI_WIDTH - 2));
    for line in content {
        println!("  {}", line);
    }
    println!("└{}┘", "─".repeat(constants::UI_WIDTH - 2));
}

/// 启动时打印的服务信息
pub fn startup_lines(addr: &str, extractor_status: &str) -> Vec<String> {
    vec![
        format!("监听地址:  http://{}", addr),
        format!("解析器:    {}", extractor_status),
        String::new(),
        format!("{}  POST /api/fetch      解析媒体链接", "▸".cyan()),
        format!("{}  GET  /api/proxy      代理下载", "▸".cyan()),
        format!("{}  GET  /api/platforms  支持的平台", "▸".cyan()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_startup_lines_mention_address_and_routes() {
        let lines = startup_lines("127.0.0.1:4000", "yt-dlp 2024.08.06");
        assert!(lines[0].contains("http://127.0.0.1:4000"));
        assert!(lines[1].contains("2024.08.06"));
        assert!(lines.iter().any(|l| l.contains("/api/proxy")));
    }
}
