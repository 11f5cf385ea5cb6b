// src/utils.rs

use crate::error::{AppError, AppResult};
use url::Url;

/// 判断字符串是否以 `http://` 或 `https://` 开头 (协议名大小写不敏感)
pub fn has_http_scheme(text: &str) -> bool {
    let lower = text
        .get(..8)
        .map(|s| s.to_ascii_lowercase())
        .unwrap_or_else(|| text.to_ascii_lowercase());
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// 解析并校验一个绝对的 HTTP(S) 地址，要求包含主机名
pub fn parse_http_url(text: &str) -> Option<Url> {
    let url = Url::parse(text.trim()).ok()?;
    match url.scheme() {
        "http" | "https" if url.host_str().is_some_and(|h| !h.is_empty()) => Some(url),
        _ => None,
    }
}

/// 规范化用户粘贴的链接：去除首尾空白，缺少协议时补全 `https://`
pub fn normalize_input_url(input: Option<&str>) -> AppResult<String> {
    let raw = input.map(str::trim).unwrap_or_default();
    if raw.is_empty() {
        return Err(AppError::Validation("缺少 URL 参数".to_string()));
    }
    let candidate = if raw.contains("://") {
        raw.to_string()
    } else {
        format!("https://{}", raw)
    };
    parse_http_url(&candidate)
        .map(String::from)
        .ok_or_else(|| AppError::Validation(format!("无效的链接: '{}'", truncate_text(raw, 120))))
}

pub fn truncate_text(text: &str, max_width: usize) -> String {
    let mut width = 0;
    let mut end_pos = 0;
    for (i, c) in text.char_indices() {
        width += if c.is_ascii() { 1 } else { 2 };
        if width > max_width.saturating_sub(3) {
            end_pos = i;
            break;
        }
    }
    if end_pos == 0 { text.to_string() } else { format!("{}...", &text[..end_pos]) }
}

/// 保留字节流末尾最多 `max_bytes` 个字节，并转为 UTF-8 文本 (yt-dlp 的关键报错通常在最后几行)
pub fn tail_lossy(bytes: &[u8], max_bytes: usize) -> String {
    let text = String::from_utf8_lossy(bytes);
    let trimmed = text.trim();
    if trimmed.len() <= max_bytes {
        return trimmed.to_string();
    }
    let mut start = trimmed.len() - max_bytes;
    while start < trimmed.len() && !trimmed.is_char_boundary(start) {
        start += 1;
    }
    format!("...{}", &trimmed[start..])
}

/// 保留文本开头最多 `max_bytes` 个字节
pub fn head_lossy(bytes: &[u8], max_bytes: usize) -> String {
    let text = String::from_utf8_lossy(bytes);
    let trimmed = text.trim();
    if trimmed.len() <= max_bytes {
        return trimmed.to_string();
    }
    let mut end = max_bytes;
    while end > 0 && !trimmed.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &trimmed[..end])
}
