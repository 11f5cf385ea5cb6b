// src/normalizer.rs

//! 将解析器输出的原始 JSON 整理为稳定的 `MediaInfo` 结构。
//! 整个过程不会失败：字段缺失或类型不符时退化为默认值。

use crate::{
    constants::media,
    extractor::RawExtraction,
    models::{MediaInfo, NormalizedFormat},
    utils,
};
use itertools::Itertools;
use serde_json::Value;

pub fn normalize(raw: &RawExtraction) -> MediaInfo {
    let root = raw.value();

    let formats = format_descriptors(root)
        .into_iter()
        .enumerate()
        .filter_map(|(index, descriptor)| normalize_format(index, descriptor))
        // 解析器给出的顺序通常是画质从高到低，保留第一次出现的
        .unique_by(|f| (f.ext.clone(), f.note.clone()))
        .collect();

    MediaInfo {
        title: non_empty_str(root.get("title"))
            .or_else(|| non_empty_str(root.get("fulltitle")))
            .unwrap_or(media::UNTITLED)
            .to_string(),
        thumbnail: select_thumbnail(root),
        duration: root
            .get("duration")
            .and_then(Value::as_f64)
            .filter(|d| d.is_finite() && *d >= 0.0),
        formats,
    }
}

/// 没有 `formats` 列表但顶层带有 `url` 时，顶层对象本身就是唯一的格式
fn format_descriptors(root: &Value) -> Vec<&Value> {
    match root.get("formats").and_then(Value::as_array) {
        Some(list) => list.iter().collect(),
        None if root.get("url").is_some() => vec![root],
        None => Vec::new(),
    }
}

fn normalize_format(index: usize, descriptor: &Value) -> Option<NormalizedFormat> {
    let url = descriptor.get("url")?.as_str()?.trim();
    if !utils::has_http_scheme(url) {
        return None;
    }

    let width = descriptor.get("width").and_then(as_dimension);
    let height = descriptor.get("height").and_then(as_dimension);

    let note = non_empty_str(descriptor.get("format_note"))
        .or_else(|| non_empty_str(descriptor.get("format")))
        .map(str::to_string)
        .or_else(|| match (width, height) {
            (Some(w), Some(h)) => Some(format!("{}x{}", w, h)),
            _ => None,
        })
        .unwrap_or_else(|| media::UNKNOWN_NOTE.to_string());

    let size = descriptor
        .get("filesize")
        .and_then(as_size)
        .or_else(|| descriptor.get("filesize_approx").and_then(as_size));

    Some(NormalizedFormat {
        id: format_id(descriptor.get("format_id")).unwrap_or_else(|| index.to_string()),
        ext: non_empty_str(descriptor.get("ext"))
            .unwrap_or(media::UNKNOWN_EXT)
            .to_string(),
        note,
        width,
        height,
        size,
        url: url.to_string(),
    })
}

/// 选出分辨率最高的缩略图：按 (宽×高, 宽, 高) 取最大值，相同时取靠后的
fn select_thumbnail(root: &Value) -> Option<String> {
    let fallback = root
        .get("thumbnail")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|u| utils::has_http_scheme(u));

    let candidates: Vec<(&str, (u64, u64, u64))> = root
        .get("thumbnails")
        .and_then(Value::as_array)
        .map(|list| list.iter().filter_map(thumbnail_candidate).collect())
        .unwrap_or_default();

    // 所有候选都没有尺寸信息时无法比较，优先采用解析器自己选出的顶层缩略图
    if candidates.iter().all(|(_, score)| *score == (0, 0, 0)) {
        return fallback
            .or_else(|| candidates.last().map(|(url, _)| *url))
            .map(str::to_string);
    }

    candidates
        .into_iter()
        .max_by_key(|(_, score)| *score)
        .map(|(url, _)| url.to_string())
}

fn thumbnail_candidate(entry: &Value) -> Option<(&str, (u64, u64, u64))> {
    let url = entry.get("url")?.as_str()?.trim();
    if !utils::has_http_scheme(url) {
        return None;
    }
    let (mut width, mut height) = (
        entry.get("width").and_then(as_dimension),
        entry.get("height").and_then(as_dimension),
    );
    if width.is_none()
        && height.is_none()
        && let Some((w, h)) = entry
            .get("resolution")
            .and_then(Value::as_str)
            .and_then(parse_resolution)
    {
        (width, height) = (Some(w), Some(h));
    }
    let w = u64::from(width.unwrap_or(0));
    let h = u64::from(height.unwrap_or(0));
    Some((url, (w * h, w, h)))
}

/// 解析 "1280x720" 形式的分辨率字符串
fn parse_resolution(text: &str) -> Option<(u32, u32)> {
    let (w, h) = text.trim().split_once(['x', 'X'])?;
    Some((w.trim().parse().ok()?, h.trim().parse().ok()?))
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn format_id(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn as_dimension(value: &Value) -> Option<u32> {
    if let Some(n) = value.as_u64() {
        return u32::try_from(n).ok();
    }
    value
        .as_f64()
        .filter(|f| f.is_finite() && *f >= 0.0 && *f <= f64::from(u32::MAX))
        .map(|f| f as u32)
}

fn as_size(value: &Value) -> Option<u64> {
    if let Some(n) = value.as_u64() {
        return Some(n);
    }
    value
        .as_f64()
        .filter(|f| f.is_finite() && *f >= 0.0)
        .map(|f| f.round() as u64)
}
