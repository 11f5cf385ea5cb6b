// src/platform.rs

//! 平台识别：按固定优先级依次匹配链接，第一个命中的规则胜出。
//! 识别结果只用于前端展示 (主题、图标)，不会阻止对未知平台的解析。

use regex::Regex;
use serde::Serialize;
use std::{fmt, sync::LazyLock};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    YouTube,
    TikTok,
    Instagram,
    Facebook,
    X,
    Unknown,
}

impl Platform {
    pub fn id(&self) -> &'static str {
        match self {
            Platform::YouTube => "youtube",
            Platform::TikTok => "tiktok",
            Platform::Instagram => "instagram",
            Platform::Facebook => "facebook",
            Platform::X => "x",
            Platform::Unknown => "unknown",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Platform::YouTube => "YouTube",
            Platform::TikTok => "TikTok",
            Platform::Instagram => "Instagram",
            Platform::Facebook => "Facebook",
            Platform::X => "X (Twitter)",
            Platform::Unknown => "Unknown",
        }
    }

    pub fn info(&self) -> PlatformInfo {
        PlatformInfo {
            id: *self,
            name: self.display_name(),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// 返回给客户端的平台描述
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlatformInfo {
    pub id: Platform,
    pub name: &'static str,
}

#[derive(Debug)]
pub struct PlatformRule {
    pub platform: Platform,
    pub pattern: Regex,
}

/// 构造只匹配主机部分的模式：协议可选、允许子域名、用户信息和端口。
fn host_pattern(domains: &[&str]) -> Regex {
    let alternatives = domains
        .iter()
        .map(|d| regex::escape(d))
        .collect::<Vec<_>>()
        .join("|");
    let pattern = format!(
        r"(?i)^(?:[a-z][a-z0-9+.\-]*://)?(?:[^/?#@\s]*@)?(?:[a-z0-9\-]+\.)*(?:{})(?::\d+)?(?:[/?#]|$)",
        alternatives
    );
    Regex::new(&pattern).expect("平台匹配规则必须是合法的正则表达式")
}

static RULES: LazyLock<Vec<PlatformRule>> = LazyLock::new(|| {
    vec![
        PlatformRule {
            platform: Platform::YouTube,
            pattern: host_pattern(&["youtube.com", "youtu.be", "youtube-nocookie.com"]),
        },
        PlatformRule {
            platform: Platform::TikTok,
            pattern: host_pattern(&["tiktok.com"]),
        },
        PlatformRule {
            platform: Platform::Instagram,
            pattern: host_pattern(&["instagram.com", "instagr.am"]),
        },
        PlatformRule {
            platform: Platform::Facebook,
            pattern: host_pattern(&["facebook.com", "fb.watch", "fb.com"]),
        },
        PlatformRule {
            platform: Platform::X,
            pattern: host_pattern(&["x.com", "twitter.com"]),
        },
    ]
});

/// 按优先级排列的全部规则
pub fn rules() -> &'static [PlatformRule] {
    &RULES
}

pub fn classify(url: &str) -> Platform {
    let url = url.trim();
    RULES
        .iter()
        .find(|rule| rule.pattern.is_match(url))
        .map_or(Platform::Unknown, |rule| rule.platform)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_known_platforms() {
        let cases = [
            ("https://youtu.be/abc123", Platform::YouTube),
            ("https://www.youtube.com/watch?v=dQw4w9WgXcQ", Platform::YouTube),
            ("https://music.youtube.com/watch?v=1", Platform::YouTube),
            ("https://m.youtube.com/shorts/xyz", Platform::YouTube),
            ("https://www.youtube-nocookie.com/embed/1", Platform::YouTube),
            ("youtu.be/abc123", Platform::YouTube),
            ("HTTPS://WWW.YOUTUBE.COM/watch?v=1", Platform::YouTube),
            ("https://www.tiktok.com/@user/video/7212345678901234567", Platform::TikTok),
            ("https://vm.tiktok.com/ZMabc/", Platform::TikTok),
            ("https://www.instagram.com/reel/Cabc/", Platform::Instagram),
            ("https://instagr.am/p/abc", Platform::Instagram),
            ("https://www.facebook.com/watch/?v=123", Platform::Facebook),
            ("https://fb.watch/abc/", Platform::Facebook),
            ("https://x.com/user/status/1", Platform::X),
            ("https://twitter.com/user/status/1", Platform::X),
            ("https://mobile.twitter.com:443/user/status/1", Platform::X),
        ];
        for (url, expected) in cases {
            assert_eq!(classify(url), expected, "链接 {} 识别错误", url);
        }
    }

    #[test]
    fn test_classify_unknown() {
        let cases = [
            "https://example.com/x",
            "https://notyoutube.com/watch?v=1",
            "https://example.com/?u=https://youtube.com/watch",
            "https://youtube.com.evil.example/watch",
            "https://vimeo.com/123",
            "not a url at all",
            "",
        ];
        for url in cases {
            assert_eq!(classify(url), Platform::Unknown, "链接 {} 不应被识别", url);
        }
    }

    #[test]
    fn test_rules_are_ordered_and_unique() {
        let ids: Vec<_> = rules().iter().map(|r| r.platform.id()).collect();
        assert_eq!(ids, vec!["youtube", "tiktok", "instagram", "facebook", "x"]);
        assert!(!ids.contains(&"unknown"));
    }

    #[test]
    fn test_platform_serializes_lowercase() {
        let json = serde_json::to_value(Platform::YouTube.info()).unwrap();
        assert_eq!(json, serde_json::json!({"id": "youtube", "name": "YouTube"}));
        assert_eq!(Platform::X.to_string(), "x");
    }
}
