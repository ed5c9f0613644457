//! URL 验证模块
//!
//! 通用 http(s) 安全检查 + 按平台校验视频 URL 形状

use url::Url;

use crate::repository::Platform;

/// URL 验证错误
#[derive(Debug)]
pub enum UrlValidationError {
    EmptyUrl,
    InvalidProtocol(String),
    InvalidFormat(String),
    PlatformMismatch(Platform),
}

impl std::fmt::Display for UrlValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyUrl => write!(f, "URL cannot be empty"),
            Self::InvalidProtocol(proto) => write!(
                f,
                "Invalid protocol: {}. Only http:// and https:// are allowed",
                proto
            ),
            Self::InvalidFormat(msg) => write!(f, "Invalid URL format: {}", msg),
            Self::PlatformMismatch(platform) => {
                write!(f, "URL does not match platform {}", platform)
            }
        }
    }
}

impl std::error::Error for UrlValidationError {}

/// 验证 URL 基本安全性并解析
///
/// 检查项目：
/// 1. URL 不为空
/// 2. 必须是 http:// 或 https://
/// 3. URL 格式有效
fn parse_checked(url: &str) -> Result<Url, UrlValidationError> {
    let url = url.trim();

    if url.is_empty() {
        return Err(UrlValidationError::EmptyUrl);
    }

    let url_lower = url.to_lowercase();
    if !url_lower.starts_with("http://") && !url_lower.starts_with("https://") {
        let proto = url_lower
            .split(':')
            .next()
            .map(|s| format!("{}:", s))
            .unwrap_or_default();
        return Err(UrlValidationError::InvalidProtocol(proto));
    }

    Url::parse(url).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))
}

fn host_matches(url: &Url, hosts: &[&str]) -> bool {
    match url.host_str() {
        Some(host) => {
            let host = host.to_lowercase();
            hosts.iter().any(|h| host == *h)
        }
        None => false,
    }
}

/// 校验视频 URL 是否符合平台的链接形状
///
/// - youtube：youtube.com/shorts/{id} 或 youtu.be/{id}
/// - instagram：instagram.com/reel/{id}
/// - tiktok：tiktok.com/@{user}/video/{id}
pub fn validate_platform_url(platform: Platform, url: &str) -> Result<(), UrlValidationError> {
    let parsed = parse_checked(url)?;
    let path = parsed.path();

    let matches = match platform {
        Platform::Youtube => {
            let shorts = host_matches(&parsed, &["youtube.com", "www.youtube.com"])
                && path.strip_prefix("/shorts/").is_some_and(|id| !id.is_empty());
            let short_host = host_matches(&parsed, &["youtu.be", "www.youtu.be"])
                && path.len() > 1;
            shorts || short_host
        }
        Platform::Instagram => {
            host_matches(&parsed, &["instagram.com", "www.instagram.com"])
                && path.strip_prefix("/reel/").is_some_and(|id| !id.is_empty())
        }
        Platform::Tiktok => {
            host_matches(&parsed, &["tiktok.com", "www.tiktok.com"])
                && path.starts_with("/@")
                && path
                    .split_once("/video/")
                    .is_some_and(|(_, id)| !id.is_empty())
        }
    };

    if matches {
        Ok(())
    } else {
        Err(UrlValidationError::PlatformMismatch(platform))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn youtube_shorts_and_short_links() {
        assert!(validate_platform_url(
            Platform::Youtube,
            "https://www.youtube.com/shorts/dQw4w9WgXcQ"
        )
        .is_ok());
        assert!(validate_platform_url(Platform::Youtube, "https://youtu.be/dQw4w9WgXcQ").is_ok());
        assert!(
            validate_platform_url(Platform::Youtube, "https://www.youtube.com/watch?v=x").is_err()
        );
    }

    #[test]
    fn instagram_reels_only() {
        assert!(validate_platform_url(
            Platform::Instagram,
            "https://www.instagram.com/reel/Cxyz123/"
        )
        .is_ok());
        assert!(
            validate_platform_url(Platform::Instagram, "https://www.instagram.com/p/Cxyz123/")
                .is_err()
        );
    }

    #[test]
    fn tiktok_video_path() {
        assert!(validate_platform_url(
            Platform::Tiktok,
            "https://www.tiktok.com/@someuser/video/7291234567890"
        )
        .is_ok());
        assert!(
            validate_platform_url(Platform::Tiktok, "https://www.tiktok.com/@someuser").is_err()
        );
    }

    #[test]
    fn cross_platform_urls_rejected() {
        assert!(validate_platform_url(
            Platform::Youtube,
            "https://www.tiktok.com/@someuser/video/7291234567890"
        )
        .is_err());
    }

    #[test]
    fn bad_protocols_rejected() {
        assert!(matches!(
            validate_platform_url(Platform::Youtube, "ftp://youtube.com/shorts/x"),
            Err(UrlValidationError::InvalidProtocol(_))
        ));
        assert!(matches!(
            validate_platform_url(Platform::Youtube, ""),
            Err(UrlValidationError::EmptyUrl)
        ));
    }
}
