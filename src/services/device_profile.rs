//! User-Agent parsing into device/browser details
//!
//! Uses woothee to turn the raw header into the two display strings the
//! device-distribution report groups on.

use woothee::parser::Parser;

/// Parsed device/browser display details
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceProfile {
    pub device_details: String,
    pub browser_details: String,
}

/// Parse a User-Agent header value
///
/// Returns None for an empty or unparseable UA string; callers treat a
/// missing profile as "nothing to record", never as an error.
pub fn parse_user_agent(ua_string: &str) -> Option<DeviceProfile> {
    let ua_string = ua_string.trim();
    if ua_string.is_empty() {
        return None;
    }

    let parser = Parser::new();
    let result = parser.parse(ua_string)?;

    let category = known(result.category);
    let os = known(result.os);
    let browser = known(result.name);
    let version = if result.version.is_empty() || result.version == "UNKNOWN" {
        None
    } else {
        Some(result.version.to_string())
    };

    let device_details = match (category, os) {
        (Some(category), Some(os)) => format!("{} / {}", category, os),
        (Some(category), None) => category.to_string(),
        (None, Some(os)) => os.to_string(),
        (None, None) => "Unknown".to_string(),
    };

    let browser_details = match (browser, version) {
        (Some(browser), Some(version)) => format!("{} {}", browser, version),
        (Some(browser), None) => browser.to_string(),
        (None, _) => "Unknown".to_string(),
    };

    Some(DeviceProfile {
        device_details,
        browser_details,
    })
}

fn known(value: &str) -> Option<&str> {
    if value.is_empty() || value == "UNKNOWN" {
        None
    } else {
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_desktop_chrome() {
        let ua = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                  (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
        let profile = parse_user_agent(ua).unwrap();
        assert!(profile.device_details.contains("pc"));
        assert!(profile.browser_details.starts_with("Chrome"));
    }

    #[test]
    fn empty_ua_yields_none() {
        assert!(parse_user_agent("").is_none());
        assert!(parse_user_agent("   ").is_none());
    }
}
